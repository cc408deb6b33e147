use rust_decimal::{Decimal, RoundingStrategy};

/// Two decimal places with thousands separators, e.g. `3,867,024.06`.
/// Display only.
pub fn display_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let formatted = format!("{:.2}", rounded.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// `display_amount` prefixed with a currency code
pub fn display_money(currency: &str, amount: Decimal) -> String {
    format!("{} {}", currency, display_amount(amount))
}

/// A rate as a percentage without trailing zeros, e.g. `0.0225` -> `2.25%`
pub fn display_pct(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}
