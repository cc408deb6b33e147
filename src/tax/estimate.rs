//! Heuristic FOB estimate for when no purchase price is known.
//!
//! Approximate only: a fixed base value per make, depreciated by a flat
//! annual rate. It is not a market valuation.

use crate::tax::landed::{vehicle_age, InvalidInput};
use crate::tax::tariff::Valuation;
use rust_decimal::Decimal;

/// Estimate the FOB value in USD of a `make` built in `year`.
pub fn estimate_fob(
    year: i32,
    make: &str,
    as_of_year: i32,
    valuation: &Valuation,
) -> Result<Decimal, InvalidInput> {
    let age = vehicle_age(year, as_of_year)?;

    let key = make.trim().to_uppercase();
    let base = match valuation.base_values.get(&key) {
        Some(value) => *value,
        None => {
            log::debug!("No base value for make '{}', using default", key);
            valuation.default_base_value
        }
    };

    let retained = Decimal::ONE - valuation.depreciation_rate;
    let mut estimate = base;
    for _ in 0..age {
        let next = estimate * retained;
        // stop once the floor is reached or the value no longer moves
        if estimate <= valuation.minimum_value || next == estimate {
            break;
        }
        estimate = next;
    }
    let estimate = estimate.max(valuation.minimum_value);

    log::debug!(
        "Estimated FOB for {} ({}, age {}): base={}, estimate={}",
        key,
        year,
        age,
        base,
        estimate
    );
    Ok(estimate)
}
