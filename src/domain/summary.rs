//! Flat item/value summary of a calculation, for download as CSV.

use crate::money::display_amount;
use crate::tax::CostBreakdown;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    #[serde(rename = "Item")]
    pub item: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// The vehicle a summary describes
#[derive(Debug, Clone)]
pub struct SummaryVehicle<'a> {
    pub make: &'a str,
    pub model: &'a str,
    pub year: i32,
    pub engine_liters: Decimal,
}

pub fn build_summary(
    vehicle: &SummaryVehicle,
    costs: &CostBreakdown,
    local_currency: &str,
) -> Vec<SummaryLine> {
    let line = |item: String, value: String| SummaryLine { item, value };
    vec![
        line(
            "Vehicle".into(),
            format!("{} {}", vehicle.make, vehicle.model),
        ),
        line("Year".into(), vehicle.year.to_string()),
        line(
            "Engine Size (L)".into(),
            vehicle.engine_liters.normalize().to_string(),
        ),
        line(
            "FOB Value (USD)".into(),
            display_amount(costs.duties.fob_usd),
        ),
        line(
            "CIF Value (USD)".into(),
            display_amount(costs.duties.cif_usd),
        ),
        line(
            "Total Statutory Taxes (USD)".into(),
            display_amount(costs.duties.total_statutory_taxes),
        ),
        line(
            format!("Other Fees ({})", local_currency),
            display_amount(costs.fees.total),
        ),
        line(
            format!("Exchange Rate (USD \u{2192} {})", local_currency),
            costs.exchange_rate.normalize().to_string(),
        ),
        line(
            format!("GRAND TOTAL ({})", local_currency),
            display_amount(costs.grand_total),
        ),
    ]
}

pub fn write_summary_csv<W: Write>(lines: &[SummaryLine], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for line in lines {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Suggested download name, e.g. `TOYOTA_HARRIER_2021_import_summary.csv`
pub fn summary_file_name(make: &str, model: &str, year: i32) -> String {
    let clean = |s: &str| {
        s.split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .replace(['/', '\\'], "-")
    };
    format!("{}_{}_{}_import_summary.csv", clean(make), clean(model), year)
}
