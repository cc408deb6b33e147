//! Batch command - landed cost for every vehicle in a CSV file

use crate::cmd::TariffArgs;
use crate::ingest::decode_text;
use crate::money::display_amount;
use crate::tax::{compute_costs, CostBreakdown, CostError, FobSource, TariffConfig, VehicleInput};
use anyhow::Context;
use clap::Args;
use landed_derive::CsvSchema;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// Description of one input CSV column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// One vehicle per row of the batch input
#[derive(Debug, Clone, Deserialize, CsvSchema)]
pub struct VehicleRecord {
    /// Vehicle make (e.g. TOYOTA)
    pub make: String,
    /// Vehicle model (e.g. HARRIER)
    pub model: String,
    /// Year of manufacture
    pub year: i32,
    /// Engine displacement in litres
    pub engine_liters: Decimal,
    /// FOB price in USD (blank to estimate with --estimate-fob)
    #[serde(default)]
    pub fob_usd: Option<Decimal>,
    /// Freight cost in USD
    pub freight_usd: Decimal,
    /// Insurance cost in USD
    pub insurance_usd: Decimal,
}

impl From<VehicleRecord> for VehicleInput {
    fn from(record: VehicleRecord) -> Self {
        VehicleInput {
            make: record.make.trim().to_uppercase(),
            model: record.model.trim().to_string(),
            year: record.year,
            engine_liters: record.engine_liters,
            fob_usd: record.fob_usd,
            freight_usd: record.freight_usd,
            insurance_usd: record.insurance_usd,
        }
    }
}

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// CSV file of vehicles (see `schema csv-fields`)
    #[arg(short, long)]
    vehicles: PathBuf,

    /// Estimate FOB for rows that leave fob_usd blank
    #[arg(long)]
    estimate_fob: bool,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,

    #[command(flatten)]
    tariff: TariffArgs,
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct BatchRow {
    #[tabled(rename = "#")]
    #[serde(rename = "row_num")]
    pub row_num: usize,

    #[tabled(rename = "Vehicle")]
    pub vehicle: String,

    #[tabled(rename = "Year")]
    pub year: String,

    #[tabled(rename = "FOB (USD)")]
    pub fob_usd: String,

    #[tabled(rename = "CIF (USD)")]
    pub cif_usd: String,

    #[tabled(rename = "Taxes (USD)")]
    pub taxes_usd: String,

    #[tabled(rename = "Other Fees")]
    pub other_fees: String,

    #[tabled(rename = "Grand Total")]
    pub grand_total: String,

    #[tabled(rename = "Status")]
    pub status: String,
}

impl BatchRow {
    fn computed(
        row_num: usize,
        vehicle: &VehicleInput,
        costs: &CostBreakdown,
        source: FobSource,
    ) -> Self {
        let status = match source {
            FobSource::Supplied => "OK",
            FobSource::Estimated => "OK (FOB estimated)",
        };
        BatchRow {
            row_num,
            vehicle: format!("{} {}", vehicle.make, vehicle.model),
            year: vehicle.year.to_string(),
            fob_usd: display_amount(costs.duties.fob_usd),
            cif_usd: display_amount(costs.duties.cif_usd),
            taxes_usd: display_amount(costs.duties.total_statutory_taxes),
            other_fees: display_amount(costs.fees.total),
            grand_total: display_amount(costs.grand_total),
            status: status.to_string(),
        }
    }

    fn failed(row_num: usize, vehicle: Option<&VehicleInput>, status: String) -> Self {
        BatchRow {
            row_num,
            vehicle: vehicle.map_or(String::new(), |v| format!("{} {}", v.make, v.model)),
            year: vehicle.map_or(String::new(), |v| v.year.to_string()),
            fob_usd: String::new(),
            cif_usd: String::new(),
            taxes_usd: String::new(),
            other_fees: String::new(),
            grand_total: String::new(),
            status,
        }
    }
}

/// Compute every row. A row that fails carries its reason and no figures.
pub fn process_batch(
    text: &str,
    config: &TariffConfig,
    as_of_year: i32,
    estimate_missing_fob: bool,
) -> anyhow::Result<Vec<BatchRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<VehicleRecord>().enumerate() {
        let row_num = idx + 1;
        let vehicle: VehicleInput = match result {
            Ok(record) => record.into(),
            Err(err) => {
                log::debug!("Row {} unreadable: {}", row_num, err);
                rows.push(BatchRow::failed(row_num, None, format!("Invalid: {}", err)));
                continue;
            }
        };

        let outcome = vehicle
            .cost_input(as_of_year, estimate_missing_fob, config)
            .map_err(CostError::from)
            .and_then(|(input, source)| compute_costs(&input, config).map(|c| (c, source)));

        let row = match outcome {
            Ok((costs, source)) => BatchRow::computed(row_num, &vehicle, &costs, source),
            Err(CostError::Rejected(reason)) => {
                BatchRow::failed(row_num, Some(&vehicle), format!("Rejected: {}", reason))
            }
            Err(err) => BatchRow::failed(row_num, Some(&vehicle), format!("Invalid: {}", err)),
        };
        rows.push(row);
    }

    log::info!("Processed {} vehicles", rows.len());
    Ok(rows)
}

impl BatchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = self.tariff.load_config()?;
        let bytes = std::fs::read(&self.vehicles)
            .with_context(|| format!("reading {}", self.vehicles.display()))?;
        let text = decode_text(&bytes);

        let rows = process_batch(&text, &config, self.tariff.as_of_year(), self.estimate_fob)?;

        if self.csv {
            self.write_csv(&rows)
        } else {
            self.print_table(&rows, &config.local_currency);
            Ok(())
        }
    }

    fn print_table(&self, rows: &[BatchRow], currency: &str) {
        if rows.is_empty() {
            println!("No vehicles found in {}", self.vehicles.display());
            return;
        }

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!("Other fees and grand totals in {}", currency);
    }

    fn write_csv(&self, rows: &[BatchRow]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "make,model,year,engine_liters,fob_usd,freight_usd,insurance_usd";

    fn run(body: &str, estimate: bool) -> Vec<BatchRow> {
        let text = format!("{}\n{}", HEADER, body);
        process_batch(&text, &TariffConfig::default(), 2025, estimate).unwrap()
    }

    #[test]
    fn computes_each_row() {
        let rows = run(
            "toyota,Harrier,2021,2.0,15000,1200,300\nNISSAN,Note,2020,1.2,6000,1100,250\n",
            false,
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].vehicle, "TOYOTA Harrier");
        assert_eq!(rows[0].cif_usd, "16,500.00");
        assert_eq!(rows[0].taxes_usd, "13,004.06");
        assert_eq!(rows[0].grand_total, "3,867,024.06");
        assert_eq!(rows[0].status, "OK");
        assert_eq!(rows[1].status, "OK");
    }

    #[test]
    fn rejected_rows_carry_no_figures() {
        let rows = run("BMW,X5,2015,3.0,20000,1500,400\n", false);
        assert!(rows[0].status.starts_with("Rejected: vehicle exceeds maximum importable age"));
        assert!(rows[0].grand_total.is_empty());
        assert!(rows[0].cif_usd.is_empty());
    }

    #[test]
    fn blank_fob_needs_estimate_flag() {
        let body = "MAZDA,CX-5,2022,2.5,,1200,300\n";
        let rows = run(body, false);
        assert!(rows[0].status.starts_with("Invalid: invalid input: no FOB value given"));

        let rows = run(body, true);
        assert_eq!(rows[0].status, "OK (FOB estimated)");
        // 18000 * 0.85^3
        assert_eq!(rows[0].fob_usd, "11,054.25");
    }

    #[test]
    fn oversized_fob_is_reported_per_row() {
        let rows = run(
            "TOYOTA,Harrier,2021,2.0,39614081257132168796771975167,1200,300\n\
             TOYOTA,Harrier,2021,2.0,15000,1200,300\n",
            false,
        );
        assert_eq!(rows[0].status, "Invalid: amounts are too large to compute");
        assert!(rows[0].grand_total.is_empty());
        assert_eq!(rows[1].status, "OK");
    }

    #[test]
    fn unreadable_row_does_not_stop_the_batch() {
        let rows = run(
            "HONDA,Fit,not-a-year,1.3,5000,1000,200\nHONDA,Vezel,2021,1.5,9000,1000,200\n",
            false,
        );
        assert_eq!(rows.len(), 2);
        assert!(rows[0].status.starts_with("Invalid:"));
        assert_eq!(rows[1].status, "OK");
    }

    #[test]
    fn schema_lists_columns() {
        let fields = VehicleRecord::csv_schema();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(names, HEADER.split(',').collect::<Vec<_>>());
        let fob = fields.iter().find(|f| f.name == "fob_usd").unwrap();
        assert!(!fob.required);
        assert!(fields.iter().filter(|f| f.name != "fob_usd").all(|f| f.required));
        assert_eq!(fields[2].description, "Year of manufacture");
    }
}
