//! Calc command - landed cost of a single vehicle

use crate::cmd::TariffArgs;
use crate::domain::summary::{build_summary, summary_file_name, write_summary_csv, SummaryVehicle};
use crate::money::{display_amount, display_money, display_pct};
use crate::tax::{
    compare_with_local_market, compute_costs, CostBreakdown, FobSource, MarketComparison,
    Recommendation, TariffConfig, VehicleInput,
};
use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalcCommand {
    /// Vehicle make (e.g. Toyota)
    #[arg(long)]
    make: String,

    /// Vehicle model (e.g. Harrier)
    #[arg(long)]
    model: String,

    /// Year of manufacture
    #[arg(short, long)]
    year: i32,

    /// Engine displacement in litres
    #[arg(short, long)]
    engine: Decimal,

    /// FOB price in USD
    #[arg(long)]
    fob: Option<Decimal>,

    /// Estimate the FOB price from make and age when --fob is not given
    #[arg(long)]
    estimate_fob: bool,

    /// Freight cost in USD
    #[arg(long, default_value = "1200")]
    freight: Decimal,

    /// Insurance cost in USD
    #[arg(long, default_value = "300")]
    insurance: Decimal,

    /// Write the item/value summary CSV to this file (or directory)
    #[arg(long)]
    export: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    tariff: TariffArgs,
}

#[derive(Debug, Serialize)]
struct CalcOutput<'a> {
    make: &'a str,
    model: &'a str,
    year: i32,
    age: i32,
    engine_liters: Decimal,
    fob_source: FobSource,
    local_currency: &'a str,
    costs: &'a CostBreakdown,
    grand_total_usd: Decimal,
    market: MarketComparison,
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "USD")]
    usd: String,
    #[tabled(rename = "Local")]
    local: String,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = self.tariff.load_config()?;
        let as_of_year = self.tariff.as_of_year();

        let vehicle = VehicleInput {
            make: self.make.trim().to_uppercase(),
            model: self.model.trim().to_string(),
            year: self.year,
            engine_liters: self.engine,
            fob_usd: self.fob,
            freight_usd: self.freight,
            insurance_usd: self.insurance,
        };

        let (input, fob_source) = vehicle.cost_input(as_of_year, self.estimate_fob, &config)?;
        let costs = compute_costs(&input, &config)?;
        let market = compare_with_local_market(costs.grand_total, config.local_market_markup)?;

        if let Some(path) = &self.export {
            self.export_summary(path, &vehicle, &costs, &config)?;
        }

        if self.json {
            let output = CalcOutput {
                make: &vehicle.make,
                model: &vehicle.model,
                year: vehicle.year,
                age: input.age,
                engine_liters: vehicle.engine_liters,
                fob_source,
                local_currency: &config.local_currency,
                costs: &costs,
                grand_total_usd: costs.grand_total_usd(),
                market,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            self.print_report(&vehicle, input.age, fob_source, &costs, &market, &config);
        }
        Ok(())
    }

    fn export_summary(
        &self,
        path: &Path,
        vehicle: &VehicleInput,
        costs: &CostBreakdown,
        config: &TariffConfig,
    ) -> anyhow::Result<()> {
        let path = if path.is_dir() {
            path.join(summary_file_name(&vehicle.make, &vehicle.model, vehicle.year))
        } else {
            path.to_path_buf()
        };
        let summary_vehicle = SummaryVehicle {
            make: &vehicle.make,
            model: &vehicle.model,
            year: vehicle.year,
            engine_liters: vehicle.engine_liters,
        };
        let lines = build_summary(&summary_vehicle, costs, &config.local_currency);
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        write_summary_csv(&lines, file)?;
        log::info!("Summary written to {}", path.display());
        Ok(())
    }

    fn print_report(
        &self,
        vehicle: &VehicleInput,
        age: i32,
        fob_source: FobSource,
        costs: &CostBreakdown,
        market: &MarketComparison,
        config: &TariffConfig,
    ) {
        let cur = config.local_currency.as_str();
        let rate = costs.exchange_rate;
        let d = &costs.duties;
        let f = &costs.fees;

        println!();
        println!("{} {} ({})", vehicle.make, vehicle.model, vehicle.year);
        println!("Engine: {}L | Age: {} years", vehicle.engine_liters.normalize(), age);
        if fob_source == FobSource::Estimated {
            println!("FOB value is an approximate estimate, not a market valuation");
        }
        println!();

        let usd_row = |item: &str, rate_pct: Option<Decimal>, usd: Decimal| BreakdownRow {
            item: item.to_string(),
            rate: rate_pct.map(display_pct).unwrap_or_default(),
            usd: display_amount(usd),
            local: display_amount(usd * rate),
        };
        let local_row = |item: &str, local: Decimal| BreakdownRow {
            item: item.to_string(),
            rate: String::new(),
            usd: String::new(),
            local: display_amount(local),
        };

        let duties = &config.duties;
        let rows = vec![
            usd_row("FOB value", None, d.fob_usd),
            usd_row("Freight", None, d.freight_usd),
            usd_row("Insurance", None, d.insurance_usd),
            BreakdownRow {
                local: display_amount(costs.cif_local()),
                ..usd_row("CIF value", None, d.cif_usd)
            },
            usd_row("Customs duty", Some(duties.customs_duty), d.customs_duty),
            usd_row("Excise duty", Some(d.excise_rate), d.excise_duty),
            usd_row("VAT", Some(duties.vat), d.vat),
            usd_row("Import declaration fee", Some(duties.declaration_fee), d.declaration_fee),
            usd_row("Railway development levy", Some(duties.rail_levy), d.rail_levy),
            BreakdownRow {
                local: display_amount(costs.taxes_local()),
                ..usd_row("Total statutory taxes", None, d.total_statutory_taxes)
            },
            local_row("Clearing agent", f.clearing_agent),
            local_row("Inland transport", f.inland_transport),
            local_row("Port handling", f.port_handling),
            local_row("Inspection", f.inspection),
            local_row("Registration & plates", f.registration),
            local_row("Total other fees", f.total),
        ];

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();

        println!("Exchange rate: 1 USD = {} {}", rate.normalize(), cur);
        println!("GRAND TOTAL: {}", display_money(cur, costs.grand_total));
        println!("  (approximately {})", display_money("USD", costs.grand_total_usd()));
        println!();

        println!(
            "Estimated local yard price: {}",
            display_money(cur, market.estimated_local_price)
        );
        match market.recommendation {
            Recommendation::Import => println!(
                "Importing could save {} ({:.1}%)",
                display_money(cur, market.potential_savings),
                market.savings_pct
            ),
            Recommendation::BuyLocally => {
                println!("Buying locally may be more economical for this vehicle")
            }
        }
    }
}
