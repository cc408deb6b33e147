//! Estimate command - rough FOB value when no price is known

use crate::cmd::TariffArgs;
use crate::money::display_money;
use crate::tax::estimate_fob;
use clap::Args;

#[derive(Args, Debug)]
pub struct EstimateCommand {
    /// Year of manufacture
    #[arg(short, long)]
    year: i32,

    /// Vehicle make (e.g. Toyota)
    #[arg(long)]
    make: String,

    #[command(flatten)]
    tariff: TariffArgs,
}

impl EstimateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = self.tariff.load_config()?;
        let estimate = estimate_fob(
            self.year,
            &self.make,
            self.tariff.as_of_year(),
            &config.valuation,
        )?;
        println!(
            "Estimated FOB for a {} {}: {} (approximate)",
            self.year,
            self.make.trim().to_uppercase(),
            display_money("USD", estimate)
        );
        Ok(())
    }
}
