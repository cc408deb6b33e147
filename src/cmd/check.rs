//! Check command - can a vehicle of this age be imported at all

use crate::cmd::TariffArgs;
use crate::tax::landed::vehicle_age;
use crate::tax::{check_eligibility, Eligibility};
use clap::Args;

#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Year of manufacture
    #[arg(short, long)]
    year: i32,

    #[command(flatten)]
    tariff: TariffArgs,
}

impl CheckCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = self.tariff.load_config()?;
        let as_of_year = self.tariff.as_of_year();
        let age = vehicle_age(self.year, as_of_year)?;

        match check_eligibility(age, &config.age_limits) {
            Eligibility::Eligible => {
                println!(
                    "\u{2713} Eligible: {} years old (limit {})",
                    age, config.age_limits.general_limit
                );
                Ok(())
            }
            Eligibility::Rejected(reason) => {
                println!("\u{2717} Not eligible: {}", reason);
                std::process::exit(1);
            }
        }
    }
}
