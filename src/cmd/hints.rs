//! Hints command - suggested vehicle details from a listing page

use crate::cmd::TariffArgs;
use crate::domain::hints::HintSource;
use crate::listing::HttpHintSource;
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct HintsCommand {
    /// Listing page URL
    url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    #[command(flatten)]
    tariff: TariffArgs,
}

impl HintsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = self.tariff.load_config()?;
        let known_makes = config.valuation.base_values.keys().cloned().collect();
        let source = HttpHintSource::new(Duration::from_secs(self.timeout), known_makes);
        let hints = source.fetch_hints(&self.url)?;
        if hints.is_empty() {
            eprintln!("No details recognised on the page");
        } else {
            eprintln!("Suggestions only: confirm each value before passing it to `calc`");
        }
        println!("{}", serde_json::to_string_pretty(&hints)?);
        Ok(())
    }
}
