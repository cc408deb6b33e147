pub mod batch;
pub mod calc;
pub mod check;
pub mod estimate;
pub mod hints;
pub mod schema;
pub mod search;

use crate::tax::TariffConfig;
use anyhow::Context;
use chrono::Datelike;
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Options shared by every command that applies the tariff
#[derive(Args, Debug)]
pub struct TariffArgs {
    /// JSON file overriding tariff constants (see `schema json-schema`)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Year vehicle ages are measured against (defaults to the current year)
    #[arg(long)]
    as_of_year: Option<i32>,
}

impl TariffArgs {
    pub fn load_config(&self) -> anyhow::Result<TariffConfig> {
        match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("opening config {}", path.display()))?;
                let config = TariffConfig::from_json(BufReader::new(file))
                    .with_context(|| format!("loading config {}", path.display()))?;
                log::info!("Loaded tariff overrides from {}", path.display());
                Ok(config)
            }
            None => Ok(TariffConfig::default()),
        }
    }

    pub fn as_of_year(&self) -> i32 {
        self.as_of_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }
}
