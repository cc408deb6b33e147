//! Search command - look a vehicle up in a reference price table

use crate::domain::reference::{
    extract_engine_size, normalize_reference_table, search_reference_table, ReferenceRow,
    ReferenceTable,
};
use crate::ingest::read_table;
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Reference table (csv, xlsx, xls, ods). Reads CSV from stdin with "-".
    #[arg(short, long)]
    reference: PathBuf,

    /// Worksheet to read from a spreadsheet (defaults to the first)
    #[arg(long)]
    sheet: Option<String>,

    /// Make to search for (substring, case-insensitive)
    #[arg(long)]
    make: String,

    /// Model to search for (substring, case-insensitive)
    #[arg(long)]
    model: String,

    /// Show at most this many matches
    #[arg(short, long)]
    limit: Option<usize>,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SearchOutput {
    table_sha256: String,
    total_matches: usize,
    matches: Vec<BTreeMap<String, String>>,
}

impl SearchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let raw = read_table(&self.reference, self.sheet.as_deref())?;
        let table = normalize_reference_table(&raw)?;
        if table.is_empty() {
            log::warn!("Reference table {} has no data rows", self.reference.display());
        } else {
            log::info!("Searching {} reference rows", table.len());
        }

        let matches = search_reference_table(&self.make, &self.model, &table);
        let total = matches.len();
        // display truncation only
        let shown: Vec<_> = matches
            .into_iter()
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();

        if self.json {
            let output = SearchOutput {
                table_sha256: table.fingerprint().to_string(),
                total_matches: total,
                matches: shown
                    .iter()
                    .map(|row| {
                        table
                            .columns()
                            .iter()
                            .cloned()
                            .zip(row.values.iter().cloned())
                            .collect()
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        if total == 0 {
            println!(
                "No vehicles matching '{}' / '{}' in the reference table; enter the details manually",
                self.make.trim(),
                self.model.trim()
            );
            return Ok(());
        }

        print_matches(&table, &shown);
        if shown.len() < total {
            println!("Showing {} of {} matches", shown.len(), total);
        } else {
            println!("{} match(es)", total);
        }
        Ok(())
    }
}

fn print_matches(table: &ReferenceTable, rows: &[&ReferenceRow]) {
    let mut builder = Builder::default();
    let mut header: Vec<String> = table.columns().to_vec();
    header.push("ENGINE (L, GUESS)".to_string());
    builder.push_record(header);

    for row in rows {
        let mut record = row.values.clone();
        record.push(
            extract_engine_size(&row.model)
                .map(|l| l.normalize().to_string())
                .unwrap_or_default(),
        );
        builder.push_record(record);
    }

    let mut out = builder.build();
    out.with(Style::rounded());
    println!("{}", out);
}
