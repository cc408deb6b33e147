//! Schema command - print expected input formats

use crate::cmd::batch::VehicleRecord;
use crate::tax::TariffConfig;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema (tariff config), csv-header or csv-fields (batch input)
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for tariff override files
    JsonSchema,
    /// CSV header row for batch input
    CsvHeader,
    /// Batch input column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(TariffConfig);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        let names: Vec<_> = VehicleRecord::csv_schema().iter().map(|f| f.name).collect();
        println!("{}", names.join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Batch CSV Input Format");
        println!("======================");
        println!();
        for field in VehicleRecord::csv_schema() {
            let req = if field.required { "required" } else { "optional" };
            println!("{:15} ({:8})  {}", field.name, req, field.description);
        }
        println!();
        println!("Amounts are USD; engine size in litres (e.g. 1.8)");
        Ok(())
    }
}
