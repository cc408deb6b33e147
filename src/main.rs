use clap::{Parser, Subcommand};

mod cmd;
mod domain;
mod ingest;
mod listing;
mod money;
mod tax;

/// Landed cost calculator for used vehicle imports
#[derive(Parser, Debug)]
#[command(name = "landed", version, about)]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full duty, levy and fee breakdown for one vehicle
    Calc(cmd::calc::CalcCommand),
    /// Look a vehicle up in a reference price table
    Search(cmd::search::SearchCommand),
    /// Check whether a vehicle is young enough to import
    Check(cmd::check::CheckCommand),
    /// Approximate FOB value from make and year
    Estimate(cmd::estimate::EstimateCommand),
    /// Landed cost for every vehicle in a CSV file
    Batch(cmd::batch::BatchCommand),
    /// Suggested vehicle details from a listing page
    Hints(cmd::hints::HintsCommand),
    /// Print expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    match opts.command {
        Command::Calc(calc) => calc.exec(),
        Command::Search(search) => search.exec(),
        Command::Check(check) => check.exec(),
        Command::Estimate(estimate) => estimate.exec(),
        Command::Batch(batch) => batch.exec(),
        Command::Hints(hints) => hints.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
