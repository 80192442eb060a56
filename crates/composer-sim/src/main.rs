use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    batch::{self, BatchArgs},
    catalog::{self, CatalogArgs},
    compose::{self, ComposeArgs},
    listing::{self, ListingArgs},
    verify::{self, VerifyArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;
mod job;

#[derive(Parser, Debug)]
#[command(name = "composer", about = "Type-directed program graph synthesizer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a single graph from a job file.
    Compose(ComposeArgs),
    /// Compose many graphs from independent seeds.
    Batch(BatchArgs),
    /// Decode and validate a graph, printing its canonical hash.
    Verify(VerifyArgs),
    /// Print the straight-line listing of a graph.
    Listing(ListingArgs),
    /// Print the reference primitive catalog.
    Catalog(CatalogArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Compose(args) => compose::run(&args),
        Command::Batch(args) => batch::run(&args),
        Command::Verify(args) => verify::run(&args),
        Command::Listing(args) => listing::run(&args),
        Command::Catalog(args) => catalog::run(&args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
