use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use composer_core::RngHandle;
use composer_graph::{canonical_hash, graph_to_json, straight_line};
use tracing::info;

use super::write_text;
use crate::job::LoadedJob;

#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// YAML job file holding the request and search settings.
    #[arg(long)]
    pub job: PathBuf,
    /// Primitive registry overriding the one named by the job.
    #[arg(long)]
    pub registry: Option<PathBuf>,
    /// Seed overriding the job seed.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write the graph JSON here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Print the straight-line listing instead of JSON.
    #[arg(long)]
    pub listing: bool,
}

pub fn run(args: &ComposeArgs) -> Result<(), Box<dyn Error>> {
    let job = LoadedJob::read(&args.job)?;
    let request = job.request()?;
    let composer = job.composer(args.registry.as_deref())?;
    let seed = job.seed(args.seed);

    let composition = composer.compose(&request, &mut RngHandle::from_seed(seed))?;
    let hash = canonical_hash(&composition.graph)?;
    let report = serde_json::to_string(&composition.report)?;
    info!(seed, hash = %hash, report = %report, "search report");

    let json = graph_to_json(&composition.graph)?;
    if let Some(out) = &args.out {
        write_text(out, &json)?;
    }
    if args.listing {
        print!("{}", straight_line(&composition.graph));
    } else if args.out.is_none() {
        println!("{json}");
    }
    Ok(())
}
