use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use composer_graph::graph_to_json;
use composer_search::compose_batch;
use tracing::warn;

use crate::job::LoadedJob;

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// YAML job file holding the request and search settings.
    #[arg(long)]
    pub job: PathBuf,
    /// Number of graphs to compose.
    #[arg(long, default_value_t = 16)]
    pub count: usize,
    /// Output directory for graphs and the summary.
    #[arg(long)]
    pub out: PathBuf,
    /// Master seed overriding the job seed.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Primitive registry overriding the one named by the job.
    #[arg(long)]
    pub registry: Option<PathBuf>,
}

pub fn run(args: &BatchArgs) -> Result<(), Box<dyn Error>> {
    let job = LoadedJob::read(&args.job)?;
    let request = job.request()?;
    let composer = job.composer(args.registry.as_deref())?;
    let master_seed = job.seed(args.seed);

    let report = compose_batch(&composer, &request, master_seed, args.count)?;
    fs::create_dir_all(&args.out)?;
    for item in &report.items {
        match &item.result {
            Ok(composition) => {
                let path = args.out.join(format!("graph_{}.json", item.index));
                fs::write(path, graph_to_json(&composition.graph)?)?;
            }
            Err(err) => warn!(index = item.index, seed = item.seed, error = %err, "item failed"),
        }
    }
    let summary = serde_json::to_string_pretty(&report.summary)?;
    fs::write(args.out.join("summary.json"), &summary)?;
    println!("{summary}");
    Ok(())
}
