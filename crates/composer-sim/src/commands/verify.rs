use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use composer_graph::canonical_hash;

use super::read_graph;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Graph JSON to decode and validate.
    #[arg(long)]
    pub graph: PathBuf,
}

pub fn run(args: &VerifyArgs) -> Result<(), Box<dyn Error>> {
    let graph = read_graph(&args.graph)?;
    println!("{}", canonical_hash(&graph)?);
    Ok(())
}
