use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use composer_graph::straight_line;

use super::read_graph;

#[derive(Args, Debug)]
pub struct ListingArgs {
    /// Graph JSON to render.
    #[arg(long)]
    pub graph: PathBuf,
}

pub fn run(args: &ListingArgs) -> Result<(), Box<dyn Error>> {
    let graph = read_graph(&args.graph)?;
    print!("{}", straight_line(&graph));
    Ok(())
}
