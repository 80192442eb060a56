use std::error::Error;

use clap::{Args, ValueEnum};
use composer_core::catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogFormat {
    Yaml,
    Json,
}

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Output format of the registry document.
    #[arg(long, value_enum, default_value_t = CatalogFormat::Yaml)]
    pub format: CatalogFormat,
}

pub fn run(args: &CatalogArgs) -> Result<(), Box<dyn Error>> {
    let registry = catalog::standard();
    let text = match args.format {
        CatalogFormat::Yaml => registry.to_yaml_string()?,
        CatalogFormat::Json => registry.to_json_string()?,
    };
    println!("{}", text.trim_end());
    Ok(())
}
