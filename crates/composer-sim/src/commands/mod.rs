pub mod batch;
pub mod catalog;
pub mod compose;
pub mod listing;
pub mod verify;

use std::error::Error;
use std::fs;
use std::path::Path;

use composer_graph::{graph_from_json, FinalGraph};

pub(crate) fn read_graph(path: &Path) -> Result<FinalGraph, Box<dyn Error>> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("failed to read graph {}: {err}", path.display()))?;
    Ok(graph_from_json(&text)?)
}

pub(crate) fn write_text(path: &Path, text: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    Ok(())
}
