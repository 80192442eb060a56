use composer_core::errors::{ComposeError, ErrorInfo};

use crate::model::FinalGraph;
use crate::validate::validate;

/// Serializes the graph to a compact binary representation using `bincode`.
pub fn graph_to_bytes(graph: &FinalGraph) -> Result<Vec<u8>, ComposeError> {
    bincode::serialize(graph)
        .map_err(|err| ComposeError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a graph from its binary representation and validates it.
pub fn graph_from_bytes(bytes: &[u8]) -> Result<FinalGraph, ComposeError> {
    let graph: FinalGraph = bincode::deserialize(bytes)
        .map_err(|err| ComposeError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    validate(&graph)?;
    Ok(graph)
}

/// Serializes the graph to a JSON string.
pub fn graph_to_json(graph: &FinalGraph) -> Result<String, ComposeError> {
    serde_json::to_string_pretty(graph)
        .map_err(|err| ComposeError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a graph from a JSON string and validates it.
pub fn graph_from_json(json: &str) -> Result<FinalGraph, ComposeError> {
    let graph: FinalGraph = serde_json::from_str(json)
        .map_err(|err| ComposeError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    validate(&graph)?;
    Ok(graph)
}
