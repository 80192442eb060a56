use composer_core::errors::{ComposeError, ErrorInfo};
use sha2::{Digest, Sha256};

use crate::model::FinalGraph;

/// Computes the canonical structural hash for the provided graph.
///
/// The digest covers the compact JSON encoding, so two graphs share a hash
/// exactly when every node, slot, argument and constant agrees.
pub fn canonical_hash(graph: &FinalGraph) -> Result<String, ComposeError> {
    let encoded = serde_json::to_vec(graph)
        .map_err(|err| ComposeError::Serde(ErrorInfo::new("hash-encode", err.to_string())))?;
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    Ok(format!("{:x}", hasher.finalize()))
}
