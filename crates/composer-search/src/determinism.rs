use std::collections::BTreeMap;

use composer_core::errors::{ComposeError, ErrorInfo};
use composer_core::{derive_substream_seed, PrimitiveRegistry, RunProvenance};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::SearchConfig;

/// Derives the seed of batch item `index`.
pub fn request_seed(master_seed: u64, index: usize) -> u64 {
    derive_substream_seed(master_seed, index as u64)
}

/// Hex SHA-256 of the registry's JSON form.
pub fn registry_hash(registry: &PrimitiveRegistry) -> Result<String, ComposeError> {
    json_digest(registry)
}

/// Hex SHA-256 of the configuration's JSON form.
pub fn config_hash(config: &SearchConfig) -> Result<String, ComposeError> {
    json_digest(config)
}

/// Provenance record for artifacts produced from `seed`.
pub fn provenance(
    seed: u64,
    registry: &PrimitiveRegistry,
    config: &SearchConfig,
) -> Result<RunProvenance, ComposeError> {
    let mut tool_versions = BTreeMap::new();
    tool_versions.insert(
        env!("CARGO_PKG_NAME").to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    Ok(RunProvenance {
        seed,
        registry_hash: registry_hash(registry)?,
        config_hash: config_hash(config)?,
        tool_versions,
    })
}

fn json_digest<T: Serialize>(value: &T) -> Result<String, ComposeError> {
    let encoded = serde_json::to_vec(value)
        .map_err(|err| ComposeError::Serde(ErrorInfo::new("hash-encode", err.to_string())))?;
    Ok(format!("{:x}", Sha256::digest(&encoded)))
}
