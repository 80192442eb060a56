//! Version tags for stored graphs and the fingerprints of a batch run.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Layout version stamped into every serialized composed graph.
///
/// Readers accept payloads with the same major version and a minor version no
/// newer than their own; the patch level never affects decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Bumped when fields are removed or change meaning.
    pub major: u32,
    /// Bumped when optional fields are added.
    pub minor: u32,
    /// Bumped for fixes that leave the layout untouched.
    pub patch: u32,
}

impl SchemaVersion {
    /// Builds a version from its three components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Returns whether a graph written under `other` decodes under `self`.
    pub fn is_compatible_with(&self, other: &SchemaVersion) -> bool {
        self.major == other.major && other.minor <= self.minor
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Inputs that reproduce a batch of compositions.
///
/// The same master seed, registry fingerprint and configuration fingerprint
/// regenerate byte-identical graphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Master seed the per-item seeds were derived from.
    pub seed: u64,
    /// SHA-256 of the primitive registry's JSON form.
    pub registry_hash: String,
    /// SHA-256 of the search configuration's JSON form.
    pub config_hash: String,
    /// Crate name to version for the code that produced the batch.
    pub tool_versions: BTreeMap<String, String>,
}
