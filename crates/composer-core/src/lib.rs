#![deny(missing_docs)]
#![doc = "Core data types for the type-directed program composer: type multisets, primitive signatures, errors and deterministic randomness."]

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod errors;
pub mod multiset;
pub mod primitive;
pub mod provenance;
pub mod rng;

pub use errors::{ComposeError, ErrorInfo};
pub use multiset::{resemblance, TypeMultiset, TypeName};
pub use primitive::{Parameter, PrimitiveId, PrimitiveRegistry, PrimitiveSpec};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};

/// Identifier for a primitive invocation within a composed graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }

    /// Returns the identifier as an index into the node arena.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Identifier for a pending or resolved requirement slot.
///
/// Slot identifiers are handed out in creation order, so comparing two ids
/// also compares their insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId(u64);

impl SlotId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }

    /// Returns the identifier as an index into the slot arena.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}
