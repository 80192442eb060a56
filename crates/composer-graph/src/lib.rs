#![deny(missing_docs)]

//! Composed program graphs: the append-only builder used during search, the
//! frozen [`FinalGraph`] it produces, structural validation, hashing and
//! serialization.

mod builder;
mod hash;
mod listing;
mod model;
mod serialization;
pub mod validate;

pub use builder::{GraphBuilder, GraphHeader, SlotDraft};
pub use hash::canonical_hash;
pub use listing::straight_line;
pub use model::{
    Argument, ConstantBinding, Destination, FinalGraph, GraphNode, InputPort, Literal, Outcome,
    OutputBinding, Resolution, Slot, GRAPH_SCHEMA,
};
pub use validate::validate;

/// Re-export serialization helpers for downstream crates.
pub use serialization::{graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json};
