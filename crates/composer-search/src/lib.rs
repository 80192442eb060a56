#![deny(missing_docs)]

//! Type-directed stochastic search composing primitive call graphs.
//!
//! Each request starts with one frontier slot per desired output. Every
//! step scores the registry against the frontier, samples a primitive with a
//! depth-scheduled softmax and wires it to the shallowest matching slots. The
//! loop ends when the frontier equals the requested inputs, or at the depth
//! limit, where leftover requirements become generated constants.

/// Batch generation over independent seeds.
pub mod batch;
/// YAML configuration schema and defaults.
pub mod config;
/// Constant generators for the depth-exhaustion fallback.
pub mod constants;
/// Per-type priority queues of pending slots.
pub mod depth_queue;
/// Deterministic seed derivation and fingerprints.
pub mod determinism;
/// Search reports and counters.
pub mod diagnostics;
/// Outstanding requirements of the graph under construction.
pub mod frontier;
/// Request schema and validation.
pub mod request;
/// Primitive sampling.
pub mod sampler;
/// Resemblance scoring and softmax.
pub mod scorer;
/// The search state machine.
pub mod search;
/// Binding sampled primitives to frontier slots.
pub mod wirer;

pub use batch::{compose_batch, BatchItem, BatchReport, BatchSummary};
pub use config::{ResemblanceCombination, SearchConfig, TemperatureSchedule};
pub use constants::{ConstantGenerator, ConstantTable, FromFn, GeneratorSpec};
pub use diagnostics::{SearchReport, SearchStats};
pub use frontier::{Frontier, FrontierSlot};
pub use request::{RequestSpec, SynthesisRequest, TypeMultisetSpec};
pub use scorer::{softmax, Scorer, Scores};
pub use search::{Composer, Composition, SearchPhase, SearchState};
