use std::collections::BTreeMap;

use composer_core::errors::ComposeError;
use composer_core::{RngHandle, RunProvenance};
use composer_graph::{canonical_hash, Outcome};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::determinism::{provenance, request_seed};
use crate::request::SynthesisRequest;
use crate::search::{Composer, Composition};

/// Result of one batch item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Position in the batch.
    pub index: usize,
    /// Seed the item ran with.
    pub seed: u64,
    /// Canonical hash of the graph, when one was produced.
    pub hash: Option<String>,
    /// Composed graph and report, or the error that ended the item.
    pub result: Result<Composition, ComposeError>,
}

/// Aggregate counts over a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Items requested.
    pub requested: usize,
    /// Items finishing in DONE.
    pub done: usize,
    /// Items finishing in FALLBACK_DONE.
    pub fallback_done: usize,
    /// Items that failed.
    pub failed: usize,
    /// Distinct canonical graph hashes among the successes.
    pub distinct_graphs: usize,
    /// Failures per error code.
    pub failures_by_code: BTreeMap<String, usize>,
    /// Master seed, registry and configuration fingerprints.
    pub provenance: RunProvenance,
}

/// Items and summary of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Per-item results in index order.
    pub items: Vec<BatchItem>,
    /// Aggregate counts.
    pub summary: BatchSummary,
}

/// Runs `count` independent requests, item `i` seeded from `(master_seed, i)`.
///
/// Failures are recorded per item and never retried.
pub fn compose_batch(
    composer: &Composer,
    request: &SynthesisRequest,
    master_seed: u64,
    count: usize,
) -> Result<BatchReport, ComposeError> {
    let mut items = Vec::with_capacity(count);
    let mut hashes: IndexSet<String> = IndexSet::new();
    let mut done = 0;
    let mut fallback_done = 0;
    let mut failures_by_code: BTreeMap<String, usize> = BTreeMap::new();

    for index in 0..count {
        let seed = request_seed(master_seed, index);
        let mut rng = RngHandle::from_seed(seed);
        let result = composer.compose(request, &mut rng);
        let hash = match &result {
            Ok(composition) => {
                match composition.report.outcome {
                    Outcome::Done => done += 1,
                    Outcome::FallbackDone => fallback_done += 1,
                }
                let hash = canonical_hash(&composition.graph)?;
                hashes.insert(hash.clone());
                Some(hash)
            }
            Err(err) => {
                *failures_by_code.entry(err.code().to_string()).or_insert(0) += 1;
                None
            }
        };
        items.push(BatchItem {
            index,
            seed,
            hash,
            result,
        });
    }

    let failed = failures_by_code.values().sum();
    let summary = BatchSummary {
        requested: count,
        done,
        fallback_done,
        failed,
        distinct_graphs: hashes.len(),
        failures_by_code,
        provenance: provenance(master_seed, composer.registry(), composer.config())?,
    };
    info!(
        requested = summary.requested,
        done = summary.done,
        fallback_done = summary.fallback_done,
        failed = summary.failed,
        distinct = summary.distinct_graphs,
        "batch finished"
    );
    Ok(BatchReport { items, summary })
}
