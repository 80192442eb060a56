use composer_core::{resemblance, PrimitiveRegistry, TypeMultiset};
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;

/// Per-primitive scores for one search step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    /// Resemblance of each primitive's outputs to the frontier.
    pub output_resemblance: Vec<f64>,
    /// Combined resemblance fed into the softmax.
    pub resemblance: Vec<f64>,
    /// Sampling distribution over the registry, in registry order.
    pub probabilities: Vec<f64>,
    /// Temperature the softmax ran at.
    pub temperature: f64,
    /// Whether input resemblance against the goal was mixed in.
    pub closing: bool,
    /// Number of primitives able to close at least one frontier slot.
    pub productive: usize,
}

impl Scores {
    /// Returns `true` when no primitive carries any resemblance signal.
    pub fn is_degenerate(&self) -> bool {
        self.resemblance.iter().all(|value| *value <= 0.0)
    }
}

/// Ranks primitives against the current frontier.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    registry: &'a PrimitiveRegistry,
    config: &'a SearchConfig,
}

impl<'a> Scorer<'a> {
    /// Creates a scorer over `registry`.
    pub fn new(registry: &'a PrimitiveRegistry, config: &'a SearchConfig) -> Self {
        Self { registry, config }
    }

    /// Scores every primitive for a frontier at `depth`.
    ///
    /// Inside the closing window the resemblance of each primitive's inputs
    /// to `goal` is combined with its output resemblance. With masking
    /// enabled, primitives whose outputs miss the frontier entirely get
    /// probability 0 as long as another primitive can make progress.
    pub fn score(
        &self,
        frontier: &TypeMultiset,
        goal: &TypeMultiset,
        depth: u32,
        max_depth: u32,
    ) -> Scores {
        let schedule = &self.config.temperature;
        let closing = schedule.is_closing(depth, max_depth);
        let temperature = schedule.at(depth, max_depth);

        let output_resemblance: Vec<f64> = self
            .registry
            .output_multisets()
            .map(|outputs| resemblance(outputs, frontier))
            .collect();
        let combined: Vec<f64> = if closing {
            output_resemblance
                .iter()
                .zip(self.registry.input_multisets())
                .map(|(r_out, inputs)| {
                    self.config
                        .combination
                        .combine(*r_out, resemblance(inputs, goal))
                })
                .collect()
        } else {
            output_resemblance.clone()
        };

        let productive = output_resemblance.iter().filter(|r| **r > 0.0).count();
        let probabilities = if self.config.mask_unproductive && productive > 0 {
            masked_softmax(&combined, &output_resemblance, temperature)
        } else {
            softmax(&combined, temperature)
        };

        Scores {
            output_resemblance,
            resemblance: combined,
            probabilities,
            temperature,
            closing,
            productive,
        }
    }
}

/// Temperature softmax with max subtraction.
///
/// Returns an empty vector for empty input; for finite values and a positive
/// temperature every entry is positive and the entries sum to 1.
pub fn softmax(values: &[f64], temperature: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values
        .iter()
        .map(|value| ((value - max) / temperature).exp())
        .collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|value| value / total).collect()
}

fn masked_softmax(values: &[f64], gate: &[f64], temperature: f64) -> Vec<f64> {
    let kept: Vec<f64> = values
        .iter()
        .zip(gate)
        .filter(|(_, g)| **g > 0.0)
        .map(|(value, _)| *value)
        .collect();
    let mut kept = softmax(&kept, temperature).into_iter();
    gate.iter()
        .map(|g| {
            if *g > 0.0 {
                kept.next().unwrap_or(0.0)
            } else {
                0.0
            }
        })
        .collect()
}
