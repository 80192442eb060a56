use composer_graph::Outcome;
use serde::{Deserialize, Serialize};

/// Counters accumulated while a search runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Wiring steps executed.
    pub steps: usize,
    /// Extra bindings created by branching.
    pub branches: usize,
    /// Primitive outputs that found no pending slot.
    pub unmatched_outputs: usize,
    /// Slots closed with generated literals.
    pub constants_injected: usize,
    /// Steps where no primitive carried any resemblance signal.
    pub degenerate_steps: usize,
    /// Longest run of consecutive degenerate steps.
    pub longest_degenerate_streak: usize,
    /// No primitive could produce an outstanding type.
    pub stalled: bool,
    /// The `max_steps` guard tripped.
    pub step_budget_exhausted: bool,
    #[serde(skip)]
    pub(crate) degenerate_streak: usize,
}

impl SearchStats {
    /// Records whether the current step was degenerate and returns the running streak.
    pub(crate) fn observe_degenerate(&mut self, degenerate: bool) -> usize {
        if degenerate {
            self.degenerate_steps += 1;
            self.degenerate_streak += 1;
            self.longest_degenerate_streak =
                self.longest_degenerate_streak.max(self.degenerate_streak);
        } else {
            self.degenerate_streak = 0;
        }
        self.degenerate_streak
    }
}

/// Summary of one synthesis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Terminal state.
    pub outcome: Outcome,
    /// Seed of the random source used.
    pub seed: u64,
    /// Global depth when the search stopped.
    pub final_depth: u32,
    /// Graph outputs produced by nodes.
    pub outputs_hit: usize,
    /// Nodes in the graph.
    pub nodes: usize,
    /// Counters gathered along the way.
    #[serde(flatten)]
    pub stats: SearchStats,
}
