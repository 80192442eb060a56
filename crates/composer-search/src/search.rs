use composer_core::errors::{ComposeError, ErrorInfo};
use composer_core::{PrimitiveRegistry, RngHandle, TypeMultiset, TypeName};
use composer_graph::{FinalGraph, GraphBuilder, GraphHeader, Outcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::constants::ConstantTable;
use crate::diagnostics::{SearchReport, SearchStats};
use crate::frontier::{Frontier, FrontierSlot};
use crate::request::SynthesisRequest;
use crate::sampler::sample;
use crate::scorer::Scorer;
use crate::wirer::Wirer;

/// State of the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchPhase {
    /// More primitives are needed.
    Running,
    /// Frontier equals the requested inputs and every output is produced.
    Done,
    /// Leftover requirements were closed with constants.
    FallbackDone,
    /// Leftover requirements had no constant generator.
    Failed,
}

/// Mutable state of one synthesis request.
#[derive(Debug, Clone)]
pub struct SearchState {
    request: SynthesisRequest,
    frontier: Frontier,
    depth: u32,
    outputs_hit: usize,
    builder: GraphBuilder,
    phase: SearchPhase,
    stats: SearchStats,
}

impl SearchState {
    /// Opens one frontier slot per requested output at target depth 0.
    pub fn new(request: &SynthesisRequest) -> Result<Self, ComposeError> {
        request.validate()?;
        let mut builder = GraphBuilder::new();
        let mut frontier = Frontier::new();
        for (index, ty) in request.output_type.iter().enumerate() {
            let slot = builder.add_output_slot(index, ty.clone());
            frontier.push(FrontierSlot {
                slot,
                ty: ty.clone(),
                target_depth: 0,
            });
        }
        Ok(Self {
            request: request.clone(),
            frontier,
            depth: 0,
            outputs_hit: 0,
            builder,
            phase: SearchPhase::Running,
            stats: SearchStats::default(),
        })
    }

    /// Current phase.
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Global depth reached so far.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Graph outputs produced by nodes so far.
    pub fn outputs_hit(&self) -> usize {
        self.outputs_hit
    }

    /// Outstanding requirements.
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Counters gathered so far.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Returns whether the loop condition no longer holds.
    pub fn is_satisfied(&self) -> bool {
        self.outputs_hit == self.request.output_type.len()
            && *self.frontier.as_multiset() == self.request.input_type
    }

    /// Freezes the graph of a finished search.
    pub fn finish(self, seed: u64) -> Result<Composition, ComposeError> {
        let outcome = match self.phase {
            SearchPhase::Done => Outcome::Done,
            SearchPhase::FallbackDone => Outcome::FallbackDone,
            phase => {
                return Err(ComposeError::Graph(
                    ErrorInfo::new("search-not-finished", "search has not reached a terminal success")
                        .with_context("phase", format!("{phase:?}")),
                ))
            }
        };
        let remaining = self
            .frontier
            .slots()
            .into_iter()
            .map(|slot| slot.slot)
            .collect();
        let graph = self.builder.finish(
            GraphHeader {
                input_type: self.request.input_type.clone(),
                output_type: self.request.output_type.clone(),
                max_depth: self.request.max_depth,
                outcome,
            },
            remaining,
        )?;
        let report = SearchReport {
            outcome,
            seed,
            final_depth: self.depth,
            outputs_hit: self.outputs_hit,
            nodes: graph.len(),
            stats: self.stats,
        };
        Ok(Composition { graph, report })
    }
}

/// Graph produced by a successful search together with its report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    /// The composed program.
    pub graph: FinalGraph,
    /// Diagnostics of the run.
    pub report: SearchReport,
}

/// Type-directed stochastic composer over a primitive registry.
#[derive(Debug, Clone)]
pub struct Composer {
    registry: PrimitiveRegistry,
    constants: ConstantTable,
    config: SearchConfig,
}

impl Composer {
    /// Creates a composer after validating `config`.
    pub fn new(
        registry: PrimitiveRegistry,
        constants: ConstantTable,
        config: SearchConfig,
    ) -> Result<Self, ComposeError> {
        config.validate()?;
        Ok(Self {
            registry,
            constants,
            config,
        })
    }

    /// Primitive registry sampled from.
    pub fn registry(&self) -> &PrimitiveRegistry {
        &self.registry
    }

    /// Constant generators used by the fallback.
    pub fn constants(&self) -> &ConstantTable {
        &self.constants
    }

    /// Search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs one synthesis request to completion.
    pub fn compose(
        &self,
        request: &SynthesisRequest,
        rng: &mut RngHandle,
    ) -> Result<Composition, ComposeError> {
        let mut state = self.start(request)?;
        while self.step(&mut state, rng)? == SearchPhase::Running {}
        let composition = state.finish(rng.seed())?;
        info!(
            outcome = ?composition.report.outcome,
            nodes = composition.report.nodes,
            depth = composition.graph.depth,
            steps = composition.report.stats.steps,
            "composition finished"
        );
        Ok(composition)
    }

    /// Creates the initial state for `request`.
    pub fn start(&self, request: &SynthesisRequest) -> Result<SearchState, ComposeError> {
        if self.registry.is_empty() {
            return Err(ComposeError::EmptyRegistry(
                ErrorInfo::new("empty-registry", "no primitive available to sample from")
                    .with_hint("register at least one primitive"),
            ));
        }
        SearchState::new(request)
    }

    /// Advances the state machine by one transition.
    ///
    /// A running state either wires one more primitive, finishes, or falls
    /// back to constants once the depth limit, the step guard or a stall is
    /// reached. Terminal states are returned unchanged.
    pub fn step(
        &self,
        state: &mut SearchState,
        rng: &mut RngHandle,
    ) -> Result<SearchPhase, ComposeError> {
        if state.phase != SearchPhase::Running {
            return Ok(state.phase);
        }
        if state.is_satisfied() {
            state.phase = SearchPhase::Done;
            return Ok(state.phase);
        }
        let max_depth = state.request.max_depth;
        if state.depth >= max_depth {
            return self.fall_back(state, rng);
        }
        if state.stats.steps >= self.config.max_steps {
            warn!(
                max_steps = self.config.max_steps,
                frontier = state.frontier.len(),
                "step budget exhausted, closing the frontier with constants"
            );
            state.stats.step_budget_exhausted = true;
            return self.fall_back(state, rng);
        }

        let scores = Scorer::new(&self.registry, &self.config).score(
            state.frontier.as_multiset(),
            &state.request.input_type,
            state.depth,
            max_depth,
        );
        let streak = state.stats.observe_degenerate(scores.is_degenerate());
        if streak > 0 && streak == self.config.degenerate_warn_after {
            warn!(
                streak,
                depth = state.depth,
                frontier = %state.frontier.as_multiset(),
                "no primitive resembles the frontier"
            );
        }
        if scores.productive == 0 {
            debug!(
                depth = state.depth,
                frontier = %state.frontier.as_multiset(),
                "no primitive produces an outstanding type"
            );
            state.stats.stalled = true;
            return self.fall_back(state, rng);
        }

        let primitive = sample(&scores.probabilities, rng)?;
        let spec = self.registry.spec(primitive)?;
        let wired = Wirer::new(self.config.branch_probability).wire(
            &mut state.builder,
            &mut state.frontier,
            &state.request.input_type,
            primitive,
            spec,
            rng,
        )?;
        state.depth = state.depth.max(wired.depth);
        state.outputs_hit += wired.outputs_hit;
        state.stats.steps += 1;
        state.stats.branches += wired.branches;
        state.stats.unmatched_outputs += wired.unmatched_outputs;
        debug!(
            step = state.stats.steps,
            primitive = %spec.name,
            node = %wired.node,
            node_depth = wired.depth,
            depth = state.depth,
            temperature = scores.temperature,
            closing = scores.closing,
            frontier = state.frontier.len(),
            "wired primitive"
        );
        Ok(state.phase)
    }

    /// Binds every excess frontier slot to a generated constant.
    ///
    /// The deepest excess slots are replaced first so the shallowest ones
    /// remain available as graph arguments. Nothing is bound unless every
    /// excess type has a generator.
    fn fall_back(
        &self,
        state: &mut SearchState,
        rng: &mut RngHandle,
    ) -> Result<SearchPhase, ComposeError> {
        let excess: TypeMultiset = state
            .frontier
            .as_multiset()
            .difference(&state.request.input_type);
        let missing: Vec<TypeName> = excess
            .distinct()
            .filter(|ty| !self.constants.has(ty))
            .cloned()
            .collect();
        if !missing.is_empty() {
            state.phase = SearchPhase::Failed;
            warn!(
                unresolved = ?missing.iter().map(TypeName::as_str).collect::<Vec<_>>(),
                depth = state.depth,
                "frontier cannot be closed with constants"
            );
            return Err(ComposeError::unsatisfiable(
                &missing,
                state.depth,
                state.request.max_depth,
            ));
        }

        for (ty, count) in excess.iter() {
            for _ in 0..count {
                let Some(taken) = state.frontier.pop_deepest(ty) else {
                    break;
                };
                let value = self.constants.generate(ty, rng).ok_or_else(|| {
                    ComposeError::unsatisfiable(
                        std::slice::from_ref(ty),
                        state.depth,
                        state.request.max_depth,
                    )
                })?;
                debug!(slot = %taken.slot, ty = %ty, value = %value, "injected constant");
                state.builder.bind_constant(taken.slot, value)?;
                state.stats.constants_injected += 1;
            }
        }
        state.phase = SearchPhase::FallbackDone;
        Ok(state.phase)
    }
}
