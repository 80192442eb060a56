use composer_core::errors::ComposeError;
use composer_core::{NodeId, PrimitiveId, PrimitiveSpec, RngHandle, SlotId, TypeMultiset};
use composer_graph::{Destination, GraphBuilder};

use crate::frontier::{Frontier, FrontierSlot};

/// Effect of wiring one sampled primitive into the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireOutcome {
    /// Node created for the primitive.
    pub node: NodeId,
    /// Depth assigned to the node.
    pub depth: u32,
    /// Frontier slots the node now feeds, in binding order.
    pub bound: Vec<SlotId>,
    /// Graph outputs closed by this node.
    pub outputs_hit: usize,
    /// Extra bindings created by branching.
    pub branches: usize,
    /// Outputs that found no pending slot of their type.
    pub unmatched_outputs: usize,
    /// Input slots pushed onto the frontier.
    pub opened: Vec<SlotId>,
}

/// Binds sampled primitives to frontier slots.
#[derive(Debug, Clone, Copy)]
pub struct Wirer {
    branch_probability: f64,
}

impl Wirer {
    /// Creates a wirer that reuses an output with `branch_probability`.
    pub fn new(branch_probability: f64) -> Self {
        Self { branch_probability }
    }

    /// Adds a node for `spec` and wires it into the frontier.
    ///
    /// Each output closes the shallowest pending slot of its type. When more
    /// slots of that type are pending than `goal` still needs, the same
    /// output feeds the next one as well with the branch probability, so a
    /// branch never eats into the requested inputs. The node depth is one more than
    /// the deepest slot it feeds (1 when it feeds nothing), and its inputs
    /// join the frontier at that depth.
    pub fn wire(
        &self,
        builder: &mut GraphBuilder,
        frontier: &mut Frontier,
        goal: &TypeMultiset,
        primitive: PrimitiveId,
        spec: &PrimitiveSpec,
        rng: &mut RngHandle,
    ) -> Result<WireOutcome, ComposeError> {
        let node = builder.add_node(primitive, spec);
        let mut bound = Vec::new();
        let mut deepest: Option<u32> = None;
        let mut outputs_hit = 0;
        let mut branches = 0;
        let mut unmatched_outputs = 0;

        for (output, ty) in spec.outputs.iter().enumerate() {
            let Some(first) = frontier.pop_lowest(ty) else {
                unmatched_outputs += 1;
                continue;
            };
            let mut targets = vec![first];
            if frontier.count(ty) > goal.count(ty) && rng.chance(self.branch_probability) {
                if let Some(extra) = frontier.pop_lowest(ty) {
                    targets.push(extra);
                    branches += 1;
                }
            }
            for FrontierSlot {
                slot, target_depth, ..
            } in targets
            {
                if let Destination::GraphOutput { .. } = builder.bind_output(node, output, slot)? {
                    outputs_hit += 1;
                }
                deepest = Some(deepest.map_or(target_depth, |d| d.max(target_depth)));
                bound.push(slot);
            }
        }

        let depth = deepest.map_or(1, |d| d + 1);
        builder.set_depth(node, depth)?;
        let mut opened = Vec::with_capacity(spec.inputs.len());
        for (parameter, param) in spec.inputs.iter().enumerate() {
            let slot = builder.add_input_slot(node, parameter, depth)?;
            frontier.push(FrontierSlot {
                slot,
                ty: param.ty.clone(),
                target_depth: depth,
            });
            opened.push(slot);
        }

        Ok(WireOutcome {
            node,
            depth,
            bound,
            outputs_hit,
            branches,
            unmatched_outputs,
            opened,
        })
    }
}
