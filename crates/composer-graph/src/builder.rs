use std::collections::BTreeMap;

use composer_core::errors::{ComposeError, ErrorInfo};
use composer_core::{NodeId, Parameter, PrimitiveId, PrimitiveSpec, SlotId, TypeMultiset, TypeName};

use crate::model::{
    Argument, ConstantBinding, Destination, FinalGraph, GraphNode, InputPort, Literal, Outcome,
    OutputBinding, Resolution, Slot, GRAPH_SCHEMA,
};

/// Requirement slot under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotDraft {
    /// Slot identifier.
    pub id: SlotId,
    /// Required type.
    pub ty: TypeName,
    /// Depth the producer must sit below.
    pub target_depth: u32,
    /// Position waiting for the value.
    pub owner: Destination,
    /// Resolution, once bound.
    pub resolution: Option<Resolution>,
}

#[derive(Debug, Clone)]
struct NodeDraft {
    primitive: PrimitiveId,
    name: String,
    depth: u32,
    parameters: Vec<Parameter>,
    inputs: Vec<Option<SlotId>>,
    output_bindings: Vec<OutputBinding>,
}

/// Request-level facts recorded on the finished graph.
#[derive(Debug, Clone)]
pub struct GraphHeader {
    /// Requested graph inputs.
    pub input_type: TypeMultiset,
    /// Requested graph outputs in position order.
    pub output_type: Vec<TypeName>,
    /// Depth bound of the search.
    pub max_depth: u32,
    /// Terminal state reached.
    pub outcome: Outcome,
}

/// Append-only arena of nodes and slots.
///
/// Bindings may only point from a node to a slot that already exists, and a
/// node-input slot always belongs to a node created earlier than its
/// producer, so the graph stays acyclic by construction.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    nodes: Vec<NodeDraft>,
    slots: Vec<SlotDraft>,
    constants: Vec<ConstantBinding>,
}

impl GraphBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes created so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of slots created so far.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the draft for `id`.
    pub fn slot(&self, id: SlotId) -> Option<&SlotDraft> {
        self.slots.get(id.index())
    }

    /// Creates the slot for graph output `index`; graph outputs sit at depth 0.
    pub fn add_output_slot(&mut self, index: usize, ty: TypeName) -> SlotId {
        self.push_slot(ty, 0, Destination::GraphOutput { index })
    }

    /// Appends a node invoking `spec` with no bindings yet.
    pub fn add_node(&mut self, primitive: PrimitiveId, spec: &PrimitiveSpec) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u64);
        self.nodes.push(NodeDraft {
            primitive,
            name: spec.name.clone(),
            depth: 1,
            parameters: spec.inputs.clone(),
            inputs: vec![None; spec.inputs.len()],
            output_bindings: spec
                .outputs
                .iter()
                .map(|ty| OutputBinding {
                    ty: ty.clone(),
                    destinations: Vec::new(),
                })
                .collect(),
        });
        id
    }

    /// Records the depth of `node`.
    pub fn set_depth(&mut self, node: NodeId, depth: u32) -> Result<(), ComposeError> {
        self.node_mut(node)?.depth = depth;
        Ok(())
    }

    /// Creates the slot for input `parameter` of `node` with the given target depth.
    pub fn add_input_slot(
        &mut self,
        node: NodeId,
        parameter: usize,
        target_depth: u32,
    ) -> Result<SlotId, ComposeError> {
        let draft = self.node_ref(node)?;
        let ty = match draft.parameters.get(parameter) {
            Some(param) => param.ty.clone(),
            None => {
                return Err(graph_error(
                    "unknown-parameter",
                    "parameter index out of range",
                    [("node", node.to_string()), ("parameter", parameter.to_string())],
                ))
            }
        };
        if draft.inputs[parameter].is_some() {
            return Err(graph_error(
                "parameter-already-open",
                "parameter already has a slot",
                [("node", node.to_string()), ("parameter", parameter.to_string())],
            ));
        }
        let slot = self.push_slot(ty, target_depth, Destination::NodeInput { node, parameter });
        self.nodes[node.index()].inputs[parameter] = Some(slot);
        Ok(slot)
    }

    /// Feeds output `output` of `node` into the pending `slot`.
    pub fn bind_output(
        &mut self,
        node: NodeId,
        output: usize,
        slot: SlotId,
    ) -> Result<Destination, ComposeError> {
        let produced = match self.node_ref(node)?.output_bindings.get(output) {
            Some(binding) => binding.ty.clone(),
            None => {
                return Err(graph_error(
                    "unknown-output",
                    "output index out of range",
                    [("node", node.to_string()), ("output", output.to_string())],
                ))
            }
        };
        let draft = self.pending_slot(slot)?;
        if draft.ty != produced {
            return Err(graph_error(
                "type-mismatch",
                "output type differs from slot type",
                [
                    ("slot", slot.to_string()),
                    ("expected", draft.ty.to_string()),
                    ("found", produced.to_string()),
                ],
            ));
        }
        let owner = draft.owner;
        if let Destination::NodeInput { node: consumer, .. } = owner {
            if consumer >= node {
                return Err(graph_error(
                    "would-create-cycle",
                    "a node may only feed nodes created before it",
                    [("producer", node.to_string()), ("consumer", consumer.to_string())],
                ));
            }
        }
        self.slots[slot.index()].resolution = Some(Resolution::Node { node, output });
        self.nodes[node.index()].output_bindings[output]
            .destinations
            .push(owner);
        Ok(owner)
    }

    /// Replaces the pending `slot` with a literal.
    pub fn bind_constant(&mut self, slot: SlotId, value: Literal) -> Result<(), ComposeError> {
        self.pending_slot(slot)?;
        self.slots[slot.index()].resolution = Some(Resolution::Constant);
        self.constants.push(ConstantBinding { slot, value });
        Ok(())
    }

    /// Turns the remaining slots into graph arguments and freezes the graph.
    ///
    /// `remaining` must be a sub-multiset of the requested inputs; requested
    /// inputs without a slot become unused arguments.
    pub fn finish(
        mut self,
        header: GraphHeader,
        remaining: Vec<SlotId>,
    ) -> Result<FinalGraph, ComposeError> {
        let mut by_type: BTreeMap<TypeName, Vec<SlotId>> = BTreeMap::new();
        for slot in remaining {
            let ty = self.pending_slot(slot)?.ty.clone();
            by_type.entry(ty).or_default().push(slot);
        }
        let unbound_inputs: TypeMultiset = by_type
            .iter()
            .flat_map(|(ty, slots)| std::iter::repeat(ty.clone()).take(slots.len()))
            .collect();
        if !unbound_inputs.is_subset(&header.input_type) {
            return Err(graph_error(
                "excess-frontier",
                "remaining slots exceed the requested inputs",
                [
                    ("remaining", unbound_inputs.to_string()),
                    ("inputs", header.input_type.to_string()),
                ],
            ));
        }
        let unused_inputs = header.input_type.difference(&unbound_inputs);

        let mut arguments = Vec::with_capacity(header.input_type.len());
        for (ty, count) in header.input_type.iter() {
            let mut slots = by_type.remove(ty).unwrap_or_default();
            slots.sort();
            let stem = argument_stem(ty);
            for ordinal in 0..count {
                let index = arguments.len();
                let slot = slots.get(ordinal).copied();
                if let Some(slot) = slot {
                    self.slots[slot.index()].resolution = Some(Resolution::Argument { index });
                }
                arguments.push(Argument {
                    index,
                    name: format!("{stem}{ordinal}"),
                    ty: ty.clone(),
                    slot,
                });
            }
        }

        let mut slots = Vec::with_capacity(self.slots.len());
        for draft in self.slots {
            let Some(resolution) = draft.resolution else {
                return Err(graph_error(
                    "unresolved-slot",
                    "slot left without producer, argument or constant",
                    [("slot", draft.id.to_string()), ("type", draft.ty.to_string())],
                ));
            };
            slots.push(Slot {
                id: draft.id,
                ty: draft.ty,
                target_depth: draft.target_depth,
                owner: draft.owner,
                resolution,
            });
        }

        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (index, draft) in self.nodes.into_iter().enumerate() {
            let id = NodeId::from_raw(index as u64);
            let mut inputs = Vec::with_capacity(draft.parameters.len());
            for (param, slot) in draft.parameters.into_iter().zip(draft.inputs) {
                let Some(slot) = slot else {
                    return Err(graph_error(
                        "missing-input-slot",
                        "node parameter has no slot",
                        [("node", id.to_string()), ("parameter", param.name)],
                    ));
                };
                inputs.push(InputPort {
                    parameter: param.name,
                    ty: param.ty,
                    slot,
                });
            }
            nodes.push(GraphNode {
                id,
                primitive: draft.primitive,
                name: draft.name,
                depth: draft.depth,
                inputs,
                output_bindings: draft.output_bindings,
            });
        }

        let depth = nodes.iter().map(|node| node.depth).max().unwrap_or(0);
        let outputs_hit = slots
            .iter()
            .filter(|slot| {
                matches!(slot.owner, Destination::GraphOutput { .. })
                    && matches!(slot.resolution, Resolution::Node { .. })
            })
            .count();
        let mut constants = self.constants;
        constants.sort_by_key(|binding| binding.slot);

        Ok(FinalGraph {
            schema_version: GRAPH_SCHEMA,
            input_type: header.input_type,
            output_type: header.output_type,
            max_depth: header.max_depth,
            depth,
            outcome: header.outcome,
            outputs_hit,
            nodes,
            slots,
            arguments,
            constants,
            unbound_inputs,
            unused_inputs,
        })
    }

    fn push_slot(&mut self, ty: TypeName, target_depth: u32, owner: Destination) -> SlotId {
        let id = SlotId::from_raw(self.slots.len() as u64);
        self.slots.push(SlotDraft {
            id,
            ty,
            target_depth,
            owner,
            resolution: None,
        });
        id
    }

    fn pending_slot(&self, slot: SlotId) -> Result<&SlotDraft, ComposeError> {
        let draft = self.slots.get(slot.index()).ok_or_else(|| {
            graph_error("unknown-slot", "slot id is not allocated", [("slot", slot.to_string())])
        })?;
        if draft.resolution.is_some() {
            return Err(graph_error(
                "slot-already-bound",
                "slot is already resolved",
                [("slot", slot.to_string())],
            ));
        }
        Ok(draft)
    }

    fn node_ref(&self, node: NodeId) -> Result<&NodeDraft, ComposeError> {
        self.nodes.get(node.index()).ok_or_else(|| unknown_node(node))
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut NodeDraft, ComposeError> {
        self.nodes.get_mut(node.index()).ok_or_else(|| unknown_node(node))
    }
}

/// Argument name prefix derived from a type name.
fn argument_stem(ty: &TypeName) -> String {
    ty.as_str()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

fn unknown_node(node: NodeId) -> ComposeError {
    graph_error("unknown-node", "node id is not allocated", [("node", node.to_string())])
}

pub(crate) fn graph_error<const N: usize>(
    code: &str,
    message: &str,
    context: [(&str, String); N],
) -> ComposeError {
    let mut info = ErrorInfo::new(code, message);
    for (key, value) in context {
        info = info.with_context(key, value);
    }
    ComposeError::Graph(info)
}
