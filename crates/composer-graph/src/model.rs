use std::fmt;

use composer_core::provenance::SchemaVersion;
use composer_core::{NodeId, PrimitiveId, SlotId, TypeMultiset, TypeName};
use serde::{Deserialize, Serialize};

/// Schema version written into every [`FinalGraph`].
pub const GRAPH_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Position that consumes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    /// One of the requested graph outputs.
    GraphOutput {
        /// Index into [`FinalGraph::output_type`].
        index: usize,
    },
    /// An input parameter of a previously created node.
    NodeInput {
        /// Consuming node.
        node: NodeId,
        /// Parameter position within the consuming primitive.
        parameter: usize,
    },
}

/// How a slot is satisfied in the finished graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    /// Produced by an output of a node.
    Node {
        /// Producing node.
        node: NodeId,
        /// Output position within the producing primitive.
        output: usize,
    },
    /// Fed directly by a graph argument.
    Argument {
        /// Index into [`FinalGraph::arguments`].
        index: usize,
    },
    /// Replaced by a generated literal listed in [`FinalGraph::constants`].
    Constant,
}

/// Literal value injected for a leftover slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Literal {
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Floating point literal.
    Float(f64),
    /// String literal.
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(value) => write!(f, "{value}"),
            Literal::Int(value) => write!(f, "{value}"),
            Literal::Float(value) => write!(f, "{value:?}"),
            Literal::Str(value) => write!(f, "{value:?}"),
        }
    }
}

/// A requirement created during the search together with its resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Stable slot identifier (equal to its index in [`FinalGraph::slots`]).
    pub id: SlotId,
    /// Required type.
    pub ty: TypeName,
    /// Depth the producer must sit below (0 for graph outputs).
    pub target_depth: u32,
    /// Position waiting for the value.
    pub owner: Destination,
    /// How the requirement was met.
    pub resolution: Resolution,
}

/// Named input of a node and the slot feeding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPort {
    /// Keyword the argument is passed under.
    pub parameter: String,
    /// Type of the parameter.
    pub ty: TypeName,
    /// Slot holding the requirement for this parameter.
    pub slot: SlotId,
}

/// Consumers of one output of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputBinding {
    /// Type produced at this position.
    pub ty: TypeName,
    /// Every position fed by the output, in binding order. Empty when unused.
    pub destinations: Vec<Destination>,
}

/// A primitive invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node identifier (equal to its index in [`FinalGraph::nodes`]).
    pub id: NodeId,
    /// Registry identifier of the invoked primitive.
    pub primitive: PrimitiveId,
    /// Primitive name, kept for renderers that lack the registry.
    pub name: String,
    /// `1 + max(target_depth)` over the slots the node feeds.
    pub depth: u32,
    /// Inputs in parameter order.
    pub inputs: Vec<InputPort>,
    /// Outputs in declaration order.
    pub output_bindings: Vec<OutputBinding>,
}

impl GraphNode {
    /// Total number of destinations fed by the node.
    pub fn fan_out(&self) -> usize {
        self.output_bindings
            .iter()
            .map(|binding| binding.destinations.len())
            .sum()
    }
}

/// A graph-level parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument position.
    pub index: usize,
    /// Generated argument name (`int0`, `str1`, ...).
    pub name: String,
    /// Argument type.
    pub ty: TypeName,
    /// Slot fed by the argument, `None` for requested inputs nothing consumes.
    pub slot: Option<SlotId>,
}

/// Literal bound to a slot during the depth-exhaustion fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantBinding {
    /// Slot replaced by the literal.
    pub slot: SlotId,
    /// Generated value.
    pub value: Literal,
}

/// Terminal state reached by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// The frontier matched the requested inputs and every output was produced.
    Done,
    /// Leftover requirements were closed with constants at the depth limit.
    FallbackDone,
}

/// Composed program: a DAG of primitive invocations, arguments and constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalGraph {
    /// Schema of the payload.
    pub schema_version: SchemaVersion,
    /// Requested graph inputs.
    pub input_type: TypeMultiset,
    /// Requested graph outputs, in output position order.
    pub output_type: Vec<TypeName>,
    /// Depth bound the search ran under.
    pub max_depth: u32,
    /// Longest composition chain in the graph.
    pub depth: u32,
    /// Terminal state of the search.
    pub outcome: Outcome,
    /// Number of graph outputs produced by nodes.
    pub outputs_hit: usize,
    /// Nodes in creation order; producers always follow their consumers.
    pub nodes: Vec<GraphNode>,
    /// Every slot created during the search.
    pub slots: Vec<Slot>,
    /// Graph parameters.
    pub arguments: Vec<Argument>,
    /// Literals injected by the fallback, sorted by slot.
    pub constants: Vec<ConstantBinding>,
    /// Types of the arguments that feed a slot.
    pub unbound_inputs: TypeMultiset,
    /// Requested input types that no slot consumes.
    pub unused_inputs: TypeMultiset,
}

impl FinalGraph {
    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when the graph holds no node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks a node up by id.
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.index())
    }

    /// Looks a slot up by id.
    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.index())
    }

    /// Returns the literal bound to `slot`, if any.
    pub fn constant(&self, slot: SlotId) -> Option<&Literal> {
        self.constants
            .binary_search_by_key(&slot, |binding| binding.slot)
            .ok()
            .map(|index| &self.constants[index].value)
    }

    /// Slots created for the graph outputs, in output order.
    pub fn output_slots(&self) -> Vec<&Slot> {
        let mut outputs: Vec<&Slot> = self
            .slots
            .iter()
            .filter(|slot| matches!(slot.owner, Destination::GraphOutput { .. }))
            .collect();
        outputs.sort_by_key(|slot| match slot.owner {
            Destination::GraphOutput { index } => index,
            Destination::NodeInput { .. } => usize::MAX,
        });
        outputs
    }

    /// Number of nodes invoking each primitive name.
    pub fn primitive_counts(&self) -> std::collections::BTreeMap<&str, usize> {
        let mut counts = std::collections::BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(node.name.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
