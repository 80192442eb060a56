//! Structural checks run on every finished or decoded [`FinalGraph`].

use composer_core::errors::ComposeError;
use composer_core::{SlotId, TypeMultiset};

use crate::builder::graph_error;
use crate::model::{Destination, FinalGraph, Outcome, Resolution, Slot, GRAPH_SCHEMA};

/// Runs every structural check and returns the first violation.
pub fn validate(graph: &FinalGraph) -> Result<(), ComposeError> {
    check_schema(graph)?;
    check_slots(graph)?;
    check_nodes(graph)?;
    check_resolutions(graph)?;
    check_depths(graph)?;
    check_arguments(graph)?;
    check_outcome(graph)?;
    Ok(())
}

fn check_schema(graph: &FinalGraph) -> Result<(), ComposeError> {
    if !GRAPH_SCHEMA.is_compatible_with(&graph.schema_version) {
        let found = graph.schema_version;
        return Err(graph_error(
            "unsupported-schema",
            "graph schema version is not readable",
            [(
                "found",
                format!("{}.{}.{}", found.major, found.minor, found.patch),
            )],
        ));
    }
    Ok(())
}

fn check_slots(graph: &FinalGraph) -> Result<(), ComposeError> {
    let mut outputs_seen = vec![false; graph.output_type.len()];
    for (index, slot) in graph.slots.iter().enumerate() {
        if slot.id.index() != index {
            return Err(graph_error(
                "slot-id-mismatch",
                "slot id does not match its position",
                [("slot", slot.id.to_string()), ("position", index.to_string())],
            ));
        }
        match slot.owner {
            Destination::GraphOutput { index: output } => {
                let Some(expected) = graph.output_type.get(output) else {
                    return Err(graph_error(
                        "unknown-graph-output",
                        "slot owner names a missing graph output",
                        [("slot", slot.id.to_string()), ("output", output.to_string())],
                    ));
                };
                if outputs_seen[output] || *expected != slot.ty || slot.target_depth != 0 {
                    return Err(graph_error(
                        "bad-output-slot",
                        "graph output slot is duplicated or mistyped",
                        [("slot", slot.id.to_string()), ("output", output.to_string())],
                    ));
                }
                outputs_seen[output] = true;
            }
            Destination::NodeInput { node, parameter } => {
                let port = graph
                    .node(node)
                    .and_then(|owner| owner.inputs.get(parameter));
                match port {
                    Some(port) if port.slot == slot.id && port.ty == slot.ty => {}
                    _ => {
                        return Err(graph_error(
                            "bad-input-slot",
                            "slot owner does not point back at the slot",
                            [("slot", slot.id.to_string()), ("node", node.to_string())],
                        ))
                    }
                }
            }
        }
    }
    if let Some(missing) = outputs_seen.iter().position(|seen| !seen) {
        return Err(graph_error(
            "missing-output-slot",
            "graph output has no slot",
            [("output", missing.to_string())],
        ));
    }
    Ok(())
}

fn check_nodes(graph: &FinalGraph) -> Result<(), ComposeError> {
    for (index, node) in graph.nodes.iter().enumerate() {
        if node.id.index() != index {
            return Err(graph_error(
                "node-id-mismatch",
                "node id does not match its position",
                [("node", node.id.to_string()), ("position", index.to_string())],
            ));
        }
        if node.output_bindings.is_empty() {
            return Err(graph_error(
                "node-without-outputs",
                "node has no output",
                [("node", node.id.to_string())],
            ));
        }
        for (parameter, port) in node.inputs.iter().enumerate() {
            let owned = graph.slot(port.slot).map(|slot| slot.owner)
                == Some(Destination::NodeInput {
                    node: node.id,
                    parameter,
                });
            if !owned {
                return Err(graph_error(
                    "foreign-input-slot",
                    "input port references a slot owned elsewhere",
                    [("node", node.id.to_string()), ("parameter", port.parameter.clone())],
                ));
            }
        }
        for (output, binding) in node.output_bindings.iter().enumerate() {
            for destination in &binding.destinations {
                let slot = destination_slot(graph, *destination).ok_or_else(|| {
                    graph_error(
                        "dangling-destination",
                        "output feeds a position with no slot",
                        [("node", node.id.to_string()), ("output", output.to_string())],
                    )
                })?;
                if slot.resolution
                    != (Resolution::Node {
                        node: node.id,
                        output,
                    })
                {
                    return Err(graph_error(
                        "binding-mismatch",
                        "output binding disagrees with slot resolution",
                        [("node", node.id.to_string()), ("slot", slot.id.to_string())],
                    ));
                }
            }
        }
    }
    Ok(())
}

fn check_resolutions(graph: &FinalGraph) -> Result<(), ComposeError> {
    let mut outputs_hit = 0;
    let mut constant_slots: Vec<SlotId> = Vec::new();
    for slot in &graph.slots {
        match slot.resolution {
            Resolution::Node { node, output } => {
                let Some(producer) = graph.node(node) else {
                    return Err(graph_error(
                        "unknown-producer",
                        "slot resolved by a missing node",
                        [("slot", slot.id.to_string()), ("node", node.to_string())],
                    ));
                };
                let binding = producer.output_bindings.get(output);
                let listed = binding.is_some_and(|binding| {
                    binding.ty == slot.ty && binding.destinations.contains(&slot.owner)
                });
                if !listed {
                    return Err(graph_error(
                        "binding-mismatch",
                        "slot resolution is not listed by the producer",
                        [("slot", slot.id.to_string()), ("node", node.to_string())],
                    ));
                }
                match slot.owner {
                    Destination::GraphOutput { .. } => outputs_hit += 1,
                    Destination::NodeInput { node: consumer, .. } if consumer >= node => {
                        return Err(graph_error(
                            "cycle",
                            "producer does not follow its consumer",
                            [("producer", node.to_string()), ("consumer", consumer.to_string())],
                        ));
                    }
                    Destination::NodeInput { .. } => {}
                }
            }
            Resolution::Argument { index } => {
                let fed = graph
                    .arguments
                    .get(index)
                    .is_some_and(|argument| argument.slot == Some(slot.id) && argument.ty == slot.ty);
                if !fed {
                    return Err(graph_error(
                        "argument-mismatch",
                        "slot resolved by an argument that does not feed it",
                        [("slot", slot.id.to_string()), ("argument", index.to_string())],
                    ));
                }
            }
            Resolution::Constant => constant_slots.push(slot.id),
        }
    }
    if outputs_hit != graph.outputs_hit {
        return Err(graph_error(
            "outputs-hit-mismatch",
            "recorded outputs_hit differs from the slots",
            [
                ("recorded", graph.outputs_hit.to_string()),
                ("actual", outputs_hit.to_string()),
            ],
        ));
    }
    let bound: Vec<SlotId> = graph.constants.iter().map(|binding| binding.slot).collect();
    if bound != constant_slots {
        return Err(graph_error(
            "constant-mismatch",
            "constants do not cover exactly the constant slots",
            [
                ("constants", bound.len().to_string()),
                ("constant_slots", constant_slots.len().to_string()),
            ],
        ));
    }
    Ok(())
}

fn check_depths(graph: &FinalGraph) -> Result<(), ComposeError> {
    for node in &graph.nodes {
        let mut deepest: Option<u32> = None;
        for binding in &node.output_bindings {
            for destination in &binding.destinations {
                if let Some(slot) = destination_slot(graph, *destination) {
                    deepest = Some(deepest.map_or(slot.target_depth, |d| d.max(slot.target_depth)));
                }
            }
        }
        let expected = deepest.map_or(1, |depth| depth + 1);
        if node.depth != expected {
            return Err(graph_error(
                "node-depth-mismatch",
                "node depth is not one more than its deepest consumer slot",
                [
                    ("node", node.id.to_string()),
                    ("depth", node.depth.to_string()),
                    ("expected", expected.to_string()),
                ],
            ));
        }
        for port in &node.inputs {
            let target = graph.slot(port.slot).map(|slot| slot.target_depth);
            if target != Some(node.depth) {
                return Err(graph_error(
                    "input-depth-mismatch",
                    "input slot target depth differs from node depth",
                    [("node", node.id.to_string()), ("slot", port.slot.to_string())],
                ));
            }
        }
    }
    let depth = graph.nodes.iter().map(|node| node.depth).max().unwrap_or(0);
    if depth != graph.depth || depth > graph.max_depth {
        return Err(graph_error(
            "graph-depth-mismatch",
            "graph depth is inconsistent or exceeds max_depth",
            [
                ("depth", graph.depth.to_string()),
                ("actual", depth.to_string()),
                ("max_depth", graph.max_depth.to_string()),
            ],
        ));
    }
    Ok(())
}

fn check_arguments(graph: &FinalGraph) -> Result<(), ComposeError> {
    let mut bound = TypeMultiset::new();
    let mut unused = TypeMultiset::new();
    for (index, argument) in graph.arguments.iter().enumerate() {
        if argument.index != index {
            return Err(graph_error(
                "argument-index-mismatch",
                "argument index does not match its position",
                [("argument", argument.name.clone())],
            ));
        }
        match argument.slot {
            Some(slot) => {
                let resolved = graph.slot(slot).map(|slot| slot.resolution);
                if resolved != Some(Resolution::Argument { index }) {
                    return Err(graph_error(
                        "argument-mismatch",
                        "argument feeds a slot resolved elsewhere",
                        [("argument", argument.name.clone()), ("slot", slot.to_string())],
                    ));
                }
                bound.insert(argument.ty.clone());
            }
            None => unused.insert(argument.ty.clone()),
        }
    }
    if bound != graph.unbound_inputs || unused != graph.unused_inputs {
        return Err(graph_error(
            "argument-types-mismatch",
            "arguments disagree with unbound_inputs or unused_inputs",
            [
                ("unbound_inputs", graph.unbound_inputs.to_string()),
                ("arguments", bound.to_string()),
            ],
        ));
    }
    let mut total = bound;
    total.extend(unused.expand());
    if total != graph.input_type {
        return Err(graph_error(
            "input-type-mismatch",
            "arguments do not add up to the requested inputs",
            [("input_type", graph.input_type.to_string())],
        ));
    }
    Ok(())
}

fn check_outcome(graph: &FinalGraph) -> Result<(), ComposeError> {
    if graph.outcome != Outcome::Done {
        return Ok(());
    }
    let complete = graph.constants.is_empty()
        && graph.outputs_hit == graph.output_type.len()
        && graph.unbound_inputs == graph.input_type;
    if !complete {
        return Err(graph_error(
            "incomplete-done",
            "a done graph must hit every output from the requested inputs alone",
            [
                ("outputs_hit", graph.outputs_hit.to_string()),
                ("constants", graph.constants.len().to_string()),
            ],
        ));
    }
    Ok(())
}

fn destination_slot(graph: &FinalGraph, destination: Destination) -> Option<&Slot> {
    match destination {
        Destination::GraphOutput { index } => graph
            .slots
            .iter()
            .find(|slot| slot.owner == Destination::GraphOutput { index }),
        Destination::NodeInput { node, parameter } => graph
            .node(node)
            .and_then(|owner| owner.inputs.get(parameter))
            .and_then(|port| graph.slot(port.slot)),
    }
}
