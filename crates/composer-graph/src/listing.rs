use std::collections::BTreeMap;
use std::fmt::Write;

use composer_core::NodeId;

use crate::model::{FinalGraph, Resolution, Slot};

/// Renders the graph as a straight-line program listing for inspection.
///
/// Nodes are emitted in reverse creation order, which is a topological order
/// because producers are always created after their consumers. Outputs that
/// feed nothing are named `_` and constants are rendered as literals.
pub fn straight_line(graph: &FinalGraph) -> String {
    let mut names: BTreeMap<(NodeId, usize), String> = BTreeMap::new();
    let mut next = 0usize;
    let mut out = String::new();

    let inputs: Vec<String> = graph
        .arguments
        .iter()
        .map(|argument| format!("${}: {}", argument.name, argument.ty))
        .collect();
    let _ = writeln!(out, ">INPUT ({})", inputs.join(", "));

    for node in graph.nodes.iter().rev() {
        let mut targets = Vec::with_capacity(node.output_bindings.len());
        for (output, binding) in node.output_bindings.iter().enumerate() {
            if binding.destinations.is_empty() {
                targets.push("_".to_string());
            } else {
                let name = format!("!v{next}");
                next += 1;
                names.insert((node.id, output), name.clone());
                targets.push(name);
            }
        }
        let params: Vec<String> = node
            .inputs
            .iter()
            .map(|port| {
                let value = graph
                    .slot(port.slot)
                    .map(|slot| operand(graph, &names, slot))
                    .unwrap_or_else(|| "?".to_string());
                format!("{}: {} = {}", port.parameter, port.ty, value)
            })
            .collect();
        let _ = writeln!(
            out,
            "{} = {}({})",
            targets.join(", "),
            node.name,
            params.join(", ")
        );
    }

    let returns: Vec<String> = graph
        .output_slots()
        .into_iter()
        .map(|slot| operand(graph, &names, slot))
        .collect();
    let _ = writeln!(out, ">RETURN ({})", returns.join(", "));
    out
}

fn operand(graph: &FinalGraph, names: &BTreeMap<(NodeId, usize), String>, slot: &Slot) -> String {
    match slot.resolution {
        Resolution::Node { node, output } => names
            .get(&(node, output))
            .cloned()
            .unwrap_or_else(|| "?".to_string()),
        Resolution::Argument { index } => graph
            .arguments
            .get(index)
            .map(|argument| format!("${}", argument.name))
            .unwrap_or_else(|| "?".to_string()),
        Resolution::Constant => graph
            .constant(slot.id)
            .map(ToString::to_string)
            .unwrap_or_else(|| "?".to_string()),
    }
}
