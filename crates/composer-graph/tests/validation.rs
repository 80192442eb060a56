use composer_core::errors::ComposeError;
use composer_core::{PrimitiveId, PrimitiveSpec, TypeMultiset, TypeName};
use composer_graph::{
    validate, Destination, FinalGraph, GraphBuilder, GraphHeader, Literal, Outcome, Resolution,
};

fn ints(count: usize) -> TypeMultiset {
    let mut set = TypeMultiset::new();
    set.insert_n(TypeName::new("int"), count);
    set
}

/// `int_add(int_add(a, b), c)` with the inner node feeding two consumers.
fn branched_graph() -> FinalGraph {
    let add = PrimitiveSpec::new("int_add")
        .input("x", "int")
        .input("y", "int")
        .output("int");
    let mut builder = GraphBuilder::new();
    let out = builder.add_output_slot(0, TypeName::new("int"));
    let n0 = builder.add_node(PrimitiveId::from_raw(0), &add);
    builder.bind_output(n0, 0, out).unwrap();
    let x0 = builder.add_input_slot(n0, 0, 1).unwrap();
    let y0 = builder.add_input_slot(n0, 1, 1).unwrap();
    let n1 = builder.add_node(PrimitiveId::from_raw(0), &add);
    builder.bind_output(n1, 0, x0).unwrap();
    builder.bind_output(n1, 0, y0).unwrap();
    builder.set_depth(n1, 2).unwrap();
    let x1 = builder.add_input_slot(n1, 0, 2).unwrap();
    let y1 = builder.add_input_slot(n1, 1, 2).unwrap();
    builder.bind_constant(y1, Literal::Int(4)).unwrap();
    builder
        .finish(
            GraphHeader {
                input_type: ints(2),
                output_type: vec![TypeName::new("int")],
                max_depth: 2,
                outcome: Outcome::FallbackDone,
            },
            vec![x1],
        )
        .unwrap()
}

fn graph_code(result: Result<(), ComposeError>) -> String {
    match result {
        Err(ComposeError::Graph(info)) => info.code,
        other => panic!("expected graph error, got {other:?}"),
    }
}

#[test]
fn builder_output_passes_validation() {
    let graph = branched_graph();
    validate(&graph).unwrap();
    assert_eq!(graph.nodes[1].fan_out(), 2);
    assert_eq!(graph.nodes[1].depth, 2);
}

#[test]
fn wrong_node_depth_is_reported() {
    let mut graph = branched_graph();
    graph.nodes[1].depth = 3;
    assert_eq!(graph_code(validate(&graph)), "node-depth-mismatch");
}

#[test]
fn outputs_hit_must_match_slots() {
    let mut graph = branched_graph();
    graph.outputs_hit = 0;
    assert_eq!(graph_code(validate(&graph)), "outputs-hit-mismatch");
}

#[test]
fn dropped_constant_is_reported() {
    let mut graph = branched_graph();
    graph.constants.clear();
    assert_eq!(graph_code(validate(&graph)), "constant-mismatch");
}

#[test]
fn done_graph_cannot_carry_constants() {
    let mut graph = branched_graph();
    graph.outcome = Outcome::Done;
    assert_eq!(graph_code(validate(&graph)), "incomplete-done");
}

#[test]
fn forward_reference_is_a_cycle() {
    let mut graph = branched_graph();
    // Feed the first input of n0 from n0 itself.
    let slot = graph.nodes[0].inputs[0].slot;
    graph.slots[slot.index()].resolution = Resolution::Node {
        node: graph.nodes[0].id,
        output: 0,
    };
    let n0 = graph.nodes[0].id;
    graph.nodes[0].output_bindings[0]
        .destinations
        .push(Destination::NodeInput {
            node: n0,
            parameter: 0,
        });
    graph.nodes[1].output_bindings[0].destinations.remove(0);
    let code = graph_code(validate(&graph));
    assert!(code == "cycle" || code == "node-depth-mismatch", "{code}");
}

#[test]
fn argument_types_must_add_up() {
    let mut graph = branched_graph();
    graph.input_type = ints(3);
    assert_eq!(graph_code(validate(&graph)), "input-type-mismatch");
}

#[test]
fn depth_above_bound_is_reported() {
    let mut graph = branched_graph();
    graph.max_depth = 1;
    assert_eq!(graph_code(validate(&graph)), "graph-depth-mismatch");
}
