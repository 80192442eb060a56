use composer_core::catalog::{self, FLOAT, INT, STR};
use composer_core::{RngHandle, TypeMultiset, TypeName};
use composer_graph::{validate, Outcome};
use composer_search::{Composer, ConstantTable, SearchConfig, SynthesisRequest};
use proptest::prelude::*;

fn type_name() -> impl Strategy<Value = TypeName> {
    prop_oneof![Just(INT), Just(FLOAT), Just(STR)].prop_map(TypeName::new)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn catalog_requests_always_close(
        seed in any::<u64>(),
        inputs in prop::collection::vec(type_name(), 0..4),
        outputs in prop::collection::vec(type_name(), 1..4),
        max_depth in 1u32..5,
        branch_probability in 0.0f64..=1.0,
    ) {
        let config = SearchConfig { branch_probability, ..SearchConfig::default() };
        let composer = Composer::new(catalog::standard(), ConstantTable::standard(), config).unwrap();
        let input_type: TypeMultiset = inputs.into_iter().collect();
        let request = SynthesisRequest::new(input_type.clone(), outputs.clone(), max_depth).unwrap();

        let composition = composer.compose(&request, &mut RngHandle::from_seed(seed)).unwrap();
        let graph = &composition.graph;
        validate(graph).unwrap();
        prop_assert!(graph.depth <= max_depth);
        prop_assert_eq!(&graph.output_type, &outputs);
        prop_assert_eq!(graph.output_slots().len(), outputs.len());
        prop_assert!(graph.unbound_inputs.is_subset(&input_type));
        if graph.outcome == Outcome::Done {
            prop_assert_eq!(graph.outputs_hit, outputs.len());
            prop_assert_eq!(&graph.unbound_inputs, &input_type);
            prop_assert!(graph.constants.is_empty());
        }
        prop_assert_eq!(composition.report.stats.constants_injected, graph.constants.len());
    }
}
