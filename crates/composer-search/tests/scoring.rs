use composer_core::catalog;
use composer_core::{RngHandle, TypeMultiset, TypeName};
use composer_search::sampler::sample;
use composer_search::{softmax, ResemblanceCombination, Scorer, SearchConfig, TemperatureSchedule};
use proptest::prelude::*;

fn set(names: &[&str]) -> TypeMultiset {
    names.iter().map(|name| TypeName::new(*name)).collect()
}

proptest! {
    #[test]
    fn softmax_is_a_distribution(
        values in prop::collection::vec(-50.0f64..50.0, 1..24),
        temperature in 0.01f64..5.0,
    ) {
        let probs = softmax(&values, temperature);
        prop_assert_eq!(probs.len(), values.len());
        prop_assert!(probs.iter().all(|p| *p >= 0.0 && p.is_finite()));
        prop_assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn softmax_preserves_order(a in 0.0f64..1.0, b in 0.0f64..1.0) {
        let probs = softmax(&[a, b], 0.7);
        if a > b {
            prop_assert!(probs[0] >= probs[1]);
        } else if b > a {
            prop_assert!(probs[1] >= probs[0]);
        }
    }
}

#[test]
fn schedule_is_sharp_at_the_edges() {
    let schedule = TemperatureSchedule::default();
    let taus: Vec<f64> = (0..5).map(|d| schedule.at(d, 5)).collect();
    assert_eq!(taus, vec![0.35, 0.7, 0.7, 0.35, 0.35]);
    assert!(!schedule.is_closing(2, 5));
    assert!(schedule.is_closing(3, 5));
    // depth 0 is also closing for shallow searches
    assert_eq!(schedule.at(0, 1), 0.35);
}

#[test]
fn schedule_shape_is_validated() {
    let mut config = SearchConfig::default();
    config.temperature.opening = 1.5;
    let err = config.validate().unwrap_err();
    assert_eq!(err.code(), "temperature-schedule-shape");

    let mut config = SearchConfig::default();
    config.temperature.closing = 0.0;
    assert_eq!(config.validate().unwrap_err().code(), "non-positive-temperature");

    let mut config = SearchConfig::default();
    config.branch_probability = 1.5;
    assert_eq!(
        config.validate().unwrap_err().code(),
        "branch-probability-out-of-range"
    );
}

#[test]
fn unproductive_primitives_are_masked() {
    let registry = catalog::standard();
    let config = SearchConfig::default();
    let scores = Scorer::new(&registry, &config).score(&set(&["str"]), &set(&["str"]), 1, 6);

    assert!(!scores.closing);
    assert_eq!(scores.temperature, 0.7);
    for (id, spec) in registry.iter() {
        let p = scores.probabilities[id.index()];
        if spec.outputs.iter().any(|ty| ty.as_str() == "str") {
            assert!(p > 0.0, "{} should be sampleable", spec.name);
        } else {
            assert_eq!(p, 0.0, "{} should be masked", spec.name);
        }
    }
    assert!((scores.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
}

#[test]
fn closing_window_mixes_in_goal_resemblance() {
    let registry = catalog::standard();
    let config = SearchConfig::default();
    let scorer = Scorer::new(&registry, &config);
    let frontier = set(&["int"]);
    let goal = set(&["str", "str"]);
    let (add, _) = registry.by_name("int_add").unwrap();
    let (length, _) = registry.by_name("str_length").unwrap();

    let open = scorer.score(&frontier, &goal, 1, 6);
    assert_eq!(
        open.probabilities[add.index()],
        open.probabilities[length.index()]
    );

    let closing = scorer.score(&frontier, &goal, 4, 6);
    assert!(closing.closing);
    assert!((closing.resemblance[length.index()] - 0.75).abs() < 1e-12);
    assert!((closing.resemblance[add.index()] - 0.5).abs() < 1e-12);
    assert!(closing.probabilities[length.index()] > closing.probabilities[add.index()]);
}

#[test]
fn combination_rules() {
    let max = ResemblanceCombination::Max;
    let product = ResemblanceCombination::Product;
    assert_eq!(max.combine(0.25, 0.5), 0.5);
    assert_eq!(product.combine(0.25, 0.5), 0.125);
    assert_eq!(ResemblanceCombination::default().combine(1.0, 0.5), 0.75);
}

#[test]
fn product_rule_can_be_degenerate() {
    let registry = catalog::standard();
    let config = SearchConfig {
        combination: ResemblanceCombination::Product,
        ..SearchConfig::default()
    };
    let scores = Scorer::new(&registry, &config).score(&set(&["int"]), &set(&["str"]), 3, 4);
    // str_length still links the two, so this is not degenerate
    assert!(!scores.is_degenerate());
    let scores = Scorer::new(&registry, &config).score(&set(&["int"]), &set(&["bool"]), 3, 4);
    assert!(scores.is_degenerate());
    assert!(scores.productive > 0);
}

#[test]
fn empty_distribution_is_an_empty_registry() {
    let mut rng = RngHandle::from_seed(1);
    let err = sample(&[], &mut rng).unwrap_err();
    assert_eq!(err.code(), "empty-registry");
}

#[test]
fn sampler_never_draws_zero_probability() {
    let mut rng = RngHandle::from_seed(99);
    for _ in 0..200 {
        let id = sample(&[0.0, 0.3, 0.0, 0.7], &mut rng).unwrap();
        assert!(id.index() == 1 || id.index() == 3);
    }
}
