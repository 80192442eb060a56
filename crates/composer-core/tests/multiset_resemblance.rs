use composer_core::{resemblance, TypeMultiset, TypeName};
use proptest::prelude::*;

fn set(names: &[&str]) -> TypeMultiset {
    names.iter().map(|name| TypeName::new(*name)).collect()
}

fn arb_multiset() -> impl Strategy<Value = TypeMultiset> {
    prop::collection::vec(prop::sample::select(vec!["int", "float", "str", "bool"]), 0..8)
        .prop_map(|names| names.into_iter().map(TypeName::new).collect())
}

#[test]
fn documented_example_scores_two_thirds() {
    let a = set(&["int", "int", "str"]);
    let b = set(&["int", "str"]);
    assert_eq!(a.intersection(&b), set(&["int", "str"]));
    assert_eq!(a.union(&b), set(&["int", "int", "str"]));
    assert!((resemblance(&a, &b) - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn empty_pair_carries_no_signal() {
    assert_eq!(resemblance(&TypeMultiset::new(), &TypeMultiset::new()), 0.0);
}

#[test]
fn disjoint_sets_score_zero() {
    assert_eq!(resemblance(&set(&["int"]), &set(&["str", "str"])), 0.0);
}

#[test]
fn negative_counts_are_rejected() {
    let err = TypeMultiset::from_counts([(TypeName::new("int"), 2), (TypeName::new("str"), -1)])
        .unwrap_err();
    assert_eq!(err.code(), "negative-multiplicity");
    assert_eq!(err.info().context["type"], "str");
}

#[test]
fn difference_saturates_per_type() {
    let frontier = set(&["int", "int", "int", "str"]);
    let goal = set(&["int", "float"]);
    assert_eq!(frontier.difference(&goal), set(&["int", "int", "str"]));
    assert!(goal.difference(&frontier).len() == 1);
}

#[test]
fn json_form_is_a_count_map() {
    let a = set(&["int", "int", "str"]);
    let json = serde_json::to_string(&a).unwrap();
    assert_eq!(json, r#"{"int":2,"str":1}"#);
    let back: TypeMultiset = serde_json::from_str(&json).unwrap();
    assert_eq!(back, a);
    assert_eq!(back.len(), 3);
}

proptest! {
    #[test]
    fn resemblance_is_symmetric_and_bounded(a in arb_multiset(), b in arb_multiset()) {
        let ab = resemblance(&a, &b);
        let ba = resemblance(&b, &a);
        prop_assert!((ab - ba).abs() < 1e-12);
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    #[test]
    fn self_resemblance_is_one(a in arb_multiset()) {
        prop_assume!(!a.is_empty());
        prop_assert!((resemblance(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn union_and_intersection_sizes_agree(a in arb_multiset(), b in arb_multiset()) {
        prop_assert_eq!(a.intersection(&b).len(), a.intersection_len(&b));
        prop_assert_eq!(a.union(&b).len(), a.union_len(&b));
        prop_assert!(a.intersection(&b).is_subset(&a));
        prop_assert!(a.is_subset(&a.union(&b)));
    }
}
