use composer_core::{SlotId, TypeMultiset, TypeName};
use composer_search::depth_queue::DepthQueue;
use composer_search::{Frontier, FrontierSlot};

fn int() -> TypeName {
    TypeName::new("int")
}

fn slot(raw: u64, ty: &str, target_depth: u32) -> FrontierSlot {
    FrontierSlot {
        slot: SlotId::from_raw(raw),
        ty: TypeName::new(ty),
        target_depth,
    }
}

#[test]
fn pop_lowest_prefers_shallow_then_oldest() {
    let mut queue = DepthQueue::new();
    queue.push(int(), 2, SlotId::from_raw(0));
    queue.push(int(), 1, SlotId::from_raw(1));
    queue.push(int(), 1, SlotId::from_raw(2));

    assert_eq!(queue.peek_lowest(&int()), Some((1, SlotId::from_raw(1))));
    assert_eq!(queue.pop_lowest(&int()), Some((1, SlotId::from_raw(1))));
    assert_eq!(queue.pop_lowest(&int()), Some((1, SlotId::from_raw(2))));
    assert_eq!(queue.pop_lowest(&int()), Some((2, SlotId::from_raw(0))));
    assert_eq!(queue.pop_lowest(&int()), None);
    assert!(queue.is_empty());
    assert_eq!(queue.types().count(), 0);
}

#[test]
fn pop_deepest_prefers_latest_among_equals() {
    let mut queue = DepthQueue::new();
    queue.push(int(), 3, SlotId::from_raw(0));
    queue.push(int(), 3, SlotId::from_raw(4));
    queue.push(int(), 1, SlotId::from_raw(5));

    assert_eq!(queue.pop_deepest(&int()), Some((3, SlotId::from_raw(4))));
    assert_eq!(queue.pop_deepest(&int()), Some((3, SlotId::from_raw(0))));
    assert_eq!(queue.len(), 1);
}

#[test]
fn remove_matched_takes_exact_depth() {
    let mut queue = DepthQueue::new();
    queue.push(int(), 0, SlotId::from_raw(0));
    queue.push(int(), 2, SlotId::from_raw(1));
    queue.push(int(), 2, SlotId::from_raw(2));

    assert_eq!(queue.remove_matched(&int(), 2), Some(SlotId::from_raw(1)));
    assert_eq!(queue.remove_matched(&int(), 5), None);
    assert_eq!(queue.count(&int()), 2);
    assert_eq!(queue.entries(&int()), vec![(0, SlotId::from_raw(0)), (2, SlotId::from_raw(2))]);
}

#[test]
fn frontier_tracks_multiset_and_types() {
    let mut frontier = Frontier::new();
    frontier.push(slot(0, "int", 0));
    frontier.push(slot(1, "str", 1));
    frontier.push(slot(2, "int", 1));

    let expected: TypeMultiset = ["int", "int", "str"].into_iter().map(TypeName::new).collect();
    assert_eq!(frontier.as_multiset(), &expected);
    let types: Vec<_> = frontier.peek_types().into_iter().collect();
    assert_eq!(types, vec![TypeName::new("int"), TypeName::new("str")]);

    assert_eq!(frontier.pop_lowest(&int()), Some(slot(0, "int", 0)));
    assert_eq!(
        frontier.remove_matched(&TypeName::new("str"), 1),
        Some(slot(1, "str", 1))
    );
    assert_eq!(frontier.len(), 1);
    assert_eq!(frontier.as_multiset().count(&int()), 1);
    assert_eq!(frontier.slots(), vec![slot(2, "int", 1)]);
    assert!(frontier.pop_lowest(&TypeName::new("bool")).is_none());
}

#[test]
fn slots_are_ordered_by_type_then_depth() {
    let mut frontier = Frontier::new();
    frontier.push(slot(0, "str", 0));
    frontier.push(slot(1, "int", 2));
    frontier.push(slot(2, "int", 1));

    let order: Vec<u64> = frontier.slots().iter().map(|s| s.slot.as_raw()).collect();
    assert_eq!(order, vec![2, 1, 0]);
    assert!(!frontier.is_empty());
}
