use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use composer_core::{SlotId, TypeName};

/// Per-type min-heaps of `(target_depth, slot)` pending requirements.
///
/// Slot ids grow with insertion, so ordering on the pair breaks depth ties in
/// FIFO order. Empty heaps are dropped so [`DepthQueue::types`] only lists
/// outstanding types.
#[derive(Debug, Clone, Default)]
pub struct DepthQueue {
    heaps: BTreeMap<TypeName, BinaryHeap<Reverse<(u32, SlotId)>>>,
    len: usize,
}

impl DepthQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending slot.
    pub fn push(&mut self, ty: TypeName, target_depth: u32, slot: SlotId) {
        self.heaps
            .entry(ty)
            .or_default()
            .push(Reverse((target_depth, slot)));
        self.len += 1;
    }

    /// Shallowest pending entry of `ty` without removing it.
    pub fn peek_lowest(&self, ty: &TypeName) -> Option<(u32, SlotId)> {
        self.heaps
            .get(ty)
            .and_then(|heap| heap.peek())
            .map(|Reverse(entry)| *entry)
    }

    /// Removes and returns the shallowest pending entry of `ty`.
    pub fn pop_lowest(&mut self, ty: &TypeName) -> Option<(u32, SlotId)> {
        let heap = self.heaps.get_mut(ty)?;
        let Reverse(entry) = heap.pop()?;
        self.after_removal(ty);
        Some(entry)
    }

    /// Removes and returns the deepest pending entry of `ty`, latest inserted first.
    pub fn pop_deepest(&mut self, ty: &TypeName) -> Option<(u32, SlotId)> {
        let heap = self.heaps.get_mut(ty)?;
        let deepest = heap.iter().map(|Reverse(entry)| *entry).max()?;
        heap.retain(|Reverse(entry)| *entry != deepest);
        self.after_removal(ty);
        Some(deepest)
    }

    /// Removes the earliest pending slot of `ty` at exactly `target_depth`.
    pub fn remove_matched(&mut self, ty: &TypeName, target_depth: u32) -> Option<SlotId> {
        let heap = self.heaps.get_mut(ty)?;
        let matched = heap
            .iter()
            .map(|Reverse(entry)| *entry)
            .filter(|(depth, _)| *depth == target_depth)
            .min()?;
        heap.retain(|Reverse(entry)| *entry != matched);
        self.after_removal(ty);
        Some(matched.1)
    }

    /// Number of pending entries of `ty`.
    pub fn count(&self, ty: &TypeName) -> usize {
        self.heaps.get(ty).map_or(0, BinaryHeap::len)
    }

    /// Total number of pending entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Outstanding types in ascending order.
    pub fn types(&self) -> impl Iterator<Item = &TypeName> + '_ {
        self.heaps.keys()
    }

    /// All pending entries of `ty`, shallowest first.
    pub fn entries(&self, ty: &TypeName) -> Vec<(u32, SlotId)> {
        let mut entries: Vec<_> = self
            .heaps
            .get(ty)
            .map(|heap| heap.iter().map(|Reverse(entry)| *entry).collect())
            .unwrap_or_default();
        entries.sort_unstable();
        entries
    }

    fn after_removal(&mut self, ty: &TypeName) {
        self.len -= 1;
        if self.heaps.get(ty).is_some_and(BinaryHeap::is_empty) {
            self.heaps.remove(ty);
        }
    }
}
