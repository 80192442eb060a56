use std::collections::BTreeSet;

use composer_core::{SlotId, TypeMultiset, TypeName};
use serde::{Deserialize, Serialize};

use crate::depth_queue::DepthQueue;

/// One outstanding requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontierSlot {
    /// Slot in the graph under construction.
    pub slot: SlotId,
    /// Required type.
    pub ty: TypeName,
    /// Depth the producer must sit below.
    pub target_depth: u32,
}

/// Multiset of outstanding requirements backed by a [`DepthQueue`].
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    queue: DepthQueue,
    types: TypeMultiset,
}

impl Frontier {
    /// Creates an empty frontier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct outstanding types.
    pub fn peek_types(&self) -> BTreeSet<TypeName> {
        self.queue.types().cloned().collect()
    }

    /// Adds a requirement.
    pub fn push(&mut self, slot: FrontierSlot) {
        self.types.insert(slot.ty.clone());
        self.queue.push(slot.ty, slot.target_depth, slot.slot);
    }

    /// Removes the shallowest requirement of `ty`.
    pub fn pop_lowest(&mut self, ty: &TypeName) -> Option<FrontierSlot> {
        let (target_depth, slot) = self.queue.pop_lowest(ty)?;
        Some(self.taken(ty, target_depth, slot))
    }

    /// Removes the deepest requirement of `ty`.
    pub fn pop_deepest(&mut self, ty: &TypeName) -> Option<FrontierSlot> {
        let (target_depth, slot) = self.queue.pop_deepest(ty)?;
        Some(self.taken(ty, target_depth, slot))
    }

    /// Removes a requirement of `ty` at exactly `target_depth`.
    pub fn remove_matched(&mut self, ty: &TypeName, target_depth: u32) -> Option<FrontierSlot> {
        let slot = self.queue.remove_matched(ty, target_depth)?;
        Some(self.taken(ty, target_depth, slot))
    }

    /// Number of outstanding requirements of `ty`.
    pub fn count(&self, ty: &TypeName) -> usize {
        self.queue.count(ty)
    }

    /// Total number of outstanding requirements.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` when nothing is outstanding.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Outstanding types with multiplicity.
    pub fn as_multiset(&self) -> &TypeMultiset {
        &self.types
    }

    /// Every outstanding requirement ordered by type, then depth, then slot.
    pub fn slots(&self) -> Vec<FrontierSlot> {
        self.queue
            .types()
            .flat_map(|ty| {
                self.queue
                    .entries(ty)
                    .into_iter()
                    .map(move |(target_depth, slot)| FrontierSlot {
                        slot,
                        ty: ty.clone(),
                        target_depth,
                    })
            })
            .collect()
    }

    fn taken(&mut self, ty: &TypeName, target_depth: u32, slot: SlotId) -> FrontierSlot {
        self.types.remove_one(ty);
        FrontierSlot {
            slot,
            ty: ty.clone(),
            target_depth,
        }
    }
}
