// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recency ordering of atlas slots.
//!
//! Every slot, empty or not, sits on one circular doubly-linked list stored as
//! index arrays. The head is the most recently used slot and its predecessor is
//! the least recently used one, so the next slot to recycle is always
//! `prev[head]`.

/// A node of the ring, one per slot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct Node {
    prev: usize,
    next: usize,
    /// Frame version in which the slot was last used.
    version: u32,
}

#[derive(Clone, Debug)]
pub(crate) struct PriorityRing {
    nodes: Vec<Node>,
    head: usize,
}

impl PriorityRing {
    /// Links `count` slots so that slot 0 is the first to be recycled,
    /// then slot 1, and so on.
    pub(crate) fn new(count: usize) -> Self {
        debug_assert!(count > 0, "the ring needs at least one slot");
        let last = count - 1;
        let nodes = (0..count)
            .map(|i| Node {
                prev: if i == last { 0 } else { i + 1 },
                next: if i == 0 { last } else { i - 1 },
                version: 0,
            })
            .collect();
        Self { nodes, head: last }
    }

    /// The most recently used slot.
    #[inline]
    pub(crate) fn head(&self) -> usize {
        self.head
    }

    /// The least recently used slot.
    #[inline]
    pub(crate) fn tail(&self) -> usize {
        self.nodes[self.head].prev
    }

    /// Marks `slot` as used in `version` and moves it to the head.
    pub(crate) fn touch(&mut self, slot: usize, version: u32) {
        self.nodes[slot].version = version;
        if slot == self.head {
            return;
        }
        self.unlink(slot);
        let head = self.head;
        let tail = self.nodes[head].prev;
        self.nodes[slot].prev = tail;
        self.nodes[slot].next = head;
        self.nodes[head].prev = slot;
        self.nodes[tail].next = slot;
        self.head = slot;
    }

    fn unlink(&mut self, slot: usize) {
        let Node { prev, next, .. } = self.nodes[slot];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    /// The slot to recycle next, or `None` if it was already used in `version`,
    /// which means every slot was.
    pub(crate) fn evict_candidate(&self, version: u32) -> Option<usize> {
        let tail = self.tail();
        (self.nodes[tail].version != version).then_some(tail)
    }

    /// Claims the least recently used slot for `version`, making it the head.
    pub(crate) fn claim(&mut self, version: u32) -> Option<usize> {
        let slot = self.evict_candidate(version)?;
        self.nodes[slot].version = version;
        // The tail already precedes the head, so rotating the ring is enough.
        self.head = slot;
        Some(slot)
    }

    #[cfg(test)]
    pub(crate) fn order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut slot = self.head;
        loop {
            order.push(slot);
            slot = self.nodes[slot].next;
            if slot == self.head {
                return order;
            }
        }
    }
}
