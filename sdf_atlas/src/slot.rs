// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-cell glyph records.

use crate::key::GlyphKey;
use crate::metrics::BaseMetrics;

/// Metadata for one atlas cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Slot {
    /// Glyph held by the cell, `None` while the cell is empty or being reassigned.
    pub(crate) key: Option<GlyphKey>,
    /// Metrics at the base render size.
    pub(crate) metrics: BaseMetrics,
}

/// Fixed array of slots, one per atlas cell.
#[derive(Clone, Debug)]
pub(crate) struct SlotTable {
    slots: Vec<Slot>,
}

impl SlotTable {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            slots: vec![Slot::default(); count],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn key(&self, slot: usize) -> Option<GlyphKey> {
        self.slots[slot].key
    }

    #[inline]
    pub(crate) fn metrics(&self, slot: usize) -> BaseMetrics {
        self.slots[slot].metrics
    }

    /// Forgets the glyph held by `slot`, returning it.
    pub(crate) fn release(&mut self, slot: usize) -> Option<GlyphKey> {
        self.slots[slot].key.take()
    }

    pub(crate) fn store(&mut self, slot: usize, key: GlyphKey, metrics: BaseMetrics) {
        self.slots[slot] = Slot {
            key: Some(key),
            metrics,
        };
    }

    /// Iterates over `(slot, key)` for every occupied slot, in slot order.
    pub(crate) fn occupied(&self) -> impl Iterator<Item = (usize, GlyphKey)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.key.map(|key| (index, key)))
    }
}
