// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open-addressing index from glyph keys to slots.
//!
//! Buckets only store slot numbers; the key is read back from the slot table.
//! Nothing is ever removed from a bucket. When a slot is reassigned, buckets that
//! still point at it simply stop matching the old key, and a bucket whose slot is
//! currently empty may be reused by an insert. Stale buckets are dropped by
//! [`HashIndex::rehash`], which runs once enough inserts have accumulated.

use crate::config::COLLISION_STEP;
use crate::key::GlyphKey;
use crate::slot::SlotTable;

#[derive(Clone, Debug)]
pub(crate) struct HashIndex {
    buckets: Vec<Option<usize>>,
    /// Inserts since the last rehash.
    live: usize,
    /// Rehash once `live` would exceed this.
    threshold: usize,
}

impl HashIndex {
    pub(crate) fn new(bucket_count: usize, slot_count: usize) -> Self {
        Self {
            buckets: vec![None; bucket_count],
            live: 0,
            threshold: slot_count + slot_count / 2,
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "the remainder is below the bucket count"
    )]
    #[inline]
    fn home(&self, key: GlyphKey) -> usize {
        let hash = key
            .packed()
            .wrapping_mul(0xdeec_e66d)
            .wrapping_add(0xb);
        (hash % self.buckets.len() as u64) as usize
    }

    #[inline]
    fn next(&self, position: usize) -> usize {
        (position + COLLISION_STEP) % self.buckets.len()
    }

    /// Finds the slot holding `key`.
    pub(crate) fn lookup(&self, key: GlyphKey, slots: &SlotTable) -> Option<usize> {
        let mut position = self.home(key);
        while let Some(slot) = self.buckets[position] {
            if slots.key(slot) == Some(key) {
                return Some(slot);
            }
            position = self.next(position);
        }
        None
    }

    /// Records that `slot` holds `key`.
    ///
    /// `key` must not already be indexed, and `slot` must be empty in `slots`
    /// (its key is written by the caller afterwards).
    pub(crate) fn insert(&mut self, key: GlyphKey, slot: usize, slots: &SlotTable) {
        if self.live + 1 > self.threshold {
            self.rehash(slots);
        }
        self.live += 1;
        self.place(key, slot, slots);
    }

    fn place(&mut self, key: GlyphKey, slot: usize, slots: &SlotTable) {
        let mut position = self.home(key);
        while let Some(existing) = self.buckets[position] {
            match slots.key(existing) {
                None => break,
                Some(other) => debug_assert_ne!(other, key, "glyph key indexed twice"),
            }
            position = self.next(position);
        }
        self.buckets[position] = Some(slot);
    }

    /// Rebuilds the index from the occupied slots.
    pub(crate) fn rehash(&mut self, slots: &SlotTable) {
        self.buckets.fill(None);
        self.live = 0;
        for (slot, key) in slots.occupied() {
            self.live += 1;
            self.place(key, slot, slots);
        }
        log::debug!("glyph index rehashed with {} live glyphs", self.live);
    }

    #[cfg(test)]
    fn used_buckets(&self) -> usize {
        self.buckets.iter().filter(|b| b.is_some()).count()
    }
}
