// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atlas configuration and the geometry derived from it.

use crate::error::Error;

/// Padding in pixels around every rendered glyph, holding the distance field falloff.
pub const DISTANCE_OFFSET: u16 = 8;

/// Distance field value written on the glyph outline.
pub const ONEDGE_VALUE: u8 = 180;

/// Distance field value change per pixel of distance from the outline.
pub const PIXEL_DIST_SCALE: f32 = ONEDGE_VALUE as f32 / DISTANCE_OFFSET as f32;

/// Probe step of the glyph hash index.
pub const COLLISION_STEP: usize = 7;

/// Configuration for a [`FontManager`](crate::FontManager).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Side length of the square atlas texture, in pixels.
    ///
    /// The default value is 2048.
    pub texture_size: u16,

    /// Side length of one glyph cell, in pixels.
    ///
    /// Glyph metrics are computed at a base size of this value minus
    /// [`DISTANCE_OFFSET`] on each side.
    ///
    /// The default value is 64.
    pub glyph_size: u16,

    /// Dots per inch used when converting point sizes to pixels and no DPI is given.
    ///
    /// The default value is 96.
    pub dpi: u16,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            texture_size: 2048,
            glyph_size: 64,
            dpi: 96,
        }
    }
}

impl AtlasConfig {
    /// Checks the configuration and computes the atlas geometry.
    pub fn validate(&self) -> Result<AtlasGeometry, Error> {
        if self.glyph_size <= DISTANCE_OFFSET * 2 {
            return Err(Error::invalid_config(
                "glyph size must leave room for the distance field padding",
            ));
        }
        if self.texture_size < self.glyph_size
            || !self.texture_size.is_multiple_of(self.glyph_size)
        {
            return Err(Error::invalid_config(
                "texture size must be a multiple of the glyph size",
            ));
        }
        if self.dpi == 0 {
            return Err(Error::invalid_config("dpi must be positive"));
        }
        let slots_per_line = usize::from(self.texture_size / self.glyph_size);
        let slot_count = slots_per_line * slots_per_line;
        if slot_count > usize::from(u16::MAX) {
            return Err(Error::invalid_config("too many glyph cells"));
        }
        let mut bucket_count = slot_count * 2;
        if bucket_count.is_multiple_of(COLLISION_STEP) {
            bucket_count += 1;
        }
        Ok(AtlasGeometry {
            texture_size: self.texture_size,
            glyph_size: self.glyph_size,
            base_size: self.glyph_size - DISTANCE_OFFSET * 2,
            slots_per_line,
            slot_count,
            bucket_count,
            dpi: self.dpi,
        })
    }
}

/// Validated atlas layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasGeometry {
    /// Side length of the atlas texture, in pixels.
    pub texture_size: u16,
    /// Side length of one cell, in pixels.
    pub glyph_size: u16,
    /// Em size, in pixels, at which glyph metrics are stored.
    pub base_size: u16,
    /// Number of cells along one side of the atlas.
    pub slots_per_line: usize,
    /// Total number of cells.
    pub slot_count: usize,
    /// Number of buckets in the hash index.
    pub bucket_count: usize,
    /// Default dots per inch.
    pub dpi: u16,
}

impl AtlasGeometry {
    /// Pixel origin `(u, v)` of the cell belonging to `slot`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "validate() bounds every cell origin by the u16 texture size"
    )]
    pub fn cell_origin(&self, slot: usize) -> (u16, u16) {
        let glyph = usize::from(self.glyph_size);
        let u = (slot % self.slots_per_line) * glyph;
        let v = (slot / self.slots_per_line) * glyph;
        (u as u16, v as u16)
    }
}
