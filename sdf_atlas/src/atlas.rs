// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The atlas pixel buffer.

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use crate::config::AtlasGeometry;
use crate::rasterizer::SdfBitmap;

/// A square single-channel texture split into glyph cells.
///
/// Cells are written one at a time under a short write lock, so renders for
/// different cells can run in parallel and only serialize on the copy.
#[derive(Debug)]
pub(crate) struct Atlas {
    size: u16,
    glyph_size: u16,
    pixels: RwLock<Vec<u8>>,
}

impl Atlas {
    pub(crate) fn new(geometry: &AtlasGeometry) -> Self {
        let side = usize::from(geometry.texture_size);
        Self {
            size: geometry.texture_size,
            glyph_size: geometry.glyph_size,
            pixels: RwLock::new(vec![0; side * side]),
        }
    }

    /// Copies a distance field into the cell at `origin`, cropped to the
    /// `reserved` width and height of the glyph.
    ///
    /// The rest of the cell is cleared.
    pub(crate) fn write_sdf(
        &self,
        origin: (u16, u16),
        bitmap: &SdfBitmap,
        reserved: (u16, u16),
    ) {
        let width = bitmap.width as usize;
        let height = bitmap.height as usize;
        self.fill_cell(
            origin,
            &bitmap.pixels,
            width,
            (
                width.min(usize::from(reserved.0)),
                height.min(usize::from(reserved.1)),
            ),
        );
    }

    /// Copies an icon of exactly one cell into the cell at `origin`.
    pub(crate) fn write_icon(&self, origin: (u16, u16), icon: &[u8]) {
        let cell = usize::from(self.glyph_size);
        self.fill_cell(origin, icon, cell, (cell, cell));
    }

    /// Zeroes the cell at `origin`.
    pub(crate) fn clear_cell(&self, origin: (u16, u16)) {
        self.fill_cell(origin, &[], 0, (0, 0));
    }

    /// Copies the top-left `extent` of a `stride`-wide source into a cell and
    /// zeroes everything else in the cell.
    fn fill_cell(
        &self,
        (u, v): (u16, u16),
        source: &[u8],
        stride: usize,
        (width, height): (usize, usize),
    ) {
        let side = usize::from(self.size);
        let cell = usize::from(self.glyph_size);
        let copy_width = width.min(cell);
        let mut pixels = self.pixels.write().unwrap_or_else(PoisonError::into_inner);
        for y in 0..cell {
            let start = (usize::from(v) + y) * side + usize::from(u);
            let row = &mut pixels[start..start + cell];
            let source_row = (y < height)
                .then(|| source.get(y * stride..y * stride + copy_width))
                .flatten();
            match source_row {
                Some(source_row) => {
                    row[..copy_width].copy_from_slice(source_row);
                    row[copy_width..].fill(0);
                }
                None => row.fill(0),
            }
        }
    }

    pub(crate) fn texture(&self) -> AtlasTexture<'_> {
        AtlasTexture {
            pixels: self.pixels.read().unwrap_or_else(PoisonError::into_inner),
            size: self.size,
        }
    }
}

/// Read access to the atlas texture, for uploading it to the GPU.
///
/// Cell writes wait while this view is alive, so drop it once the upload is done.
pub struct AtlasTexture<'a> {
    pixels: RwLockReadGuard<'a, Vec<u8>>,
    size: u16,
}

impl AtlasTexture<'_> {
    /// The pixels, one byte per texel, `size * size` row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Side length of the square texture.
    pub fn size(&self) -> u16 {
        self.size
    }
}

impl core::fmt::Debug for AtlasTexture<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AtlasTexture")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
