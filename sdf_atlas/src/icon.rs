// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pre-baked icon bitmaps served through the reserved icon font.

use std::sync::Arc;

use crate::error::Error;

/// A set of square 8-bit distance field icons, stored back to back.
///
/// Each icon is `glyph_size * glyph_size` bytes, row-major, and is copied into
/// its atlas cell unchanged. Icons are requested through
/// [`FontId::ICON`](crate::FontId::ICON) with the icon index as the codepoint.
#[derive(Clone)]
pub struct IconBundle {
    data: Arc<[u8]>,
    glyph_size: u16,
    count: usize,
}

impl IconBundle {
    /// Wraps icon data for cells of `glyph_size` pixels.
    ///
    /// Fails with [`ErrorKind::InvalidIconBundle`](crate::ErrorKind::InvalidIconBundle)
    /// if the data is not a whole number of icons.
    pub fn new(data: impl Into<Arc<[u8]>>, glyph_size: u16) -> Result<Self, Error> {
        let data = data.into();
        let icon_len = usize::from(glyph_size) * usize::from(glyph_size);
        if icon_len == 0 {
            return Err(Error::invalid_icon_bundle("icon size must be positive"));
        }
        if !data.len().is_multiple_of(icon_len) {
            return Err(Error::invalid_icon_bundle(
                "icon data is not a whole number of icons",
            ));
        }
        Ok(Self {
            count: data.len() / icon_len,
            data,
            glyph_size,
        })
    }

    /// Number of icons.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the bundle holds no icons.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Side length of one icon, in pixels.
    pub fn glyph_size(&self) -> u16 {
        self.glyph_size
    }

    /// Returns true if `codepoint` names an icon of this bundle.
    pub fn contains(&self, codepoint: u32) -> bool {
        usize::try_from(codepoint).is_ok_and(|index| index < self.count)
    }

    /// The pixels of icon `index`.
    pub fn icon(&self, index: usize) -> Option<&[u8]> {
        let icon_len = usize::from(self.glyph_size) * usize::from(self.glyph_size);
        let start = index.checked_mul(icon_len)?;
        self.data.get(start..start + icon_len)
    }
}

impl core::fmt::Debug for IconBundle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IconBundle")
            .field("glyph_size", &self.glyph_size)
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}
