// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font identifiers and glyph cache keys.

/// Identifier of a font face known to the rasterizer.
///
/// Ids start at 1; id 0 never names a font. Ids with the high bit set are
/// reserved, and [`FontId::ICON`] selects the icon bundle instead of a font.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(u16);

impl FontId {
    /// Pseudo font whose codepoints index into the icon bundle.
    pub const ICON: Self = Self(Self::RESERVED_BIT);

    const RESERVED_BIT: u16 = 0x8000;

    /// Wraps a raw font id.
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub const fn to_u16(self) -> u16 {
        self.0
    }

    /// Returns true for [`FontId::ICON`].
    pub const fn is_icon(self) -> bool {
        self.0 == Self::ICON.0
    }

    /// Returns true if this id can name a font face.
    pub const fn is_font(self) -> bool {
        self.0 != 0 && self.0 & Self::RESERVED_BIT == 0
    }

    /// Position of the face in registration order, for ids that can name a font.
    pub(crate) fn face_index(self) -> Option<usize> {
        self.is_font().then(|| usize::from(self.0) - 1)
    }
}

/// Identifies one cached glyph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    /// Font of the glyph, or [`FontId::ICON`].
    pub font: FontId,
    /// Unicode codepoint, or icon index for the icon font.
    pub codepoint: u32,
}

impl GlyphKey {
    /// Creates a key.
    pub const fn new(font: FontId, codepoint: u32) -> Self {
        Self { font, codepoint }
    }

    /// Packs both fields into one integer for hashing.
    pub(crate) fn packed(self) -> u64 {
        (u64::from(self.font.0) << 32) | u64::from(self.codepoint)
    }
}

/// Returns true for codepoints that advance the pen but have no visible pixels.
pub fn is_space_codepoint(codepoint: u32) -> bool {
    matches!(codepoint, 0x20 | 0x09 | 0x0A | 0x0D)
}
