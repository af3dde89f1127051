// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use crate::{AtlasConfig, FontId, FontManager, Glyph};

use super::MockRasterizer;

pub(crate) const FONT: FontId = FontId::new(1);

/// A manager over the mock rasterizer.
pub(crate) struct TestEnv {
    pub(crate) manager: FontManager<MockRasterizer>,
}

impl TestEnv {
    /// Four cells of 64 pixels.
    pub(crate) fn tiny() -> Self {
        Self::with_texture_size(128)
    }

    pub(crate) fn with_texture_size(texture_size: u16) -> Self {
        Self::with_rasterizer(texture_size, MockRasterizer::default())
    }

    pub(crate) fn with_rasterizer(texture_size: u16, rasterizer: MockRasterizer) -> Self {
        let config = AtlasConfig {
            texture_size,
            glyph_size: 64,
            dpi: 96,
        };
        let manager = FontManager::new(config, Arc::new(rasterizer)).unwrap();
        Self { manager }
    }

    pub(crate) fn renders(&self) -> usize {
        self.manager.rasterizer().renders()
    }

    /// Requests `codepoint` in [`FONT`] at the base size.
    pub(crate) fn get(&self, codepoint: char) -> Glyph {
        self.manager.get_glyph(FONT, codepoint as u32, 48).unwrap()
    }
}

/// Copies the whole cell holding `glyph` out of the atlas.
pub(crate) fn cell_pixels(manager: &FontManager<MockRasterizer>, glyph: &Glyph) -> Vec<u8> {
    let texture = manager.texture();
    let side = usize::from(texture.size());
    let cell = usize::from(manager.geometry().glyph_size);
    let (u, v) = (usize::from(glyph.atlas.u), usize::from(glyph.atlas.v));
    (0..cell)
        .flat_map(|y| {
            let start = (v + y) * side + u;
            texture.pixels()[start..start + cell].to_vec()
        })
        .collect()
}
