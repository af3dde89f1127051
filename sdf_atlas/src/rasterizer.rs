// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The font capability the atlas consumes.

use crate::config::{DISTANCE_OFFSET, ONEDGE_VALUE, PIXEL_DIST_SCALE};
use crate::error::Error;
use crate::key::FontId;
use crate::metrics::Underline;

/// Font metrics queries and distance field rendering.
///
/// Implementations are shared between threads: the [`FontManager`](crate::FontManager)
/// calls the metric queries and [`generate_sdf`](Self::generate_sdf) without holding its
/// cache lock, possibly from several threads at once.
///
/// [`FontCollection`](crate::FontCollection) implements this trait with `skrifa`.
pub trait GlyphRasterizer: Send + Sync {
    /// Pixels per font unit when the em square is `pixels` tall.
    ///
    /// Returns `None` if `font` is unknown.
    fn scale_for_pixel_height(&self, font: FontId, pixels: f32) -> Option<f32>;

    /// Ascent, descent and line gap in font units, preferring the OS/2 typographic values.
    fn vertical_metrics(&self, font: FontId) -> Option<VerticalMetrics>;

    /// Advance and left side bearing of a codepoint, in font units.
    fn horizontal_metrics(&self, font: FontId, codepoint: u32) -> Option<HorizontalMetrics>;

    /// Pixel bounds of a codepoint's outline at `scale`, y pointing down.
    fn bitmap_box(&self, font: FontId, codepoint: u32, scale: f32) -> Option<BitmapBox>;

    /// Renders the distance field of a codepoint at `scale`.
    ///
    /// Returns `None` when the glyph has no outline.
    fn generate_sdf(
        &self,
        font: FontId,
        codepoint: u32,
        scale: f32,
        params: &SdfParams,
    ) -> Option<SdfBitmap>;

    /// Underline position and thickness in font units, if the font provides them.
    fn underline(&self, font: FontId) -> Option<Underline>;

    /// Finds a loaded font by family name.
    fn resolve_family(&self, name: &str) -> Option<FontId> {
        let _ = name;
        None
    }

    /// Loads raw font file data, returning the number of faces added.
    fn import_font_data(&self, data: Vec<u8>) -> Result<usize, Error> {
        let _ = data;
        Err(Error::invalid_font_data("this rasterizer does not load fonts"))
    }
}

/// Vertical metrics in font units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VerticalMetrics {
    /// Distance from the baseline to the top of the line, positive upwards.
    pub ascent: i16,
    /// Distance from the baseline to the bottom of the line, usually negative.
    pub descent: i16,
    /// Extra spacing between lines.
    pub line_gap: i16,
}

/// Horizontal metrics of one glyph in font units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HorizontalMetrics {
    /// Horizontal pen advance.
    pub advance: i32,
    /// Distance from the pen position to the left edge of the outline.
    pub left_side_bearing: i32,
}

/// Integer pixel bounds of a glyph, y pointing down.
///
/// `y0` is the top edge, so it is negative for glyphs above the baseline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BitmapBox {
    /// Left edge.
    pub x0: i32,
    /// Top edge.
    pub y0: i32,
    /// Right edge (exclusive).
    pub x1: i32,
    /// Bottom edge (exclusive).
    pub y1: i32,
}

impl BitmapBox {
    /// Width in pixels.
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    /// Height in pixels.
    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

/// Distance field encoding parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SdfParams {
    /// Pixels added around the glyph bounds on every side.
    pub padding: u16,
    /// Value stored exactly on the outline.
    pub on_edge_value: u8,
    /// Value change per pixel of distance; inside the outline values grow.
    pub pixel_dist_scale: f32,
}

impl Default for SdfParams {
    fn default() -> Self {
        Self {
            padding: DISTANCE_OFFSET,
            on_edge_value: ONEDGE_VALUE,
            pixel_dist_scale: PIXEL_DIST_SCALE,
        }
    }
}

/// An 8-bit distance field bitmap owned by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SdfBitmap {
    /// Width in pixels; also the row stride of `pixels`.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Horizontal offset of the bitmap's left edge from the glyph origin.
    pub x_off: i32,
    /// Vertical offset of the bitmap's top edge from the baseline, y pointing down.
    pub y_off: i32,
    /// Row-major distance values.
    pub pixels: Vec<u8>,
}

impl SdfBitmap {
    /// Returns row `y`.
    pub fn row(&self, y: u32) -> &[u8] {
        let width = self.width as usize;
        let start = y as usize * width;
        &self.pixels[start..start + width]
    }
}
