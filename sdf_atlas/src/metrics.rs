// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph metrics at the base render size and their scaling to requested sizes.
//!
//! Metrics are stored once, in pixels at the base size, and every request scales
//! them by `size / base_size` with round-to-nearest integer arithmetic.

use crate::config::{DISTANCE_OFFSET, ONEDGE_VALUE, PIXEL_DIST_SCALE};
use crate::rasterizer::{BitmapBox, HorizontalMetrics, VerticalMetrics};

/// Glyph metrics in pixels at the base render size, padding included.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct BaseMetrics {
    pub(crate) offset_x: i16,
    pub(crate) offset_y: i16,
    pub(crate) advance_x: i16,
    pub(crate) advance_y: i16,
    pub(crate) width: u16,
    pub(crate) height: u16,
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the value is clamped to the i16 range first"
)]
fn clamp_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the value is clamped to the cell size first"
)]
fn clamp_extent(value: i32, glyph_size: u16) -> u16 {
    value.clamp(0, i32::from(glyph_size)) as u16
}

impl BaseMetrics {
    /// Metrics of an outline glyph rendered with `scale` (pixels per font unit).
    #[expect(
        clippy::cast_possible_truncation,
        reason = "pixel metrics of a glyph fit in i32"
    )]
    pub(crate) fn from_outline(
        horizontal: HorizontalMetrics,
        vertical: VerticalMetrics,
        bitmap: BitmapBox,
        scale: f32,
        glyph_size: u16,
    ) -> Self {
        let pad = i32::from(DISTANCE_OFFSET);
        let line_height = i32::from(vertical.ascent) - i32::from(vertical.descent);
        Self {
            offset_x: clamp_i16((horizontal.left_side_bearing as f32 * scale) as i32 - pad),
            offset_y: clamp_i16(bitmap.y0 - pad),
            advance_x: clamp_i16((horizontal.advance as f32 * scale).round() as i32),
            advance_y: clamp_i16((line_height as f32 * scale).round() as i32),
            width: clamp_extent(bitmap.width() + pad * 2, glyph_size),
            height: clamp_extent(bitmap.height() + pad * 2, glyph_size),
        }
    }

    /// Metrics of an icon, which fills its whole cell.
    pub(crate) fn icon(glyph_size: u16) -> Self {
        let size = clamp_i16(i32::from(glyph_size));
        Self {
            offset_x: 0,
            offset_y: clamp_i16(i32::from(DISTANCE_OFFSET) - i32::from(glyph_size)),
            advance_x: size,
            advance_y: size,
            width: glyph_size,
            height: glyph_size,
        }
    }

    /// The same metrics with no visible extent.
    pub(crate) fn without_extent(self) -> Self {
        Self {
            width: 0,
            height: 0,
            ..self
        }
    }

    /// Scales to `size` pixels per em, producing a glyph at atlas origin `(u, v)`.
    pub(crate) fn to_glyph(self, size: u16, base_size: u16, u: u16, v: u16) -> Glyph {
        let scale = |value: i32| scale_metric(value, size, base_size);
        Glyph {
            offset_x: scale(self.offset_x.into()),
            offset_y: scale(self.offset_y.into()),
            advance_x: scale(self.advance_x.into()),
            advance_y: scale(self.advance_y.into()),
            width: scale(self.width.into()).unsigned_abs(),
            height: scale(self.height.into()).unsigned_abs(),
            atlas: AtlasRegion {
                u,
                v,
                width: self.width,
                height: self.height,
            },
        }
    }
}

/// Scales a base-size metric to `size`, rounding to nearest.
///
/// Uses floor division so that negative metrics round the same way as positive ones.
#[inline]
pub(crate) fn scale_metric(value: i32, size: u16, base_size: u16) -> i32 {
    let base = i32::from(base_size);
    (value * i32::from(size) + base / 2).div_euclid(base)
}

/// Scales a font-unit metric to `size`, given the font-unit to base-size `scale`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the float to int cast saturates"
)]
pub(crate) fn scale_font_metric(value: i16, scale: f32, size: u16, base_size: u16) -> i32 {
    let base = i32::from(base_size);
    let scaled = (f32::from(value) * scale * f32::from(size)) as i32;
    scaled.saturating_add(base / 2).div_euclid(base)
}

/// Scales a font-unit metric to `size` without rounding.
pub(crate) fn scale_font_metric_f32(value: f32, scale: f32, size: u16, base_size: u16) -> f32 {
    value * scale * f32::from(size) / f32::from(base_size)
}

/// A glyph ready to be drawn: quad metrics at the requested size and its place in the atlas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Glyph {
    /// Horizontal offset from the pen position to the left edge of the quad.
    pub offset_x: i32,
    /// Vertical offset from the baseline to the top edge of the quad, y pointing down.
    pub offset_y: i32,
    /// Horizontal pen advance.
    pub advance_x: i32,
    /// Line advance (ascent minus descent).
    pub advance_y: i32,
    /// Width of the quad. Zero for whitespace.
    pub width: u32,
    /// Height of the quad. Zero for whitespace.
    pub height: u32,
    /// The unscaled region of the atlas holding the glyph's distance field.
    pub atlas: AtlasRegion,
}

/// A rectangle of the atlas texture, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AtlasRegion {
    /// Left edge of the glyph's cell.
    pub u: u16,
    /// Top edge of the glyph's cell.
    pub v: u16,
    /// Width of the occupied part of the cell.
    pub width: u16,
    /// Height of the occupied part of the cell.
    pub height: u16,
}

/// Vertical font metrics at a requested size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FontHeight {
    /// Distance from the baseline to the top of the line, positive upwards.
    pub ascent: i32,
    /// Distance from the baseline to the bottom of the line, usually negative.
    pub descent: i32,
    /// Extra spacing between lines.
    pub line_gap: i32,
}

/// Underline placement at a requested size.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Underline {
    /// Offset of the underline from the baseline, positive upwards.
    pub position: f32,
    /// Thickness of the underline.
    pub thickness: f32,
}

/// Converts a size in points to whole pixels at `dpi`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "pixel sizes are small and the value is clamped to be non-negative"
)]
pub fn pixel_size_for_point_size(points: f32, dpi: u16) -> u32 {
    ((points / 72.0) * f32::from(dpi) + 0.5).max(0.0) as u32
}

/// Distance field value on the outline, normalized to `0.0..=1.0`.
///
/// This is the alpha threshold a text shader compares samples against.
pub fn sdf_edge_mask() -> f32 {
    f32::from(ONEDGE_VALUE) / 255.0
}

/// Normalized distance field change across `pixels` pixels of the base size.
pub fn sdf_distance(pixels: f32) -> f32 {
    pixels * PIXEL_DIST_SCALE / 255.0
}
