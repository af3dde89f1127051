// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Barrier;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    BitmapBox, FontId, GlyphRasterizer, HorizontalMetrics, SdfBitmap, SdfParams, Underline,
    VerticalMetrics, is_space_codepoint,
};

/// Font with an outline-less glyph behind every codepoint.
pub(crate) const EMPTY_OUTLINE: FontId = FontId::new(2);

/// Font without underline metrics.
pub(crate) const NO_UNDERLINE: FontId = FontId::new(3);

/// Font whose distance fields are larger than the glyph's measured box.
pub(crate) const OVERSIZED: FontId = FontId::new(4);

/// Distance field value written for [`OVERSIZED`] glyphs.
pub(crate) const OVERSIZED_VALUE: u8 = 200;

const FONT_COUNT: u16 = 4;
const UNITS_PER_EM: f32 = 1000.0;

/// Rasterizer with fixed metrics for every glyph of fonts 1 to 4.
///
/// At the default base size every visible glyph measures 36x46 pixels with
/// offset (-6, -38) and advance (29, 48). Rendered cells are filled with the
/// low byte of the codepoint.
#[derive(Debug, Default)]
pub(crate) struct MockRasterizer {
    renders: AtomicUsize,
    gate: Option<RenderGate>,
}

/// Holds every render until the test lets it go.
#[derive(Debug)]
pub(crate) struct RenderGate {
    started: Barrier,
    release: Barrier,
}

impl RenderGate {
    /// Waits until a render is in progress.
    pub(crate) fn wait_started(&self) {
        self.started.wait();
    }

    /// Lets the waiting render finish.
    pub(crate) fn release(&self) {
        self.release.wait();
    }
}

impl MockRasterizer {
    /// A rasterizer whose renders block on its [`RenderGate`].
    pub(crate) fn gated() -> Self {
        Self {
            renders: AtomicUsize::new(0),
            gate: Some(RenderGate {
                started: Barrier::new(2),
                release: Barrier::new(2),
            }),
        }
    }

    pub(crate) fn gate(&self) -> Option<&RenderGate> {
        self.gate.as_ref()
    }

    pub(crate) fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    fn knows(font: FontId) -> bool {
        font.is_font() && font.to_u16() <= FONT_COUNT
    }
}

impl GlyphRasterizer for MockRasterizer {
    fn scale_for_pixel_height(&self, font: FontId, pixels: f32) -> Option<f32> {
        Self::knows(font).then(|| pixels / UNITS_PER_EM)
    }

    fn vertical_metrics(&self, font: FontId) -> Option<VerticalMetrics> {
        Self::knows(font).then_some(VerticalMetrics {
            ascent: 800,
            descent: -200,
            line_gap: 100,
        })
    }

    fn horizontal_metrics(&self, font: FontId, _codepoint: u32) -> Option<HorizontalMetrics> {
        Self::knows(font).then_some(HorizontalMetrics {
            advance: 600,
            left_side_bearing: 50,
        })
    }

    fn bitmap_box(&self, font: FontId, codepoint: u32, _scale: f32) -> Option<BitmapBox> {
        if !Self::knows(font) {
            return None;
        }
        if is_space_codepoint(codepoint) {
            return Some(BitmapBox::default());
        }
        Some(BitmapBox {
            x0: 2,
            y0: -30,
            x1: 22,
            y1: 0,
        })
    }

    fn generate_sdf(
        &self,
        font: FontId,
        codepoint: u32,
        _scale: f32,
        params: &SdfParams,
    ) -> Option<SdfBitmap> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.started.wait();
            gate.release.wait();
        }
        if !Self::knows(font) || font == EMPTY_OUTLINE {
            return None;
        }
        if font == OVERSIZED {
            return Some(SdfBitmap {
                width: 60,
                height: 60,
                x_off: 0,
                y_off: 0,
                pixels: vec![OVERSIZED_VALUE; 60 * 60],
            });
        }
        let pad = params.padding;
        let width = 20 + 2 * u32::from(pad);
        let height = 30 + 2 * u32::from(pad);
        Some(SdfBitmap {
            width,
            height,
            x_off: 2 - i32::from(pad),
            y_off: -30 - i32::from(pad),
            pixels: vec![codepoint.to_le_bytes()[0]; (width * height) as usize],
        })
    }

    fn underline(&self, font: FontId) -> Option<Underline> {
        (Self::knows(font) && font != NO_UNDERLINE).then_some(Underline {
            position: -100.0,
            thickness: 50.0,
        })
    }
}
