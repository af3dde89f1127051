// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`GlyphRasterizer`] over fonts loaded from memory, using `skrifa`.

use std::sync::{Arc, PoisonError, RwLock};

use hashbrown::HashMap;
use peniko::kurbo::{Affine, BezPath};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::raw::TableProvider as _;
use skrifa::string::StringId;
use skrifa::{FontRef, GlyphId, MetadataProvider as _};

use crate::error::Error;
use crate::key::FontId;
use crate::metrics::Underline;
use crate::rasterizer::{
    BitmapBox, GlyphRasterizer, HorizontalMetrics, SdfBitmap, SdfParams, VerticalMetrics,
};
use crate::sdf;

/// Largest number of faces a collection can hold; higher ids are reserved.
const MAX_FACES: usize = 0x7FFF;

struct Face {
    data: Arc<[u8]>,
    index: u32,
}

#[derive(Default)]
struct Registry {
    faces: Vec<Face>,
    /// Lowercased family name to the first face registered with it.
    families: HashMap<String, FontId>,
}

/// Font faces imported from memory, addressed by [`FontId`].
///
/// Every face of every imported file gets the next id, starting at 1. Families are
/// looked up by the name recorded in the font's `name` table, ignoring case.
pub struct FontCollection {
    registry: RwLock<Registry>,
}

impl FontCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
        }
    }

    /// Returns the number of faces.
    pub fn len(&self) -> usize {
        self.read().faces.len()
    }

    /// Returns true if no face was imported.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` on the face behind `font` without holding the registry lock.
    fn with_font<T>(&self, font: FontId, f: impl FnOnce(&FontRef<'_>) -> Option<T>) -> Option<T> {
        let (data, index) = {
            let registry = self.read();
            let face = registry.faces.get(font.face_index()?)?;
            (face.data.clone(), face.index)
        };
        let font = FontRef::from_index(&data, index).ok()?;
        f(&font)
    }
}

impl Default for FontCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for FontCollection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let registry = self.read();
        f.debug_struct("FontCollection")
            .field("faces", &registry.faces.len())
            .field("families", &registry.families.len())
            .finish_non_exhaustive()
    }
}

fn glyph_id(font: &FontRef<'_>, codepoint: u32) -> GlyphId {
    font.charmap().map(codepoint).unwrap_or(GlyphId::NOTDEF)
}

fn family_name(font: &FontRef<'_>) -> Option<String> {
    [StringId::TYPOGRAPHIC_FAMILY_NAME, StringId::FAMILY_NAME]
        .into_iter()
        .find_map(|id| font.localized_strings(id).next())
        .map(|name| name.chars().collect())
}

/// Outline of a codepoint in pixels at `scale`, y pointing down.
fn pixel_outline(font: &FontRef<'_>, codepoint: u32, scale: f32) -> Option<BezPath> {
    let glyph = font.outline_glyphs().get(glyph_id(font, codepoint))?;
    let mut pen = PathPen::default();
    let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
    glyph.draw(settings, &mut pen).ok()?;
    let scale = f64::from(scale);
    let mut path = pen.path;
    path.apply_affine(Affine::scale_non_uniform(scale, -scale));
    Some(path)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "font unit metrics fit in i32"
)]
fn font_units(value: f32) -> i32 {
    value.round() as i32
}

impl GlyphRasterizer for FontCollection {
    fn scale_for_pixel_height(&self, font: FontId, pixels: f32) -> Option<f32> {
        self.with_font(font, |font| {
            let units_per_em = font.head().ok()?.units_per_em();
            (units_per_em != 0).then(|| pixels / f32::from(units_per_em))
        })
    }

    fn vertical_metrics(&self, font: FontId) -> Option<VerticalMetrics> {
        self.with_font(font, |font| {
            if let Ok(os2) = font.os2() {
                return Some(VerticalMetrics {
                    ascent: os2.s_typo_ascender(),
                    descent: os2.s_typo_descender(),
                    line_gap: os2.s_typo_line_gap(),
                });
            }
            let hhea = font.hhea().ok()?;
            Some(VerticalMetrics {
                ascent: hhea.ascender().to_i16(),
                descent: hhea.descender().to_i16(),
                line_gap: hhea.line_gap().to_i16(),
            })
        })
    }

    fn horizontal_metrics(&self, font: FontId, codepoint: u32) -> Option<HorizontalMetrics> {
        self.with_font(font, |font| {
            let glyph = glyph_id(font, codepoint);
            let metrics = font.glyph_metrics(Size::unscaled(), LocationRef::default());
            Some(HorizontalMetrics {
                advance: font_units(metrics.advance_width(glyph).unwrap_or_default()),
                left_side_bearing: font_units(
                    metrics.left_side_bearing(glyph).unwrap_or_default(),
                ),
            })
        })
    }

    fn bitmap_box(&self, font: FontId, codepoint: u32, scale: f32) -> Option<BitmapBox> {
        self.with_font(font, |font| {
            Some(
                pixel_outline(font, codepoint, scale)
                    .and_then(|path| sdf::bitmap_box(&path))
                    .unwrap_or_default(),
            )
        })
    }

    fn generate_sdf(
        &self,
        font: FontId,
        codepoint: u32,
        scale: f32,
        params: &SdfParams,
    ) -> Option<SdfBitmap> {
        self.with_font(font, |font| {
            let path = pixel_outline(font, codepoint, scale)?;
            sdf::render_sdf(&path, params)
        })
    }

    fn underline(&self, font: FontId) -> Option<Underline> {
        self.with_font(font, |font| {
            let post = font.post().ok()?;
            Some(Underline {
                position: f32::from(post.underline_position().to_i16()),
                thickness: f32::from(post.underline_thickness().to_i16()),
            })
        })
    }

    fn resolve_family(&self, name: &str) -> Option<FontId> {
        self.read().families.get(&name.to_lowercase()).copied()
    }

    fn import_font_data(&self, data: Vec<u8>) -> Result<usize, Error> {
        let data: Arc<[u8]> = data.into();
        let faces: Vec<(u32, Option<String>)> = (0_u32..)
            .map_while(|index| {
                FontRef::from_index(&data, index)
                    .ok()
                    .map(|font| (index, family_name(&font)))
            })
            .collect();
        if faces.is_empty() {
            log::warn!("rejected {} bytes of font data without faces", data.len());
            return Err(Error::invalid_font_data("no font faces found"));
        }

        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        if registry.faces.len() + faces.len() > MAX_FACES {
            return Err(Error::invalid_font_data("too many font faces"));
        }
        let count = faces.len();
        for (index, family) in faces {
            let id = u16::try_from(registry.faces.len() + 1)
                .map(FontId::new)
                .map_err(|_| Error::invalid_font_data("too many font faces"))?;
            registry.faces.push(Face {
                data: data.clone(),
                index,
            });
            if let Some(family) = family {
                log::debug!("registered font {} for family {family:?}", id.to_u16());
                registry.families.entry(family.to_lowercase()).or_insert(id);
            }
        }
        Ok(count)
    }
}

/// Collects a skrifa outline into a kurbo path.
#[derive(Default)]
struct PathPen {
    path: BezPath,
}

impl OutlinePen for PathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((f64::from(x), f64::from(y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((f64::from(x), f64::from(y)));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path.quad_to(
            (f64::from(cx0), f64::from(cy0)),
            (f64::from(x), f64::from(y)),
        );
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            (f64::from(cx0), f64::from(cy0)),
            (f64::from(cx1), f64::from(cy1)),
            (f64::from(x), f64::from(y)),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use peniko::kurbo::PathEl;

    #[test]
    fn garbage_is_rejected() {
        let fonts = FontCollection::new();
        let err = fonts.import_font_data(vec![0; 64]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFontData);
        assert!(fonts.is_empty());
    }

    #[test]
    fn unknown_fonts_have_no_metrics() {
        let fonts = FontCollection::new();
        for font in [FontId::new(0), FontId::new(1), FontId::ICON] {
            assert!(fonts.scale_for_pixel_height(font, 48.0).is_none());
            assert!(fonts.vertical_metrics(font).is_none());
            assert!(fonts.horizontal_metrics(font, 'a' as u32).is_none());
            assert!(fonts.bitmap_box(font, 'a' as u32, 1.0).is_none());
            assert!(
                fonts
                    .generate_sdf(font, 'a' as u32, 1.0, &SdfParams::default())
                    .is_none()
            );
            assert!(fonts.underline(font).is_none());
        }
        assert!(fonts.resolve_family("Anything").is_none());
    }

    #[test]
    fn pen_builds_path() {
        let mut pen = PathPen::default();
        pen.move_to(0.0, 0.0);
        pen.line_to(10.0, 0.0);
        pen.quad_to(10.0, 10.0, 0.0, 10.0);
        pen.curve_to(-2.0, 8.0, -2.0, 2.0, 0.0, 0.0);
        pen.close();
        let elements = pen.path.elements();
        assert_eq!(elements.len(), 5);
        assert!(matches!(elements[2], PathEl::QuadTo(..)));
        assert!(matches!(elements[3], PathEl::CurveTo(..)));
        assert_eq!(elements[4], PathEl::ClosePath);
    }
}
