// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The glyph cache: lookups, cell recycling, rendering and frame flushes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::atlas::{Atlas, AtlasTexture};
use crate::config::{AtlasConfig, AtlasGeometry};
use crate::error::Error;
use crate::hash_index::HashIndex;
use crate::icon::IconBundle;
use crate::key::{FontId, GlyphKey, is_space_codepoint};
use crate::metrics::{
    BaseMetrics, FontHeight, Glyph, Underline, scale_font_metric, scale_font_metric_f32,
};
use crate::rasterizer::{GlyphRasterizer, SdfParams};
use crate::ring::PriorityRing;
use crate::slot::SlotTable;

/// Set while a manager created by [`FontManager::exclusive`] is alive.
static EXCLUSIVE: AtomicBool = AtomicBool::new(false);

/// Outcome of a successful glyph request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Touch {
    /// The glyph was already in the atlas.
    Hit,
    /// The glyph was rendered into a newly claimed cell.
    Miss,
}

/// Cache statistics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from the atlas since the last [`FontManager::clear_stats`].
    pub hits: u64,
    /// Requests that rendered a glyph since the last [`FontManager::clear_stats`].
    pub misses: u64,
    /// Glyphs dropped to make room for others since the last [`FontManager::clear_stats`].
    pub evictions: u64,
    /// Cells currently holding a glyph.
    pub occupied: usize,
}

/// State guarded by the cache lock.
struct Cache {
    /// Current frame; cells used in this frame cannot be recycled.
    version: u32,
    /// Set when a cell was claimed or written since the last flush.
    dirty: bool,
    slots: SlotTable,
    ring: PriorityRing,
    index: HashIndex,
    icons: Option<IconBundle>,
    stats: CacheStats,
}

impl Cache {
    fn new(geometry: &AtlasGeometry) -> Self {
        Self {
            version: 1,
            dirty: false,
            slots: SlotTable::new(geometry.slot_count),
            ring: PriorityRing::new(geometry.slot_count),
            index: HashIndex::new(geometry.bucket_count, geometry.slot_count),
            icons: None,
            stats: CacheStats::default(),
        }
    }

    /// Rejects requests that can never succeed, before anything is mutated.
    fn check(&self, key: GlyphKey) -> Result<(), Error> {
        if key.font.is_icon() {
            self.icon_bundle(key.codepoint).map(|_| ())
        } else if key.font.is_font() {
            Ok(())
        } else {
            Err(Error::invalid_glyph_font(key.font, key.codepoint))
        }
    }

    fn icon_bundle(&self, codepoint: u32) -> Result<&IconBundle, Error> {
        self.icons
            .as_ref()
            .filter(|icons| icons.contains(codepoint))
            .ok_or_else(|| Error::invalid_icon(codepoint))
    }

    /// Looks `key` up, marking it used in this frame if found.
    fn hit(&mut self, key: GlyphKey) -> Option<(usize, BaseMetrics)> {
        let slot = self.index.lookup(key, &self.slots)?;
        self.ring.touch(slot, self.version);
        self.stats.hits += 1;
        Some((slot, self.slots.metrics(slot)))
    }

    /// Assigns the least recently used cell to `key`.
    fn claim(&mut self, key: GlyphKey, metrics: BaseMetrics) -> Option<usize> {
        let slot = self.ring.claim(self.version)?;
        if let Some(old) = self.slots.release(slot) {
            self.stats.evictions += 1;
            log::debug!(
                "evicted glyph {:#x} of font {} from slot {slot}",
                old.codepoint,
                old.font.to_u16()
            );
        }
        self.index.insert(key, slot, &self.slots);
        self.slots.store(slot, key, metrics);
        self.dirty = true;
        self.stats.misses += 1;
        Some(slot)
    }
}

/// A fixed-size glyph atlas shared between threads.
///
/// Glyph metadata lives behind one lock that is only held for lookups and
/// bookkeeping. Rasterization runs without it, after the target cell has been
/// claimed for the current frame, so several threads can render different
/// glyphs at once.
pub struct FontManager<R> {
    geometry: AtlasGeometry,
    rasterizer: Arc<R>,
    cache: Mutex<Cache>,
    atlas: Atlas,
    exclusive: bool,
}

impl<R: GlyphRasterizer> FontManager<R> {
    /// Creates a manager with an empty atlas.
    pub fn new(config: AtlasConfig, rasterizer: Arc<R>) -> Result<Self, Error> {
        let geometry = config.validate()?;
        Ok(Self::with_geometry(geometry, rasterizer, false))
    }

    /// Creates the one manager of the process.
    ///
    /// Fails with [`ErrorKind::AlreadyInitialized`](crate::ErrorKind::AlreadyInitialized)
    /// while another manager created this way is alive.
    pub fn exclusive(config: AtlasConfig, rasterizer: Arc<R>) -> Result<Self, Error> {
        let geometry = config.validate()?;
        if EXCLUSIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::already_initialized());
        }
        Ok(Self::with_geometry(geometry, rasterizer, true))
    }

    fn with_geometry(geometry: AtlasGeometry, rasterizer: Arc<R>, exclusive: bool) -> Self {
        log::debug!(
            "glyph atlas {0}x{0} with {1} cells of {2} pixels",
            geometry.texture_size,
            geometry.slot_count,
            geometry.glyph_size
        );
        Self {
            cache: Mutex::new(Cache::new(&geometry)),
            atlas: Atlas::new(&geometry),
            geometry,
            rasterizer,
            exclusive,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The atlas layout.
    pub fn geometry(&self) -> &AtlasGeometry {
        &self.geometry
    }

    /// The rasterizer glyphs are rendered with.
    pub fn rasterizer(&self) -> &Arc<R> {
        &self.rasterizer
    }

    /// Finds a loaded font by family name.
    pub fn add_font_by_family(&self, name: &str) -> Option<FontId> {
        self.rasterizer.resolve_family(name)
    }

    /// Loads a font file, returning the number of faces added.
    pub fn import_font_data(&self, data: Vec<u8>) -> Result<usize, Error> {
        let len = data.len();
        let faces = self.rasterizer.import_font_data(data)?;
        log::debug!("imported {faces} font faces from {len} bytes");
        Ok(faces)
    }

    /// Replaces the icon bundle served through [`FontId::ICON`].
    ///
    /// Icons cached from a previous bundle are forgotten.
    pub fn import_icon_bundle(&self, icons: IconBundle) -> Result<(), Error> {
        if icons.glyph_size() != self.geometry.glyph_size {
            return Err(Error::invalid_icon_bundle(
                "icon size does not match the glyph cell size",
            ));
        }
        let mut cache = self.lock();
        let stale: Vec<usize> = cache
            .slots
            .occupied()
            .filter_map(|(slot, key)| key.font.is_icon().then_some(slot))
            .collect();
        for slot in stale {
            cache.slots.release(slot);
        }
        log::debug!("imported {} icons", icons.len());
        cache.icons = Some(icons);
        Ok(())
    }

    /// Makes sure a glyph is in the atlas and marks it used in this frame.
    pub fn touch_glyph(&self, font: FontId, codepoint: u32) -> Result<Touch, Error> {
        self.request(GlyphKey::new(font, codepoint))
            .map(|(touch, ..)| touch)
    }

    /// Returns the atlas location of a glyph and its metrics at `size` pixels per em,
    /// rendering it first if needed.
    ///
    /// Fails with [`ErrorKind::CacheFull`](crate::ErrorKind::CacheFull) when every cell was
    /// already used in this frame; [`flush`](Self::flush) and retry in the next frame.
    pub fn get_glyph(&self, font: FontId, codepoint: u32, size: u16) -> Result<Glyph, Error> {
        let (_, slot, metrics) = self.request(GlyphKey::new(font, codepoint))?;
        let (u, v) = self.geometry.cell_origin(slot);
        Ok(metrics.to_glyph(size, self.geometry.base_size, u, v))
    }

    fn request(&self, key: GlyphKey) -> Result<(Touch, usize, BaseMetrics), Error> {
        {
            let mut cache = self.lock();
            cache.check(key)?;
            if let Some((slot, metrics)) = cache.hit(key) {
                log::trace!("glyph {:#x} hit in slot {slot}", key.codepoint);
                return Ok((Touch::Hit, slot, metrics));
            }
            if cache.ring.evict_candidate(cache.version).is_none() {
                log::warn!("glyph cache full, dropping glyph {:#x}", key.codepoint);
                return Err(Error::cache_full(key.font, key.codepoint));
            }
        }

        let (metrics, scale) = self.measure(key)?;

        let (slot, icons) = {
            let mut cache = self.lock();
            // Another thread may have rendered it meanwhile.
            if let Some((slot, metrics)) = cache.hit(key) {
                return Ok((Touch::Hit, slot, metrics));
            }
            let icons = if key.font.is_icon() {
                Some(cache.icon_bundle(key.codepoint)?.clone())
            } else {
                None
            };
            let Some(slot) = cache.claim(key, metrics) else {
                log::warn!("too many glyphs this frame, dropping {:#x}", key.codepoint);
                return Err(Error::too_many_glyphs(key.font, key.codepoint));
            };
            log::trace!("glyph {:#x} claimed slot {slot}", key.codepoint);
            (slot, icons)
        };

        self.render(key, slot, scale, icons.as_ref());
        Ok((Touch::Miss, slot, metrics))
    }

    /// Computes base-size metrics without holding the cache lock.
    ///
    /// Also returns the outline scale, or `None` when there is no outline to render.
    fn measure(&self, key: GlyphKey) -> Result<(BaseMetrics, Option<f32>), Error> {
        let glyph_size = self.geometry.glyph_size;
        if key.font.is_icon() {
            return Ok((BaseMetrics::icon(glyph_size), None));
        }
        let (font, codepoint) = (key.font, key.codepoint);
        let invalid = || Error::invalid_glyph_font(font, codepoint);
        let rasterizer = &*self.rasterizer;
        let scale = rasterizer
            .scale_for_pixel_height(font, f32::from(self.geometry.base_size))
            .ok_or_else(invalid)?;
        let vertical = rasterizer.vertical_metrics(font).ok_or_else(invalid)?;
        let horizontal = rasterizer
            .horizontal_metrics(font, codepoint)
            .ok_or_else(invalid)?;
        let bitmap = rasterizer
            .bitmap_box(font, codepoint, scale)
            .ok_or_else(invalid)?;
        let metrics = BaseMetrics::from_outline(horizontal, vertical, bitmap, scale, glyph_size);
        if is_space_codepoint(codepoint) {
            Ok((metrics.without_extent(), None))
        } else {
            Ok((metrics, Some(scale)))
        }
    }

    /// Draws a claimed cell, then publishes the pixels if the cell still belongs to `key`.
    ///
    /// Cells without an outline or icon are cleared.
    fn render(&self, key: GlyphKey, slot: usize, scale: Option<f32>, icons: Option<&IconBundle>) {
        let bitmap = scale.and_then(|scale| {
            self.rasterizer
                .generate_sdf(key.font, key.codepoint, scale, &SdfParams::default())
        });
        let icon = icons.and_then(|icons| {
            usize::try_from(key.codepoint)
                .ok()
                .and_then(|index| icons.icon(index))
        });

        let mut cache = self.lock();
        if cache.slots.key(slot) != Some(key) {
            log::debug!(
                "slot {slot} was reassigned before glyph {:#x} was drawn",
                key.codepoint
            );
            return;
        }
        let origin = self.geometry.cell_origin(slot);
        let reserved = cache.slots.metrics(slot);
        match (icon, bitmap) {
            (Some(icon), _) => self.atlas.write_icon(origin, icon),
            (None, Some(bitmap)) => {
                self.atlas
                    .write_sdf(origin, &bitmap, (reserved.width, reserved.height));
            }
            (None, None) => self.atlas.clear_cell(origin),
        }
        // A flush may have happened since the claim.
        cache.dirty = true;
        drop(cache);
    }

    /// Starts a new frame, returning whether the atlas changed since the previous flush.
    pub fn flush(&self) -> bool {
        let mut cache = self.lock();
        cache.version = cache.version.checked_add(1).unwrap_or(1);
        core::mem::take(&mut cache.dirty)
    }

    /// Read access to the atlas pixels for uploading.
    ///
    /// Glyph requests that render wait until the view is dropped, so do not
    /// request glyphs on the same thread while holding it.
    pub fn texture(&self) -> AtlasTexture<'_> {
        self.atlas.texture()
    }

    /// Side length of the atlas texture, in pixels.
    pub fn texture_size(&self) -> u16 {
        self.geometry.texture_size
    }

    /// Converts a size in points to whole pixels, using the configured DPI when
    /// `dpi` is `None` or zero.
    pub fn pixel_size_for_point_size(&self, points: f32, dpi: Option<u16>) -> u32 {
        let dpi = dpi.filter(|&dpi| dpi != 0).unwrap_or(self.geometry.dpi);
        crate::metrics::pixel_size_for_point_size(points, dpi)
    }

    fn font_scale(&self, font: FontId) -> Result<f32, Error> {
        if !font.is_font() {
            return Err(Error::invalid_font(font));
        }
        self.rasterizer
            .scale_for_pixel_height(font, f32::from(self.geometry.base_size))
            .ok_or_else(|| Error::invalid_font(font))
    }

    /// Ascent, descent and line gap of a font at `size` pixels per em.
    pub fn font_height(&self, font: FontId, size: u16) -> Result<FontHeight, Error> {
        let scale = self.font_scale(font)?;
        let vertical = self
            .rasterizer
            .vertical_metrics(font)
            .ok_or_else(|| Error::invalid_font(font))?;
        let base = self.geometry.base_size;
        Ok(FontHeight {
            ascent: scale_font_metric(vertical.ascent, scale, size, base),
            descent: scale_font_metric(vertical.descent, scale, size, base),
            line_gap: scale_font_metric(vertical.line_gap, scale, size, base),
        })
    }

    /// Underline position and thickness of a font at `size` pixels per em.
    ///
    /// Fails with [`ErrorKind::Unsupported`](crate::ErrorKind::Unsupported) if the font
    /// does not describe its underline.
    pub fn underline_metrics(&self, font: FontId, size: u16) -> Result<Underline, Error> {
        let scale = self.font_scale(font)?;
        let underline = self
            .rasterizer
            .underline(font)
            .ok_or_else(|| Error::unsupported(font, "font has no underline metrics"))?;
        let base = self.geometry.base_size;
        Ok(Underline {
            position: scale_font_metric_f32(underline.position, scale, size, base),
            thickness: scale_font_metric_f32(underline.thickness, scale, size, base),
        })
    }

    /// Hit, miss and eviction counts plus current occupancy.
    pub fn stats(&self) -> CacheStats {
        let cache = self.lock();
        CacheStats {
            occupied: cache.slots.occupied().count(),
            ..cache.stats
        }
    }

    /// Resets the hit, miss and eviction counters without touching the cache.
    pub fn clear_stats(&self) {
        self.lock().stats = CacheStats::default();
    }
}

impl<R> Drop for FontManager<R> {
    fn drop(&mut self) {
        if self.exclusive {
            EXCLUSIVE.store(false, Ordering::Release);
        }
    }
}

impl<R> core::fmt::Debug for FontManager<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("FontManager")
            .field("geometry", &self.geometry)
            .field("version", &cache.version)
            .field("dirty", &cache.dirty)
            .field("stats", &cache.stats)
            .finish_non_exhaustive()
    }
}
