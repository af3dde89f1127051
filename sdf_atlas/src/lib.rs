// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SDF Atlas keeps a single fixed-size texture of pre-rasterized signed distance field glyphs
//! and answers "where in the atlas is this glyph, and how big is it at this size?".
//!
//! The atlas is split into a square grid of equally sized cells, one glyph per cell. Cells are
//! recycled in least-recently-used order, but a cell that was used during the current frame is
//! never evicted: when every cell has been used this frame, requests fail with
//! [`ErrorKind::CacheFull`] until the caller [flushes](FontManager::flush) and starts a new frame.
//!
//! All glyph metrics are computed once at a fixed base size and scaled to the requested pixel
//! size with integer arithmetic, so a glyph is rasterized only once regardless of how many sizes
//! it is drawn at.
//!
//! ```no_run
//! use std::sync::Arc;
//! use sdf_atlas::{AtlasConfig, FontCollection, FontManager};
//!
//! # fn main() -> Result<(), sdf_atlas::Error> {
//! let fonts = Arc::new(FontCollection::new());
//! let manager = FontManager::new(AtlasConfig::default(), fonts)?;
//! manager.import_font_data(std::fs::read("font.ttf").unwrap_or_default())?;
//! let font = manager.add_font_by_family("Roboto").unwrap();
//!
//! let glyph = manager.get_glyph(font, 'A' as u32, 24)?;
//! println!("quad {}x{} at atlas ({}, {})", glyph.width, glyph.height, glyph.atlas.u, glyph.atlas.v);
//!
//! // Once per frame.
//! if manager.flush() {
//!     let texture = manager.texture();
//!     // upload texture.pixels() (texture.size() x texture.size(), R8) to the GPU
//! #   let _ = texture.pixels();
//! }
//! # Ok(())
//! # }
//! ```

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

mod atlas;
mod collection;
mod config;
mod error;
mod hash_index;
mod icon;
mod key;
mod manager;
mod metrics;
mod rasterizer;
mod ring;
mod sdf;
mod slot;

#[cfg(test)]
mod tests;

pub use peniko::kurbo;
pub use skrifa;

pub use crate::atlas::AtlasTexture;
pub use crate::collection::FontCollection;
pub use crate::config::{
    AtlasConfig, AtlasGeometry, COLLISION_STEP, DISTANCE_OFFSET, ONEDGE_VALUE, PIXEL_DIST_SCALE,
};
pub use crate::error::{Error, ErrorKind};
pub use crate::icon::IconBundle;
pub use crate::key::{FontId, GlyphKey, is_space_codepoint};
pub use crate::manager::{CacheStats, FontManager, Touch};
pub use crate::metrics::{
    AtlasRegion, FontHeight, Glyph, Underline, pixel_size_for_point_size, sdf_distance,
    sdf_edge_mask,
};
pub use crate::rasterizer::{
    BitmapBox, GlyphRasterizer, HorizontalMetrics, SdfBitmap, SdfParams, VerticalMetrics,
};
pub use crate::sdf::render_sdf;
