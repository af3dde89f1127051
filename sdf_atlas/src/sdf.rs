// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Signed distance field rendering of glyph outlines.

use peniko::kurbo::{self, BezPath, PathEl, Point, Shape as _, Vec2};

use crate::rasterizer::{BitmapBox, SdfBitmap, SdfParams};

/// Maximum distance, in pixels, between a curve and its flattened polyline.
const FLATTEN_TOLERANCE: f64 = 0.05;

#[derive(Copy, Clone, Debug)]
struct Edge {
    from: Point,
    to: Point,
}

impl Edge {
    fn distance_sq(&self, p: Point) -> f64 {
        let d = self.to - self.from;
        let len_sq = d.hypot2();
        let t = if len_sq > 0.0 {
            ((p - self.from).dot(d) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (p - (self.from + d * t)).hypot2()
    }

    /// Contribution of this edge to the winding number around `p`.
    fn winding(&self, p: Point) -> i32 {
        let side = cross(self.to - self.from, p - self.from);
        if self.from.y <= p.y {
            if self.to.y > p.y && side > 0.0 {
                return 1;
            }
        } else if self.to.y <= p.y && side < 0.0 {
            return -1;
        }
        0
    }
}

fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

fn close(edges: &mut Vec<Edge>, last: Point, start: Point) {
    if last != start {
        edges.push(Edge {
            from: last,
            to: start,
        });
    }
}

fn flatten(path: &BezPath) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut start = Point::ZERO;
    let mut last = Point::ZERO;
    kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            close(&mut edges, last, start);
            start = p;
            last = p;
        }
        PathEl::LineTo(p) => {
            edges.push(Edge { from: last, to: p });
            last = p;
        }
        PathEl::ClosePath => {
            close(&mut edges, last, start);
            last = start;
        }
        // Flattening only produces lines.
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    close(&mut edges, last, start);
    edges
}

/// Integer pixel bounds of an outline given in pixel space.
///
/// Returns `None` for an empty outline.
#[expect(
    clippy::cast_possible_truncation,
    reason = "glyph bounds in pixels fit in i32"
)]
pub(crate) fn bitmap_box(path: &BezPath) -> Option<BitmapBox> {
    if path.elements().is_empty() {
        return None;
    }
    let bounds = path.bounding_box();
    Some(BitmapBox {
        x0: bounds.x0.floor() as i32,
        y0: bounds.y0.floor() as i32,
        x1: bounds.x1.ceil() as i32,
        y1: bounds.y1.ceil() as i32,
    })
}

/// Renders the distance field of an outline given in pixel space, y pointing down.
///
/// The bitmap covers the outline's pixel bounds grown by `params.padding` on every side.
/// Each pixel stores `on_edge_value + pixel_dist_scale * d`, clamped to a byte, where `d` is
/// the distance from the pixel centre to the outline, positive inside (non-zero winding).
///
/// Returns `None` if the outline encloses no pixels.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "bitmap extents are positive and distance values are clamped to a byte"
)]
pub fn render_sdf(path: &BezPath, params: &SdfParams) -> Option<SdfBitmap> {
    let bounds = bitmap_box(path)?;
    if bounds.width() <= 0 || bounds.height() <= 0 {
        return None;
    }
    let edges = flatten(path);
    if edges.is_empty() {
        return None;
    }

    let pad = i32::from(params.padding);
    let x_off = bounds.x0 - pad;
    let y_off = bounds.y0 - pad;
    let width = (bounds.width() + pad * 2) as u32;
    let height = (bounds.height() + pad * 2) as u32;
    let on_edge = f64::from(params.on_edge_value);
    let dist_scale = f64::from(params.pixel_dist_scale);

    let mut pixels = vec![0_u8; width as usize * height as usize];
    for (y, row) in pixels.chunks_exact_mut(width as usize).enumerate() {
        let py = f64::from(y_off) + y as f64 + 0.5;
        for (x, value) in row.iter_mut().enumerate() {
            let p = Point::new(f64::from(x_off) + x as f64 + 0.5, py);
            let mut min_sq = f64::MAX;
            let mut winding = 0;
            for edge in &edges {
                min_sq = min_sq.min(edge.distance_sq(p));
                winding += edge.winding(p);
            }
            let mut distance = min_sq.sqrt();
            if winding == 0 {
                distance = -distance;
            }
            *value = (on_edge + dist_scale * distance).clamp(0.0, 255.0) as u8;
        }
    }

    Some(SdfBitmap {
        width,
        height,
        x_off,
        y_off,
        pixels,
    })
}
