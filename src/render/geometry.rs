//! Geometry functions: corner radii and rounded path creation

use glam::{DVec2, dvec2};

use crate::element::{Roundness, RoundnessType};

use super::defaults;
use super::path_builder::PathData;

pub fn distance(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// Corner radius for a side of length `size` under the given roundness
///
/// Adaptive rounding keeps a fixed radius once the side is long enough for
/// the proportional radius to exceed it.
pub fn corner_radius(size: f64, roundness: &Roundness) -> f64 {
    match roundness.kind {
        RoundnessType::Legacy | RoundnessType::ProportionalRadius => {
            size * defaults::DEFAULT_PROPORTIONAL_RADIUS
        }
        RoundnessType::AdaptiveRadius => {
            let fixed = roundness.value.unwrap_or(defaults::DEFAULT_ADAPTIVE_RADIUS);
            let cutoff = fixed / defaults::DEFAULT_PROPORTIONAL_RADIUS;
            if size <= cutoff {
                size * defaults::DEFAULT_PROPORTIONAL_RADIUS
            } else {
                fixed
            }
        }
    }
}

/// Rectangle outline from (0, 0) to (w, h) with quadratic corners of radius `r`
pub fn create_rounded_rect_path(w: f64, h: f64, r: f64) -> PathData {
    PathData::new()
        .m(r, 0.0)
        .l(w - r, 0.0)
        .q(w, 0.0, w, r)
        .l(w, h - r)
        .q(w, h, w - r, h)
        .l(r, h)
        .q(0.0, h, 0.0, h - r)
        .l(0.0, r)
        .q(0.0, 0.0, r, 0.0)
}

/// Vertices of a diamond inscribed in a `width` x `height` box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiamondPoints {
    pub top: DVec2,
    pub right: DVec2,
    pub bottom: DVec2,
    pub left: DVec2,
}

impl DiamondPoints {
    pub fn new(width: f64, height: f64) -> Self {
        let top_x = (width / 2.0).floor() + 1.0;
        let right_y = (height / 2.0).floor() + 1.0;
        Self {
            top: dvec2(top_x, 0.0),
            right: dvec2(width, right_y),
            bottom: dvec2(top_x, height),
            left: dvec2(0.0, right_y),
        }
    }

    /// Clockwise from the top
    pub fn to_vec(self) -> Vec<DVec2> {
        vec![self.top, self.right, self.bottom, self.left]
    }
}

/// Diamond outline with cubic corners
///
/// The vertical and horizontal radii differ for non-square diamonds: each is
/// derived from the diamond's extent along its own axis.
pub fn create_rounded_diamond_path(points: DiamondPoints, roundness: &Roundness) -> PathData {
    let DiamondPoints {
        top,
        right,
        bottom,
        left,
    } = points;
    let vr = corner_radius((top.x - left.x).abs(), roundness);
    let hr = corner_radius((right.y - top.y).abs(), roundness);

    PathData::new()
        .m(top.x + vr, top.y + hr)
        .l(right.x - vr, right.y - hr)
        .c(right.x, right.y, right.x, right.y, right.x - vr, right.y + hr)
        .l(bottom.x + vr, bottom.y - hr)
        .c(bottom.x, bottom.y, bottom.x, bottom.y, bottom.x - vr, bottom.y - hr)
        .l(left.x + vr, left.y + hr)
        .c(left.x, left.y, left.x, left.y, left.x + vr, left.y - hr)
        .l(top.x - vr, top.y + hr)
        .c(top.x, top.y, top.x, top.y, top.x + vr, top.y + hr)
}

/// Cubic segments `(start, cp1, cp2, end)` of a Catmull–Rom spline through `points`
///
/// Control points sit a sixth of the neighbor chord away, the same fit the
/// sketch generator uses at zero curve tightness. End tangents reuse the
/// terminal point, so a two-point input yields a single straight cubic.
pub fn catmull_rom_cubics(points: &[DVec2]) -> Vec<[DVec2; 4]> {
    const TENSION: f64 = 0.5;

    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let get = |i: isize| points[i.clamp(0, n as isize - 1) as usize];

    (0..n - 1)
        .map(|i| {
            let i = i as isize;
            let (p0, p1, p2, p3) = (get(i - 1), get(i), get(i + 1), get(i + 2));
            let cp1 = p1 + (p2 - p0) * TENSION / 3.0;
            let cp2 = p2 - (p3 - p1) * TENSION / 3.0;
            [p1, cp1, cp2, p2]
        })
        .collect()
}

/// Smooth curve through all points as an SVG path
///
/// Only the fill area of a curve is traced from this; the stroke comes from
/// the sketch generator's own curve fit.
pub fn create_curve_path(points: &[DVec2]) -> PathData {
    let Some(&first) = points.first() else {
        return PathData::new();
    };
    catmull_rom_cubics(points)
        .into_iter()
        .fold(PathData::new().move_to(first), |path, [_, c1, c2, end]| {
            path.cubic_to(c1, c2, end)
        })
}

/// Closed polygon outline whose corners are replaced by quadratic curves
///
/// The radius at each corner is limited to a third of both adjacent edges.
pub fn create_rounded_polygon_path(vertices: &[DVec2], radius: f64) -> PathData {
    let n = vertices.len();
    if n < 3 || radius <= 0.0 {
        let mut path = PathData::new();
        for (i, v) in vertices.iter().enumerate() {
            path = if i == 0 { path.move_to(*v) } else { path.line_to(*v) };
        }
        return if n > 0 { path.z() } else { path };
    }

    let insets: Vec<(DVec2, DVec2)> = (0..n)
        .map(|i| {
            let prev = vertices[(i + n - 1) % n];
            let v = vertices[i];
            let next = vertices[(i + 1) % n];
            let to_prev = prev - v;
            let to_next = next - v;
            let r = radius
                .min(to_prev.length() / 3.0)
                .min(to_next.length() / 3.0);
            (
                v + to_prev.normalize_or_zero() * r,
                v + to_next.normalize_or_zero() * r,
            )
        })
        .collect();

    let mut path = PathData::new().move_to(insets[0].1);
    for i in 1..=n {
        let idx = i % n;
        let (before, after) = insets[idx];
        path = path.line_to(before).quad_to(vertices[idx], after);
    }
    path.z()
}
