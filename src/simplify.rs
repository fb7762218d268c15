//! Polyline simplification capability.

use glam::DVec2;

/// Reduces a dense point sequence to a sparser one within `tolerance`
pub trait PathSimplifier {
    fn simplify(&self, points: &[DVec2], tolerance: f64) -> Vec<DVec2>;
}

/// Ramer–Douglas–Peucker simplification
///
/// Endpoints are always kept. Closed loops (first point equal to the last)
/// measure against the shared endpoint, so they stay closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DouglasPeucker;

impl PathSimplifier for DouglasPeucker {
    fn simplify(&self, points: &[DVec2], tolerance: f64) -> Vec<DVec2> {
        if points.len() <= 2 {
            return points.to_vec();
        }

        let mut keep = vec![false; points.len()];
        keep[0] = true;
        keep[points.len() - 1] = true;
        mark_kept(points, tolerance, 0, points.len() - 1, &mut keep);

        points
            .iter()
            .zip(keep)
            .filter_map(|(p, kept)| kept.then_some(*p))
            .collect()
    }
}

fn mark_kept(points: &[DVec2], tolerance: f64, start: usize, end: usize, keep: &mut [bool]) {
    if end <= start + 1 {
        return;
    }

    let (a, b) = (points[start], points[end]);
    let mut max_idx = start;
    let mut max_distance = -1.0;
    for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
        let d = point_segment_distance(*p, a, b);
        if d > max_distance {
            max_distance = d;
            max_idx = i;
        }
    }

    if max_distance > tolerance {
        keep[max_idx] = true;
        mark_kept(points, tolerance, start, max_idx, keep);
        mark_kept(points, tolerance, max_idx, end, keep);
    }
}

pub fn point_segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= 1e-12 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
