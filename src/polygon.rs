//! Closing and reopening line elements as polygons.

use glam::DVec2;

use crate::render::defaults;

/// Result of toggling a line's polygon state
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonToggle {
    pub polygon: bool,
    pub points: Vec<DVec2>,
}

/// Whether a point sequence has enough distinct vertices to enclose an area
pub fn can_become_polygon(points: &[DVec2]) -> bool {
    match points {
        [first, _, last] => first != last,
        _ => points.len() > 3,
    }
}

/// Toggle a line into or out of polygon mode with the stock merge distance
///
/// See [`toggle_line_polygon_state_with`], or
/// [`ShapeConfig::toggle_line_polygon_state`](crate::ShapeConfig::toggle_line_polygon_state)
/// for a host-tuned distance.
pub fn toggle_line_polygon_state(points: &[DVec2], next_state: bool) -> Option<PolygonToggle> {
    toggle_line_polygon_state_with(
        points,
        next_state,
        defaults::LINE_POLYGON_POINT_MERGE_DISTANCE,
    )
}

/// Toggle a line into or out of polygon mode
///
/// Closing snaps the last point onto the first when they are within
/// `merge_distance` and at least 4 points exist; otherwise a copy of the
/// first point is appended. Returns `None` when the points cannot close.
/// Opening keeps the points as they are.
pub fn toggle_line_polygon_state_with(
    points: &[DVec2],
    next_state: bool,
    merge_distance: f64,
) -> Option<PolygonToggle> {
    let mut points = points.to_vec();

    if next_state {
        if !can_become_polygon(&points) {
            return None;
        }
        let (first, last) = (*points.first()?, *points.last()?);
        if first.distance(last) > merge_distance || points.len() < 4 {
            points.push(first);
        } else if let Some(last) = points.last_mut() {
            *last = first;
        }
    }

    Some(PolygonToggle {
        polygon: next_state,
        points,
    })
}
