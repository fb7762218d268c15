//! Tunables for shape generation.

use glam::DVec2;

use crate::polygon::{PolygonToggle, toggle_line_polygon_state_with};
use crate::render::defaults;

/// Numeric knobs of the shape generator
///
/// `Default` reproduces the stock whiteboard behaviour; hosts override
/// individual fields with struct update syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeConfig {
    /// Corner radius of elbow arrow turns
    pub elbow_corner_radius: f64,
    /// Elbow arrows with any coordinate beyond this bound render as nothing
    pub elbow_coordinate_limit: f64,
    pub freedraw_simplify_tolerance: f64,
    /// Endpoint distance under which a line closing into a polygon snaps shut
    pub polygon_merge_distance: f64,
    /// Canvas background used when no render context is supplied
    pub canvas_background: String,
    /// Fraction of the bounding box a 3D box's projected depth may occupy
    pub box_depth_ratio: f64,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            elbow_corner_radius: defaults::ELBOW_CORNER_RADIUS,
            elbow_coordinate_limit: defaults::ELBOW_COORDINATE_LIMIT,
            freedraw_simplify_tolerance: defaults::FREEDRAW_SIMPLIFY_TOLERANCE,
            polygon_merge_distance: defaults::LINE_POLYGON_POINT_MERGE_DISTANCE,
            canvas_background: defaults::CANVAS_BACKGROUND.to_string(),
            box_depth_ratio: defaults::BOX_DEPTH_RATIO,
        }
    }
}

impl ShapeConfig {
    /// Toggle a line's polygon state using this config's merge distance
    pub fn toggle_line_polygon_state(
        &self,
        points: &[DVec2],
        next_state: bool,
    ) -> Option<PolygonToggle> {
        toggle_line_polygon_state_with(points, next_state, self.polygon_merge_distance)
    }
}
