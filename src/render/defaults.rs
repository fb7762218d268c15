//! Default sizes, colors and thresholds (all in scene pixels)

pub const STROKE_COLOR: &str = "#1e1e1e";
pub const TRANSPARENT: &str = "transparent";
pub const STROKE_WIDTH: f64 = 2.0;
pub const CANVAS_BACKGROUND: &str = "#ffffff";

pub const ROUGHNESS_ARCHITECT: f64 = 0.0;
pub const ROUGHNESS_ARTIST: f64 = 1.0;
/// Above this, vertices may drift for a sketchier look
pub const ROUGHNESS_CARTOONIST: f64 = 2.0;
pub const MAX_ADJUSTED_ROUGHNESS: f64 = 2.5;

/// Endpoint distance under which a point sequence counts as closed
pub const LINE_CONFIRM_THRESHOLD: f64 = 8.0;
/// Endpoint distance under which closing a line snaps instead of appending
pub const LINE_POLYGON_POINT_MERGE_DISTANCE: f64 = 20.0;

pub const ELBOW_CORNER_RADIUS: f64 = 16.0;
/// Elbow arrows with any coordinate beyond this render as nothing
pub const ELBOW_COORDINATE_LIMIT: f64 = 1e6;

pub const FREEDRAW_SIMPLIFY_TOLERANCE: f64 = 0.75;

pub const IFRAME_PLACEHOLDER_BACKGROUND: &str = "#d3d3d3";
pub const IFRAME_STROKE: &str = "#000000";
pub const IFRAME_BACKGROUND: &str = "#f4f4f6";

pub const DEFAULT_PROPORTIONAL_RADIUS: f64 = 0.25;
pub const DEFAULT_ADAPTIVE_RADIUS: f64 = 32.0;

/// cos(30°)
pub const ISO_X_SCALE: f64 = 0.866_025_403_784_438_6;
/// sin(30°)
pub const ISO_Y_SCALE: f64 = 0.5;
/// Fraction of the bounding box the projected depth may take up
pub const BOX_DEPTH_RATIO: f64 = 0.8;
pub const BOX_BOUNDS_EPSILON: f64 = 1e-6;

pub const MAX_CONTAINER_DEPTH: usize = 8;
