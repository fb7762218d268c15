//! Hand-drawn shape synthesis for whiteboard elements
//!
//! Turns element descriptions (rectangles, diamonds, ellipses, lines, arrows,
//! freehand strokes, 3D boxes, embeds) into sketchy render geometry, caches
//! that geometry per element identity, and derives the precise shapes used
//! for hit-testing.
//!
//! ```
//! use sketch_shapes::{Element, ElementKind, ElementShape, RenderContext, generate_shape};
//!
//! let rect = Element::new("r1", ElementKind::Rectangle).with_size(100.0, 60.0);
//! let shape = generate_shape(&rect, &RenderContext::default()).unwrap();
//! assert!(matches!(shape, ElementShape::Single(_)));
//! ```

pub mod cache;
pub mod collision;
pub mod config;
pub mod element;
pub mod errors;
pub mod log;
pub mod polygon;
pub mod render;
pub mod simplify;
pub mod sketch;
pub mod types;

pub use cache::{BitmapCacheInvalidator, NoopBitmapCache, ShapeCache};
pub use collision::{CollisionShape, HitTest, linear_collision_ops, resolve_collision_shape};
pub use config::ShapeConfig;
pub use element::{
    Element, ElementId, ElementKind, ElementType, ElementsMap, Roundness, is_path_a_loop,
};
pub use errors::ShapeError;
pub use polygon::{PolygonToggle, can_become_polygon, toggle_line_polygon_state};
pub use render::geometry::{corner_radius, distance};
pub use render::{RenderContext, ShapeGenerator, SketchOptions};
pub use simplify::{DouglasPeucker, PathSimplifier};
pub use sketch::{RoughGenerator, SketchGenerator};
pub use types::{Drawable, ElementShape, PathOp, Primitive, rotate_point};

/// Generate render geometry with the default sketch generator and settings
pub fn generate_shape(element: &Element, ctx: &RenderContext) -> Result<ElementShape, ShapeError> {
    ShapeGenerator::default().generate(element, ctx)
}
