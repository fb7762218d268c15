//! Shape generation for whiteboard elements
//!
//! This module is organized into submodules:
//! - `defaults`: Default sizes, colors and thresholds
//! - `context`: RenderContext carrying per-pass inputs
//! - `options`: Sketch options derived from element style
//! - `geometry`: Corner radii and rounded path creation
//! - `path_builder`: SVG path strings and elbow routing
//! - `arrowhead`: Arrowhead geometry and drawables
//! - `box3d`: Isometric projection of 3D boxes

pub mod arrowhead;
pub mod box3d;
pub mod context;
pub mod defaults;
pub mod geometry;
pub mod options;
pub mod path_builder;

use std::borrow::Cow;

pub use context::RenderContext;
pub use options::SketchOptions;

use crate::config::ShapeConfig;
use crate::element::{
    ArrowheadPosition, Element, ElementKind, FillStyle, is_path_a_loop, is_transparent,
};
use crate::errors::ShapeError;
use crate::simplify::{DouglasPeucker, PathSimplifier};
use crate::sketch::{RoughGenerator, SketchGenerator};
use crate::types::{Drawable, ElementShape};

use arrowhead::arrowhead_shapes;
use box3d::{box_drawables, project_box};
use geometry::{
    DiamondPoints, corner_radius, create_rounded_diamond_path, create_rounded_rect_path,
};
use options::build_options;
use path_builder::elbow_path;

/// Builds render geometry for elements
///
/// Holds the injected sketch and simplification capabilities; generation
/// itself is pure and can be repeated for the same element at will.
pub struct ShapeGenerator {
    sketch: Box<dyn SketchGenerator>,
    simplifier: Box<dyn PathSimplifier>,
    config: ShapeConfig,
}

impl Default for ShapeGenerator {
    fn default() -> Self {
        Self::new(
            Box::new(RoughGenerator::new()),
            Box::new(DouglasPeucker),
            ShapeConfig::default(),
        )
    }
}

impl std::fmt::Debug for ShapeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ShapeGenerator {
    pub fn new(
        sketch: Box<dyn SketchGenerator>,
        simplifier: Box<dyn PathSimplifier>,
        config: ShapeConfig,
    ) -> Self {
        Self {
            sketch,
            simplifier,
            config,
        }
    }

    pub fn with_config(mut self, config: ShapeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn sketch(&self) -> &dyn SketchGenerator {
        self.sketch.as_ref()
    }

    pub fn simplifier(&self) -> &dyn PathSimplifier {
        self.simplifier.as_ref()
    }

    pub fn config(&self) -> &ShapeConfig {
        &self.config
    }

    /// Generate render geometry for an element
    ///
    /// Text, image and frame elements are drawn by other means and yield
    /// `ElementShape::Empty`. Selection rectangles have no shape at all and
    /// are rejected.
    pub fn generate(
        &self,
        element: &Element,
        ctx: &RenderContext,
    ) -> Result<ElementShape, ShapeError> {
        validate_dimensions(element)?;

        crate::log::debug!(
            element_id = %element.id,
            kind = %element.element_type(),
            width = element.width,
            height = element.height,
            "generating shape"
        );

        let sketch = self.sketch();
        match &element.kind {
            ElementKind::Rectangle | ElementKind::Iframe | ElementKind::Embeddable => {
                let element = substitute_iframe_like_colors(element, ctx);
                let (w, h) = (element.width, element.height);
                let drawable = match &element.roundness {
                    Some(roundness) => {
                        let r = corner_radius(w.min(h), roundness);
                        let path = create_rounded_rect_path(w, h, r);
                        sketch.path(&path.to_string(), &build_options(&element, true)?)
                    }
                    None => sketch.rectangle(0.0, 0.0, w, h, &build_options(&element, false)?),
                };
                Ok(ElementShape::Single(drawable))
            }
            ElementKind::Diamond => {
                let points = DiamondPoints::new(element.width, element.height);
                let drawable = match &element.roundness {
                    Some(roundness) => {
                        let path = create_rounded_diamond_path(points, roundness);
                        sketch.path(&path.to_string(), &build_options(element, true)?)
                    }
                    None => sketch.polygon(&points.to_vec(), &build_options(element, false)?),
                };
                Ok(ElementShape::Single(drawable))
            }
            ElementKind::Ellipse => {
                let (w, h) = (element.width, element.height);
                let options = build_options(element, false)?;
                Ok(ElementShape::Single(sketch.ellipse(w / 2.0, h / 2.0, w, h, &options)))
            }
            ElementKind::Line(_) | ElementKind::Arrow(_) => self.generate_linear(element, ctx),
            ElementKind::Freedraw(data) => {
                if !is_path_a_loop(&data.points) {
                    return Ok(ElementShape::Empty);
                }
                let simplified = self
                    .simplifier
                    .simplify(&data.points, self.config.freedraw_simplify_tolerance);
                let options = build_options(element, false)?.with_stroke(None);
                Ok(ElementShape::Single(sketch.curve(&simplified, &options)))
            }
            ElementKind::Frame
            | ElementKind::MagicFrame
            | ElementKind::Text
            | ElementKind::Image => Ok(ElementShape::Empty),
            ElementKind::Cube(data) | ElementKind::RectangularPrism(data) => {
                let options = build_options(element, false)?;
                let projection = project_box(
                    element.width,
                    element.height,
                    data.depth,
                    self.config.box_depth_ratio,
                );
                let radius = element
                    .roundness
                    .map(|roundness| {
                        corner_radius(
                            projection.face_size.x.min(projection.face_size.y),
                            &roundness,
                        )
                    })
                    .unwrap_or(0.0);
                Ok(ElementShape::Many(box_drawables(
                    &projection,
                    radius,
                    &options,
                    sketch,
                )))
            }
            ElementKind::Selection => Err(ShapeError::unimplemented(element.element_type())),
        }
    }

    fn generate_linear(
        &self,
        element: &Element,
        ctx: &RenderContext,
    ) -> Result<ElementShape, ShapeError> {
        let sketch = self.sketch();
        let points = element.points_or_origin();
        let options = build_options(element, false)?;

        let mut shapes: Vec<Drawable> = if element.is_elbow_arrow() {
            let limit = self.config.elbow_coordinate_limit;
            if points.iter().any(|p| p.x.abs() > limit || p.y.abs() > limit) {
                crate::log::error!(
                    element_id = %element.id,
                    limit,
                    "elbow arrow has a coordinate beyond the sane range, skipping"
                );
                return Ok(ElementShape::Many(Vec::new()));
            }
            let path = elbow_path(&points, self.config.elbow_corner_radius);
            vec![sketch.path(&path.to_string(), &build_options(element, true)?)]
        } else if element.roundness.is_none() {
            if options.fill.is_some() {
                vec![sketch.polygon(&points, &options)]
            } else {
                vec![sketch.linear_path(&points, &options)]
            }
        } else {
            vec![sketch.curve(&points, &options)]
        };

        if let ElementKind::Arrow(data) = &element.kind {
            let ends = [
                (ArrowheadPosition::Start, data.start_arrowhead),
                (ArrowheadPosition::End, data.end_arrowhead),
            ];
            for (position, head) in ends {
                let Some(head) = head else { continue };
                let heads = arrowhead_shapes(
                    element,
                    &shapes,
                    position,
                    head,
                    sketch,
                    &options,
                    &ctx.canvas_background_color,
                );
                shapes.extend(heads);
            }
        }

        Ok(ElementShape::Many(shapes))
    }
}

fn validate_dimensions(element: &Element) -> Result<(), ShapeError> {
    let fields = [
        ("x", element.x),
        ("y", element.y),
        ("width", element.width),
        ("height", element.height),
        ("angle", element.angle),
    ];
    for (field, value) in fields {
        let negative_size = matches!(field, "width" | "height") && value < 0.0;
        if !value.is_finite() || negative_size {
            return Err(ShapeError::InvalidDimension {
                element_id: element.id.to_string(),
                field,
                value,
            });
        }
    }
    Ok(())
}

/// Colors iframe-like elements are drawn with
///
/// Works on a copy; the stored element is never modified.
pub fn substitute_iframe_like_colors<'a>(
    element: &'a Element,
    ctx: &RenderContext,
) -> Cow<'a, Element> {
    let kind = element.element_type();
    let placeholder = kind.is_iframe_like()
        && (ctx.is_exporting || (kind.is_embeddable() && !ctx.is_embed_validated(&element.id)))
        && is_transparent(&element.background_color)
        && is_transparent(&element.stroke_color);

    if placeholder {
        let mut el = element.clone();
        el.roughness = defaults::ROUGHNESS_ARCHITECT;
        el.background_color = defaults::IFRAME_PLACEHOLDER_BACKGROUND.to_string();
        el.fill_style = FillStyle::Solid;
        return Cow::Owned(el);
    }

    if kind == crate::element::ElementType::Iframe {
        let mut el = element.clone();
        if is_transparent(&el.stroke_color) {
            el.stroke_color = defaults::IFRAME_STROKE.to_string();
        }
        if is_transparent(&el.background_color) {
            el.background_color = defaults::IFRAME_BACKGROUND.to_string();
        }
        return Cow::Owned(el);
    }

    Cow::Borrowed(element)
}
