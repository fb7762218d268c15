//! Sketch generator capability and its `roughr` adapter.
//!
//! The shape generator never perturbs geometry itself. It describes precise
//! primitives and asks a [`SketchGenerator`] for the seeded hand-drawn ops.

use glam::{DVec2, dvec2};
use roughr::core::{Op, OpSet as RoughOpSet, OpSetType, OpType, Options, OptionsBuilder};
use roughr::renderer::EllipseResult;

use crate::element::FillStyle;
use crate::log::warn;
use crate::render::geometry::create_curve_path;
use crate::render::options::SketchOptions;
use crate::types::{Drawable, OpSet, OpSetKind, PathOp, Primitive};

/// Produces hand-drawn drawables from precise primitives
///
/// Output must be reproducible: the same primitive and options (including
/// the seed) always yield the same ops.
pub trait SketchGenerator {
    fn rectangle(
        &self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        options: &SketchOptions,
    ) -> Drawable;
    fn ellipse(
        &self,
        cx: f64,
        cy: f64,
        width: f64,
        height: f64,
        options: &SketchOptions,
    ) -> Drawable;
    fn circle(&self, cx: f64, cy: f64, diameter: f64, options: &SketchOptions) -> Drawable;
    fn line(&self, from: DVec2, to: DVec2, options: &SketchOptions) -> Drawable;
    fn linear_path(&self, points: &[DVec2], options: &SketchOptions) -> Drawable;
    fn polygon(&self, points: &[DVec2], options: &SketchOptions) -> Drawable;
    fn curve(&self, points: &[DVec2], options: &SketchOptions) -> Drawable;
    fn path(&self, d: &str, options: &SketchOptions) -> Drawable;
}

/// [`SketchGenerator`] backed by the `roughr` Rough.js port
///
/// Follows `roughr::generator::Generator`: the outline is sketched first,
/// then the fill (solid or patterned per `fill_style`) continues the same
/// random stream. Sets are ordered fill before stroke.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoughGenerator;

impl RoughGenerator {
    pub fn new() -> Self {
        Self
    }

    fn drawable(
        &self,
        shape: Primitive,
        options: &SketchOptions,
        stroke: impl FnOnce(&mut Options) -> RoughOpSet<f64>,
        fill_outline: impl FnOnce() -> Vec<Vec<DVec2>>,
    ) -> Drawable {
        let mut rough = to_rough_options(options);
        let stroke_set = stroke(&mut rough);
        finish(shape, options, &mut rough, stroke_set, fill_outline)
    }

    fn ellipse_drawable(
        &self,
        shape: Primitive,
        center: DVec2,
        width: f64,
        height: f64,
        options: &SketchOptions,
    ) -> Drawable {
        let mut rough = to_rough_options(options);
        let params = roughr::renderer::generate_ellipse_params::<f64>(width, height, &mut rough);
        let EllipseResult {
            opset,
            estimated_points,
        } = roughr::renderer::ellipse_with_params(center.x, center.y, &mut rough, &params);
        finish(shape, options, &mut rough, opset, || {
            vec![estimated_points.into_iter().map(|p| dvec2(p.x, p.y)).collect()]
        })
    }

    fn path_outline(d: &str, options: &SketchOptions) -> Vec<Vec<DVec2>> {
        let distance = (1.0 + options.roughness) / 2.0;
        roughr::points_on_path::points_on_path::<f64>(d.to_string(), Some(1.0), Some(distance))
            .into_iter()
            .map(|set| set.into_iter().map(|p| dvec2(p.x, p.y)).collect())
            .collect()
    }
}

fn finish(
    shape: Primitive,
    options: &SketchOptions,
    rough: &mut Options,
    stroke_set: RoughOpSet<f64>,
    fill_outline: impl FnOnce() -> Vec<Vec<DVec2>>,
) -> Drawable {
    let mut sets = Vec::with_capacity(2);
    if options.fill.is_some() {
        let polygons: Vec<Vec<euclid::default::Point2D<f64>>> = fill_outline()
            .into_iter()
            .filter(|poly| poly.len() >= 3)
            .map(|poly| poly.into_iter().map(to_rough_point).collect())
            .collect();
        if !polygons.is_empty() {
            let fill_set = if options.fill_style == Some(FillStyle::Solid) {
                roughr::renderer::solid_fill_polygon(&polygons, rough)
            } else {
                roughr::renderer::pattern_fill_polygons::<f64, _>(polygons, rough)
            };
            sets.push(from_rough_set(&fill_set));
        }
    }
    if options.stroke.is_some() {
        sets.push(from_rough_set(&stroke_set));
    }

    Drawable {
        shape,
        options: options.clone(),
        sets,
    }
}

impl SketchGenerator for RoughGenerator {
    fn rectangle(
        &self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        options: &SketchOptions,
    ) -> Drawable {
        self.drawable(
            Primitive::Rectangle {
                x,
                y,
                width,
                height,
            },
            options,
            |o| roughr::renderer::rectangle::<f64>(x, y, width, height, o),
            || {
                vec![vec![
                    dvec2(x, y),
                    dvec2(x + width, y),
                    dvec2(x + width, y + height),
                    dvec2(x, y + height),
                ]]
            },
        )
    }

    fn ellipse(
        &self,
        cx: f64,
        cy: f64,
        width: f64,
        height: f64,
        options: &SketchOptions,
    ) -> Drawable {
        let shape = Primitive::Ellipse {
            cx,
            cy,
            width,
            height,
        };
        self.ellipse_drawable(shape, dvec2(cx, cy), width, height, options)
    }

    fn circle(&self, cx: f64, cy: f64, diameter: f64, options: &SketchOptions) -> Drawable {
        let shape = Primitive::Circle { cx, cy, diameter };
        self.ellipse_drawable(shape, dvec2(cx, cy), diameter, diameter, options)
    }

    fn line(&self, from: DVec2, to: DVec2, options: &SketchOptions) -> Drawable {
        self.drawable(
            Primitive::Line { from, to },
            options,
            |o| roughr::renderer::line::<f64>(from.x, from.y, to.x, to.y, o),
            Vec::new,
        )
    }

    fn linear_path(&self, points: &[DVec2], options: &SketchOptions) -> Drawable {
        let d = polyline_d(points);
        self.drawable(
            Primitive::LinearPath(points.to_vec()),
            options,
            |o| roughr::renderer::svg_path::<f64>(d, o),
            Vec::new,
        )
    }

    fn polygon(&self, points: &[DVec2], options: &SketchOptions) -> Drawable {
        let rough_points: Vec<euclid::default::Point2D<f64>> =
            points.iter().copied().map(to_rough_point).collect();
        self.drawable(
            Primitive::Polygon(points.to_vec()),
            options,
            |o| roughr::renderer::polygon::<f64>(&rough_points, o),
            || vec![points.to_vec()],
        )
    }

    fn curve(&self, points: &[DVec2], options: &SketchOptions) -> Drawable {
        let rough_points: Vec<euclid::default::Point2D<f64>> =
            points.iter().copied().map(to_rough_point).collect();
        self.drawable(
            Primitive::Curve(points.to_vec()),
            options,
            |o| {
                if rough_points.is_empty() {
                    RoughOpSet {
                        op_set_type: OpSetType::Path,
                        ops: Vec::new(),
                        size: None,
                        path: None,
                    }
                } else {
                    roughr::renderer::curve::<f64>(&rough_points, o)
                }
            },
            // closed fills need a real area; the outline is the unperturbed spline
            || {
                if points.len() < 3 {
                    return Vec::new();
                }
                Self::path_outline(&create_curve_path(points).to_string(), options)
            },
        )
    }

    fn path(&self, d: &str, options: &SketchOptions) -> Drawable {
        self.drawable(
            Primitive::Path(d.to_string()),
            options,
            |o| roughr::renderer::svg_path::<f64>(d.to_string(), o),
            || Self::path_outline(d, options),
        )
    }
}

fn polyline_d(points: &[DVec2]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            d.push(' ');
        }
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{cmd} {} {}", p.x, p.y));
    }
    d
}

fn to_rough_point(p: DVec2) -> euclid::default::Point2D<f64> {
    roughr::Point2D::new(p.x, p.y)
}

fn to_rough_fill_style(style: FillStyle) -> roughr::core::FillStyle {
    match style {
        FillStyle::Hachure => roughr::core::FillStyle::Hachure,
        FillStyle::CrossHatch => roughr::core::FillStyle::CrossHatch,
        FillStyle::Solid => roughr::core::FillStyle::Solid,
        FillStyle::ZigZag => roughr::core::FillStyle::ZigZag,
    }
}

/// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` into an sRGBA color
pub fn parse_hex_color(s: &str) -> Option<roughr::Srgba> {
    let hex = s.trim().strip_prefix('#')?;
    let channel = |range: std::ops::Range<usize>, short: bool| -> Option<f32> {
        let digits = hex.get(range)?;
        let digits = if short { digits.repeat(2) } else { digits.to_string() };
        u8::from_str_radix(&digits, 16).ok().map(|v| v as f32 / 255.0)
    };
    let (r, g, b, a) = match hex.len() {
        3 => (channel(0..1, true)?, channel(1..2, true)?, channel(2..3, true)?, 1.0),
        4 => (
            channel(0..1, true)?,
            channel(1..2, true)?,
            channel(2..3, true)?,
            channel(3..4, true)?,
        ),
        6 => (channel(0..2, false)?, channel(2..4, false)?, channel(4..6, false)?, 1.0),
        8 => (
            channel(0..2, false)?,
            channel(2..4, false)?,
            channel(4..6, false)?,
            channel(6..8, false)?,
        ),
        _ => return None,
    };
    Some(roughr::Srgba::new(r, g, b, a))
}

fn to_rough_options(options: &SketchOptions) -> Options {
    let mut builder = OptionsBuilder::default();
    builder
        .seed(options.seed)
        .roughness(options.roughness as f32)
        .stroke_width(options.stroke_width as f32)
        .fill_weight(options.fill_weight as f32)
        .hachure_gap(options.hachure_gap as f32)
        .disable_multi_stroke(options.disable_multi_stroke)
        .disable_multi_stroke_fill(options.disable_multi_stroke_fill)
        .preserve_vertices(options.preserve_vertices);

    if let Some(curve_fitting) = options.curve_fitting {
        builder.curve_fitting(curve_fitting as f32);
    }
    if let Some(dash) = options.stroke_line_dash {
        builder.stroke_line_dash(dash.to_vec());
    }
    if let Some(stroke) = options.stroke.as_deref().and_then(parse_hex_color) {
        builder.stroke(stroke);
    }
    if let Some(fill) = options.fill.as_deref().and_then(parse_hex_color) {
        builder.fill(fill);
    }
    if let Some(style) = options.fill_style {
        builder.fill_style(to_rough_fill_style(style));
    }

    match builder.build() {
        Ok(rough) => rough,
        Err(err) => {
            warn!(error = %err, "invalid sketch options, using generator defaults");
            let mut fallback = Options::default();
            fallback.seed = Some(options.seed);
            fallback.roughness = Some(options.roughness as f32);
            fallback
        }
    }
}

fn from_rough_op(op: &Op<f64>) -> Option<PathOp> {
    match (&op.op, op.data.as_slice()) {
        (OpType::Move, [x, y, ..]) => Some(PathOp::Move(dvec2(*x, *y))),
        (OpType::LineTo, [x, y, ..]) => Some(PathOp::LineTo(dvec2(*x, *y))),
        (OpType::BCurveTo, [x1, y1, x2, y2, x, y, ..]) => Some(PathOp::BCurveTo {
            cp1: dvec2(*x1, *y1),
            cp2: dvec2(*x2, *y2),
            to: dvec2(*x, *y),
        }),
        _ => None,
    }
}

fn from_rough_set(set: &RoughOpSet<f64>) -> OpSet {
    OpSet {
        kind: match set.op_set_type {
            OpSetType::Path => OpSetKind::Path,
            OpSetType::FillPath => OpSetKind::FillPath,
            OpSetType::FillSketch => OpSetKind::FillSketch,
        },
        ops: set.ops.iter().filter_map(from_rough_op).collect(),
    }
}
