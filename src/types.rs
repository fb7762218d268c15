//! Core value types: sketch ops, drawable primitives and render geometry.

use glam::DVec2;

use crate::render::options::SketchOptions;

/// A single drawing instruction emitted by the sketch generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    Move(DVec2),
    LineTo(DVec2),
    BCurveTo { cp1: DVec2, cp2: DVec2, to: DVec2 },
}

impl PathOp {
    /// The point the pen ends up at after this op
    pub fn end_point(&self) -> DVec2 {
        match *self {
            PathOp::Move(p) | PathOp::LineTo(p) => p,
            PathOp::BCurveTo { to, .. } => to,
        }
    }

    /// Apply `f` to every point carried by this op
    pub fn map_points(&self, f: impl Fn(DVec2) -> DVec2) -> PathOp {
        match *self {
            PathOp::Move(p) => PathOp::Move(f(p)),
            PathOp::LineTo(p) => PathOp::LineTo(f(p)),
            PathOp::BCurveTo { cp1, cp2, to } => PathOp::BCurveTo {
                cp1: f(cp1),
                cp2: f(cp2),
                to: f(to),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpSetKind {
    /// Stroke outline
    Path,
    /// Solid fill area
    FillPath,
    /// Hachure-style fill strokes
    FillSketch,
}

/// A group of ops painted with the same stroke/fill treatment
#[derive(Debug, Clone, PartialEq)]
pub struct OpSet {
    pub kind: OpSetKind,
    pub ops: Vec<PathOp>,
}

/// The precise geometry a drawable was generated from
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rectangle { x: f64, y: f64, width: f64, height: f64 },
    /// Ellipse centered at (`cx`, `cy`) with full width and height
    Ellipse { cx: f64, cy: f64, width: f64, height: f64 },
    Circle { cx: f64, cy: f64, diameter: f64 },
    Line { from: DVec2, to: DVec2 },
    LinearPath(Vec<DVec2>),
    Polygon(Vec<DVec2>),
    Curve(Vec<DVec2>),
    /// SVG path description
    Path(String),
}

impl Primitive {
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Rectangle { .. } => "rectangle",
            Primitive::Ellipse { .. } => "ellipse",
            Primitive::Circle { .. } => "circle",
            Primitive::Line { .. } => "line",
            Primitive::LinearPath(_) => "linearPath",
            Primitive::Polygon(_) => "polygon",
            Primitive::Curve(_) => "curve",
            Primitive::Path(_) => "path",
        }
    }
}

/// One unit of render geometry: what to draw, how, and the sketchy ops
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub shape: Primitive,
    pub options: SketchOptions,
    pub sets: Vec<OpSet>,
}

impl Drawable {
    /// Ops of the stroke outline, the set curve-based consumers read
    pub fn path_ops(&self) -> &[PathOp] {
        self.sets
            .iter()
            .find(|set| set.kind == OpSetKind::Path)
            .map(|set| set.ops.as_slice())
            .unwrap_or(&[])
    }
}

/// Cached render geometry of an element
///
/// `Empty` is a computed result ("nothing to draw for this element"), which
/// is distinct from the cache not holding an entry at all.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementShape {
    Empty,
    Single(Drawable),
    Many(Vec<Drawable>),
}

impl ElementShape {
    pub fn drawables(&self) -> &[Drawable] {
        match self {
            ElementShape::Empty => &[],
            ElementShape::Single(d) => std::slice::from_ref(d),
            ElementShape::Many(ds) => ds,
        }
    }

    /// The body primitive; for lines and arrows this is always the first drawable
    pub fn primary(&self) -> Option<&Drawable> {
        self.drawables().first()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables().is_empty()
    }
}

/// Rotate `point` around `center` by `angle` radians
pub fn rotate_point(point: DVec2, center: DVec2, angle: f64) -> DVec2 {
    if angle == 0.0 {
        return point;
    }
    let (sin, cos) = angle.sin_cos();
    let d = point - center;
    center + DVec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Evaluate a cubic bezier at `t`
pub fn cubic_point(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}
