//! Hit-test geometry derived from elements and their cached render geometry.
//!
//! Collision shapes live in absolute scene coordinates with the element's
//! rotation already applied, so callers test raw pointer positions.

use std::rc::Rc;

use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};

use crate::cache::ShapeCache;
use crate::config::ShapeConfig;
use crate::element::{Element, ElementKind, ElementsMap};
use crate::errors::ShapeError;
use crate::render::SketchOptions;
use crate::render::geometry::DiamondPoints;
use crate::render::path_builder::elbow_path;
use crate::simplify::{PathSimplifier, point_segment_distance};
use crate::sketch::SketchGenerator;
use crate::types::{PathOp, cubic_point, rotate_point};

/// Samples per cubic segment when flattening curves
const CURVE_FLATTEN_STEPS: usize = 16;

/// Point queries shared by all collision shapes
#[enum_dispatch]
pub trait HitTest {
    /// Whether `point` lies in the shape's interior; open shapes have none
    fn contains(&self, point: DVec2) -> bool;

    /// Distance from `point` to the shape's outline
    fn distance_to(&self, point: DVec2) -> f64;

    fn hit(&self, point: DVec2, threshold: f64) -> bool {
        self.contains(point) || self.distance_to(point) <= threshold
    }
}

/// Closed vertex loop
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub points: Vec<DVec2>,
}

impl PolygonShape {
    pub fn new(points: Vec<DVec2>) -> Self {
        Self { points }
    }
}

impl HitTest for PolygonShape {
    fn contains(&self, point: DVec2) -> bool {
        winding_number(&self.points, point) != 0
    }

    fn distance_to(&self, point: DVec2) -> f64 {
        outline_distance(&self.points, true, point)
    }
}

/// Rotated ellipse given by center and half axes
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseShape {
    pub center: DVec2,
    pub half_width: f64,
    pub half_height: f64,
    pub angle: f64,
}

impl EllipseShape {
    fn to_local(&self, point: DVec2) -> DVec2 {
        rotate_point(point, self.center, -self.angle) - self.center
    }
}

impl HitTest for EllipseShape {
    fn contains(&self, point: DVec2) -> bool {
        let (a, b) = (self.half_width, self.half_height);
        if a <= 0.0 || b <= 0.0 {
            return false;
        }
        let p = self.to_local(point);
        (p.x / a).powi(2) + (p.y / b).powi(2) <= 1.0
    }

    fn distance_to(&self, point: DVec2) -> f64 {
        let p = self.to_local(point);
        p.distance(closest_on_ellipse(p, self.half_width, self.half_height))
    }
}

/// Cubic segments grouped into subpaths, one per pen lift
#[derive(Debug, Clone, PartialEq)]
pub struct CurveShape {
    pub subpaths: Vec<Vec<[DVec2; 4]>>,
    /// Closed curves contain their interior
    pub closed: bool,
}

impl CurveShape {
    /// Group ops into cubic subpaths; lines become degenerate cubics
    pub fn from_ops(ops: &[PathOp], closed: bool) -> Self {
        let mut subpaths: Vec<Vec<[DVec2; 4]>> = Vec::new();
        let mut current = Vec::new();
        let mut pen = DVec2::ZERO;

        for op in ops {
            match *op {
                PathOp::Move(to) => {
                    if !current.is_empty() {
                        subpaths.push(std::mem::take(&mut current));
                    }
                    pen = to;
                }
                PathOp::LineTo(to) => {
                    current.push([pen, pen, to, to]);
                    pen = to;
                }
                PathOp::BCurveTo { cp1, cp2, to } => {
                    current.push([pen, cp1, cp2, to]);
                    pen = to;
                }
            }
        }
        if !current.is_empty() {
            subpaths.push(current);
        }

        Self { subpaths, closed }
    }

    fn flattened(&self) -> impl Iterator<Item = Vec<DVec2>> + '_ {
        self.subpaths.iter().map(|segments| flatten_cubics(segments))
    }
}

impl HitTest for CurveShape {
    fn contains(&self, point: DVec2) -> bool {
        if !self.closed {
            return false;
        }
        // sketchy strokes lift the pen at every edge; the interior is the whole trace
        let outline: Vec<DVec2> = self.flattened().flatten().collect();
        winding_number(&outline, point) != 0
    }

    fn distance_to(&self, point: DVec2) -> f64 {
        self.flattened()
            .map(|outline| outline_distance(&outline, false, point))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Freehand stroke as a polyline, or its outline when closed
#[derive(Debug, Clone, PartialEq)]
pub struct FreehandShape {
    pub points: Vec<DVec2>,
    pub closed: bool,
}

impl HitTest for FreehandShape {
    fn contains(&self, point: DVec2) -> bool {
        self.closed && winding_number(&self.points, point) != 0
    }

    fn distance_to(&self, point: DVec2) -> f64 {
        outline_distance(&self.points, self.closed, point)
    }
}

#[enum_dispatch(HitTest)]
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    Polygon(PolygonShape),
    Ellipse(EllipseShape),
    Curve(CurveShape),
    Freehand(FreehandShape),
}

/// Build the hit-test shape of an element in scene coordinates
///
/// Lines and arrows reuse the cached render geometry (generating it on a
/// miss). Container offsets resolve through `elements`.
pub fn resolve_collision_shape(
    element: &Rc<Element>,
    elements: &ElementsMap,
    cache: &mut ShapeCache,
) -> Result<CollisionShape, ShapeError> {
    let origin = element.absolute_origin(elements);
    let center = element.absolute_center(elements);
    let to_scene = |p: DVec2| rotate_point(origin + p, center, element.angle);

    let shape = match &element.kind {
        ElementKind::Rectangle
        | ElementKind::Iframe
        | ElementKind::Embeddable
        | ElementKind::Frame
        | ElementKind::MagicFrame
        | ElementKind::Text
        | ElementKind::Image
        | ElementKind::Selection
        | ElementKind::Cube(_)
        | ElementKind::RectangularPrism(_) => {
            let (w, h) = (element.width, element.height);
            let corners = [DVec2::ZERO, dvec2(w, 0.0), dvec2(w, h), dvec2(0.0, h)];
            PolygonShape::new(corners.into_iter().map(to_scene).collect()).into()
        }
        ElementKind::Diamond => {
            let corners = DiamondPoints::new(element.width, element.height).to_vec();
            PolygonShape::new(corners.into_iter().map(to_scene).collect()).into()
        }
        ElementKind::Ellipse => EllipseShape {
            center,
            half_width: element.width / 2.0,
            half_height: element.height / 2.0,
            angle: element.angle,
        }
        .into(),
        ElementKind::Line(_) | ElementKind::Arrow(_) => {
            let geometry = cache.get_or_generate(element, None)?;
            let ops: Vec<PathOp> = geometry
                .primary()
                .map(|body| body.path_ops().iter().map(|op| op.map_points(to_scene)).collect())
                .unwrap_or_default();
            CurveShape::from_ops(&ops, element.should_test_inside()).into()
        }
        ElementKind::Freedraw(_) => FreehandShape {
            points: element.points_or_origin().into_iter().map(to_scene).collect(),
            closed: element.should_test_inside(),
        }
        .into(),
    };

    crate::log::debug!(element_id = %element.id, "resolved collision shape");
    Ok(shape)
}

/// Precise, rotated ops of a line-like element in its local frame
///
/// Used for snapping and routing previews. Always regenerates with zero
/// roughness and never touches a [`ShapeCache`]. Non-linear elements yield
/// no ops.
pub fn linear_collision_ops(
    element: &Element,
    generator: &dyn SketchGenerator,
    simplifier: &dyn PathSimplifier,
    config: &ShapeConfig,
) -> Vec<PathOp> {
    let options = SketchOptions::precise(element.seed);
    let offset = dvec2(element.x, element.y);
    let center = element.absolute_center(&ElementsMap::default());
    let rotate_local = |p: DVec2| rotate_point(p + offset, center, element.angle) - offset;

    match &element.kind {
        ElementKind::Line(_) | ElementKind::Arrow(_) => {
            let points = element.points_or_origin();
            if element.is_elbow_arrow() {
                let path = elbow_path(&points, config.elbow_corner_radius);
                generator.path(&path.to_string(), &options).path_ops().to_vec()
            } else if element.roundness.is_none() {
                points
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let p = rotate_local(*p);
                        if i == 0 { PathOp::Move(p) } else { PathOp::LineTo(p) }
                    })
                    .collect()
            } else {
                generator
                    .curve(&points, &options)
                    .path_ops()
                    .iter()
                    .take(points.len())
                    .map(|op| op.map_points(rotate_local))
                    .collect()
            }
        }
        ElementKind::Freedraw(data) => {
            if data.points.len() < 2 {
                return Vec::new();
            }
            let simplified = simplifier.simplify(&data.points, config.freedraw_simplify_tolerance);
            generator
                .curve(&simplified, &options)
                .path_ops()
                .iter()
                .take(data.points.len())
                .map(|op| op.map_points(rotate_local))
                .collect()
        }
        _ => Vec::new(),
    }
}

fn flatten_cubics(segments: &[[DVec2; 4]]) -> Vec<DVec2> {
    let mut points = Vec::with_capacity(segments.len() * CURVE_FLATTEN_STEPS + 1);
    for (index, &[p0, p1, p2, p3]) in segments.iter().enumerate() {
        if index == 0 {
            points.push(p0);
        }
        for step in 1..=CURVE_FLATTEN_STEPS {
            let t = step as f64 / CURVE_FLATTEN_STEPS as f64;
            points.push(cubic_point(p0, p1, p2, p3, t));
        }
    }
    points
}

/// Non-zero winding number of `point` against the loop through `points`
fn winding_number(points: &[DVec2], point: DVec2) -> i32 {
    if points.len() < 3 {
        return 0;
    }
    let mut winding = 0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let cross = (b - *a).perp_dot(point - *a);
        if a.y <= point.y {
            if b.y > point.y && cross > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && cross < 0.0 {
            winding -= 1;
        }
    }
    winding
}

fn outline_distance(points: &[DVec2], closed: bool, point: DVec2) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => only.distance(point),
        _ => {
            let open = points.windows(2).map(|w| point_segment_distance(point, w[0], w[1]));
            let closing = closed
                .then(|| point_segment_distance(point, points[points.len() - 1], points[0]));
            open.chain(closing).fold(f64::INFINITY, f64::min)
        }
    }
}

/// Closest point on an axis-aligned ellipse centered at the origin
///
/// Iterates on the evolute, which converges in a handful of steps for any
/// eccentricity.
fn closest_on_ellipse(p: DVec2, a: f64, b: f64) -> DVec2 {
    if a <= 0.0 || b <= 0.0 {
        // degenerate ellipses collapse to a segment
        let half = dvec2(a.max(0.0), b.max(0.0));
        let t = p.clamp(-half, half);
        return if a <= 0.0 { dvec2(0.0, t.y) } else { dvec2(t.x, 0.0) };
    }

    let (px, py) = (p.x.abs(), p.y.abs());
    let mut t = DVec2::splat(std::f64::consts::FRAC_1_SQRT_2);
    for _ in 0..4 {
        let x = a * t.x;
        let y = b * t.y;
        let ex = (a * a - b * b) * t.x.powi(3) / a;
        let ey = (b * b - a * a) * t.y.powi(3) / b;
        let r = dvec2(x - ex, y - ey).length();
        let q = dvec2(px - ex, py - ey);
        let q_len = q.length();
        if q_len <= f64::EPSILON {
            break;
        }
        t = dvec2(
            ((q.x * r / q_len + ex) / a).clamp(0.0, 1.0),
            ((q.y * r / q_len + ey) / b).clamp(0.0, 1.0),
        );
        t = t.normalize_or(DVec2::splat(std::f64::consts::FRAC_1_SQRT_2));
    }
    dvec2((a * t.x).copysign(p.x), (b * t.y).copysign(p.y))
}
