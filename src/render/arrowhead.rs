//! Arrowhead geometry derived from the terminal segment of a rendered line.
//!
//! The approach direction comes from the body's sketched ops rather than the
//! raw points, so heads follow the drawn (possibly curved) stroke.

use glam::{DVec2, dvec2};

use crate::element::{Arrowhead, ArrowheadPosition, Element, StrokeStyle};
use crate::sketch::SketchGenerator;
use crate::types::{Drawable, PathOp, rotate_point};

use super::options::{SketchOptions, dash_array_dotted};

/// Curve parameter used to sample a point just behind the tip
const APPROACH_T: f64 = 0.3;

/// Resolved arrowhead geometry, in the element's local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowheadPoints {
    Circle { center: DVec2, diameter: f64 },
    /// Two wings that meet at `tip`
    Wings { tip: DVec2, left: DVec2, right: DVec2 },
    Diamond {
        tip: DVec2,
        left: DVec2,
        opposite: DVec2,
        right: DVec2,
    },
}

pub fn arrowhead_size(arrowhead: Arrowhead) -> f64 {
    match arrowhead {
        Arrowhead::Arrow => 25.0,
        Arrowhead::Diamond | Arrowhead::DiamondOutline => 12.0,
        Arrowhead::CrowfootOne | Arrowhead::CrowfootMany | Arrowhead::CrowfootOneOrMany => 20.0,
        _ => 15.0,
    }
}

/// Half-opening of the head, in degrees
pub fn arrowhead_angle(arrowhead: Arrowhead) -> f64 {
    match arrowhead {
        Arrowhead::Bar => 90.0,
        Arrowhead::Arrow => 20.0,
        _ => 25.0,
    }
}

/// Terminal cubic of the body as `(p0, cp1, cp2, p3)`
fn terminal_cubic(
    ops: &[PathOp],
    position: ArrowheadPosition,
) -> Option<(DVec2, DVec2, DVec2, DVec2)> {
    let index = match position {
        ArrowheadPosition::Start => 1,
        ArrowheadPosition::End => ops.len().checked_sub(1)?,
    };
    let prev = ops.get(index.checked_sub(1)?)?;
    let p0 = prev.end_point();

    let (p1, p2, p3) = match *ops.get(index)? {
        PathOp::BCurveTo { cp1, cp2, to } => (cp1, cp2, to),
        PathOp::LineTo(to) => (p0, to, to),
        PathOp::Move(to) => (to, to, to),
    };
    Some((p0, p1, p2, p3))
}

/// Compute head geometry for one end of a line
///
/// Returns `None` for degenerate lines: fewer than two points, a body with
/// fewer than two ops, or a zero-length approach direction.
pub fn arrowhead_points(
    element: &Element,
    body: &[Drawable],
    position: ArrowheadPosition,
    arrowhead: Arrowhead,
) -> Option<ArrowheadPoints> {
    let points = element.points()?;
    if points.len() < 2 {
        return None;
    }
    let ops = body.first()?.path_ops();
    let (p0, p1, p2, p3) = terminal_cubic(ops, position)?;

    // weights run from p3 back to p0, so t=0.3 lands near p3
    let u = 1.0 - APPROACH_T;
    let t = APPROACH_T;
    let approach =
        p3 * (u * u * u) + p2 * (3.0 * t * u * u) + p1 * (3.0 * t * t * u) + p0 * (t * t * t);

    let tip = match position {
        ArrowheadPosition::Start => p0,
        ArrowheadPosition::End => p3,
    };
    let distance = tip.distance(approach);
    if !distance.is_finite() || distance <= f64::EPSILON {
        return None;
    }
    let direction = (tip - approach) / distance;

    let (end, neighbour) = match position {
        ArrowheadPosition::Start => (points[0], points[1]),
        ArrowheadPosition::End => (points[points.len() - 1], points[points.len() - 2]),
    };
    let segment_length = end.distance(neighbour);

    let length_multiplier = match arrowhead {
        Arrowhead::Diamond | Arrowhead::DiamondOutline => 0.25,
        _ => 0.5,
    };
    let min_size = arrowhead_size(arrowhead).min(segment_length * length_multiplier);
    let back = tip - direction * min_size;

    if matches!(arrowhead, Arrowhead::Dot | Arrowhead::Circle | Arrowhead::CircleOutline) {
        let diameter = back.distance(tip) + element.stroke_width - 2.0;
        return Some(ArrowheadPoints::Circle {
            center: tip,
            diameter,
        });
    }

    let angle = arrowhead_angle(arrowhead).to_radians();

    if matches!(arrowhead, Arrowhead::CrowfootMany | Arrowhead::CrowfootOneOrMany) {
        // the fan opens toward the tip, so the wings meet behind it
        return Some(ArrowheadPoints::Wings {
            tip: back,
            left: rotate_point(tip, back, -angle),
            right: rotate_point(tip, back, angle),
        });
    }

    let left = rotate_point(back, tip, -angle);
    let right = rotate_point(back, tip, angle);

    if matches!(arrowhead, Arrowhead::Diamond | Arrowhead::DiamondOutline) {
        let opposite = match position {
            ArrowheadPosition::Start => {
                let p = points[1];
                rotate_point(
                    dvec2(tip.x + min_size * 2.0, tip.y),
                    tip,
                    (p.y - tip.y).atan2(p.x - tip.x),
                )
            }
            ArrowheadPosition::End => {
                let p = points[points.len() - 2];
                rotate_point(
                    dvec2(tip.x - min_size * 2.0, tip.y),
                    tip,
                    (tip.y - p.y).atan2(tip.x - p.x),
                )
            }
        };
        return Some(ArrowheadPoints::Diamond {
            tip,
            left,
            opposite,
            right,
        });
    }

    Some(ArrowheadPoints::Wings { tip, left, right })
}

/// Build the drawables for one arrowhead
///
/// `options` are the body's options; every adjustment here yields a new value,
/// so resolving one end never affects the other.
pub fn arrowhead_shapes(
    element: &Element,
    body: &[Drawable],
    position: ArrowheadPosition,
    arrowhead: Arrowhead,
    generator: &dyn SketchGenerator,
    options: &SketchOptions,
    canvas_background_color: &str,
) -> Vec<Drawable> {
    let Some(points) = arrowhead_points(element, body, position, arrowhead) else {
        return Vec::new();
    };

    let head_fill = if arrowhead.is_outline() {
        canvas_background_color
    } else {
        element.stroke_color.as_str()
    };

    match (arrowhead, points) {
        (_, ArrowheadPoints::Circle { center, diameter }) => {
            let circle_options = options
                .without_dash()
                .with_solid_fill(head_fill)
                .with_stroke(Some(element.stroke_color.clone()))
                .with_roughness_at_most(0.5);
            vec![generator.circle(center.x, center.y, diameter, &circle_options)]
        }
        (
            _,
            ArrowheadPoints::Diamond {
                tip,
                left,
                opposite,
                right,
            },
        ) => {
            let polygon_options = options
                .without_dash()
                .with_solid_fill(head_fill)
                .with_roughness_at_most(1.0);
            vec![generator.polygon(&[tip, left, opposite, right, tip], &polygon_options)]
        }
        (
            Arrowhead::Triangle | Arrowhead::TriangleOutline,
            ArrowheadPoints::Wings { tip, left, right },
        ) => {
            let polygon_options = options
                .without_dash()
                .with_solid_fill(head_fill)
                .with_roughness_at_most(1.0);
            vec![generator.polygon(&[tip, left, right, tip], &polygon_options)]
        }
        (Arrowhead::CrowfootOne, ArrowheadPoints::Wings { left, right, .. }) => {
            vec![generator.line(left, right, options)]
        }
        (_, ArrowheadPoints::Wings { tip, left, right }) => {
            let dashed = if element.stroke_style == StrokeStyle::Dotted {
                let [dot, gap] = dash_array_dotted(element.stroke_width - 1.0);
                options.with_dash([dot, gap - 1.0])
            } else {
                options.without_dash()
            };
            let wing_options = dashed.with_roughness_at_most(1.0);

            let mut shapes = vec![
                generator.line(left, tip, &wing_options),
                generator.line(right, tip, &wing_options),
            ];
            if arrowhead == Arrowhead::CrowfootOneOrMany {
                // the bar is resolved on its own; its geometry differs from the fan's
                shapes.extend(arrowhead_shapes(
                    element,
                    body,
                    position,
                    Arrowhead::CrowfootOne,
                    generator,
                    &wing_options,
                    canvas_background_color,
                ));
            }
            shapes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ArrowData, ElementKind};
    use crate::sketch::RoughGenerator;
    use crate::types::{OpSet, OpSetKind, Primitive};

    const ALL: [Arrowhead; 12] = [
        Arrowhead::Arrow,
        Arrowhead::Bar,
        Arrowhead::Dot,
        Arrowhead::Circle,
        Arrowhead::CircleOutline,
        Arrowhead::Triangle,
        Arrowhead::TriangleOutline,
        Arrowhead::Diamond,
        Arrowhead::DiamondOutline,
        Arrowhead::CrowfootOne,
        Arrowhead::CrowfootMany,
        Arrowhead::CrowfootOneOrMany,
    ];

    fn assert_point_eq(actual: DVec2, expected: DVec2) {
        const EPSILON: f64 = 1e-9;
        assert!(
            (actual - expected).length() < EPSILON,
            "point mismatch: {actual:?} != {expected:?}"
        );
    }

    fn arrow(points: Vec<DVec2>) -> Element {
        Element::new(
            "a",
            ElementKind::Arrow(ArrowData {
                points,
                ..ArrowData::default()
            }),
        )
    }

    /// Straight body from (0, 0) to (100, 0) as one cubic
    fn straight_body() -> Vec<Drawable> {
        vec![Drawable {
            shape: Primitive::LinearPath(vec![DVec2::ZERO, dvec2(100.0, 0.0)]),
            options: SketchOptions::precise(1),
            sets: vec![OpSet {
                kind: OpSetKind::Path,
                ops: vec![
                    PathOp::Move(DVec2::ZERO),
                    PathOp::BCurveTo {
                        cp1: dvec2(30.0, 0.0),
                        cp2: dvec2(70.0, 0.0),
                        to: dvec2(100.0, 0.0),
                    },
                ],
            }],
        }]
    }

    #[test]
    fn degenerate_lines_have_no_heads() {
        let generator = RoughGenerator::new();
        let single = arrow(vec![DVec2::ZERO]);
        let empty = arrow(vec![]);
        for head in ALL {
            for position in [ArrowheadPosition::Start, ArrowheadPosition::End] {
                assert_eq!(arrowhead_points(&single, &straight_body(), position, head), None);
                assert_eq!(arrowhead_points(&empty, &[], position, head), None);
                assert!(
                    arrowhead_shapes(
                        &single,
                        &straight_body(),
                        position,
                        head,
                        &generator,
                        &SketchOptions::default(),
                        "#ffffff",
                    )
                    .is_empty()
                );
            }
        }
    }

    #[test]
    fn body_without_ops_has_no_heads() {
        let el = arrow(vec![DVec2::ZERO, dvec2(100.0, 0.0)]);
        let mut body = straight_body();
        body[0].sets.clear();
        assert_eq!(arrowhead_points(&el, &body, ArrowheadPosition::End, Arrowhead::Arrow), None);
    }

    #[test]
    fn end_arrow_wings() {
        let el = arrow(vec![DVec2::ZERO, dvec2(100.0, 0.0)]);
        let Some(ArrowheadPoints::Wings { tip, left, right }) =
            arrowhead_points(&el, &straight_body(), ArrowheadPosition::End, Arrowhead::Arrow)
        else {
            panic!("expected wings");
        };
        let (sin, cos) = 20f64.to_radians().sin_cos();
        assert_point_eq(tip, dvec2(100.0, 0.0));
        assert_point_eq(left, dvec2(100.0 - 25.0 * cos, 25.0 * sin));
        assert_point_eq(right, dvec2(100.0 - 25.0 * cos, -25.0 * sin));
    }

    #[test]
    fn start_arrow_points_backwards() {
        let el = arrow(vec![DVec2::ZERO, dvec2(100.0, 0.0)]);
        let Some(ArrowheadPoints::Wings { tip, left, .. }) =
            arrowhead_points(&el, &straight_body(), ArrowheadPosition::Start, Arrowhead::Bar)
        else {
            panic!("expected wings");
        };
        assert_point_eq(tip, DVec2::ZERO);
        // a bar is perpendicular to the line
        assert!((left.x).abs() < 1e-9);
        assert!((left.y.abs() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn head_shrinks_on_short_segments() {
        let el = arrow(vec![DVec2::ZERO, dvec2(20.0, 0.0)]);
        let mut body = straight_body();
        body[0].sets[0].ops[1] = PathOp::BCurveTo {
            cp1: dvec2(6.0, 0.0),
            cp2: dvec2(14.0, 0.0),
            to: dvec2(20.0, 0.0),
        };
        let Some(ArrowheadPoints::Circle { diameter, .. }) =
            arrowhead_points(&el, &body, ArrowheadPosition::End, Arrowhead::Dot)
        else {
            panic!("expected circle");
        };
        // half of the 20px segment, plus stroke width 2 minus 2
        assert!((diameter - 10.0).abs() < 1e-9);
    }

    #[test]
    fn diamond_has_opposite_point() {
        let el = arrow(vec![DVec2::ZERO, dvec2(100.0, 0.0)]);
        let Some(ArrowheadPoints::Diamond { tip, opposite, .. }) =
            arrowhead_points(&el, &straight_body(), ArrowheadPosition::End, Arrowhead::Diamond)
        else {
            panic!("expected diamond");
        };
        assert_point_eq(tip, dvec2(100.0, 0.0));
        assert_point_eq(opposite, dvec2(76.0, 0.0));
    }

    #[test]
    fn crowfoot_many_meets_behind_tip() {
        let el = arrow(vec![DVec2::ZERO, dvec2(100.0, 0.0)]);
        let Some(ArrowheadPoints::Wings { tip, left, right }) =
            arrowhead_points(&el, &straight_body(), ArrowheadPosition::End, Arrowhead::CrowfootMany)
        else {
            panic!("expected wings");
        };
        assert_point_eq(tip, dvec2(80.0, 0.0));
        assert!(left.x > 95.0 && right.x > 95.0);
    }

    #[test]
    fn shape_counts_per_kind() {
        let generator = RoughGenerator::new();
        let el = arrow(vec![DVec2::ZERO, dvec2(100.0, 0.0)]);
        let options = SketchOptions::precise(3);
        let count = |head| {
            arrowhead_shapes(
                &el,
                &straight_body(),
                ArrowheadPosition::End,
                head,
                &generator,
                &options,
                "#ffffff",
            )
            .len()
        };
        assert_eq!(count(Arrowhead::Arrow), 2);
        assert_eq!(count(Arrowhead::Bar), 2);
        assert_eq!(count(Arrowhead::CrowfootOne), 1);
        assert_eq!(count(Arrowhead::CrowfootMany), 2);
        assert_eq!(count(Arrowhead::CrowfootOneOrMany), 3);
        assert_eq!(count(Arrowhead::Triangle), 1);
        assert_eq!(count(Arrowhead::Circle), 1);
    }

    #[test]
    fn solid_heads_clear_dash_and_pick_fill() {
        let generator = RoughGenerator::new();
        let el = arrow(vec![DVec2::ZERO, dvec2(100.0, 0.0)]).with_stroke_color("#e03131");
        let options = SketchOptions {
            roughness: 2.0,
            stroke_line_dash: Some([8.0, 10.0]),
            ..SketchOptions::precise(3)
        };

        let outline = arrowhead_shapes(
            &el,
            &straight_body(),
            ArrowheadPosition::End,
            Arrowhead::CircleOutline,
            &generator,
            &options,
            "#fafafa",
        );
        assert_eq!(outline[0].options.fill.as_deref(), Some("#fafafa"));
        assert_eq!(outline[0].options.stroke_line_dash, None);
        assert_eq!(outline[0].options.roughness, 0.5);

        let solid = arrowhead_shapes(
            &el,
            &straight_body(),
            ArrowheadPosition::End,
            Arrowhead::Triangle,
            &generator,
            &options,
            "#fafafa",
        );
        assert_eq!(solid[0].options.fill.as_deref(), Some("#e03131"));
        assert_eq!(solid[0].options.roughness, 1.0);
        assert!(matches!(&solid[0].shape, Primitive::Polygon(p) if p.len() == 4));

        // the caller's options are untouched
        assert_eq!(options.stroke_line_dash, Some([8.0, 10.0]));
        assert_eq!(options.roughness, 2.0);
    }

    #[test]
    fn dotted_wings_use_tight_dots() {
        let generator = RoughGenerator::new();
        let el = arrow(vec![DVec2::ZERO, dvec2(100.0, 0.0)]).with_stroke_style(StrokeStyle::Dotted);
        let shapes = arrowhead_shapes(
            &el,
            &straight_body(),
            ArrowheadPosition::End,
            Arrowhead::Arrow,
            &generator,
            &SketchOptions::precise(3),
            "#ffffff",
        );
        assert!(shapes.iter().all(|s| s.options.stroke_line_dash == Some([1.5, 6.0])));
    }
}
