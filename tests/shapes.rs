//! End-to-end checks: element in, cached geometry and hit-test shapes out.
//!
//! Run with logging: cargo test --features tracing --test shapes -- --nocapture

use std::rc::Rc;

use glam::{DVec2, dvec2};
use sketch_shapes::element::{ArrowData, BoxData, FreedrawData, LinearData, StrokeStyle};
use sketch_shapes::types::OpSetKind;
use sketch_shapes::{
    CollisionShape, Element, ElementKind, ElementShape, ElementsMap, HitTest, Primitive,
    RenderContext, Roundness, ShapeCache, ShapeError, generate_shape, resolve_collision_shape,
    toggle_line_polygon_state,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn many(shape: &ElementShape) -> &[sketch_shapes::Drawable] {
    match shape {
        ElementShape::Many(drawables) => drawables,
        other => panic!("expected many drawables, got {other:?}"),
    }
}

// =============================================================================
// Generation
// =============================================================================

#[test]
fn rectangle_without_roundness_is_a_rectangle_primitive() {
    init_tracing();
    let rect = Element::new("r", ElementKind::Rectangle).with_size(100.0, 60.0);
    let shape = generate_shape(&rect, &RenderContext::default()).unwrap();
    let ElementShape::Single(drawable) = shape else {
        panic!("expected a single drawable");
    };
    assert_eq!(drawable.shape.name(), "rectangle");
    assert!(!drawable.sets.is_empty());
}

#[test]
fn rounded_rectangle_is_a_path_with_four_quadratic_corners() {
    let rect = Element::new("r", ElementKind::Rectangle)
        .with_size(100.0, 60.0)
        .with_roundness(Roundness::adaptive(None));
    let shape = generate_shape(&rect, &RenderContext::default()).unwrap();
    let Some(Primitive::Path(d)) = shape.primary().map(|d| &d.shape) else {
        panic!("expected a path primitive");
    };
    assert_eq!(d.matches('Q').count(), 4);
}

#[test]
fn default_fill_style_is_hatched() {
    let rect = Element::new("r", ElementKind::Rectangle)
        .with_size(100.0, 60.0)
        .with_background("#a5d8ff");
    let shape = generate_shape(&rect, &RenderContext::default()).unwrap();
    let kinds: Vec<OpSetKind> = shape.primary().unwrap().sets.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, [OpSetKind::FillSketch, OpSetKind::Path]);
}

#[test]
fn dashed_stroke_widens_and_dashes() {
    let rect = Element::new("r", ElementKind::Rectangle)
        .with_size(100.0, 60.0)
        .with_stroke_style(StrokeStyle::Dashed);
    let shape = generate_shape(&rect, &RenderContext::default()).unwrap();
    let options = &shape.primary().unwrap().options;
    assert_eq!(options.stroke_line_dash, Some([8.0, 10.0]));
    assert_eq!(options.stroke_width, 2.5);
    assert!(options.disable_multi_stroke);
}

#[test]
fn arrow_with_both_heads() {
    let arrow = Element::new(
        "a",
        ElementKind::Arrow(ArrowData {
            points: vec![DVec2::ZERO, dvec2(150.0, 0.0)],
            start_arrowhead: Some(sketch_shapes::element::Arrowhead::Triangle),
            end_arrowhead: Some(sketch_shapes::element::Arrowhead::Bar),
            ..ArrowData::default()
        }),
    )
    .with_size(150.0, 0.0);
    let shape = generate_shape(&arrow, &RenderContext::default()).unwrap();
    let drawables = many(&shape);
    // body, triangle, bar wings
    assert_eq!(drawables.len(), 4);
    assert_eq!(drawables[0].shape.name(), "linearPath");
    assert_eq!(drawables[1].shape.name(), "polygon");
}

#[test]
fn single_point_arrow_has_no_heads() {
    let arrow = Element::new(
        "a",
        ElementKind::Arrow(ArrowData {
            points: vec![],
            start_arrowhead: Some(sketch_shapes::element::Arrowhead::Dot),
            ..ArrowData::default()
        }),
    );
    let shape = generate_shape(&arrow, &RenderContext::default()).unwrap();
    assert_eq!(many(&shape).len(), 1);
}

#[test]
fn extreme_elbow_arrow_degrades_to_nothing() {
    init_tracing();
    let arrow = Element::new(
        "a",
        ElementKind::Arrow(ArrowData {
            points: vec![DVec2::ZERO, dvec2(0.0, -5e6)],
            elbowed: true,
            ..ArrowData::default()
        }),
    );
    let shape = generate_shape(&arrow, &RenderContext::default()).unwrap();
    assert_eq!(shape, ElementShape::Many(vec![]));
}

#[test]
fn open_freedraw_and_text_have_no_geometry() {
    let stroke = Element::new(
        "f",
        ElementKind::Freedraw(FreedrawData {
            points: vec![DVec2::ZERO, dvec2(30.0, 10.0), dvec2(60.0, 0.0)],
        }),
    );
    let ctx = RenderContext::default();
    assert_eq!(generate_shape(&stroke, &ctx).unwrap(), ElementShape::Empty);
    assert_eq!(
        generate_shape(&Element::new("t", ElementKind::Text), &ctx).unwrap(),
        ElementShape::Empty
    );
}

#[test]
fn selection_is_a_contract_violation() {
    let selection = Element::new("s", ElementKind::Selection);
    let err = generate_shape(&selection, &RenderContext::default()).unwrap_err();
    assert!(matches!(err, ShapeError::UnimplementedType { .. }));
    assert_eq!(err.to_string(), "unimplemented type selection");
}

#[test]
fn filled_prism_paints_faces_then_outlines() {
    init_tracing();
    let prism = Element::new(
        "p",
        ElementKind::RectangularPrism(BoxData {
            depth: -30.0,
            ..BoxData::default()
        }),
    )
    .with_size(120.0, 90.0)
    .with_background("#ffec99")
    .with_roundness(Roundness::adaptive(Some(6.0)));
    let shape = generate_shape(&prism, &RenderContext::default()).unwrap();
    let drawables = many(&shape);
    assert_eq!(drawables.len(), 6 + 3);
    for face in &drawables[..6] {
        assert_eq!(face.shape.name(), "polygon");
        for p in match &face.shape {
            Primitive::Polygon(points) => points.as_slice(),
            _ => unreachable!(),
        } {
            assert!((0.0..=120.0).contains(&p.x) && (0.0..=90.0).contains(&p.y));
        }
    }
}

// =============================================================================
// Cache
// =============================================================================

#[test]
fn cache_serves_until_edit() {
    let mut cache = ShapeCache::default();
    let rect = Rc::new(Element::new("r", ElementKind::Rectangle).with_size(100.0, 60.0));

    let first = cache.get_or_generate(&rect, None).unwrap();
    assert!(Rc::ptr_eq(&first, &cache.get_or_generate(&rect, None).unwrap()));

    let edited = Rc::new(Element::clone(&rect).with_roundness(Roundness::proportional()));
    let second = cache.get_or_generate(&edited, None).unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(second.primary().unwrap().shape.name(), "path");

    drop(rect);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.prune(), 0);
    drop(edited);
    assert_eq!(cache.prune(), 1);
}

// =============================================================================
// Collision
// =============================================================================

#[test]
fn arrow_collision_reuses_cached_body() {
    let mut cache = ShapeCache::default();
    let arrow = Rc::new(
        Element::new(
            "a",
            ElementKind::Arrow(ArrowData {
                points: vec![DVec2::ZERO, dvec2(200.0, 0.0)],
                ..ArrowData::default()
            }),
        )
        .with_position(50.0, 50.0)
        .with_size(200.0, 0.0),
    );

    let shape = resolve_collision_shape(&arrow, &ElementsMap::default(), &mut cache).unwrap();
    assert!(matches!(shape, CollisionShape::Curve(_)));
    assert_eq!(cache.len(), 1);
    assert!(shape.hit(dvec2(150.0, 52.0), 10.0));
    assert!(!shape.hit(dvec2(150.0, 120.0), 10.0));
    assert!(!shape.contains(dvec2(150.0, 50.0)));
}

#[test]
fn closing_a_line_makes_its_interior_hittable() {
    let points = vec![
        DVec2::ZERO,
        dvec2(100.0, 0.0),
        dvec2(100.0, 100.0),
        dvec2(0.0, 100.0),
    ];
    let toggled = toggle_line_polygon_state(&points, true).unwrap();
    assert_eq!(toggled.points.len(), 5);

    let line = Rc::new(
        Element::new("l", ElementKind::Line(LinearData { points: toggled.points }))
            .with_size(100.0, 100.0)
            .with_background("#b2f2bb"),
    );
    let mut cache = ShapeCache::default();
    let shape = resolve_collision_shape(&line, &ElementsMap::default(), &mut cache).unwrap();
    assert!(shape.contains(dvec2(50.0, 50.0)));
}
