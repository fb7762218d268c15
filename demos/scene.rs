//! Generate and hit-test a small scene.
//!
//! Run with: cargo run --example scene --features tracing

use std::rc::Rc;

use glam::dvec2;
use sketch_shapes::element::{ArrowData, BoxData};
use sketch_shapes::{
    Element, ElementKind, ElementsMap, HitTest, RenderContext, Roundness, ShapeCache,
    resolve_collision_shape,
};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let scene = vec![
        Rc::new(
            Element::new("card", ElementKind::Rectangle)
                .with_size(160.0, 90.0)
                .with_roundness(Roundness::adaptive(None))
                .with_background("#a5d8ff"),
        ),
        Rc::new(
            Element::new(
                "link",
                ElementKind::Arrow(ArrowData {
                    points: vec![dvec2(0.0, 0.0), dvec2(120.0, 0.0), dvec2(120.0, 80.0)],
                    elbowed: true,
                    ..ArrowData::default()
                }),
            )
            .with_position(170.0, 45.0)
            .with_size(120.0, 80.0),
        ),
        Rc::new(
            Element::new(
                "store",
                ElementKind::Cube(BoxData {
                    depth: 40.0,
                    ..BoxData::default()
                }),
            )
            .with_position(240.0, 130.0)
            .with_size(100.0, 80.0),
        ),
    ];

    let mut cache = ShapeCache::default();
    let ctx = RenderContext::default();
    let elements: ElementsMap = scene.iter().map(|el| (el.id.clone(), Rc::clone(el))).collect();

    for element in &scene {
        let shape = cache.get_or_generate(element, Some(&ctx))?;
        println!("{}: {} drawables", element.id, shape.drawables().len());
        for drawable in shape.drawables() {
            println!("  {} ({} op sets)", drawable.shape.name(), drawable.sets.len());
        }
    }

    let probe = dvec2(80.0, 45.0);
    for element in &scene {
        let collision = resolve_collision_shape(element, &elements, &mut cache)?;
        println!("{} hit at {probe}: {}", element.id, collision.hit(probe, 4.0));
    }

    Ok(())
}
