//! Render geometry cache keyed by element identity.
//!
//! Entries remember the exact `Rc<Element>` they were generated from through a
//! `Weak` handle. An entry only matches the same allocation, so an edited
//! element (which is always a new `Rc`) never sees its predecessor's shape,
//! and entries of dropped elements are reclaimed by [`ShapeCache::prune`].

use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::element::{Element, ElementId};
use crate::errors::ShapeError;
use crate::render::{RenderContext, ShapeGenerator};
use crate::types::ElementShape;

/// Hook for the host's rendered-bitmap cache
///
/// Called whenever geometry is regenerated, since any bitmap drawn from the
/// previous geometry is stale from then on.
pub trait BitmapCacheInvalidator {
    fn invalidate(&mut self, id: &ElementId);
}

/// Invalidator for hosts without a bitmap cache
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBitmapCache;

impl BitmapCacheInvalidator for NoopBitmapCache {
    fn invalidate(&mut self, _id: &ElementId) {}
}

struct CacheEntry {
    element: Weak<Element>,
    shape: Rc<ElementShape>,
}

impl CacheEntry {
    fn is_for(&self, element: &Rc<Element>) -> bool {
        // the weak handle keeps the allocation alive, so addresses are never reused
        std::ptr::eq(self.element.as_ptr(), Rc::as_ptr(element))
    }
}

/// Memoized render geometry for a scene
///
/// One instance per editor session; it is owned by the host and passed to
/// whatever needs geometry, never reached through a global.
pub struct ShapeCache {
    generator: ShapeGenerator,
    bitmaps: Box<dyn BitmapCacheInvalidator>,
    entries: FxHashMap<ElementId, CacheEntry>,
}

impl Default for ShapeCache {
    fn default() -> Self {
        Self::new(ShapeGenerator::default())
    }
}

impl std::fmt::Debug for ShapeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeCache")
            .field("generator", &self.generator)
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl ShapeCache {
    pub fn new(generator: ShapeGenerator) -> Self {
        Self::with_bitmap_cache(generator, Box::new(NoopBitmapCache))
    }

    pub fn with_bitmap_cache(
        generator: ShapeGenerator,
        bitmaps: Box<dyn BitmapCacheInvalidator>,
    ) -> Self {
        Self {
            generator,
            bitmaps,
            entries: FxHashMap::default(),
        }
    }

    pub fn generator(&self) -> &ShapeGenerator {
        &self.generator
    }

    /// Cached geometry for this exact element, without generating
    pub fn get(&self, element: &Rc<Element>) -> Option<Rc<ElementShape>> {
        self.entries
            .get(&element.id)
            .filter(|entry| entry.is_for(element))
            .map(|entry| Rc::clone(&entry.shape))
    }

    pub fn set(&mut self, element: &Rc<Element>, shape: Rc<ElementShape>) {
        self.entries.insert(
            element.id.clone(),
            CacheEntry {
                element: Rc::downgrade(element),
                shape,
            },
        );
    }

    pub fn delete(&mut self, element: &Element) {
        self.entries.remove(&element.id);
    }

    /// Wipe every entry
    pub fn destroy(&mut self) {
        self.entries.clear();
    }

    /// Drop entries whose element no longer exists; returns how many were removed
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.element.strong_count() > 0);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached geometry, generating and storing it on a miss
    ///
    /// Exports always regenerate so the output reflects the element as it is
    /// now. A cached `ElementShape::Empty` counts as a hit.
    pub fn get_or_generate(
        &mut self,
        element: &Rc<Element>,
        ctx: Option<&RenderContext>,
    ) -> Result<Rc<ElementShape>, ShapeError> {
        let fallback;
        let ctx = match ctx {
            Some(ctx) => ctx,
            None => {
                fallback = RenderContext::new()
                    .with_canvas_background(self.generator.config().canvas_background.clone());
                &fallback
            }
        };

        if !ctx.is_exporting {
            if let Some(shape) = self.get(element) {
                return Ok(shape);
            }
        }

        crate::log::debug!(
            element_id = %element.id,
            exporting = ctx.is_exporting,
            "shape cache miss"
        );

        self.bitmaps.invalidate(&element.id);
        let shape = Rc::new(self.generator.generate(element, ctx)?);
        self.set(element, Rc::clone(&shape));
        Ok(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    use glam::DVec2;

    use crate::config::ShapeConfig;
    use crate::element::ElementKind;
    use crate::render::SketchOptions;
    use crate::simplify::DouglasPeucker;
    use crate::sketch::{RoughGenerator, SketchGenerator};
    use crate::types::Drawable;

    /// Forwards to the rough generator and counts primitive requests
    struct CountingSketch {
        inner: RoughGenerator,
        calls: Rc<Cell<usize>>,
    }

    impl CountingSketch {
        fn bump(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    impl SketchGenerator for CountingSketch {
        fn rectangle(
            &self,
            x: f64,
            y: f64,
            width: f64,
            height: f64,
            options: &SketchOptions,
        ) -> Drawable {
            self.bump();
            self.inner.rectangle(x, y, width, height, options)
        }
        fn ellipse(
            &self,
            cx: f64,
            cy: f64,
            width: f64,
            height: f64,
            options: &SketchOptions,
        ) -> Drawable {
            self.bump();
            self.inner.ellipse(cx, cy, width, height, options)
        }
        fn circle(&self, cx: f64, cy: f64, diameter: f64, options: &SketchOptions) -> Drawable {
            self.bump();
            self.inner.circle(cx, cy, diameter, options)
        }
        fn line(&self, from: DVec2, to: DVec2, options: &SketchOptions) -> Drawable {
            self.bump();
            self.inner.line(from, to, options)
        }
        fn linear_path(&self, points: &[DVec2], options: &SketchOptions) -> Drawable {
            self.bump();
            self.inner.linear_path(points, options)
        }
        fn polygon(&self, points: &[DVec2], options: &SketchOptions) -> Drawable {
            self.bump();
            self.inner.polygon(points, options)
        }
        fn curve(&self, points: &[DVec2], options: &SketchOptions) -> Drawable {
            self.bump();
            self.inner.curve(points, options)
        }
        fn path(&self, d: &str, options: &SketchOptions) -> Drawable {
            self.bump();
            self.inner.path(d, options)
        }
    }

    struct RecordingBitmaps(Rc<RefCell<Vec<ElementId>>>);

    impl BitmapCacheInvalidator for RecordingBitmaps {
        fn invalidate(&mut self, id: &ElementId) {
            self.0.borrow_mut().push(id.clone());
        }
    }

    struct Harness {
        cache: ShapeCache,
        calls: Rc<Cell<usize>>,
        invalidated: Rc<RefCell<Vec<ElementId>>>,
    }

    fn harness() -> Harness {
        let calls = Rc::new(Cell::new(0));
        let invalidated = Rc::new(RefCell::new(Vec::new()));
        let generator = ShapeGenerator::new(
            Box::new(CountingSketch {
                inner: RoughGenerator::new(),
                calls: Rc::clone(&calls),
            }),
            Box::new(DouglasPeucker),
            ShapeConfig::default(),
        );
        Harness {
            cache: ShapeCache::with_bitmap_cache(
                generator,
                Box::new(RecordingBitmaps(Rc::clone(&invalidated))),
            ),
            calls,
            invalidated,
        }
    }

    fn rect(id: &str) -> Rc<Element> {
        Rc::new(Element::new(id, ElementKind::Rectangle).with_size(100.0, 60.0))
    }

    #[test]
    fn get_after_set_shares_the_value() {
        let mut cache = ShapeCache::default();
        let el = rect("r");
        let shape = Rc::new(ElementShape::Empty);
        cache.set(&el, Rc::clone(&shape));
        assert!(Rc::ptr_eq(&cache.get(&el).unwrap(), &shape));
    }

    #[test]
    fn delete_then_get_is_absent() {
        let mut cache = ShapeCache::default();
        let el = rect("r");
        cache.set(&el, Rc::new(ElementShape::Empty));
        cache.delete(&el);
        assert!(cache.get(&el).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn empty_marker_is_a_hit() {
        let mut h = harness();
        let el = rect("r");
        h.cache.set(&el, Rc::new(ElementShape::Empty));

        let shape = h.cache.get_or_generate(&el, Some(&RenderContext::default())).unwrap();
        assert_eq!(*shape, ElementShape::Empty);
        assert_eq!(h.calls.get(), 0);
        assert!(h.invalidated.borrow().is_empty());
    }

    #[test]
    fn miss_generates_once_and_invalidates_bitmap() {
        let mut h = harness();
        let el = rect("r");

        let first = h.cache.get_or_generate(&el, None).unwrap();
        let second = h.cache.get_or_generate(&el, None).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(h.calls.get(), 1);
        assert_eq!(*h.invalidated.borrow(), vec![ElementId::from("r")]);
    }

    #[test]
    fn exporting_always_regenerates() {
        let mut h = harness();
        let el = rect("r");
        h.cache.set(&el, Rc::new(ElementShape::Empty));

        let exporting = RenderContext::default().exporting();
        let shape = h.cache.get_or_generate(&el, Some(&exporting)).unwrap();
        assert!(matches!(*shape, ElementShape::Single(_)));
        assert_eq!(h.calls.get(), 1);

        h.cache.get_or_generate(&el, Some(&exporting)).unwrap();
        assert_eq!(h.calls.get(), 2);
        // the fresh export result is stored
        assert!(matches!(*h.cache.get(&el).unwrap(), ElementShape::Single(_)));
    }

    #[test]
    fn edited_element_is_not_served_stale_geometry() {
        let mut cache = ShapeCache::default();
        let original = rect("r");
        cache.get_or_generate(&original, None).unwrap();

        let edited = Rc::new(Element::clone(&original).with_size(300.0, 60.0));
        assert!(cache.get(&edited).is_none());

        let shape = cache.get_or_generate(&edited, None).unwrap();
        let Some(drawable) = shape.primary() else {
            panic!("expected geometry");
        };
        assert!(matches!(
            drawable.shape,
            crate::types::Primitive::Rectangle { width, .. } if width == 300.0
        ));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn prune_drops_discarded_elements() {
        let mut cache = ShapeCache::default();
        let kept = rect("kept");
        let dropped = rect("dropped");
        cache.set(&kept, Rc::new(ElementShape::Empty));
        cache.set(&dropped, Rc::new(ElementShape::Empty));
        drop(dropped);

        assert_eq!(cache.prune(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&kept).is_some());
    }

    #[test]
    fn destroy_wipes_everything() {
        let mut cache = ShapeCache::default();
        let a = rect("a");
        let b = rect("b");
        cache.get_or_generate(&a, None).unwrap();
        cache.get_or_generate(&b, None).unwrap();
        cache.destroy();
        assert!(cache.is_empty());
        assert!(cache.get(&a).is_none());
    }

    #[test]
    fn errors_are_not_cached() {
        let mut cache = ShapeCache::default();
        let el = Rc::new(Element::new("s", ElementKind::Selection));
        assert!(cache.get_or_generate(&el, None).is_err());
        assert!(cache.is_empty());
    }
}
