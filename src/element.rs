//! Element model: the geometry-relevant slice of a whiteboard element.
//!
//! Elements are immutable by convention. An edit produces a new `Rc<Element>`;
//! the shape cache relies on that identity to avoid serving stale geometry.

use std::fmt;
use std::rc::Rc;

use glam::DVec2;
use rustc_hash::FxHashMap;

use crate::render::defaults;

/// Point in the element's local frame (relative to `x`/`y`)
pub type LocalPoint = DVec2;

/// Lookup of elements by identity, used to resolve container frames
pub type ElementsMap = FxHashMap<ElementId, Rc<Element>>;

/// Opaque, stable identity of an element
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Type tag of an element, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Rectangle,
    Diamond,
    Ellipse,
    Line,
    Arrow,
    Freedraw,
    Iframe,
    Embeddable,
    Frame,
    MagicFrame,
    Text,
    Image,
    Cube,
    RectangularPrism,
    Selection,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Rectangle => "rectangle",
            ElementType::Diamond => "diamond",
            ElementType::Ellipse => "ellipse",
            ElementType::Line => "line",
            ElementType::Arrow => "arrow",
            ElementType::Freedraw => "freedraw",
            ElementType::Iframe => "iframe",
            ElementType::Embeddable => "embeddable",
            ElementType::Frame => "frame",
            ElementType::MagicFrame => "magicframe",
            ElementType::Text => "text",
            ElementType::Image => "image",
            ElementType::Cube => "cube",
            ElementType::RectangularPrism => "rectangularPrism",
            ElementType::Selection => "selection",
        }
    }

    /// Line-like elements whose geometry is an ordered point sequence
    pub fn is_linear(self) -> bool {
        matches!(self, ElementType::Line | ElementType::Arrow)
    }

    pub fn is_iframe_like(self) -> bool {
        matches!(self, ElementType::Iframe | ElementType::Embeddable)
    }

    pub fn is_embeddable(self) -> bool {
        self == ElementType::Embeddable
    }

    /// Whether a roundness descriptor has any effect on this type
    pub fn can_change_roundness(self) -> bool {
        matches!(
            self,
            ElementType::Rectangle
                | ElementType::Iframe
                | ElementType::Embeddable
                | ElementType::Arrow
                | ElementType::Line
                | ElementType::Diamond
                | ElementType::Image
                | ElementType::Cube
                | ElementType::RectangularPrism
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillStyle {
    #[default]
    Hachure,
    CrossHatch,
    Solid,
    ZigZag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundnessType {
    Legacy,
    ProportionalRadius,
    AdaptiveRadius,
}

/// How corners of an element are rounded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roundness {
    pub kind: RoundnessType,
    /// Fixed radius for adaptive rounding; `None` uses the default
    pub value: Option<f64>,
}

impl Roundness {
    pub fn proportional() -> Self {
        Self {
            kind: RoundnessType::ProportionalRadius,
            value: None,
        }
    }

    pub fn adaptive(value: Option<f64>) -> Self {
        Self {
            kind: RoundnessType::AdaptiveRadius,
            value,
        }
    }
}

/// Decoration drawn at an arrow end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrowhead {
    Arrow,
    Bar,
    Dot,
    Circle,
    CircleOutline,
    Triangle,
    TriangleOutline,
    Diamond,
    DiamondOutline,
    CrowfootOne,
    CrowfootMany,
    CrowfootOneOrMany,
}

impl Arrowhead {
    /// Outline variants fill with the canvas background instead of the stroke color
    pub fn is_outline(self) -> bool {
        matches!(
            self,
            Arrowhead::CircleOutline | Arrowhead::TriangleOutline | Arrowhead::DiamondOutline
        )
    }
}

/// Which end of a line an arrowhead sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowheadPosition {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearData {
    pub points: Vec<LocalPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowData {
    pub points: Vec<LocalPoint>,
    pub elbowed: bool,
    pub start_arrowhead: Option<Arrowhead>,
    pub end_arrowhead: Option<Arrowhead>,
}

impl Default for ArrowData {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            elbowed: false,
            start_arrowhead: None,
            end_arrowhead: Some(Arrowhead::Arrow),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FreedrawData {
    pub points: Vec<LocalPoint>,
}

/// 3D descriptor for cube-like elements. Signed depth; rotations are carried
/// for consumers but the projection itself is fixed isometric.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxData {
    pub depth: f64,
    pub rotation_x: f64,
    pub rotation_y: f64,
    pub rotation_z: f64,
}

/// Type-specific payload of an element
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Rectangle,
    Diamond,
    Ellipse,
    Line(LinearData),
    Arrow(ArrowData),
    Freedraw(FreedrawData),
    Iframe,
    Embeddable,
    Frame,
    MagicFrame,
    Text,
    Image,
    Cube(BoxData),
    RectangularPrism(BoxData),
    Selection,
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Rectangle => ElementType::Rectangle,
            ElementKind::Diamond => ElementType::Diamond,
            ElementKind::Ellipse => ElementType::Ellipse,
            ElementKind::Line(_) => ElementType::Line,
            ElementKind::Arrow(_) => ElementType::Arrow,
            ElementKind::Freedraw(_) => ElementType::Freedraw,
            ElementKind::Iframe => ElementType::Iframe,
            ElementKind::Embeddable => ElementType::Embeddable,
            ElementKind::Frame => ElementType::Frame,
            ElementKind::MagicFrame => ElementType::MagicFrame,
            ElementKind::Text => ElementType::Text,
            ElementKind::Image => ElementType::Image,
            ElementKind::Cube(_) => ElementType::Cube,
            ElementKind::RectangularPrism(_) => ElementType::RectangularPrism,
            ElementKind::Selection => ElementType::Selection,
        }
    }
}

/// A drawable element with its style attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation about the element center, in radians
    pub angle: f64,
    pub stroke_color: String,
    pub background_color: String,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub fill_style: FillStyle,
    pub roughness: f64,
    pub seed: u64,
    pub roundness: Option<Roundness>,
    /// Element whose origin `x`/`y` are relative to
    pub container_id: Option<ElementId>,
    pub has_bound_text: bool,
    pub kind: ElementKind,
}

impl Element {
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(id),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            angle: 0.0,
            stroke_color: defaults::STROKE_COLOR.to_string(),
            background_color: defaults::TRANSPARENT.to_string(),
            stroke_width: defaults::STROKE_WIDTH,
            stroke_style: StrokeStyle::Solid,
            fill_style: FillStyle::Hachure,
            roughness: defaults::ROUGHNESS_ARTIST,
            seed: 1,
            roundness: None,
            container_id: None,
            has_bound_text: false,
            kind,
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_roundness(mut self, roundness: Roundness) -> Self {
        self.roundness = Some(roundness);
        self
    }

    pub fn with_stroke_style(mut self, style: StrokeStyle) -> Self {
        self.stroke_style = style;
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn with_stroke_color(mut self, color: impl Into<String>) -> Self {
        self.stroke_color = color.into();
        self
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Point sequence for line, arrow and freedraw elements
    pub fn points(&self) -> Option<&[LocalPoint]> {
        match &self.kind {
            ElementKind::Line(data) => Some(&data.points),
            ElementKind::Arrow(data) => Some(&data.points),
            ElementKind::Freedraw(data) => Some(&data.points),
            _ => None,
        }
    }

    /// Points of a line-like element, substituting the origin for an empty sequence
    pub fn points_or_origin(&self) -> Vec<LocalPoint> {
        match self.points() {
            Some(points) if !points.is_empty() => points.to_vec(),
            _ => vec![DVec2::ZERO],
        }
    }

    pub fn is_elbow_arrow(&self) -> bool {
        matches!(&self.kind, ElementKind::Arrow(data) if data.elbowed)
    }

    /// Origin in scene coordinates, resolving the container chain
    pub fn absolute_origin(&self, elements: &ElementsMap) -> DVec2 {
        let mut origin = DVec2::new(self.x, self.y);
        let mut container = self.container_id.as_ref();
        let mut depth = 0;
        while let Some(id) = container {
            if depth >= defaults::MAX_CONTAINER_DEPTH {
                break;
            }
            let Some(parent) = elements.get(id) else {
                break;
            };
            origin += DVec2::new(parent.x, parent.y);
            container = parent.container_id.as_ref();
            depth += 1;
        }
        origin
    }

    /// Center of the element in scene coordinates
    ///
    /// Line-like elements use the bounds of their points, which may extend
    /// to negative local coordinates.
    pub fn absolute_center(&self, elements: &ElementsMap) -> DVec2 {
        let origin = self.absolute_origin(elements);
        match self.points() {
            Some(points) if !points.is_empty() => {
                let (min, max) = point_bounds(points);
                origin + (min + max) * 0.5
            }
            _ => origin + DVec2::new(self.width / 2.0, self.height / 2.0),
        }
    }

    /// Whether hit-testing should treat the interior as part of the element
    pub fn should_test_inside(&self) -> bool {
        let kind = self.element_type();
        if kind == ElementType::Arrow {
            return false;
        }
        let draggable_from_inside = !is_transparent(&self.background_color)
            || self.has_bound_text
            || kind.is_iframe_like()
            || kind == ElementType::Text;

        match &self.kind {
            ElementKind::Line(data) => draggable_from_inside && is_path_a_loop(&data.points),
            ElementKind::Freedraw(data) => draggable_from_inside && is_path_a_loop(&data.points),
            _ => draggable_from_inside || kind == ElementType::Image,
        }
    }
}

/// Axis-aligned bounds of a non-empty point list
pub fn point_bounds(points: &[DVec2]) -> (DVec2, DVec2) {
    points.iter().fold(
        (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
        |(min, max), p| (min.min(*p), max.max(*p)),
    )
}

/// Whether a CSS color string is fully transparent
pub fn is_transparent(color: &str) -> bool {
    let color = color.trim();
    let rgb_transparent = color.len() == 5 && color.starts_with('#') && color.ends_with('0');
    let rrggbb_transparent = color.len() == 9 && color.starts_with('#') && color.ends_with("00");
    rgb_transparent || rrggbb_transparent || color.eq_ignore_ascii_case(defaults::TRANSPARENT)
}

/// Whether the point sequence closes on itself within the loop threshold
pub fn is_path_a_loop(points: &[LocalPoint]) -> bool {
    is_path_a_loop_within(points, defaults::LINE_CONFIRM_THRESHOLD)
}

pub fn is_path_a_loop_within(points: &[LocalPoint], threshold: f64) -> bool {
    match points {
        [first, .., last] if points.len() >= 3 => first.distance(*last) <= threshold,
        _ => false,
    }
}
