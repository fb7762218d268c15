//! Sketch options derived from element style, and roughness damping.

use crate::element::{
    Element, ElementKind, ElementType, FillStyle, StrokeStyle, is_path_a_loop, is_transparent,
};
use crate::errors::ShapeError;

use super::defaults;

/// Style options handed to the sketch generator
///
/// Values are call-scoped: every adjustment returns a new value, so one end
/// of an arrow can never leak its dash or roughness tweaks into the other.
#[derive(Debug, Clone, PartialEq)]
pub struct SketchOptions {
    pub seed: u64,
    pub roughness: f64,
    /// `None` means no stroke at all
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub stroke_line_dash: Option<[f64; 2]>,
    pub disable_multi_stroke: bool,
    pub disable_multi_stroke_fill: bool,
    pub fill: Option<String>,
    pub fill_style: Option<FillStyle>,
    pub fill_weight: f64,
    pub hachure_gap: f64,
    pub curve_fitting: Option<f64>,
    pub preserve_vertices: bool,
}

impl Default for SketchOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            roughness: defaults::ROUGHNESS_ARTIST,
            stroke: Some(defaults::STROKE_COLOR.to_string()),
            stroke_width: 1.0,
            stroke_line_dash: None,
            disable_multi_stroke: false,
            disable_multi_stroke_fill: false,
            fill: None,
            fill_style: None,
            fill_weight: -1.0,
            hachure_gap: -1.0,
            curve_fitting: None,
            preserve_vertices: false,
        }
    }
}

impl SketchOptions {
    /// Straight-line options for exact, reproducible geometry
    pub fn precise(seed: u64) -> Self {
        Self {
            seed,
            roughness: defaults::ROUGHNESS_ARCHITECT,
            disable_multi_stroke: true,
            disable_multi_stroke_fill: true,
            preserve_vertices: true,
            ..Self::default()
        }
    }

    pub fn without_dash(&self) -> Self {
        Self {
            stroke_line_dash: None,
            ..self.clone()
        }
    }

    pub fn with_dash(&self, dash: [f64; 2]) -> Self {
        Self {
            stroke_line_dash: Some(dash),
            ..self.clone()
        }
    }

    pub fn with_roughness_at_most(&self, max: f64) -> Self {
        Self {
            roughness: self.roughness.min(max),
            ..self.clone()
        }
    }

    pub fn with_solid_fill(&self, color: impl Into<String>) -> Self {
        Self {
            fill: Some(color.into()),
            fill_style: Some(FillStyle::Solid),
            ..self.clone()
        }
    }

    pub fn without_fill(&self) -> Self {
        Self {
            fill: None,
            ..self.clone()
        }
    }

    pub fn with_stroke(&self, stroke: Option<String>) -> Self {
        Self {
            stroke,
            ..self.clone()
        }
    }
}

pub fn dash_array_dashed(stroke_width: f64) -> [f64; 2] {
    [8.0, 8.0 + stroke_width]
}

pub fn dash_array_dotted(stroke_width: f64) -> [f64; 2] {
    [1.5, 6.0 + stroke_width]
}

/// Dampen roughness for small elements so tiny shapes don't look chaotic
pub fn adjust_roughness(
    roughness: f64,
    width: f64,
    height: f64,
    kind: ElementType,
    has_roundness: bool,
) -> f64 {
    let max_size = width.max(height);
    let min_size = width.min(height);

    let both_sides_big = min_size >= 20.0 && max_size >= 50.0;
    let round_and_big_enough = min_size >= 15.0 && has_roundness && kind.can_change_roundness();
    let long_linear = matches!(
        kind,
        ElementType::Line | ElementType::Arrow | ElementType::Freedraw
    ) && max_size >= 50.0;

    if both_sides_big || round_and_big_enough || long_linear {
        return roughness;
    }

    let divisor = if max_size < 10.0 { 3.0 } else { 2.0 };
    (roughness / divisor).min(defaults::MAX_ADJUSTED_ROUGHNESS)
}

/// Map an element's style attributes to sketch generator options
pub fn build_options(
    element: &Element,
    continuous_path: bool,
) -> Result<SketchOptions, ShapeError> {
    let stroke_width = element.stroke_width;
    let solid = element.stroke_style == StrokeStyle::Solid;

    let mut options = SketchOptions {
        seed: element.seed,
        stroke_line_dash: match element.stroke_style {
            StrokeStyle::Dashed => Some(dash_array_dashed(stroke_width)),
            StrokeStyle::Dotted => Some(dash_array_dotted(stroke_width)),
            StrokeStyle::Solid => None,
        },
        // multi-stroke makes dashes and dots overlay each other
        disable_multi_stroke: !solid,
        stroke_width: if solid { stroke_width } else { stroke_width + 0.5 },
        // must be explicit, the generator would otherwise derive them from the widened stroke
        fill_weight: stroke_width / 2.0,
        hachure_gap: stroke_width * 4.0,
        roughness: adjust_roughness(
            element.roughness,
            element.width,
            element.height,
            element.element_type(),
            element.roundness.is_some(),
        ),
        stroke: Some(element.stroke_color.clone()),
        preserve_vertices: continuous_path || element.roughness < defaults::ROUGHNESS_CARTOONIST,
        ..SketchOptions::default()
    };

    let background =
        (!is_transparent(&element.background_color)).then(|| element.background_color.clone());

    match &element.kind {
        ElementKind::Rectangle
        | ElementKind::Iframe
        | ElementKind::Embeddable
        | ElementKind::Diamond => {
            options.fill_style = Some(element.fill_style);
            options.fill = background;
        }
        ElementKind::Ellipse => {
            options.fill_style = Some(element.fill_style);
            options.fill = background;
            options.curve_fitting = Some(1.0);
        }
        ElementKind::Cube(_) | ElementKind::RectangularPrism(_) => {
            if background.is_some() {
                options.fill_style = Some(element.fill_style);
                options.fill = background;
            }
        }
        ElementKind::Line(data) => {
            if is_path_a_loop(&data.points) {
                options.fill_style = Some(element.fill_style);
                options.fill = background;
            }
        }
        ElementKind::Freedraw(data) => {
            if is_path_a_loop(&data.points) {
                options.fill_style = Some(element.fill_style);
                options.fill = background;
            }
        }
        ElementKind::Arrow(_) => {}
        ElementKind::Frame
        | ElementKind::MagicFrame
        | ElementKind::Text
        | ElementKind::Image
        | ElementKind::Selection => {
            return Err(ShapeError::unimplemented(element.element_type()));
        }
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ArrowData, LinearData, Roundness};
    use glam::DVec2;

    fn rect(width: f64, height: f64) -> Element {
        Element::new("r", ElementKind::Rectangle).with_size(width, height)
    }

    #[test]
    fn big_elements_keep_roughness() {
        for (w, h) in [(20.0, 50.0), (100.0, 20.0), (300.0, 400.0)] {
            assert_eq!(adjust_roughness(2.0, w, h, ElementType::Rectangle, false), 2.0);
        }
    }

    #[test]
    fn tiny_elements_are_damped() {
        let r = adjust_roughness(2.0, 5.0, 5.0, ElementType::Rectangle, false);
        assert!(r <= 2.0 / 3.0 + 1e-12);
        assert!(r <= 2.5);

        // clamped even for wild input
        assert_eq!(adjust_roughness(30.0, 30.0, 12.0, ElementType::Rectangle, false), 2.5);
    }

    #[test]
    fn rounded_medium_elements_keep_roughness() {
        assert_eq!(adjust_roughness(1.0, 16.0, 16.0, ElementType::Rectangle, true), 1.0);
        // freedraw can't be rounded, so roundness doesn't count
        assert_eq!(adjust_roughness(1.0, 16.0, 16.0, ElementType::Freedraw, true), 0.5);
    }

    #[test]
    fn long_linear_elements_keep_roughness() {
        assert_eq!(adjust_roughness(1.5, 60.0, 0.0, ElementType::Arrow, false), 1.5);
    }

    #[test]
    fn dashed_and_dotted_patterns() {
        let mut el = rect(100.0, 60.0);
        el.stroke_width = 2.0;

        el.stroke_style = StrokeStyle::Dashed;
        let o = build_options(&el, false).unwrap();
        assert_eq!(o.stroke_line_dash, Some([8.0, 10.0]));
        assert!(o.disable_multi_stroke);
        assert_eq!(o.stroke_width, 2.5);
        assert_eq!(o.fill_weight, 1.0);
        assert_eq!(o.hachure_gap, 8.0);

        el.stroke_style = StrokeStyle::Dotted;
        let o = build_options(&el, false).unwrap();
        assert_eq!(o.stroke_line_dash, Some([1.5, 8.0]));

        el.stroke_style = StrokeStyle::Solid;
        let o = build_options(&el, false).unwrap();
        assert_eq!(o.stroke_line_dash, None);
        assert_eq!(o.stroke_width, 2.0);
        assert!(!o.disable_multi_stroke);
    }

    #[test]
    fn transparent_background_means_no_fill() {
        let el = rect(100.0, 60.0);
        let o = build_options(&el, false).unwrap();
        assert_eq!(o.fill, None);
        assert_eq!(o.fill_style, Some(FillStyle::Hachure));

        let el = rect(100.0, 60.0).with_background("#a5d8ff");
        assert_eq!(build_options(&el, false).unwrap().fill.as_deref(), Some("#a5d8ff"));
    }

    #[test]
    fn ellipse_uses_full_curve_fitting() {
        let el = Element::new("e", ElementKind::Ellipse).with_size(80.0, 40.0);
        assert_eq!(build_options(&el, false).unwrap().curve_fitting, Some(1.0));
    }

    #[test]
    fn open_lines_and_arrows_are_unfilled() {
        let points = vec![DVec2::ZERO, DVec2::new(100.0, 0.0), DVec2::new(100.0, 100.0)];
        let line = Element::new("l", ElementKind::Line(LinearData { points: points.clone() }))
            .with_background("#ffc9c9");
        assert_eq!(build_options(&line, false).unwrap().fill, None);

        let mut closed = points;
        closed.push(DVec2::new(2.0, 2.0));
        let line = Element::new("l", ElementKind::Line(LinearData { points: closed }))
            .with_background("#ffc9c9");
        assert_eq!(build_options(&line, false).unwrap().fill.as_deref(), Some("#ffc9c9"));

        let arrow =
            Element::new("a", ElementKind::Arrow(ArrowData::default())).with_background("#ffc9c9");
        assert_eq!(build_options(&arrow, false).unwrap().fill, None);
    }

    #[test]
    fn vertex_preservation() {
        let mut el = rect(100.0, 60.0).with_roundness(Roundness::proportional());
        el.roughness = 2.0;
        assert!(!build_options(&el, false).unwrap().preserve_vertices);
        assert!(build_options(&el, true).unwrap().preserve_vertices);
        el.roughness = 1.0;
        assert!(build_options(&el, false).unwrap().preserve_vertices);
    }

    #[test]
    fn text_is_unimplemented() {
        let el = Element::new("t", ElementKind::Text);
        assert_eq!(
            build_options(&el, false),
            Err(ShapeError::UnimplementedType { kind: ElementType::Text })
        );
    }

    #[test]
    fn adjustments_do_not_alias() {
        let base = SketchOptions {
            roughness: 2.0,
            stroke_line_dash: Some([8.0, 10.0]),
            ..SketchOptions::default()
        };
        let head = base.without_dash().with_roughness_at_most(0.5);
        assert_eq!(head.roughness, 0.5);
        assert_eq!(head.stroke_line_dash, None);
        assert_eq!(base.roughness, 2.0);
        assert_eq!(base.stroke_line_dash, Some([8.0, 10.0]));
    }
}
