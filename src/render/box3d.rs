//! Isometric projection of cube-like elements into their 2D bounding box.
//!
//! Vertex indices: 0..4 are the front face and 4..8 the back face, each in
//! top-left, top-right, bottom-right, bottom-left order.

use glam::{DVec2, dvec2};

use crate::log::warn;
use crate::sketch::SketchGenerator;
use crate::types::Drawable;

use super::defaults;
use super::geometry::create_rounded_polygon_path;
use super::options::SketchOptions;

/// The 12 box edges: front loop, back loop, then the connecting edges
pub const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Front,
    Back,
    Top,
    Bottom,
    Left,
    Right,
}

impl Face {
    pub fn vertices(self) -> [usize; 4] {
        match self {
            Face::Front => [0, 1, 2, 3],
            Face::Back => [4, 5, 6, 7],
            Face::Top => [0, 1, 5, 4],
            Face::Bottom => [3, 2, 6, 7],
            Face::Left => [0, 3, 7, 4],
            Face::Right => [1, 2, 6, 5],
        }
    }
}

/// Faces that stay visible under the fixed projection
pub const VISIBLE_FACES: [Face; 3] = [Face::Front, Face::Top, Face::Right];

/// Back-to-front order for filled faces
pub const PAINTER_ORDER: [Face; 6] = [
    Face::Back,
    Face::Bottom,
    Face::Left,
    Face::Right,
    Face::Front,
    Face::Top,
];

#[derive(Debug, Clone, PartialEq)]
pub struct BoxProjection {
    pub vertices: [DVec2; 8],
    /// Signed depth after clamping
    pub depth: f64,
    /// Projected depth along x and y
    pub depth_offset: DVec2,
    pub face_size: DVec2,
}

impl BoxProjection {
    pub fn face_points(&self, face: Face) -> [DVec2; 4] {
        face.vertices().map(|i| self.vertices[i])
    }

    pub fn edge_points(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        EDGES
            .iter()
            .map(|&(a, b)| (self.vertices[a], self.vertices[b]))
    }

    /// Largest corner radius the faces can take without overlapping rounds
    pub fn max_corner_radius(&self) -> f64 {
        let face_span = self.face_size.x.min(self.face_size.y) / 4.0;
        let depth_span = self.depth_offset.x.min(self.depth_offset.y) / 2.0;
        face_span.min(depth_span).max(0.0)
    }
}

/// Project a box with signed `depth` into a `width` x `height` box
///
/// `depth_ratio` bounds how much of the box the depth offset may take; depth
/// beyond that is clamped, so any larger request gives the same result.
pub fn project_box(width: f64, height: f64, depth: f64, depth_ratio: f64) -> BoxProjection {
    let x_scale = defaults::ISO_X_SCALE;
    let y_scale = defaults::ISO_Y_SCALE;

    let max_depth = (depth_ratio * (width / x_scale).min(height / y_scale)).max(0.0);
    let magnitude = depth.abs().min(max_depth);
    let depth = if depth < 0.0 { -magnitude } else { magnitude };

    let dox = magnitude * x_scale;
    let doy = magnitude * y_scale;
    let face_w = (width - dox).max(0.0);
    let face_h = (height - doy).max(0.0);

    let centering = |slack: f64| {
        if slack > defaults::BOX_BOUNDS_EPSILON {
            slack / 2.0
        } else {
            0.0
        }
    };
    let ox = centering(width - face_w - dox);
    let oy = centering(height - face_h - doy);
    let (near_x, far_x) = (ox, width - ox);
    let (near_y, far_y) = (oy, height - oy);

    let quad = |left: f64, top: f64, right: f64, bottom: f64| {
        [
            dvec2(left, top),
            dvec2(right, top),
            dvec2(right, bottom),
            dvec2(left, bottom),
        ]
    };

    // front sits bottom-left for positive depth and top-right for negative
    let (front, back) = if depth >= 0.0 {
        (
            quad(near_x, near_y + doy, far_x - dox, far_y),
            quad(near_x + dox, near_y, far_x, far_y - doy),
        )
    } else {
        (
            quad(near_x + dox, near_y, far_x, far_y - doy),
            quad(near_x, near_y + doy, far_x - dox, far_y),
        )
    };

    let mut vertices = [DVec2::ZERO; 8];
    vertices[..4].copy_from_slice(&front);
    vertices[4..].copy_from_slice(&back);

    let projection = BoxProjection {
        vertices,
        depth,
        depth_offset: dvec2(dox, doy),
        face_size: dvec2(face_w, face_h),
    };
    check_bounds(&projection, width, height);
    projection
}

fn check_bounds(projection: &BoxProjection, width: f64, height: f64) {
    let eps = defaults::BOX_BOUNDS_EPSILON;
    for (index, v) in projection.vertices.iter().enumerate() {
        let inside = v.x >= -eps && v.x <= width + eps && v.y >= -eps && v.y <= height + eps;
        if !inside {
            warn!(
                index,
                x = v.x,
                y = v.y,
                width,
                height,
                depth = projection.depth,
                "box vertex outside element bounds"
            );
        }
    }
}

/// Render a projected box: filled faces first, then outlines
///
/// Faces are only filled when `options.fill` is set. With a positive
/// `radius` the outlines are the three visible faces with rounded corners,
/// otherwise the 12 straight edges.
pub fn box_drawables(
    projection: &BoxProjection,
    radius: f64,
    options: &SketchOptions,
    generator: &dyn SketchGenerator,
) -> Vec<Drawable> {
    let mut drawables = Vec::new();

    if options.fill.is_some() {
        let face_options = options.with_stroke(None);
        for face in PAINTER_ORDER {
            let [a, b, c, d] = projection.face_points(face);
            drawables.push(generator.polygon(&[a, b, c, d], &face_options));
        }
    }

    let stroke_options = options.without_fill();
    let radius = radius.min(projection.max_corner_radius());
    if radius > 0.0 {
        for face in VISIBLE_FACES {
            let path = create_rounded_polygon_path(&projection.face_points(face), radius);
            drawables.push(generator.path(&path.to_string(), &stroke_options));
        }
    } else {
        for (from, to) in projection.edge_points() {
            drawables.push(generator.line(from, to, &stroke_options));
        }
    }

    drawables
}
