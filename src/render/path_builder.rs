//! SVG path-string builder and orthogonal (elbow) path construction.
//!
//! `PathData` is a small fluent builder over the subset of SVG path commands
//! the shape generator emits (`M`, `L`, `Q`, `C`, `Z`). Paths are written in
//! absolute coordinates with a space between every token and `, ` between
//! coordinate pairs of one command, e.g. `Q 10 0, 10 10`.

use std::fmt;

use glam::{DVec2, dvec2};

#[derive(Debug, Clone, Copy, PartialEq)]
enum PathCommand {
    Move(DVec2),
    Line(DVec2),
    Quad(DVec2, DVec2),
    Cubic(DVec2, DVec2, DVec2),
    Close,
}

/// Fluent builder for an SVG path description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn m(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::Move(dvec2(x, y)));
        self
    }

    pub fn l(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::Line(dvec2(x, y)));
        self
    }

    pub fn q(mut self, cx: f64, cy: f64, x: f64, y: f64) -> Self {
        self.commands
            .push(PathCommand::Quad(dvec2(cx, cy), dvec2(x, y)));
        self
    }

    pub fn c(mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::Cubic(
            dvec2(x1, y1),
            dvec2(x2, y2),
            dvec2(x, y),
        ));
        self
    }

    pub fn z(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn move_to(self, p: DVec2) -> Self {
        self.m(p.x, p.y)
    }

    pub fn line_to(self, p: DVec2) -> Self {
        self.l(p.x, p.y)
    }

    pub fn quad_to(self, control: DVec2, p: DVec2) -> Self {
        self.q(control.x, control.y, p.x, p.y)
    }

    pub fn cubic_to(self, c1: DVec2, c2: DVec2, p: DVec2) -> Self {
        self.c(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Count of commands with the given SVG letter
    pub fn count(&self, letter: char) -> usize {
        self.commands
            .iter()
            .filter(|cmd| match cmd {
                PathCommand::Move(_) => letter == 'M',
                PathCommand::Line(_) => letter == 'L',
                PathCommand::Quad(..) => letter == 'Q',
                PathCommand::Cubic(..) => letter == 'C',
                PathCommand::Close => letter == 'Z',
            })
            .count()
    }
}

struct Pt(DVec2);

impl fmt::Display for Pt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0.x, self.0.y)
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PathCommand::Move(p) => write!(f, "M {}", Pt(p)),
            PathCommand::Line(p) => write!(f, "L {}", Pt(p)),
            PathCommand::Quad(c, p) => write!(f, "Q {}, {}", Pt(c), Pt(p)),
            PathCommand::Cubic(c1, c2, p) => write!(f, "C {}, {}, {}", Pt(c1), Pt(c2), Pt(p)),
            PathCommand::Close => f.write_str("Z"),
        }
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{cmd}")?;
        }
        Ok(())
    }
}

impl From<PathData> for String {
    fn from(path: PathData) -> Self {
        path.to_string()
    }
}

/// Axis a displacement mostly travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Right,
    Left,
    Down,
    Up,
}

impl Heading {
    /// Heading of a displacement vector
    ///
    /// Diagonal ties resolve toward the x axis when moving left (the zero
    /// vector counts as `Left`) but toward the y axis when moving right.
    pub fn from_vector(v: DVec2) -> Self {
        if v.x > v.y.abs() {
            Heading::Right
        } else if v.x <= -v.y.abs() {
            Heading::Left
        } else if v.y > 0.0 {
            Heading::Down
        } else {
            Heading::Up
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Heading::Right | Heading::Left)
    }
}

/// Pull `p` toward `toward` by `amount` along the given axis
fn inset_along(p: DVec2, toward: DVec2, horizontal: bool, amount: f64) -> DVec2 {
    if horizontal {
        let x = if toward.x < p.x { p.x - amount } else { p.x + amount };
        dvec2(x, p.y)
    } else {
        let y = if toward.y < p.y { p.y - amount } else { p.y + amount };
        dvec2(p.x, y)
    }
}

/// Build an orthogonal polyline path with quadratic corners
///
/// Each interior vertex is replaced by a `Q` curve whose inset is capped at
/// half of both adjacent segments, so neighbouring corners never overlap.
pub fn elbow_path(points: &[DVec2], corner_radius: f64) -> PathData {
    let Some((&first, rest)) = points.split_first() else {
        return PathData::new();
    };
    let mut path = PathData::new().move_to(first);
    if rest.is_empty() {
        return path;
    }

    for window in points.windows(3) {
        let [prev, p, next] = [window[0], window[1], window[2]];
        let incoming = Heading::from_vector(p - prev);
        let outgoing = Heading::from_vector(next - p);

        let corner = corner_radius
            .min(p.distance(next) / 2.0)
            .min(p.distance(prev) / 2.0);

        let before = inset_along(p, prev, incoming.is_horizontal(), corner);
        let after = inset_along(p, next, outgoing.is_horizontal(), corner);

        path = path.line_to(before).quad_to(p, after);
    }

    match points.last() {
        Some(&last) => path.line_to(last),
        None => path,
    }
}
