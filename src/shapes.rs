//! Shape outlines for shape fills and image masks.
//!
//! [`shape_path`] maps a [`ShapeKind`] to a deterministic outline in the
//! element's own box, using 0–100 percentage coordinates on both axes so the
//! same outline serves any element size. Star and burst outlines are generated
//! parametrically from their point count.

#[cfg(test)]
#[path = "shapes_test.rs"]
mod shapes_test;

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

use crate::consts::{BURST_INNER_RATIO, DEFAULT_BURST_POINTS, DEFAULT_STAR_POINTS, STAR_INNER_RATIO};
use crate::geometry::Point;

/// Smallest point count a star/burst can have.
const MIN_POINTS: u32 = 3;

/// Largest point count a star/burst can have.
const MAX_POINTS: u32 = 64;

/// Corner radius of a rounded rectangle, percent of the box.
const ROUNDED_RADIUS: f64 = 12.0;

/// The outline family of a shape element or image mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Rectangle,
    RoundedRectangle,
    Circle,
    Triangle,
    Diamond,
    Pentagon,
    Hexagon,
    Star,
    Burst,
    Heart,
    Arrow,
}

impl ShapeKind {
    /// Parse a wire tag. Accepts a few legacy aliases.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "rectangle" | "rect" | "square" => Self::Rectangle,
            "rounded-rectangle" | "rounded" => Self::RoundedRectangle,
            "circle" | "ellipse" => Self::Circle,
            "triangle" => Self::Triangle,
            "diamond" => Self::Diamond,
            "pentagon" => Self::Pentagon,
            "hexagon" => Self::Hexagon,
            "star" => Self::Star,
            "burst" => Self::Burst,
            "heart" => Self::Heart,
            "arrow" => Self::Arrow,
            _ => return None,
        };
        Some(kind)
    }

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::RoundedRectangle => "rounded-rectangle",
            Self::Circle => "circle",
            Self::Triangle => "triangle",
            Self::Diamond => "diamond",
            Self::Pentagon => "pentagon",
            Self::Hexagon => "hexagon",
            Self::Star => "star",
            Self::Burst => "burst",
            Self::Heart => "heart",
            Self::Arrow => "arrow",
        }
    }
}

/// One step of a free-form outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PathCommand {
    Move { to: Point },
    Line { to: Point },
    Cubic { c1: Point, c2: Point, to: Point },
    Close,
}

/// Outline of a shape in its own 0–100 box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum ShapePath {
    /// The full box.
    Rect,
    /// The full box with rounded corners (radius in percent).
    Rounded(f64),
    /// The ellipse inscribed in the box.
    Ellipse,
    /// A closed polygon.
    Polygon(Vec<Point>),
    /// A closed path with curves.
    Path(Vec<PathCommand>),
}

/// Outline for `kind`. `points` only affects stars and bursts.
#[must_use]
pub fn shape_path(kind: ShapeKind, points: Option<u32>) -> ShapePath {
    match kind {
        ShapeKind::Rectangle => ShapePath::Rect,
        ShapeKind::RoundedRectangle => ShapePath::Rounded(ROUNDED_RADIUS),
        ShapeKind::Circle => ShapePath::Ellipse,
        ShapeKind::Triangle => polygon(&[(50.0, 0.0), (100.0, 100.0), (0.0, 100.0)]),
        ShapeKind::Diamond => polygon(&[(50.0, 0.0), (100.0, 50.0), (50.0, 100.0), (0.0, 50.0)]),
        ShapeKind::Pentagon => ShapePath::Polygon(regular_polygon(5)),
        ShapeKind::Hexagon => ShapePath::Polygon(regular_polygon(6)),
        ShapeKind::Star => ShapePath::Polygon(star_points(points.unwrap_or(DEFAULT_STAR_POINTS), STAR_INNER_RATIO)),
        ShapeKind::Burst => ShapePath::Polygon(star_points(points.unwrap_or(DEFAULT_BURST_POINTS), BURST_INNER_RATIO)),
        ShapeKind::Heart => ShapePath::Path(heart()),
        ShapeKind::Arrow => polygon(&[
            (0.0, 35.0),
            (60.0, 35.0),
            (60.0, 10.0),
            (100.0, 50.0),
            (60.0, 90.0),
            (60.0, 65.0),
            (0.0, 65.0),
        ]),
    }
}

fn polygon(coords: &[(f64, f64)]) -> ShapePath {
    ShapePath::Polygon(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
}

/// Vertex on the unit circle scaled into the 0–100 box, radius as a fraction of the half-box.
fn on_circle(angle: f64, radius: f64) -> Point {
    Point::new(50.0 + 50.0 * radius * angle.cos(), 50.0 + 50.0 * radius * angle.sin())
}

fn regular_polygon(sides: u32) -> Vec<Point> {
    (0..sides)
        .map(|i| on_circle(TAU * f64::from(i) / f64::from(sides) - FRAC_PI_2, 1.0))
        .collect()
}

/// `points` tips alternating between the outer radius and `inner_ratio` of it.
///
/// Vertex `i` of `2 * points` sits at angle `π·i/points`, rotated so the first
/// tip points straight up.
#[must_use]
pub fn star_points(points: u32, inner_ratio: f64) -> Vec<Point> {
    let n = points.clamp(MIN_POINTS, MAX_POINTS);
    (0..2 * n)
        .map(|i| {
            let angle = PI * f64::from(i) / f64::from(n) - FRAC_PI_2;
            let radius = if i % 2 == 0 { 1.0 } else { inner_ratio };
            on_circle(angle, radius)
        })
        .collect()
}

fn heart() -> Vec<PathCommand> {
    let p = Point::new;
    vec![
        PathCommand::Move { to: p(50.0, 95.0) },
        PathCommand::Cubic { c1: p(20.0, 75.0), c2: p(0.0, 55.0), to: p(3.0, 30.0) },
        PathCommand::Cubic { c1: p(8.0, 5.0), c2: p(40.0, 0.0), to: p(50.0, 22.0) },
        PathCommand::Cubic { c1: p(60.0, 0.0), c2: p(92.0, 5.0), to: p(97.0, 30.0) },
        PathCommand::Cubic { c1: p(100.0, 55.0), c2: p(80.0, 75.0), to: p(50.0, 95.0) },
        PathCommand::Close,
    ]
}

/// Round to two decimals for compact CSS/SVG output.
fn fmt_num(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl ShapePath {
    /// CSS `clip-path` value clipping an element's box to this outline.
    #[must_use]
    pub fn to_clip_path(&self) -> String {
        match self {
            Self::Rect => "inset(0)".to_owned(),
            Self::Rounded(r) => format!("inset(0 round {}%)", fmt_num(*r)),
            Self::Ellipse => "ellipse(50% 50% at 50% 50%)".to_owned(),
            Self::Polygon(points) => {
                let coords: Vec<String> = points
                    .iter()
                    .map(|pt| format!("{}% {}%", fmt_num(pt.x), fmt_num(pt.y)))
                    .collect();
                format!("polygon({})", coords.join(", "))
            }
            Self::Path(_) => format!("path('{}')", self.to_svg_path()),
        }
    }

    /// SVG path data in a 100×100 user space.
    #[must_use]
    pub fn to_svg_path(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Rect => out.push_str("M0 0 H100 V100 H0 Z"),
            Self::Rounded(r) => {
                let r = fmt_num(*r);
                let far = fmt_num(100.0 - r);
                out.push_str(&format!(
                    "M{r} 0 H{far} A{r} {r} 0 0 1 100 {r} V{far} A{r} {r} 0 0 1 {far} 100 \
                     H{r} A{r} {r} 0 0 1 0 {far} V{r} A{r} {r} 0 0 1 {r} 0 Z"
                ));
            }
            Self::Ellipse => out.push_str("M0 50 A50 50 0 1 0 100 50 A50 50 0 1 0 0 50 Z"),
            Self::Polygon(points) => {
                for (i, pt) in points.iter().enumerate() {
                    let op = if i == 0 { 'M' } else { 'L' };
                    out.push_str(&format!("{op}{} {} ", fmt_num(pt.x), fmt_num(pt.y)));
                }
                out.push('Z');
            }
            Self::Path(commands) => {
                for cmd in commands {
                    let segment = match cmd {
                        PathCommand::Move { to } => format!("M{} {} ", fmt_num(to.x), fmt_num(to.y)),
                        PathCommand::Line { to } => format!("L{} {} ", fmt_num(to.x), fmt_num(to.y)),
                        PathCommand::Cubic { c1, c2, to } => format!(
                            "C{} {} {} {} {} {} ",
                            fmt_num(c1.x),
                            fmt_num(c1.y),
                            fmt_num(c2.x),
                            fmt_num(c2.y),
                            fmt_num(to.x),
                            fmt_num(to.y)
                        ),
                        PathCommand::Close => "Z ".to_owned(),
                    };
                    out.push_str(&segment);
                }
                out.truncate(out.trim_end().len());
            }
        }
        out
    }
}
