//! Snapping: grid/centerline snap and smart guides against other elements.
//!
//! Object snap runs first and wins; grid snap is only tried on an axis where
//! no element produced a guide.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use serde::{Deserialize, Serialize};

use crate::consts::CENTERLINE;
use crate::geometry::Rect;

/// Result of snapping a single coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    pub value: f64,
    pub snapped: bool,
}

impl Snapped {
    fn to(value: f64) -> Self {
        Self { value, snapped: true }
    }

    fn unchanged(value: f64) -> Self {
        Self { value, snapped: false }
    }
}

/// Snap `value` to the nearest grid line within `threshold`, else to the 50%
/// centerline within `threshold`, else pass it through.
#[must_use]
pub fn grid_snap(value: f64, step: f64, threshold: f64) -> Snapped {
    if step > 0.0 {
        let remainder = value.rem_euclid(step);
        if remainder < threshold {
            return Snapped::to(value - remainder);
        }
        if step - remainder < threshold {
            return Snapped::to(value + (step - remainder));
        }
    }
    if (value - CENTERLINE).abs() < threshold {
        return Snapped::to(CENTERLINE);
    }
    Snapped::unchanged(value)
}

/// Alignment lines to draw while a drag is snapped to other elements.
///
/// `vertical` is an x position, `horizontal` a y position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Guides {
    pub vertical: Option<f64>,
    pub horizontal: Option<f64>,
}

impl Guides {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }
}

/// Snapped position of a candidate box plus the guides that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOutcome {
    pub x: f64,
    pub y: f64,
    pub guides: Guides,
}

/// One axis of a box: start edge and extent.
#[derive(Clone, Copy)]
struct Span {
    start: f64,
    len: f64,
}

impl Span {
    fn end(self) -> f64 {
        self.start + self.len
    }

    fn mid(self) -> f64 {
        self.start + self.len / 2.0
    }
}

/// Check the alignment relations of `cand` against `other` in a fixed order
/// and return `(new_start, guide_line)` for the first that matches.
fn align_span(cand: Span, other: Span, threshold: f64) -> Option<(f64, f64)> {
    let near = |a: f64, b: f64| (a - b).abs() < threshold;
    if near(cand.start, other.start) {
        return Some((other.start, other.start));
    }
    if near(cand.start, other.end()) {
        return Some((other.end(), other.end()));
    }
    if near(cand.end(), other.start) {
        return Some((other.start - cand.len, other.start));
    }
    if near(cand.end(), other.end()) {
        return Some((other.end() - cand.len, other.end()));
    }
    if near(cand.mid(), other.mid()) {
        return Some((other.mid() - cand.len / 2.0, other.mid()));
    }
    None
}

/// Snap a candidate box's position to the edges and centers of `others`.
///
/// Each axis is resolved independently. Within one element the relations are
/// tried left-left, left-right, right-left, right-right, center-center and the
/// first match wins; across elements the last matching element wins. Matching
/// is always measured from the unsnapped candidate.
#[must_use]
pub fn object_snap<I>(candidate: Rect, others: I, threshold: f64) -> SnapOutcome
where
    I: IntoIterator<Item = Rect>,
{
    let cand_x = Span { start: candidate.x, len: candidate.width };
    let cand_y = Span { start: candidate.y, len: candidate.height };
    let mut outcome = SnapOutcome { x: candidate.x, y: candidate.y, guides: Guides::default() };

    for other in others {
        if let Some((x, line)) = align_span(cand_x, Span { start: other.x, len: other.width }, threshold) {
            outcome.x = x;
            outcome.guides.vertical = Some(line);
        }
        if let Some((y, line)) = align_span(cand_y, Span { start: other.y, len: other.height }, threshold) {
            outcome.y = y;
            outcome.guides.horizontal = Some(line);
        }
    }
    outcome
}

/// Grid parameters for [`snap_position`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSnap {
    pub step: f64,
    pub threshold: f64,
}

/// Full drag snap: object snap first, then grid snap on any axis without a guide.
#[must_use]
pub fn snap_position<I>(candidate: Rect, others: I, object_threshold: f64, grid: Option<GridSnap>) -> SnapOutcome
where
    I: IntoIterator<Item = Rect>,
{
    let mut outcome = object_snap(candidate, others, object_threshold);
    if let Some(grid) = grid {
        if outcome.guides.vertical.is_none() {
            outcome.x = grid_snap(outcome.x, grid.step, grid.threshold).value;
        }
        if outcome.guides.horizontal.is_none() {
            outcome.y = grid_snap(outcome.y, grid.step, grid.threshold).value;
        }
    }
    outcome
}
