//! Percentage-space geometry: boxes, resize handles, resize and rotation math.
//!
//! Every function here is pure. Boxes are expressed in percent of the frame
//! (0–100 on both axes) except where a name says `px` or `screen`.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in either screen or percentage space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in percentage space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// Smallest box containing every input box. `None` for an empty input.
    #[must_use]
    pub fn union<I>(rects: I) -> Option<Rect>
    where
        I: IntoIterator<Item = Rect>,
    {
        let mut iter = rects.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.right(), first.bottom());
        for r in iter {
            min_x = min_x.min(r.x);
            min_y = min_y.min(r.y);
            max_x = max_x.max(r.right());
            max_y = max_y.max(r.bottom());
        }
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Map this box from `from`'s coordinate frame into `to`'s, scaling
    /// offsets and extents proportionally.
    #[must_use]
    pub fn remap(&self, from: Rect, to: Rect) -> Rect {
        let sx = if from.width > 0.0 { to.width / from.width } else { 1.0 };
        let sy = if from.height > 0.0 { to.height / from.height } else { 1.0 };
        Rect::new(
            to.x + (self.x - from.x) * sx,
            to.y + (self.y - from.y) * sy,
            self.width * sx,
            self.height * sy,
        )
    }

    /// Convert to pixel space for a frame of the given pixel size.
    #[must_use]
    pub fn to_px(&self, frame_width: f64, frame_height: f64) -> Rect {
        Rect::new(
            self.x / 100.0 * frame_width,
            self.y / 100.0 * frame_height,
            self.width / 100.0 * frame_width,
            self.height / 100.0 * frame_height,
        )
    }
}

/// Which of the eight resize handles is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }

    /// Whether dragging this handle moves the left edge.
    fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }
}

/// Minimum box extents enforced by resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeFloor {
    pub width: f64,
    pub height: f64,
}

/// Compute the box produced by dragging `handle` by (`dx`, `dy`) percentage
/// points from `start`.
///
/// In free mode each handle moves only its own edges. With `aspect_locked` a
/// corner handle scales the box uniformly: the axis with the larger movement
/// drives the new size, the other follows the start aspect ratio, and the
/// opposite corner stays fixed. Edge handles ignore the lock.
///
/// Width/height never drop below `floor`; x/y never drop below 0.
#[must_use]
pub fn resize(start: Rect, handle: ResizeHandle, dx: f64, dy: f64, aspect_locked: bool, floor: SizeFloor) -> Rect {
    let (width, height) = if aspect_locked && handle.is_corner() && start.width > 0.0 && start.height > 0.0 {
        locked_extent(start, handle, dx, dy, floor)
    } else {
        let mut w = start.width;
        let mut h = start.height;
        if handle.moves_right() {
            w += dx;
        } else if handle.moves_left() {
            w -= dx;
        }
        if handle.moves_bottom() {
            h += dy;
        } else if handle.moves_top() {
            h -= dy;
        }
        (w.max(floor.width), h.max(floor.height))
    };

    // The edge opposite the dragged one stays where it was.
    let x = if handle.moves_left() { start.right() - width } else { start.x };
    let y = if handle.moves_top() { start.bottom() - height } else { start.y };

    Rect::new(x.max(0.0), y.max(0.0), width, height)
}

fn locked_extent(start: Rect, handle: ResizeHandle, dx: f64, dy: f64, floor: SizeFloor) -> (f64, f64) {
    let ratio = start.width / start.height;
    let sx = if handle.moves_left() { -1.0 } else { 1.0 };
    let sy = if handle.moves_top() { -1.0 } else { 1.0 };

    let (mut w, mut h) = if dx.abs() >= dy.abs() {
        let w = start.width + sx * dx;
        (w, w / ratio)
    } else {
        let h = start.height + sy * dy;
        (h * ratio, h)
    };

    // Grow uniformly until both floors are met so the ratio survives clamping.
    let scale = (floor.width / w).max(floor.height / h).max(1.0);
    if w <= 0.0 || h <= 0.0 || !scale.is_finite() {
        let scale = (floor.width / start.width).max(floor.height / start.height);
        return (start.width * scale, start.height * scale);
    }
    w *= scale;
    h *= scale;
    (w, h)
}

/// Normalize an angle in degrees into `[0, 360)`. Non-finite input maps to 0.
#[must_use]
pub fn normalize_rotation(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360.
    if r >= 360.0 { 0.0 } else { r }
}

/// Rotation of an element whose top handle is being dragged to `pointer`.
///
/// The angle is measured from the element's screen-space `center`, with a
/// pointer straight above the center reading as 0°. With `snap_step` the
/// result is rounded to the nearest multiple of the step.
#[must_use]
pub fn rotation_from_pointer(center: Point, pointer: Point, snap_step: Option<f64>) -> f64 {
    let raw = (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees() + 90.0;
    let deg = match snap_step {
        Some(step) if step > 0.0 => (raw / step).round() * step,
        _ => raw,
    };
    normalize_rotation(deg)
}

/// Convert a screen-pixel delta into percentage points of a frame axis
/// displayed at `zoom`.
#[must_use]
pub fn px_to_pct(delta_px: f64, frame_px: f64, zoom: f64) -> f64 {
    let scale = frame_px * zoom;
    if scale <= 0.0 { 0.0 } else { delta_px / scale * 100.0 }
}
