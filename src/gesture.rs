//! Gesture model: modifier keys and the in-progress transform state machine.
//!
//! A gesture is captured on pointer-down with a baseline snapshot of the
//! element array and the pointer's screen position. Every pointer-move
//! recomputes geometry from that baseline plus the cumulative pointer delta,
//! never from the previous frame. Release commits; Escape restores the
//! baseline.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::element::{Element, ElementId};
use crate::geometry::{Point, Rect, ResizeHandle};

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift: aspect lock while resizing, 15° steps while rotating, 10× nudge.
    pub shift: bool,
    pub ctrl: bool,
    /// Alt / Option: move without snapping.
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    #[must_use]
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// The transform currently being tracked between pointer-down and release.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging one or more elements.
    Moving {
        /// Screen-space pointer position at pointer-down.
        start: Point,
        /// Top-level elements being moved with their boxes at pointer-down.
        /// The first entry drives snapping.
        origins: Vec<(ElementId, Rect)>,
        baseline: Vec<Element>,
    },
    /// Dragging one of the eight resize handles.
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        start: Point,
        /// Element box at pointer-down.
        origin: Rect,
        baseline: Vec<Element>,
    },
    /// Dragging the rotate handle.
    Rotating {
        id: ElementId,
        /// Screen-space center of the element; the rotation pivot.
        center: Point,
        baseline: Vec<Element>,
    },
}

impl Gesture {
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Element array captured when the gesture began.
    #[must_use]
    pub fn baseline(&self) -> Option<&[Element]> {
        match self {
            Self::Idle => None,
            Self::Moving { baseline, .. } | Self::Resizing { baseline, .. } | Self::Rotating { baseline, .. } => {
                Some(baseline)
            }
        }
    }
}
