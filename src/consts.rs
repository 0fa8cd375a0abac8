//! Shared numeric constants for the editor core.
//!
//! All geometry values are in percentage space (0–100 of the frame) unless the
//! name says otherwise. Runtime-tunable values are defaults for
//! [`crate::config::Settings`]; the engine reads them through the settings.

// ── Geometry floors ─────────────────────────────────────────────

/// Smallest width an element may be resized or updated to.
pub const MIN_WIDTH: f64 = 5.0;

/// Smallest height an element may be resized or updated to.
pub const MIN_HEIGHT: f64 = 3.0;

/// Largest x/y an element may be dragged or updated to, so a sliver stays grabbable.
pub const MAX_POSITION: f64 = 95.0;

// ── Snapping ────────────────────────────────────────────────────

/// Default grid step.
pub const GRID_STEP: f64 = 5.0;

/// Distance within which a value snaps to a grid line or the centerline.
pub const GRID_THRESHOLD: f64 = 2.0;

/// Distance within which an edge or center snaps to another element.
pub const OBJECT_SNAP_THRESHOLD: f64 = 0.5;

/// Frame centerline.
pub const CENTERLINE: f64 = 50.0;

/// Step for modifier-held rotation snapping, in degrees.
pub const ROTATION_SNAP_DEG: f64 = 15.0;

// ── Mutation offsets ────────────────────────────────────────────

/// Offset applied to a duplicated element, on both axes.
pub const DUPLICATE_OFFSET: f64 = 3.0;

/// Offset applied to a pasted element relative to the copied original.
pub const PASTE_OFFSET: f64 = 5.0;

/// Gap between an anchored element and the element it follows.
pub const ANCHOR_GAP: f64 = 2.0;

/// Keyboard nudge step; shift multiplies it by ten.
pub const NUDGE_STEP: f64 = 1.0;

// ── Auto-scale heuristic ────────────────────────────────────────

/// Assumed pixel width of the canvas when estimating rendered text width.
pub const AUTOSCALE_REFERENCE_PX: f64 = 1000.0;

/// Average glyph width as a fraction of the font size.
pub const GLYPH_WIDTH_RATIO: f64 = 0.55;

/// Auto-scale never shrinks text below this font size.
pub const MIN_FONT_SIZE: f64 = 10.0;

/// Font size given to text elements that do not carry one.
pub const DEFAULT_FONT_SIZE: f64 = 32.0;

// ── History / viewport ──────────────────────────────────────────

/// Maximum number of retained history snapshots.
pub const HISTORY_DEPTH: usize = 50;

/// Zoom limits for the editor viewport.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

// ── Shapes ──────────────────────────────────────────────────────

/// Inner-to-outer radius ratio for star paths.
pub const STAR_INNER_RATIO: f64 = 0.5;

/// Inner-to-outer radius ratio for burst (seal) paths.
pub const BURST_INNER_RATIO: f64 = 0.8;

/// Point count used when a star carries none.
pub const DEFAULT_STAR_POINTS: u32 = 5;

/// Point count used when a burst carries none.
pub const DEFAULT_BURST_POINTS: u32 = 12;
