//! Document model and editing engine for a poster/social-post design editor.
//!
//! The crate owns everything with real invariants behind the editor UI: the
//! element model, the mutation engine and its derived effects (group follow,
//! text auto-scale, anchor follow), snapshot undo/redo, drag/resize/rotate
//! geometry with grid and smart-guide snapping, and multi-platform variants.
//! Painting, persistence and image encoding are collaborators: the crate
//! hands them a [`scene::Scene`] or a JSON blob and never does I/O itself.
//!
//! All element geometry is in percentage space (0–100 of the frame on both
//! axes), so a document is resolution-independent until it is rendered.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`editor`] | Per-document session: store + history + variants + gestures |
//! | [`store`] | Mutation engine, selection, clipboard and viewport |
//! | [`element`] | Element types, sparse patches and style accessors |
//! | [`document`] | Document, background, frame presets and grid config |
//! | [`history`] | Bounded snapshot undo/redo stack |
//! | [`geometry`] | Boxes, resize handles, rotation and unit conversion |
//! | [`snap`] | Grid/centerline snap and object smart guides |
//! | [`gesture`] | Modifier keys and the in-flight gesture state |
//! | [`shapes`] | Shape outlines for shape fills and image masks |
//! | [`variants`] | Platform variants and smart relayout |
//! | [`scene`] | Pixel-space draw list and the exporter seam |
//! | [`persist`] | JSON blob encode/decode with repair of legacy input |
//! | [`gate`] | Tier/role feature gate |
//! | [`config`] | Runtime tunables, overridable from the environment |
//! | [`consts`] | Default values for the tunables |

pub mod config;
pub mod consts;
pub mod document;
pub mod editor;
pub mod element;
pub mod gate;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod persist;
pub mod scene;
pub mod shapes;
pub mod snap;
pub mod store;
pub mod variants;
