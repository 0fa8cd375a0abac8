//! Scene: a pixel-space, paint-ordered view of a document for the rendering
//! and export collaborators.
//!
//! The core never paints. [`build_scene`] resolves everything a painter would
//! otherwise have to re-derive (visibility through groups, percentage to pixel
//! conversion, shape outlines and image masks) and an [`Exporter`] turns the
//! result into encoded bytes.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::document::{Background, Document, Frame};
use crate::element::{Element, ElementId, ElementKind};
use crate::geometry::Rect;
use crate::shapes::{ShapePath, shape_path};

/// Default encoder quality for lossy formats.
const DEFAULT_QUALITY: f64 = 0.92;

/// One element ready to paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneItem {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Box in output pixels, before rotation.
    pub rect: Rect,
    /// Clockwise degrees about the box center.
    pub rotation: f64,
    pub opacity: f64,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Outline to clip the box to: the shape itself, or an image's mask.
    pub clip: Option<ShapePath>,
    /// Style payload, passed through untouched.
    pub props: Map<String, Value>,
}

/// Everything needed to paint a document at a given pixel size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub width_px: f64,
    pub height_px: f64,
    pub background: Background,
    /// Back to front.
    pub items: Vec<SceneItem>,
}

/// Flatten a document into draw items at `width_px` × `height_px`.
///
/// Group elements are containers only and produce no item. Hidden elements
/// are skipped, and so are members of a hidden group.
#[must_use]
pub fn build_scene(doc: &Document, width_px: f64, height_px: f64) -> Scene {
    let hidden_groups: HashSet<&str> = doc
        .elements
        .iter()
        .filter(|e| e.is_group() && !e.visible)
        .map(|e| e.id.as_str())
        .collect();

    let items = doc
        .elements
        .iter()
        .filter(|e| e.visible && !e.is_group())
        .filter(|e| e.group_id.as_deref().is_none_or(|g| !hidden_groups.contains(g)))
        .map(|e| scene_item(e, width_px, height_px))
        .collect();

    Scene { width_px, height_px, background: doc.background.clone(), items }
}

fn scene_item(el: &Element, width_px: f64, height_px: f64) -> SceneItem {
    let style = el.style();
    let clip = match el.kind {
        ElementKind::Shape => Some(shape_path(style.shape_kind(), style.points())),
        ElementKind::Image => style.mask().map(|mask| shape_path(mask, style.points())),
        ElementKind::Text | ElementKind::Icon | ElementKind::Group => None,
    };
    SceneItem {
        id: el.id.clone(),
        kind: el.kind,
        rect: el.bounds().to_px(width_px, height_px),
        rotation: el.rotation,
        opacity: el.opacity,
        flip_x: el.flip_x,
        flip_y: el.flip_y,
        clip,
        props: el.props.clone(),
    }
}

/// Encoded output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    /// Whether `quality` affects the encoding.
    #[must_use]
    pub fn is_lossy(self) -> bool {
        !matches!(self, Self::Png)
    }
}

/// Target resolution and encoding for one export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub width_px: u32,
    pub height_px: u32,
    pub format: ImageFormat,
    /// Encoder quality in `[0, 1]`; ignored by lossless formats.
    pub quality: f64,
}

impl ExportRequest {
    /// Export at the frame's native pixel size.
    #[must_use]
    pub fn for_frame(frame: &Frame, format: ImageFormat) -> Self {
        Self { width_px: frame.width, height_px: frame.height, format, quality: DEFAULT_QUALITY }
    }

    /// Multiply the output size (HD export).
    #[must_use]
    pub fn scaled(self, factor: u32) -> Self {
        let factor = factor.max(1);
        Self {
            width_px: self.width_px.saturating_mul(factor),
            height_px: self.height_px.saturating_mul(factor),
            ..self
        }
    }

    #[must_use]
    pub fn with_quality(self, quality: f64) -> Self {
        let quality = if quality.is_finite() { quality.clamp(0.0, 1.0) } else { DEFAULT_QUALITY };
        Self { quality, ..self }
    }
}

/// Encoder collaborator. Implementations live outside the core.
pub trait Exporter {
    type Error: std::error::Error;

    /// Encode `scene` as described by `request`.
    ///
    /// # Errors
    ///
    /// Whatever the encoder reports.
    fn export(&self, scene: &Scene, request: &ExportRequest) -> Result<Vec<u8>, Self::Error>;
}
