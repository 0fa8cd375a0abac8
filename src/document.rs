//! Document model: the element array plus background, frame and grid config.
//!
//! Array order is paint order: index 0 is drawn first (backmost), the last
//! element is on top.

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

use serde::{Deserialize, Serialize};

use crate::consts::GRID_STEP;
use crate::element::Element;

/// Gradient geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
}

/// One colour stop; `offset` is in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: String,
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Gradient {
    #[serde(default)]
    pub kind: GradientKind,
    /// Direction of a linear gradient in degrees.
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    /// CSS `background-image` value for this gradient.
    #[must_use]
    pub fn to_css(&self) -> String {
        let stops: Vec<String> = self
            .stops
            .iter()
            .map(|s| format!("{} {}%", s.color, (s.offset.clamp(0.0, 1.0) * 100.0).round()))
            .collect();
        match self.kind {
            GradientKind::Linear => format!("linear-gradient({}deg, {})", self.angle, stops.join(", ")),
            GradientKind::Radial => format!("radial-gradient(circle, {})", stops.join(", ")),
        }
    }
}

/// Frame background: a colour, optionally overlaid by an image or gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
}

impl Default for Background {
    fn default() -> Self {
        Self { color: "#FFFFFF".to_owned(), image: None, gradient: None }
    }
}

/// A named target canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Built-in social platform sizes.
pub const FRAME_PRESETS: &[FramePreset] = &[
    FramePreset { id: "instagram-post", name: "Instagram Post", width: 1080, height: 1080 },
    FramePreset { id: "instagram-story", name: "Instagram Story", width: 1080, height: 1920 },
    FramePreset { id: "facebook-post", name: "Facebook Post", width: 1200, height: 630 },
    FramePreset { id: "twitter-post", name: "X Post", width: 1600, height: 900 },
    FramePreset { id: "linkedin-post", name: "LinkedIn Post", width: 1200, height: 627 },
    FramePreset { id: "youtube-thumbnail", name: "YouTube Thumbnail", width: 1280, height: 720 },
    FramePreset { id: "pinterest-pin", name: "Pinterest Pin", width: 1000, height: 1500 },
];

/// Look up a built-in preset by id.
#[must_use]
pub fn frame_preset(id: &str) -> Option<&'static FramePreset> {
    FRAME_PRESETS.iter().find(|p| p.id == id)
}

/// The pixel canvas a document targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    #[must_use]
    pub fn from_preset(preset: &FramePreset) -> Self {
        Self {
            id: preset.id.to_owned(),
            name: preset.name.to_owned(),
            width: preset.width,
            height: preset.height,
        }
    }

    #[must_use]
    pub fn width_px(&self) -> f64 {
        f64::from(self.width)
    }

    #[must_use]
    pub fn height_px(&self) -> f64 {
        f64::from(self.height)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::from_preset(&FRAME_PRESETS[0])
    }
}

/// Per-document editor preferences, persisted with the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    #[serde(default)]
    pub grid_visible: bool,
    #[serde(default = "default_snap")]
    pub snap_enabled: bool,
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
}

fn default_snap() -> bool {
    true
}

fn default_grid_size() -> f64 {
    GRID_STEP
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { grid_visible: false, snap_enabled: default_snap(), grid_size: default_grid_size() }
    }
}

/// The full editable unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub elements: Vec<Element>,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub frame: Frame,
    #[serde(default)]
    pub config: GridConfig,
}

impl Document {
    /// Empty document targeting `frame`.
    #[must_use]
    pub fn with_frame(frame: Frame) -> Self {
        Self { frame, ..Self::default() }
    }

    #[must_use]
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }
}
