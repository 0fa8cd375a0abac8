//! Platform variants: one master layout, many frame sizes.
//!
//! A variant stores only a narrow override record per element (position,
//! visibility, font size). Entering a variant rebuilds the live elements from
//! the master snapshot plus those overrides; leaving it re-records the
//! overrides from the live state. A variant entered for the first time gets a
//! smart relayout instead, so images, shapes and icons keep their pixel aspect
//! ratio on the new frame.

#[cfg(test)]
#[path = "variants_test.rs"]
mod variants_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::document::{Frame, FramePreset};
use crate::element::{Element, ElementId};
use crate::config::Settings;
use crate::store::{DocStore, normalize, refit_groups};

/// Per-element override held by a variant. Absent fields fall back to master.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl ElementOverride {
    /// Record the overridable fields of a live element.
    #[must_use]
    pub fn capture(el: &Element) -> Self {
        Self {
            x: Some(el.x),
            y: Some(el.y),
            visible: Some(el.visible),
            font_size: el.props.get("fontSize").and_then(Value::as_f64),
        }
    }

    /// Apply onto a master copy of the element.
    pub fn apply(&self, el: &mut Element) {
        if let Some(x) = self.x {
            el.x = x;
        }
        if let Some(y) = self.y {
            el.y = y;
        }
        if let Some(visible) = self.visible {
            el.visible = visible;
        }
        if let Some(size) = self.font_size {
            el.set_font_size(size);
        }
    }
}

/// An alternate frame size with its own positional overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformVariant {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub overrides: BTreeMap<ElementId, ElementOverride>,
}

impl PlatformVariant {
    #[must_use]
    pub fn from_preset(preset: &FramePreset) -> Self {
        Self {
            id: preset.id.to_owned(),
            name: preset.name.to_owned(),
            width: preset.width,
            height: preset.height,
            overrides: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame { id: self.id.clone(), name: self.name.clone(), width: self.width, height: self.height }
    }
}

/// Recompute heights of aspect-keeping elements moved from frame `from` to
/// frame `to`: width percent is kept, height percent is recalculated so the
/// element's pixel aspect ratio survives. Text is left alone.
///
/// A height that would fall under the size floor is raised to it, and the
/// width grows by the same factor.
pub fn smart_relayout(elements: &mut [Element], from: &Frame, to: &Frame, settings: &Settings) {
    let (fw, fh, tw, th) = (from.width_px(), from.height_px(), to.width_px(), to.height_px());
    if fw <= 0.0 || fh <= 0.0 || tw <= 0.0 || th <= 0.0 {
        return;
    }
    for el in elements.iter_mut().filter(|e| e.kind.keeps_aspect()) {
        let px_w = el.width / 100.0 * fw;
        let px_h = el.height / 100.0 * fh;
        if px_w <= 0.0 || px_h <= 0.0 {
            continue;
        }
        let ratio = px_w / px_h;
        let new_px_w = el.width / 100.0 * tw;
        el.height = new_px_w / ratio / th * 100.0;
        if el.height < settings.min_height {
            el.width *= settings.min_height / el.height;
            el.height = settings.min_height;
        }
        normalize(el, settings);
    }
    refit_groups(elements);
}

/// Tracks the master layout and which variant, if any, is live in the store.
#[derive(Debug, Clone, Default)]
pub struct VariantResolver {
    variants: Vec<PlatformVariant>,
    active: Option<String>,
    master_elements: Vec<Element>,
    master_frame: Frame,
}

impl VariantResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver over persisted variants, starting in master context.
    #[must_use]
    pub fn from_variants(variants: Vec<PlatformVariant>) -> Self {
        Self { variants, ..Self::default() }
    }

    #[must_use]
    pub fn variants(&self) -> &[PlatformVariant] {
        &self.variants
    }

    #[must_use]
    pub fn variant(&self, id: &str) -> Option<&PlatformVariant> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// Id of the live variant; `None` while editing master.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Add a variant for a built-in preset. Returns the existing id if the
    /// preset already has a variant.
    pub fn create_variant(&mut self, preset: &FramePreset) -> String {
        if self.variant(preset.id).is_none() {
            self.variants.push(PlatformVariant::from_preset(preset));
            tracing::info!(id = preset.id, "platform variant created");
        }
        preset.id.to_owned()
    }

    /// Add a variant with a custom frame size.
    pub fn create_custom_variant(&mut self, name: &str, width: u32, height: u32) -> String {
        let id = Uuid::new_v4().to_string();
        self.variants.push(PlatformVariant {
            id: id.clone(),
            name: name.to_owned(),
            width: width.max(1),
            height: height.max(1),
            overrides: BTreeMap::new(),
        });
        tracing::info!(%id, width, height, "custom platform variant created");
        id
    }

    /// Remove a variant, switching back to master first if it is live.
    pub fn delete_variant(&mut self, id: &str, store: &mut DocStore) -> bool {
        let Some(pos) = self.variants.iter().position(|v| v.id == id) else {
            return false;
        };
        if self.active.as_deref() == Some(id) {
            self.switch_to(None, store);
        }
        self.variants.remove(pos);
        tracing::info!(%id, "platform variant deleted");
        true
    }

    /// Forget a variant's overrides. A live variant is relaid out from master.
    pub fn reset_variant_overrides(&mut self, id: &str, store: &mut DocStore) -> bool {
        let Some(variant) = self.variants.iter_mut().find(|v| v.id == id) else {
            return false;
        };
        variant.overrides.clear();
        if self.active.as_deref() == Some(id) {
            self.enter(store);
        }
        true
    }

    /// Make `target` (a variant id, or `None` for master) the live context.
    ///
    /// Leaving master snapshots it; leaving a variant re-records that
    /// variant's overrides in full. Returns `false` if nothing changed.
    pub fn switch_to(&mut self, target: Option<&str>, store: &mut DocStore) -> bool {
        if self.active.as_deref() == target {
            return false;
        }
        if let Some(id) = target {
            if self.variant(id).is_none() {
                return false;
            }
        }

        if self.active.is_none() {
            self.master_elements = store.snapshot();
            self.master_frame = store.document().frame.clone();
        } else {
            self.record_overrides(store);
        }

        let from = self.active.take();
        self.active = target.map(str::to_owned);
        self.enter(store);
        tracing::info!(from = ?from, to = ?self.active, "platform context switched");
        true
    }

    /// Master elements, taking the live store when master is active.
    #[must_use]
    pub fn master_elements(&self, store: &DocStore) -> Vec<Element> {
        match self.active {
            None => store.snapshot(),
            Some(_) => self.master_elements.clone(),
        }
    }

    #[must_use]
    pub fn master_frame(&self, store: &DocStore) -> Frame {
        match self.active {
            None => store.document().frame.clone(),
            Some(_) => self.master_frame.clone(),
        }
    }

    /// Variants with the live variant's overrides freshly recorded.
    #[must_use]
    pub fn synced_variants(&self, store: &DocStore) -> Vec<PlatformVariant> {
        let mut variants = self.variants.clone();
        if let Some(active) = self.active.as_deref() {
            if let Some(v) = variants.iter_mut().find(|v| v.id == active) {
                v.overrides = capture_all(store.elements());
            }
        }
        variants
    }

    fn record_overrides(&mut self, store: &DocStore) {
        let Some(active) = self.active.as_deref() else {
            return;
        };
        if let Some(v) = self.variants.iter_mut().find(|v| v.id == active) {
            v.overrides = capture_all(store.elements());
        }
    }

    /// Load the active context into the store.
    fn enter(&self, store: &mut DocStore) {
        let mut elements = self.master_elements.clone();
        let Some(variant) = self.active.as_deref().and_then(|id| self.variant(id)) else {
            store.replace_elements(elements);
            store.set_frame(self.master_frame.clone());
            return;
        };
        let frame = variant.frame();
        if variant.overrides.is_empty() {
            smart_relayout(&mut elements, &self.master_frame, &frame, store.settings());
        } else {
            for el in &mut elements {
                if let Some(o) = variant.overrides.get(&el.id) {
                    o.apply(el);
                }
            }
            refit_groups(&mut elements);
        }
        store.replace_elements(elements);
        store.set_frame(frame);
    }
}

fn capture_all(elements: &[Element]) -> BTreeMap<ElementId, ElementOverride> {
    elements
        .iter()
        .map(|e| (e.id.clone(), ElementOverride::capture(e)))
        .collect()
}
