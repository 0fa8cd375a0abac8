//! Persistence boundary: the JSON blob a document is stored as.
//!
//! `deserialize` is tolerant of older layouts (a bare array of elements is a
//! document with default background/frame/config) and repairs anything the
//! engine would never have produced itself: out-of-range geometry, duplicate
//! ids, and group bookkeeping that does not agree in both directions.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::Settings;
use crate::document::{Background, Document, Frame, GridConfig};
use crate::element::{Element, ElementId};
use crate::store::{normalize, refit_groups};
use crate::variants::PlatformVariant;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("malformed document json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a document object or an element array, found {0}")]
    Shape(&'static str),
}

/// Everything persisted for one design.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentBlob {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub frame: Frame,
    #[serde(default)]
    pub config: GridConfig,
    #[serde(default)]
    pub platform_variants: Vec<PlatformVariant>,
}

impl DocumentBlob {
    /// Split into the editable document and its variants.
    #[must_use]
    pub fn into_parts(self) -> (Document, Vec<PlatformVariant>) {
        let doc = Document {
            elements: self.elements,
            background: self.background,
            frame: self.frame,
            config: self.config,
        };
        (doc, self.platform_variants)
    }
}

/// Encode a blob as JSON.
///
/// # Errors
///
/// Returns an error if a style payload cannot be encoded.
pub fn serialize(blob: &DocumentBlob) -> Result<String, DocumentError> {
    Ok(serde_json::to_string(blob)?)
}

/// Decode and repair a persisted blob.
///
/// # Errors
///
/// Returns an error if the input is not JSON, is neither an object nor an
/// array, or holds an element without `id`/`type`.
pub fn deserialize(raw: &str, settings: &Settings) -> Result<DocumentBlob, DocumentError> {
    let value: Value = serde_json::from_str(raw)?;
    let mut blob = match value {
        Value::Array(_) => DocumentBlob { elements: serde_json::from_value(value)?, ..DocumentBlob::default() },
        Value::Object(_) => serde_json::from_value(value)?,
        Value::Null => return Err(DocumentError::Shape("null")),
        Value::Bool(_) => return Err(DocumentError::Shape("boolean")),
        Value::Number(_) => return Err(DocumentError::Shape("number")),
        Value::String(_) => return Err(DocumentError::Shape("string")),
    };
    repair(&mut blob.elements, settings);
    Ok(blob)
}

/// Bring loaded elements back in line with the engine's invariants.
fn repair(elements: &mut Vec<Element>, settings: &Settings) {
    let mut seen: HashSet<ElementId> = HashSet::new();
    for el in elements.iter_mut() {
        if el.id.is_empty() || !seen.insert(el.id.clone()) {
            let fresh = Uuid::new_v4().to_string();
            tracing::warn!(old = %el.id, new = %fresh, "duplicate element id reassigned");
            el.id.clone_from(&fresh);
            seen.insert(fresh);
        }
        let before = el.bounds();
        let rotation = el.rotation;
        normalize(el, settings);
        if el.bounds() != before || el.rotation.to_bits() != rotation.to_bits() {
            tracing::warn!(id = %el.id, "out-of-range geometry clamped");
        }
    }
    repair_groups(elements);

    let ids: HashSet<ElementId> = elements.iter().map(|e| e.id.clone()).collect();
    for el in elements.iter_mut() {
        if el.relative_to.as_ref().is_some_and(|r| !ids.contains(r) || *r == el.id) {
            tracing::warn!(id = %el.id, "dangling relativeTo cleared");
            el.relative_to = None;
        }
    }
}

/// Make `groupId` and `children` agree, and drop groups left with fewer
/// than two members.
fn repair_groups(elements: &mut Vec<Element>) {
    // A member counts only if it exists, is not itself a group, and does not
    // claim a different parent.
    let snapshot: Vec<(ElementId, bool, Option<ElementId>)> = elements
        .iter()
        .map(|e| (e.id.clone(), e.is_group(), e.group_id.clone()))
        .collect();
    let mut claimed: HashSet<ElementId> = HashSet::new();
    for group in elements.iter_mut().filter(|e| e.is_group()) {
        let gid = group.id.clone();
        let before = group.children.len();
        group.children.retain(|c| {
            let ok = snapshot.iter().any(|(id, is_group, parent)| {
                id == c && !is_group && parent.as_ref().is_none_or(|p| *p == gid)
            });
            ok && claimed.insert(c.clone())
        });
        if group.children.len() != before {
            tracing::warn!(id = %gid, dropped = before - group.children.len(), "invalid group members dropped");
        }
    }

    let dissolved: HashSet<ElementId> = elements
        .iter()
        .filter(|e| e.is_group() && e.children.len() < 2)
        .map(|e| e.id.clone())
        .collect();
    if !dissolved.is_empty() {
        tracing::warn!(count = dissolved.len(), "undersized groups dissolved");
        elements.retain(|e| !dissolved.contains(&e.id));
    }

    let membership: Vec<(ElementId, ElementId)> = elements
        .iter()
        .filter(|e| e.is_group())
        .flat_map(|g| g.children.iter().map(|c| (c.clone(), g.id.clone())))
        .collect();
    for el in elements.iter_mut() {
        let parent = membership.iter().find(|(c, _)| *c == el.id).map(|(_, g)| g.clone());
        if el.group_id != parent {
            if el.group_id.is_some() && parent.is_none() {
                tracing::warn!(id = %el.id, "dangling groupId cleared");
            }
            el.group_id = parent;
        }
        if !el.is_group() && !el.children.is_empty() {
            el.children.clear();
        }
    }
    refit_groups(elements);
}
