//! Mutation engine: the live document, selection, viewport and clipboard.
//!
//! `DocStore` is the only writer of the element array. Every public mutation
//! clamps geometry into range and then runs the derived-effect passes:
//!
//! - **Group follow**: a group's box change remaps its members; a member's box
//!   change refits its group around the members.
//! - **Auto-scale**: text with `autoScale` shrinks its font until the
//!   estimated run width fits the box.
//! - **Anchor follow**: elements with `relativeTo` pointing at a moved element
//!   are re-placed above or below it, transitively.
//!
//! Unknown ids and invalid states are absorbed: operations report what
//! happened through `bool`/`Option` and never fail.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Settings;
use crate::document::{Background, Document, Frame, GridConfig};
use crate::element::{Element, ElementId, ElementKind, ElementPatch};
use crate::geometry::{Rect, normalize_rotation};

/// Frame alignment targets for [`DocStore::align`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// On-screen display state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: 1.0, pan_x: 0.0, pan_y: 0.0 }
    }
}

/// Single-slot clipboard. A copied group carries its members.
#[derive(Debug, Clone)]
struct Clipboard {
    element: Element,
    members: Vec<Element>,
}

/// Target of a z-order step.
#[derive(Debug, Clone, Copy)]
enum Layer {
    Front,
    Back,
    Forward,
    Backward,
    At(usize),
}

/// The authoritative document plus its transient editing state.
#[derive(Debug, Clone)]
pub struct DocStore {
    doc: Document,
    selection: Vec<ElementId>,
    viewport: Viewport,
    clipboard: Option<Clipboard>,
    settings: Settings,
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

fn fresh_id() -> ElementId {
    Uuid::new_v4().to_string()
}

fn clamp_position(v: f64, max: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, max) } else { 0.0 }
}

fn floor_extent(v: f64, min: f64) -> f64 {
    if v.is_finite() { v.max(min) } else { min }
}

/// Bring an element's geometry back into range.
pub(crate) fn normalize(el: &mut Element, s: &Settings) {
    el.width = floor_extent(el.width, s.min_width);
    el.height = floor_extent(el.height, s.min_height);
    el.x = clamp_position(el.x, s.max_position);
    el.y = clamp_position(el.y, s.max_position);
    el.rotation = normalize_rotation(el.rotation);
    el.opacity = if el.opacity.is_finite() { el.opacity.clamp(0.0, 1.0) } else { 1.0 };
}

/// Resize every group to the union of its members.
pub(crate) fn refit_groups(elements: &mut [Element]) {
    let boxes: Vec<(usize, Rect)> = elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_group())
        .filter_map(|(i, g)| {
            let members = elements.iter().filter(|e| g.children.contains(&e.id)).map(Element::bounds);
            Rect::union(members).map(|r| (i, r))
        })
        .collect();
    for (i, rect) in boxes {
        elements[i].set_bounds(rect);
    }
}

impl DocStore {
    /// Empty document with the default frame.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self::with_document(Document::default(), settings)
    }

    #[must_use]
    pub fn with_document(doc: Document, settings: Settings) -> Self {
        Self { doc, selection: Vec::new(), viewport: Viewport::default(), clipboard: None, settings }
    }

    // --- Queries ---

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Elements in paint order, back to front.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.doc.elements
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.doc.element(id)
    }

    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.iter().any(|s| s == id)
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Deep copy of the element array for history.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Element> {
        self.doc.elements.clone()
    }

    // --- Whole-document replacement ---

    /// Swap in a new element array (undo/redo, platform switch). The
    /// selection keeps only ids that still exist.
    pub fn replace_elements(&mut self, elements: Vec<Element>) {
        self.doc.elements = elements;
        self.prune_selection();
    }

    /// Swap in a whole document and drop all transient state except the viewport.
    pub fn load(&mut self, doc: Document) {
        self.doc = doc;
        self.selection.clear();
        self.clipboard = None;
    }

    // --- Create ---

    /// Append a new element built from the kind's skeleton plus `patch`, and
    /// select it.
    pub fn add(&mut self, kind: ElementKind, patch: &ElementPatch) -> ElementId {
        let mut el = Element::skeleton(kind);
        el.id = fresh_id();
        el.apply(patch);
        normalize(&mut el, &self.settings);
        let id = el.id.clone();
        self.doc.elements.push(el);
        tracing::debug!(%id, ?kind, "element added");

        self.auto_scale(&id);
        self.place_relative(&id);
        self.selection = vec![id.clone()];
        id
    }

    // --- Update ---

    /// Shallow-merge `patch` into an element and run the derived effects.
    /// Returns `false` if the id is unknown.
    ///
    /// Locked elements still accept updates; only transforms check the lock.
    pub fn update(&mut self, id: &str, patch: &ElementPatch) -> bool {
        let Some(idx) = self.doc.index_of(id) else {
            return false;
        };
        let before = self.doc.elements[idx].bounds();
        let el = &mut self.doc.elements[idx];
        el.apply(patch);
        normalize(el, &self.settings);

        if patch.touches_text_fit() {
            self.auto_scale(id);
        }
        if patch.anchor.is_some() || patch.relative_to.is_some() {
            self.place_relative(id);
        }
        self.box_changed(id, before);
        true
    }

    pub fn set_locked(&mut self, id: &str, locked: bool) -> bool {
        self.update(id, &ElementPatch { locked: Some(locked), ..ElementPatch::default() })
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        self.update(id, &ElementPatch { visible: Some(visible), ..ElementPatch::default() })
    }

    /// Translate a set of elements. Locked elements are skipped, as are
    /// members whose group is also in the set (the group carries them).
    pub fn move_by(&mut self, ids: &[ElementId], dx: f64, dy: f64) -> bool {
        let set: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let mut moved = false;
        for id in ids {
            if !seen.insert(id.as_str()) {
                continue;
            }
            let Some(el) = self.get(id) else {
                continue;
            };
            if el.locked || el.group_id.as_deref().is_some_and(|g| set.contains(g)) {
                continue;
            }
            let patch = ElementPatch::position(el.x + dx, el.y + dy);
            moved |= self.update(id, &patch);
        }
        moved
    }

    /// Arrow-key nudge of the selection; `dx`/`dy` are step counts and
    /// `large` (shift) multiplies the step by ten.
    pub fn nudge_selection(&mut self, dx: f64, dy: f64, large: bool) -> bool {
        let step = if large { self.settings.nudge_step * 10.0 } else { self.settings.nudge_step };
        let ids = self.selection.clone();
        self.move_by(&ids, dx * step, dy * step)
    }

    /// Snap an element flush against a frame edge or center line.
    pub fn align(&mut self, id: &str, mode: AlignMode) -> bool {
        let Some(el) = self.get(id) else {
            return false;
        };
        if el.locked {
            return false;
        }
        let patch = match mode {
            AlignMode::Left => ElementPatch { x: Some(0.0), ..ElementPatch::default() },
            AlignMode::Center => ElementPatch { x: Some((100.0 - el.width) / 2.0), ..ElementPatch::default() },
            AlignMode::Right => ElementPatch { x: Some(100.0 - el.width), ..ElementPatch::default() },
            AlignMode::Top => ElementPatch { y: Some(0.0), ..ElementPatch::default() },
            AlignMode::Middle => ElementPatch { y: Some((100.0 - el.height) / 2.0), ..ElementPatch::default() },
            AlignMode::Bottom => ElementPatch { y: Some(100.0 - el.height), ..ElementPatch::default() },
        };
        self.update(id, &patch)
    }

    // --- Delete ---

    /// Remove an element.
    ///
    /// A deleted group releases its members. A deleted member leaves its
    /// group, and a group left with fewer than two members dissolves.
    /// Followers of the element are detached.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(idx) = self.doc.index_of(id) else {
            return false;
        };
        let removed = self.doc.elements.remove(idx);

        if removed.is_group() {
            self.release_members(&removed.id);
        }
        if let Some(parent) = removed.group_id.as_deref() {
            self.leave_group(parent, &removed.id);
        }
        self.detach_followers(id);
        self.prune_selection();
        tracing::debug!(%id, kind = ?removed.kind, "element deleted");
        true
    }

    /// Delete every selected element. Returns how many were removed.
    pub fn delete_selection(&mut self) -> usize {
        let ids = std::mem::take(&mut self.selection);
        ids.iter().filter(|id| self.delete(id)).count()
    }

    fn detach_followers(&mut self, leader: &str) {
        for el in &mut self.doc.elements {
            if el.relative_to.as_deref() == Some(leader) {
                el.relative_to = None;
            }
        }
    }

    fn release_members(&mut self, group_id: &str) {
        for el in &mut self.doc.elements {
            if el.group_id.as_deref() == Some(group_id) {
                el.group_id = None;
            }
        }
    }

    fn leave_group(&mut self, group_id: &str, member: &str) {
        let Some(gidx) = self.doc.index_of(group_id) else {
            return;
        };
        let group = &mut self.doc.elements[gidx];
        group.children.retain(|c| c != member);
        if group.children.len() < 2 {
            self.doc.elements.remove(gidx);
            self.release_members(group_id);
            self.detach_followers(group_id);
            tracing::debug!(group = %group_id, "group dissolved");
        } else {
            self.refit_group(group_id);
        }
    }

    // --- Duplicate / clipboard ---

    /// Clone an element (and a group's members) offset down and right, and
    /// select the copy.
    pub fn duplicate(&mut self, id: &str) -> Option<ElementId> {
        let (element, members) = self.capture(id)?;
        let offset = self.settings.duplicate_offset;
        let new_id = self.insert_copy(&element, &members, offset);
        self.selection = vec![new_id.clone()];
        tracing::debug!(source = %id, id = %new_id, "element duplicated");
        Some(new_id)
    }

    /// Duplicate every selected element and select the copies.
    pub fn duplicate_selection(&mut self) -> Vec<ElementId> {
        let ids = self.selection.clone();
        let offset = self.settings.duplicate_offset;
        let mut copies = Vec::new();
        for id in &ids {
            if let Some((element, members)) = self.capture(id) {
                copies.push(self.insert_copy(&element, &members, offset));
            }
        }
        if !copies.is_empty() {
            self.selection.clone_from(&copies);
        }
        copies
    }

    /// Put an element on the clipboard, replacing whatever was there.
    pub fn copy(&mut self, id: &str) -> bool {
        let Some((element, members)) = self.capture(id) else {
            return false;
        };
        self.clipboard = Some(Clipboard { element, members });
        true
    }

    pub fn cut(&mut self, id: &str) -> bool {
        self.copy(id) && self.delete(id)
    }

    /// Insert a fresh copy of the clipboard, offset from the copied
    /// original's position, and select it. The clipboard is kept.
    pub fn paste(&mut self) -> Option<ElementId> {
        let clip = self.clipboard.clone()?;
        let offset = self.settings.paste_offset;
        let id = self.insert_copy(&clip.element, &clip.members, offset);
        self.selection = vec![id.clone()];
        tracing::debug!(%id, "clipboard pasted");
        Some(id)
    }

    fn capture(&self, id: &str) -> Option<(Element, Vec<Element>)> {
        let el = self.get(id)?.clone();
        let members = el
            .children
            .iter()
            .filter_map(|c| self.get(c))
            .cloned()
            .collect();
        Some((el, members))
    }

    /// Append copies with fresh ids. The copy of a member is standalone; the
    /// copy of a group gets copies of its members.
    fn insert_copy(&mut self, source: &Element, members: &[Element], offset: f64) -> ElementId {
        let mut copy = source.clone();
        copy.id = fresh_id();
        copy.group_id = None;
        copy.x += offset;
        copy.y += offset;
        normalize(&mut copy, &self.settings);

        if copy.is_group() {
            copy.children.clear();
            for member in members {
                let mut m = member.clone();
                m.id = fresh_id();
                m.group_id = Some(copy.id.clone());
                m.x += offset;
                m.y += offset;
                normalize(&mut m, &self.settings);
                copy.children.push(m.id.clone());
                self.doc.elements.push(m);
            }
        }
        let id = copy.id.clone();
        let is_group = copy.is_group();
        self.doc.elements.push(copy);
        if is_group {
            self.refit_group(&id);
        }
        id
    }

    // --- Grouping ---

    /// Group at least two ungrouped, non-group elements under a new group
    /// element sized to their union, and select the group.
    pub fn group(&mut self, ids: &[ElementId]) -> Option<ElementId> {
        let mut members: Vec<ElementId> = Vec::new();
        for id in ids {
            let Some(el) = self.get(id) else {
                continue;
            };
            if el.is_group() || el.group_id.is_some() || members.contains(id) {
                continue;
            }
            members.push(id.clone());
        }
        if members.len() < 2 {
            return None;
        }
        let bounds = Rect::union(members.iter().filter_map(|m| self.get(m)).map(Element::bounds))?;

        let mut group = Element::skeleton(ElementKind::Group);
        group.id = fresh_id();
        group.set_bounds(bounds);
        group.children.clone_from(&members);
        let gid = group.id.clone();

        for el in &mut self.doc.elements {
            if members.contains(&el.id) {
                el.group_id = Some(gid.clone());
            }
        }
        self.doc.elements.push(group);
        self.selection = vec![gid.clone()];
        tracing::debug!(id = %gid, count = members.len(), "elements grouped");
        Some(gid)
    }

    pub fn group_selection(&mut self) -> Option<ElementId> {
        let ids = self.selection.clone();
        self.group(&ids)
    }

    /// Remove a group element, release its members and select them.
    /// Followers of the group are detached.
    pub fn ungroup(&mut self, group_id: &str) -> bool {
        let Some(idx) = self.doc.index_of(group_id) else {
            return false;
        };
        if !self.doc.elements[idx].is_group() {
            return false;
        }
        let group = self.doc.elements.remove(idx);
        self.release_members(group_id);
        self.detach_followers(group_id);
        self.selection = group
            .children
            .iter()
            .filter(|c| self.doc.element(c).is_some())
            .cloned()
            .collect();
        tracing::debug!(id = %group_id, count = self.selection.len(), "group dissolved");
        true
    }

    // --- Z-order ---
    //
    // A group has no paint of its own, so every z-order step moves the group
    // element and its members as one block, keeping their relative order.

    /// Move the element at `from` so it ends up at index `to` (clamped to the end).
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let Some(id) = self.doc.elements.get(from).map(|e| e.id.clone()) else {
            return false;
        };
        self.move_block(&id, Layer::At(to))
    }

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        self.move_block(id, Layer::Front)
    }

    pub fn send_to_back(&mut self, id: &str) -> bool {
        self.move_block(id, Layer::Back)
    }

    pub fn bring_forward(&mut self, id: &str) -> bool {
        self.move_block(id, Layer::Forward)
    }

    pub fn send_backward(&mut self, id: &str) -> bool {
        self.move_block(id, Layer::Backward)
    }

    /// Ascending indices of `id` and, for a group, its members.
    fn block_of(&self, id: &str) -> Option<Vec<usize>> {
        let el = self.get(id)?;
        let block = self
            .doc
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.id == id || (el.is_group() && e.group_id.as_deref() == Some(id)))
            .map(|(i, _)| i)
            .collect();
        Some(block)
    }

    fn move_block(&mut self, id: &str, layer: Layer) -> bool {
        let Some(block) = self.block_of(id) else {
            return false;
        };
        let (Some(&first), Some(&last)) = (block.first(), block.last()) else {
            return false;
        };
        let before: Vec<ElementId> = self.doc.elements.iter().map(|e| e.id.clone()).collect();

        let mut moving = Vec::with_capacity(block.len());
        let mut rest = Vec::with_capacity(before.len() - block.len());
        for (i, el) in std::mem::take(&mut self.doc.elements).into_iter().enumerate() {
            if block.binary_search(&i).is_ok() {
                moving.push(el);
            } else {
                rest.push(el);
            }
        }
        // `first` counts the other elements below the block, `last + 1 - len`
        // those below its top.
        let at = match layer {
            Layer::Front => rest.len(),
            Layer::Back => 0,
            Layer::Forward => (last + 2 - block.len()).min(rest.len()),
            Layer::Backward => first.saturating_sub(1),
            Layer::At(to) => to.min(rest.len()),
        };
        rest.splice(at..at, moving);
        self.doc.elements = rest;

        let changed = self.doc.elements.iter().map(|e| &e.id).ne(before.iter());
        if changed {
            tracing::debug!(%id, count = block.len(), at, "element reordered");
        }
        changed
    }

    // --- Selection ---

    /// Replace the selection with one element.
    pub fn select(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selection = vec![id.to_owned()];
        true
    }

    /// Shift-click semantics: with `additive`, flip membership; otherwise replace.
    pub fn toggle_select(&mut self, id: &str, additive: bool) -> bool {
        if !additive {
            return self.select(id);
        }
        if self.get(id).is_none() {
            return false;
        }
        if let Some(pos) = self.selection.iter().position(|s| s == id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(id.to_owned());
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select every top-level element (group members are reached through their group).
    pub fn select_all(&mut self) {
        self.selection = self
            .doc
            .elements
            .iter()
            .filter(|e| e.group_id.is_none())
            .map(|e| e.id.clone())
            .collect();
    }

    /// Replace the selection, keeping only known ids.
    pub fn set_selection(&mut self, ids: &[ElementId]) {
        let mut next: Vec<ElementId> = Vec::new();
        for id in ids {
            if self.get(id).is_some() && !next.contains(id) {
                next.push(id.clone());
            }
        }
        self.selection = next;
    }

    fn prune_selection(&mut self) {
        let doc = &self.doc;
        self.selection.retain(|id| doc.element(id).is_some());
    }

    // --- Document settings / viewport ---

    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.viewport.zoom = zoom.clamp(self.settings.min_zoom, self.settings.max_zoom);
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.viewport.pan_x += dx;
            self.viewport.pan_y += dy;
        }
    }

    pub fn set_background(&mut self, background: Background) {
        self.doc.background = background;
    }

    pub fn set_frame(&mut self, frame: Frame) {
        self.doc.frame = frame;
    }

    pub fn set_grid(&mut self, config: GridConfig) {
        self.doc.config = config;
    }

    // --- Derived effects ---

    /// Estimate the rendered width of a text run and shrink its font until
    /// the estimate fits the box. Never grows the font.
    fn auto_scale(&mut self, id: &str) {
        let s = &self.settings;
        let Some(idx) = self.doc.index_of(id) else {
            return;
        };
        let el = &mut self.doc.elements[idx];
        if el.kind != ElementKind::Text || !el.auto_scale {
            return;
        }
        let style = el.style();
        let count = style.text().chars().count();
        let size = style.font_size();
        if count == 0 {
            return;
        }
        let chars = f64::from(u32::try_from(count).unwrap_or(u32::MAX));
        let box_px = el.width / 100.0 * s.autoscale_reference_px;
        if chars * size * s.glyph_width_ratio <= box_px {
            return;
        }
        let fitted = (box_px / (chars * s.glyph_width_ratio)).floor().max(s.min_font_size);
        if fitted < size {
            el.set_font_size(fitted);
            tracing::debug!(%id, from = size, to = fitted, "text auto-scaled");
        }
    }

    /// Where an anchored element should sit relative to its leader, if anywhere.
    fn anchored_y(&self, el: &Element) -> Option<f64> {
        let anchor = el.anchor.as_ref()?;
        let leader = self.get(el.relative_to.as_deref()?)?;
        let gap = self.settings.anchor_gap;
        let y = if anchor.below() {
            leader.y + leader.height + gap
        } else if anchor.above() {
            leader.y - el.height - gap
        } else {
            return None;
        };
        Some(clamp_position(y, self.settings.max_position))
    }

    /// Move an anchored element next to its leader. The caller propagates
    /// the box change.
    fn place_relative(&mut self, id: &str) {
        let Some(idx) = self.doc.index_of(id) else {
            return;
        };
        if let Some(y) = self.anchored_y(&self.doc.elements[idx]) {
            self.doc.elements[idx].y = y;
        }
    }

    /// Overwrite an element's box. A group carries its members along.
    fn set_box(&mut self, id: &str, rect: Rect) {
        let Some(idx) = self.doc.index_of(id) else {
            return;
        };
        let el = &mut self.doc.elements[idx];
        let before = el.bounds();
        el.set_bounds(rect);
        normalize(el, &self.settings);
        let after = el.bounds();
        if el.is_group() {
            let members = el.children.clone();
            for m in &members {
                if let Some(midx) = self.doc.index_of(m) {
                    let member = &mut self.doc.elements[midx];
                    member.set_bounds(member.bounds().remap(before, after));
                    normalize(member, &self.settings);
                }
            }
        }
    }

    /// Recompute a group's box as the union of its members.
    fn refit_group(&mut self, group_id: &str) {
        let Some(gidx) = self.doc.index_of(group_id) else {
            return;
        };
        let members = self.doc.elements[gidx].children.clone();
        let Some(bounds) = Rect::union(members.iter().filter_map(|m| self.get(m)).map(Element::bounds)) else {
            return;
        };
        self.doc.elements[gidx].set_bounds(bounds);
    }

    /// Propagate a box change of `id` (previously `before`) to its group,
    /// its members and every element anchored to any of them.
    fn box_changed(&mut self, id: &str, before: Rect) {
        let Some(el) = self.get(id) else {
            return;
        };
        let after = el.bounds();
        if after == before {
            return;
        }
        let mut moved: Vec<ElementId> = vec![id.to_owned()];

        if el.is_group() {
            let members = el.children.clone();
            for m in &members {
                if let Some(midx) = self.doc.index_of(m) {
                    let member = &mut self.doc.elements[midx];
                    member.set_bounds(member.bounds().remap(before, after));
                    normalize(member, &self.settings);
                    moved.push(m.clone());
                }
            }
        } else if let Some(parent) = el.group_id.clone() {
            self.refit_group(&parent);
            moved.push(parent);
        }
        self.follow_anchors(moved);
    }

    /// Re-place followers of every element in `queue`, transitively. Each
    /// follower moves at most once, so cyclic anchors terminate.
    fn follow_anchors(&mut self, mut queue: Vec<ElementId>) {
        let mut placed: HashSet<ElementId> = queue.iter().cloned().collect();
        while let Some(leader) = queue.pop() {
            let followers: Vec<ElementId> = self
                .doc
                .elements
                .iter()
                .filter(|e| e.relative_to.as_deref() == Some(leader.as_str()))
                .map(|e| e.id.clone())
                .collect();
            for f in followers {
                if placed.contains(&f) {
                    continue;
                }
                let Some(el) = self.get(&f) else {
                    continue;
                };
                let Some(y) = self.anchored_y(el) else {
                    continue;
                };
                let before = el.bounds();
                self.set_box(&f, Rect { y, ..before });
                if let Some(group) = self.get(&f).filter(|e| e.is_group()) {
                    queue.extend(group.children.iter().cloned());
                }
                if let Some(parent) = self.get(&f).and_then(|e| e.group_id.clone()) {
                    self.refit_group(&parent);
                    queue.push(parent);
                }
                placed.insert(f.clone());
                queue.push(f);
            }
        }
    }
}
