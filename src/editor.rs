//! Editor session: one document, its history, its platform variants and the
//! gesture in flight.
//!
//! An [`Editor`] is constructed per open document and handed to whatever
//! drives it. Discrete operations forward to the [`DocStore`] and then commit
//! a history entry if the element array actually changed. Gestures
//! (move/resize/rotate) recompute geometry from their baseline on every
//! pointer move and commit once on release.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::collections::HashSet;

use crate::config::Settings;
use crate::document::{Background, Document, Frame, GridConfig, frame_preset};
use crate::element::{Element, ElementId, ElementKind, ElementPatch};
use crate::geometry::{Point, Rect, ResizeHandle, SizeFloor, px_to_pct, resize, rotation_from_pointer};
use crate::gesture::{Gesture, Modifiers};
use crate::history::History;
use crate::persist::{self, DocumentBlob, DocumentError};
use crate::scene::{ExportRequest, Exporter, Scene, build_scene};
use crate::snap::{GridSnap, Guides, snap_position};
use crate::store::{AlignMode, DocStore, Viewport};
use crate::variants::{PlatformVariant, VariantResolver};

#[derive(Debug)]
pub struct Editor {
    store: DocStore,
    history: History,
    variants: VariantResolver,
    gesture: Gesture,
    guides: Guides,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Editor {
    /// Empty document on the default frame.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let grid = GridConfig { grid_size: settings.grid_step, ..GridConfig::default() };
        let doc = Document { config: grid, ..Document::default() };
        Self::assemble(doc, Vec::new(), settings)
    }

    /// Session over an already-decoded blob, in master context.
    #[must_use]
    pub fn from_blob(blob: DocumentBlob, settings: Settings) -> Self {
        let (doc, variants) = blob.into_parts();
        Self::assemble(doc, variants, settings)
    }

    fn assemble(doc: Document, variants: Vec<PlatformVariant>, settings: Settings) -> Self {
        let mut history = History::new(settings.history_depth);
        let store = DocStore::with_document(doc, settings);
        history.reset(store.snapshot());
        Self {
            store,
            history,
            variants: VariantResolver::from_variants(variants),
            gesture: Gesture::Idle,
            guides: Guides::default(),
        }
    }

    // --- Persistence ---

    /// Replace the whole session from a persisted blob. The current session
    /// is untouched if the blob cannot be read.
    ///
    /// # Errors
    ///
    /// Returns the decode error for malformed input.
    pub fn load(&mut self, raw: &str) -> Result<(), DocumentError> {
        let blob = persist::deserialize(raw, self.store.settings())?;
        let viewport = self.store.viewport();
        let settings = self.store.settings().clone();
        *self = Self::from_blob(blob, settings);
        self.store.set_zoom(viewport.zoom);
        self.store.pan_by(viewport.pan_x, viewport.pan_y);
        tracing::info!(elements = self.store.elements().len(), variants = self.variants.variants().len(), "document loaded");
        Ok(())
    }

    /// Master layout plus every variant, with the live variant's overrides
    /// recorded first.
    #[must_use]
    pub fn to_blob(&self) -> DocumentBlob {
        let doc = self.store.document();
        DocumentBlob {
            elements: self.variants.master_elements(&self.store),
            background: doc.background.clone(),
            frame: self.variants.master_frame(&self.store),
            config: doc.config.clone(),
            platform_variants: self.variants.synced_variants(&self.store),
        }
    }

    /// # Errors
    ///
    /// Returns an error if a style payload cannot be encoded.
    pub fn serialize(&self) -> Result<String, DocumentError> {
        persist::serialize(&self.to_blob())
    }

    // --- Queries ---

    #[must_use]
    pub fn store(&self) -> &DocStore {
        &self.store
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        self.store.document()
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        self.store.elements()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.store.get(id)
    }

    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        self.store.selection()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.store.viewport()
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        self.store.settings()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Smart guides to draw for the current move gesture.
    #[must_use]
    pub fn guides(&self) -> Guides {
        self.guides
    }

    #[must_use]
    pub fn platform_variants(&self) -> &[PlatformVariant] {
        self.variants.variants()
    }

    /// Id of the live variant; `None` while editing master.
    #[must_use]
    pub fn active_variant(&self) -> Option<&str> {
        self.variants.active()
    }

    // --- History ---

    /// Push a snapshot if the elements differ from the current history entry.
    fn commit(&mut self) {
        if self.history.current() != Some(self.store.elements()) {
            self.history.push(self.store.snapshot());
            tracing::trace!(depth = self.history.len(), "history committed");
        }
    }

    fn finish<T>(&mut self, out: T) -> T {
        self.commit();
        out
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.store.replace_elements(snapshot);
        tracing::debug!(cursor = self.history.cursor(), "undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.store.replace_elements(snapshot);
        tracing::debug!(cursor = self.history.cursor(), "redo");
        true
    }

    // --- Discrete mutations ---

    pub fn add(&mut self, kind: ElementKind, patch: &ElementPatch) -> ElementId {
        let id = self.store.add(kind, patch);
        self.finish(id)
    }

    pub fn update(&mut self, id: &str, patch: &ElementPatch) -> bool {
        let changed = self.store.update(id, patch);
        self.finish(changed)
    }

    pub fn set_locked(&mut self, id: &str, locked: bool) -> bool {
        let changed = self.store.set_locked(id, locked);
        self.finish(changed)
    }

    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        let changed = self.store.set_visible(id, visible);
        self.finish(changed)
    }

    pub fn move_by(&mut self, ids: &[ElementId], dx: f64, dy: f64) -> bool {
        let changed = self.store.move_by(ids, dx, dy);
        self.finish(changed)
    }

    pub fn nudge_selection(&mut self, dx: f64, dy: f64, mods: Modifiers) -> bool {
        let changed = self.store.nudge_selection(dx, dy, mods.shift);
        self.finish(changed)
    }

    pub fn align(&mut self, id: &str, mode: AlignMode) -> bool {
        let changed = self.store.align(id, mode);
        self.finish(changed)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let changed = self.store.delete(id);
        self.finish(changed)
    }

    pub fn delete_selection(&mut self) -> usize {
        let count = self.store.delete_selection();
        self.finish(count)
    }

    pub fn duplicate(&mut self, id: &str) -> Option<ElementId> {
        let copy = self.store.duplicate(id);
        self.finish(copy)
    }

    pub fn duplicate_selection(&mut self) -> Vec<ElementId> {
        let copies = self.store.duplicate_selection();
        self.finish(copies)
    }

    pub fn copy(&mut self, id: &str) -> bool {
        self.store.copy(id)
    }

    pub fn cut(&mut self, id: &str) -> bool {
        let changed = self.store.cut(id);
        self.finish(changed)
    }

    pub fn paste(&mut self) -> Option<ElementId> {
        let pasted = self.store.paste();
        self.finish(pasted)
    }

    pub fn group(&mut self, ids: &[ElementId]) -> Option<ElementId> {
        let group = self.store.group(ids);
        self.finish(group)
    }

    pub fn group_selection(&mut self) -> Option<ElementId> {
        let group = self.store.group_selection();
        self.finish(group)
    }

    pub fn ungroup(&mut self, id: &str) -> bool {
        let changed = self.store.ungroup(id);
        self.finish(changed)
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let changed = self.store.reorder(from, to);
        self.finish(changed)
    }

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        let changed = self.store.bring_to_front(id);
        self.finish(changed)
    }

    pub fn send_to_back(&mut self, id: &str) -> bool {
        let changed = self.store.send_to_back(id);
        self.finish(changed)
    }

    pub fn bring_forward(&mut self, id: &str) -> bool {
        let changed = self.store.bring_forward(id);
        self.finish(changed)
    }

    pub fn send_backward(&mut self, id: &str) -> bool {
        let changed = self.store.send_backward(id);
        self.finish(changed)
    }

    // --- Selection (not recorded in history) ---

    pub fn select(&mut self, id: &str) -> bool {
        self.store.select(id)
    }

    pub fn toggle_select(&mut self, id: &str, mods: Modifiers) -> bool {
        self.store.toggle_select(id, mods.shift || mods.ctrl || mods.meta)
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    pub fn select_all(&mut self) {
        self.store.select_all();
    }

    pub fn set_selection(&mut self, ids: &[ElementId]) {
        self.store.set_selection(ids);
    }

    // --- Document settings / viewport ---

    pub fn set_zoom(&mut self, zoom: f64) {
        self.store.set_zoom(zoom);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.store.pan_by(dx, dy);
    }

    pub fn set_background(&mut self, background: Background) {
        self.store.set_background(background);
    }

    /// Retarget the master frame. Refused while a variant is live, since the
    /// variant owns the live frame.
    pub fn set_frame(&mut self, frame: Frame) -> bool {
        if self.variants.active().is_some() {
            return false;
        }
        self.store.set_frame(frame);
        true
    }

    pub fn set_grid(&mut self, config: GridConfig) {
        self.store.set_grid(config);
    }

    // --- Gestures ---

    /// Start dragging the selection. Locked elements and members whose group
    /// is also selected stay out of the drag.
    pub fn begin_move(&mut self, pointer: Point) -> bool {
        if self.gesture.is_active() {
            return false;
        }
        let selected: HashSet<&str> = self.store.selection().iter().map(String::as_str).collect();
        let origins: Vec<(ElementId, Rect)> = self
            .store
            .selection()
            .iter()
            .filter_map(|id| self.store.get(id))
            .filter(|e| !e.locked && e.group_id.as_deref().is_none_or(|g| !selected.contains(g)))
            .map(|e| (e.id.clone(), e.bounds()))
            .collect();
        if origins.is_empty() {
            return false;
        }
        self.gesture = Gesture::Moving { start: pointer, origins, baseline: self.store.snapshot() };
        self.guides = Guides::default();
        true
    }

    /// Start dragging a resize handle of an unlocked element.
    pub fn begin_resize(&mut self, id: &str, handle: ResizeHandle, pointer: Point) -> bool {
        if self.gesture.is_active() {
            return false;
        }
        let Some(el) = self.store.get(id).filter(|e| !e.locked) else {
            return false;
        };
        self.gesture = Gesture::Resizing {
            id: el.id.clone(),
            handle,
            start: pointer,
            origin: el.bounds(),
            baseline: self.store.snapshot(),
        };
        true
    }

    /// Start dragging the rotate handle; `center` is the element's center in
    /// screen space.
    pub fn begin_rotate(&mut self, id: &str, center: Point) -> bool {
        if self.gesture.is_active() {
            return false;
        }
        let Some(el) = self.store.get(id).filter(|e| !e.locked) else {
            return false;
        };
        self.gesture = Gesture::Rotating { id: el.id.clone(), center, baseline: self.store.snapshot() };
        true
    }

    /// Recompute the gesture's geometry for the pointer's current screen
    /// position. Returns `false` when no gesture is running.
    pub fn update_gesture(&mut self, pointer: Point, mods: Modifiers) -> bool {
        let gesture = std::mem::take(&mut self.gesture);
        match &gesture {
            Gesture::Idle => return false,
            Gesture::Moving { start, origins, baseline } => {
                self.store.replace_elements(baseline.clone());
                let (dx, dy) = self.pointer_delta(*start, pointer);
                self.drag(origins, dx, dy, !mods.alt);
            }
            Gesture::Resizing { id, handle, start, origin, baseline } => {
                self.store.replace_elements(baseline.clone());
                let (dx, dy) = self.pointer_delta(*start, pointer);
                let keeps_aspect = self.store.get(id).is_some_and(|e| e.kind.keeps_aspect());
                let s = self.store.settings();
                let floor = SizeFloor { width: s.min_width, height: s.min_height };
                let rect = resize(*origin, *handle, dx, dy, mods.shift || keeps_aspect, floor);
                self.store.update(id, &ElementPatch::bounds(rect));
            }
            Gesture::Rotating { id, center, baseline } => {
                self.store.replace_elements(baseline.clone());
                let step = mods.shift.then_some(self.store.settings().rotation_snap_deg);
                let rotation = rotation_from_pointer(*center, pointer, step);
                self.store.update(id, &ElementPatch { rotation: Some(rotation), ..ElementPatch::default() });
            }
        }
        self.gesture = gesture;
        true
    }

    /// Release: keep the current geometry and record one history entry.
    pub fn end_gesture(&mut self) -> bool {
        if !self.gesture.is_active() {
            return false;
        }
        self.gesture = Gesture::Idle;
        self.guides = Guides::default();
        self.commit();
        true
    }

    /// Escape: put everything back as it was at pointer-down. Nothing is
    /// recorded.
    pub fn cancel_gesture(&mut self) -> bool {
        let gesture = std::mem::take(&mut self.gesture);
        self.guides = Guides::default();
        let Some(baseline) = gesture.baseline() else {
            return false;
        };
        self.store.replace_elements(baseline.to_vec());
        tracing::debug!("gesture cancelled");
        true
    }

    /// Screen-pixel delta from `start` to `pointer` as frame percentages.
    fn pointer_delta(&self, start: Point, pointer: Point) -> (f64, f64) {
        let frame = &self.store.document().frame;
        let zoom = self.store.viewport().zoom;
        (
            px_to_pct(pointer.x - start.x, frame.width_px(), zoom),
            px_to_pct(pointer.y - start.y, frame.height_px(), zoom),
        )
    }

    /// Translate every origin by the same delta, adjusted so the first
    /// origin snaps to other elements and the grid.
    fn drag(&mut self, origins: &[(ElementId, Rect)], dx: f64, dy: f64, allow_snap: bool) {
        let Some((_, primary)) = origins.first() else {
            return;
        };
        let candidate = Rect { x: primary.x + dx, y: primary.y + dy, ..*primary };
        let (mut dx, mut dy) = (dx, dy);
        self.guides = Guides::default();

        let config = &self.store.document().config;
        if allow_snap && config.snap_enabled {
            let s = self.store.settings();
            let grid = GridSnap { step: config.grid_size, threshold: s.grid_threshold };
            let others = self.snap_targets(origins);
            let outcome = snap_position(candidate, others, s.object_snap_threshold, Some(grid));
            dx += outcome.x - candidate.x;
            dy += outcome.y - candidate.y;
            self.guides = outcome.guides;
        }

        for (id, origin) in origins {
            self.store.update(id, &ElementPatch::position(origin.x + dx, origin.y + dy));
        }
    }

    /// Boxes of visible elements that are not moving with the drag.
    fn snap_targets(&self, origins: &[(ElementId, Rect)]) -> Vec<Rect> {
        let moving: HashSet<&str> = origins.iter().map(|(id, _)| id.as_str()).collect();
        self.store
            .elements()
            .iter()
            .filter(|e| e.visible && !moving.contains(e.id.as_str()))
            .filter(|e| e.group_id.as_deref().is_none_or(|g| !moving.contains(g)))
            .filter(|e| !e.children.iter().any(|c| moving.contains(c.as_str())))
            .map(Element::bounds)
            .collect()
    }

    // --- Platform variants ---

    /// Make a variant (or master, with `None`) the live context. History is
    /// reset to the new context's baseline.
    pub fn switch_platform(&mut self, target: Option<&str>) -> bool {
        self.cancel_gesture();
        if !self.variants.switch_to(target, &mut self.store) {
            return false;
        }
        self.history.reset(self.store.snapshot());
        true
    }

    /// Add a variant for a built-in frame preset. `None` for an unknown preset.
    pub fn create_variant(&mut self, preset_id: &str) -> Option<String> {
        let preset = frame_preset(preset_id)?;
        Some(self.variants.create_variant(preset))
    }

    pub fn create_custom_variant(&mut self, name: &str, width: u32, height: u32) -> String {
        self.variants.create_custom_variant(name, width, height)
    }

    pub fn delete_variant(&mut self, id: &str) -> bool {
        let was_active = self.variants.active() == Some(id);
        if was_active {
            self.cancel_gesture();
        }
        let deleted = self.variants.delete_variant(id, &mut self.store);
        if deleted && was_active {
            self.history.reset(self.store.snapshot());
        }
        deleted
    }

    pub fn reset_variant_overrides(&mut self, id: &str) -> bool {
        let was_active = self.variants.active() == Some(id);
        if was_active {
            self.cancel_gesture();
        }
        let reset = self.variants.reset_variant_overrides(id, &mut self.store);
        if reset && was_active {
            self.history.reset(self.store.snapshot());
        }
        reset
    }

    // --- Rendering / export ---

    /// Draw items for the live context at its frame's native size.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let frame = &self.store.document().frame;
        build_scene(self.store.document(), frame.width_px(), frame.height_px())
    }

    /// Render the live context at the request's resolution and hand it to
    /// the encoder.
    ///
    /// # Errors
    ///
    /// Whatever the exporter reports.
    pub fn export<E: Exporter>(&self, exporter: &E, request: &ExportRequest) -> Result<Vec<u8>, E::Error> {
        let scene = build_scene(
            self.store.document(),
            f64::from(request.width_px),
            f64::from(request.height_px),
        );
        tracing::debug!(width = request.width_px, height = request.height_px, format = request.format.mime(), "export requested");
        exporter.export(&scene, request)
    }
}
