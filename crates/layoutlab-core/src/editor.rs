//! The editor aggregate: owns the scene, selection, history and gesture
//! state, routes input, and re-projects onto the surface after every change.

use crate::align::{AlignMode, align_deltas};
use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementKind};
use crate::history::{History, Snapshot};
use crate::image::ImageSource;
use crate::input::{KeyCommand, KeyEvent, PointerButton, PointerEvent};
use crate::render::{Decoration, RenderSync, Surface};
use crate::selection::{Corner, Selection, hit_test_handles};
use crate::snap::Snapper;
use crate::snapshot::{self, LoadResult, SerializedElement};
use crate::storage::{AutoSave, StorageError};
use crate::store::{ElementStore, ZDirection};
use crate::transform::{Gesture, GestureKind, MoveOutcome, TransformEngine};
use kurbo::{Point, Rect, Vec2};
use std::fmt;

/// Handle hit radius in device pixels.
pub const HANDLE_RADIUS: f64 = 8.0;

/// Notified after every projection, e.g. by a property or layer panel.
pub trait SceneObserver {
    fn scene_changed(&mut self, elements: &[Element], selection: &Selection);
}

/// A geometry field editable from the property panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    X,
    Y,
    Width,
    Height,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::X => "x",
            Dimension::Y => "y",
            Dimension::Width => "width",
            Dimension::Height => "height",
        })
    }
}

/// What lies under a pointer position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// A resize handle of the lone selected element.
    Handle(Corner),
    /// A corner of the multi-selection bounding box.
    GroupHandle(Corner),
    Element(ElementId),
    Canvas,
}

/// One row of the layer list, top of the stack first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerRow {
    pub id: ElementId,
    pub label: String,
    /// The element is the primary selection.
    pub active: bool,
}

pub struct Editor<S: Surface> {
    config: EditorConfig,
    camera: Camera,
    store: ElementStore,
    selection: Selection,
    history: History,
    transform: TransformEngine,
    snapper: Snapper,
    sync: RenderSync,
    surface: S,
    autosave: Option<AutoSave>,
    observers: Vec<Box<dyn SceneObserver>>,
}

impl<S: Surface> Editor<S> {
    pub fn new(config: EditorConfig, surface: S) -> Self {
        let config = config.sanitized();
        let camera = Camera::new(config.canvas_size(), config.zoom);
        let mut editor = Self {
            store: ElementStore::new(camera.logical_size(), config.min_size()),
            history: History::new(config.history_capacity),
            snapper: Snapper::new(config.snap_enabled, config.grid_size),
            camera,
            config,
            selection: Selection::new(),
            transform: TransformEngine::new(),
            sync: RenderSync::new(),
            surface,
            autosave: None,
            observers: Vec::new(),
        };
        editor.refresh();
        editor
    }

    /// Persist through `autosave` on [`Editor::tick`].
    pub fn with_autosave(mut self, autosave: AutoSave) -> Self {
        self.autosave = Some(autosave);
        self
    }

    /// Register an observer. It is notified once right away with the
    /// current scene.
    pub fn add_observer(&mut self, mut observer: Box<dyn SceneObserver>) {
        observer.scene_changed(self.store.elements(), &self.selection);
        self.observers.push(observer);
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    /// The scene in z-order, bottom first.
    pub fn elements(&self) -> &[Element] {
        self.store.elements()
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.store.get(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn snapper(&self) -> &Snapper {
        &self.snapper
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn autosave(&self) -> Option<&AutoSave> {
        self.autosave.as_ref()
    }

    pub fn decoration(&self) -> &Decoration {
        self.sync.decoration()
    }

    pub fn is_gesture_active(&self) -> bool {
        self.transform.is_active()
    }

    pub fn gesture_kind(&self) -> Option<GestureKind> {
        self.transform.kind()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            elements: self.store.elements().to_vec(),
            selection: self.selection.ids().to_vec(),
            counter: self.store.counter(),
        }
    }

    /// Prune the selection, project onto the surface and notify observers.
    fn refresh(&mut self) {
        let store = &self.store;
        self.selection.prune(|id| store.contains(id));
        self.sync.project(
            self.store.elements(),
            &self.selection,
            self.camera.zoom(),
            &mut self.surface,
        );
        for observer in &mut self.observers {
            observer.scene_changed(self.store.elements(), &self.selection);
        }
    }

    /// [`Editor::refresh`] plus a persistence request.
    fn commit(&mut self) {
        self.refresh();
        if let Some(autosave) = &mut self.autosave {
            autosave.request();
        }
    }

    /// Geometry edits from keys or panels are refused while a gesture owns
    /// the scene; the gesture writes absolute geometry on every move.
    fn gesture_blocks(&self, action: &str) -> bool {
        let active = self.transform.is_active();
        if active {
            log::debug!("{action} rejected while a gesture is active");
        }
        active
    }

    /// Run a scene mutation. When `apply` reports a change, the state from
    /// before it is pushed as one history checkpoint (coalesced with the
    /// previous one when `tag` matches) and the change is committed.
    fn mutate(&mut self, tag: Option<&str>, apply: impl FnOnce(&mut Self) -> bool) -> bool {
        let before = self.snapshot();
        if !apply(self) {
            return false;
        }
        match tag {
            Some(tag) => {
                self.history.checkpoint_tagged(before, tag);
            }
            None => self.history.checkpoint(before),
        }
        self.commit();
        true
    }

    /// Add an element of `kind` on top of the z-order.
    pub fn add_element(&mut self, kind: ElementKind) -> ElementId {
        let before = self.snapshot();
        let id = self.store.create(kind);
        self.history.checkpoint(before);
        self.commit();
        id
    }

    /// Remove an element, dropping it from the selection and any gesture.
    pub fn remove_element(&mut self, id: &ElementId) -> bool {
        self.mutate(None, |editor| editor.remove_untracked(id))
    }

    fn remove_untracked(&mut self, id: &ElementId) -> bool {
        if self.store.remove(id).is_none() {
            return false;
        }
        self.selection.remove(id);
        self.transform.forget(id);
        true
    }

    /// Remove every selected element. Returns how many were removed.
    pub fn delete_selection(&mut self) -> usize {
        let ids = self.selection.ids().to_vec();
        let mut removed = 0;
        self.mutate(None, |editor| {
            for id in &ids {
                if editor.remove_untracked(id) {
                    removed += 1;
                }
            }
            removed > 0
        });
        removed
    }

    /// Move an element one step up or down the stack.
    pub fn reorder(&mut self, id: &ElementId, direction: ZDirection) -> bool {
        self.mutate(None, |editor| editor.store.reorder(id, direction))
    }

    /// Select exactly `id`, or clear the selection for `None`. Unknown ids
    /// are ignored.
    pub fn select_only(&mut self, id: Option<&ElementId>) {
        match id {
            Some(id) if !self.store.contains(id) => {
                log::debug!("Ignoring selection of missing element {id}");
            }
            _ => {
                self.selection.select_only(id.cloned());
                self.refresh();
            }
        }
    }

    /// Add `id` to the selection, or remove it if already selected.
    pub fn toggle_selection(&mut self, id: &ElementId) {
        if self.store.contains(id) {
            self.selection.toggle(id.clone());
            self.refresh();
        }
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.refresh();
        }
    }

    fn selected_elements(&self) -> Vec<&Element> {
        self.selection
            .ids()
            .iter()
            .filter_map(|id| self.store.get(id))
            .collect()
    }

    /// Hit-test a device-space position against the model: handles first,
    /// then elements front to back.
    pub fn hit_test(&self, device: Point) -> HitTarget {
        let point = self.camera.pointer_to_canvas(device).point;
        let tolerance = self.camera.device_dist_to_canvas(HANDLE_RADIUS);

        let selected = self.selected_elements();
        match selected.as_slice() {
            [] => {}
            [el] => {
                if let Some(corner) = hit_test_handles(el.rect(), point, tolerance) {
                    return HitTarget::Handle(corner);
                }
            }
            many => {
                if let Some(bounds) = crate::geometry::union_bounds(many.iter().copied()) {
                    if let Some(corner) = hit_test_handles(bounds, point, tolerance) {
                        return HitTarget::GroupHandle(corner);
                    }
                }
            }
        }

        match self.store.topmost_at(point) {
            Some(el) => HitTarget::Element(el.id().clone()),
            None => HitTarget::Canvas,
        }
    }

    /// Handle a press. Returns whether anything changed (a gesture started
    /// or the selection changed).
    pub fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        if event.button != PointerButton::Primary {
            return false;
        }
        if let Some(active) = self.transform.pointer() {
            log::debug!("Ignoring press from pointer {}: pointer {active} owns the gesture", event.pointer_id);
            return false;
        }

        let point = self.camera.pointer_to_canvas(event.position).point;
        let limits = self.store.limits();
        let gesture = match self.hit_test(event.position) {
            HitTarget::Handle(corner) => self
                .selected_elements()
                .first()
                .map(|el| Gesture::resize(el, corner, point, limits)),
            HitTarget::GroupHandle(corner) => {
                Gesture::group_resize(&self.selected_elements(), corner, point, limits)
            }
            HitTarget::Element(id) => {
                if event.modifiers.shift {
                    self.toggle_selection(&id);
                    return true;
                }
                if !self.selection.contains(&id) {
                    self.select_only(Some(&id));
                    return true;
                }
                let selected = self.selected_elements();
                if selected.len() > 1 {
                    Gesture::multi_drag(&selected, point)
                } else {
                    self.store.get(&id).map(|el| Gesture::drag(el, point))
                }
            }
            HitTarget::Canvas => {
                let had_selection = !self.selection.is_empty();
                self.clear_selection();
                return had_selection;
            }
        };

        match gesture {
            Some(gesture) => {
                let checkpoint = self.snapshot();
                self.transform.begin(event.pointer_id, gesture, checkpoint)
            }
            None => false,
        }
    }

    /// Handle a move. Returns whether the scene changed.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> bool {
        let at = self.camera.pointer_to_canvas(event.position);
        let limits = self.store.limits();
        let store = &mut self.store;
        let outcome = self
            .transform
            .update(event.pointer_id, at, &self.snapper, limits, |id, rect| {
                store.set_geometry(id, rect)
            });
        match outcome {
            MoveOutcome::Ignored | MoveOutcome::Unchanged => false,
            MoveOutcome::Changed { checkpoint } => {
                if let Some(checkpoint) = checkpoint {
                    self.history.checkpoint(checkpoint);
                }
                self.refresh();
                true
            }
        }
    }

    /// Handle a release. Ends the gesture bound to this pointer.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> bool {
        match self.transform.end(event.pointer_id) {
            Some(_) => {
                self.commit();
                true
            }
            None => false,
        }
    }

    /// A cancel ends the gesture exactly like a release; the in-progress
    /// geometry is kept.
    pub fn pointer_cancel(&mut self, event: &PointerEvent) -> bool {
        self.pointer_up(event)
    }

    /// Handle a key press. Returns whether the key was consumed.
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        let Some(command) = KeyCommand::from_event(event, self.config.key_step) else {
            return false;
        };
        match command {
            KeyCommand::DeleteSelection => self.delete_selection() > 0,
            KeyCommand::Nudge(delta) => self.nudge_selection(delta),
            KeyCommand::Undo => self.undo(),
            KeyCommand::Redo => self.redo(),
            KeyCommand::Duplicate => self.duplicate_primary().is_some(),
            KeyCommand::ClearSelection => {
                let had_selection = !self.selection.is_empty();
                self.clear_selection();
                had_selection
            }
        }
    }

    /// Restore the previous checkpoint. Rejected while a gesture is active.
    pub fn undo(&mut self) -> bool {
        if self.transform.is_active() {
            log::debug!("Undo rejected while a gesture is active");
            return false;
        }
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(snapshot) => {
                self.restore_snapshot(snapshot);
                true
            }
            None => false,
        }
    }

    /// Re-apply the most recently undone change. Rejected while a gesture
    /// is active.
    pub fn redo(&mut self) -> bool {
        if self.transform.is_active() {
            log::debug!("Redo rejected while a gesture is active");
            return false;
        }
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(snapshot) => {
                self.restore_snapshot(snapshot);
                true
            }
            None => false,
        }
    }

    fn restore_snapshot(&mut self, snapshot: Snapshot) {
        self.store.restore(snapshot.elements, snapshot.counter);
        self.selection.replace(snapshot.selection);
        self.commit();
    }

    /// Align the selection on `mode` against its union bounds. Rejected
    /// while a gesture is active, like the other geometry commands.
    pub fn align(&mut self, mode: AlignMode) -> bool {
        if self.gesture_blocks("Align") {
            return false;
        }
        let deltas = align_deltas(self.selected_elements(), mode);
        self.mutate(None, |editor| {
            let mut changed = false;
            for (id, delta) in &deltas {
                changed |= editor.store.translate(id, *delta);
            }
            changed
        })
    }

    /// Copy the primary selection under a new id, offset and clamped. The
    /// copy becomes the sole selection.
    pub fn duplicate_primary(&mut self) -> Option<ElementId> {
        if self.gesture_blocks("Duplicate") {
            return None;
        }
        let source = self.selection.primary()?.clone();
        let offset = Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
        let mut created = None;
        self.mutate(None, |editor| {
            created = editor.store.duplicate(&source, offset);
            if let Some(id) = &created {
                editor.selection.select_only(Some(id.clone()));
            }
            created.is_some()
        });
        created
    }

    /// Move every selected element by `delta`, clamped to the canvas.
    pub fn nudge_selection(&mut self, delta: Vec2) -> bool {
        if !(delta.x.is_finite() && delta.y.is_finite()) || self.gesture_blocks("Nudge") {
            return false;
        }
        let ids = self.selection.ids().to_vec();
        self.mutate(None, |editor| {
            let mut changed = false;
            for id in &ids {
                changed |= editor.store.translate(id, delta);
            }
            changed
        })
    }

    /// Set one geometry field. Non-finite values are ignored; everything
    /// else is clamped. Fixed-aspect kinds keep width and height equal.
    pub fn set_size(&mut self, id: &ElementId, dimension: Dimension, value: f64) -> bool {
        if !value.is_finite() {
            log::debug!("Ignoring non-finite {dimension} for {id}");
            return false;
        }
        if self.gesture_blocks("Panel geometry edit") {
            return false;
        }
        let Some(el) = self.store.get(id) else {
            return false;
        };
        let fixed_aspect = el.capabilities().fixed_aspect;
        let r = el.rect();
        let rect = match dimension {
            Dimension::X => Rect::from_origin_size(Point::new(value, r.y0), r.size()),
            Dimension::Y => Rect::from_origin_size(Point::new(r.x0, value), r.size()),
            Dimension::Width if fixed_aspect => Rect::new(r.x0, r.y0, r.x0 + value, r.y0 + value),
            Dimension::Height if fixed_aspect => Rect::new(r.x0, r.y0, r.x0 + value, r.y0 + value),
            Dimension::Width => Rect::new(r.x0, r.y0, r.x0 + value, r.y1),
            Dimension::Height => Rect::new(r.x0, r.y0, r.x1, r.y0 + value),
        };
        let tag = format!("{id}:{dimension}");
        self.mutate(Some(&tag), |editor| editor.store.set_geometry(id, rect))
    }

    pub fn set_style_property(&mut self, id: &ElementId, key: &str, value: &str) -> bool {
        let tag = format!("{id}:style:{key}");
        self.mutate(Some(&tag), |editor| editor.store.set_style_property(id, key, value))
    }

    /// Set the text payload of a text-bearing element.
    pub fn set_text(&mut self, id: &ElementId, text: &str) -> bool {
        let tag = format!("{id}:text");
        self.mutate(Some(&tag), |editor| editor.store.set_text(id, text))
    }

    /// Patch the image source of an image element. Safe to call from a
    /// completion callback after the element was deleted: a missing target
    /// is a no-op.
    pub fn set_image_source(&mut self, id: &ElementId, source: impl Into<ImageSource>) -> bool {
        if !self.store.contains(id) {
            log::debug!("Image source arrived for removed element {id}");
            return false;
        }
        let source = source.into().into_source_string();
        self.mutate(None, |editor| editor.store.set_image_source(id, source))
    }

    /// The scene in z-order as export/persistence records.
    pub fn serialize(&self) -> Vec<SerializedElement> {
        snapshot::serialize(self.store.elements())
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        snapshot::to_json(self.store.elements(), pretty)
    }

    /// Replace the scene with a saved layout. On error nothing changes.
    /// A successful load clears the selection, any gesture and the history.
    pub fn load_json(&mut self, json: &str) -> LoadResult<usize> {
        let elements = snapshot::parse_elements(json).inspect_err(|e| {
            log::warn!("Abandoning layout load: {e}");
        })?;

        self.transform.cancel();
        self.store.clear();
        let mut loaded = 0;
        for element in elements {
            if self.store.insert_loaded(element) {
                loaded += 1;
            }
        }
        self.selection.clear();
        self.history.clear();
        self.refresh();
        log::info!("Loaded {loaded} elements");
        Ok(loaded)
    }

    /// Layer list rows, top of the stack first.
    pub fn layers(&self) -> Vec<LayerRow> {
        let primary = self.selection.primary();
        self.store
            .elements()
            .iter()
            .rev()
            .map(|el| LayerRow {
                id: el.id().clone(),
                label: format!("{} \u{2022} {}", el.kind().label(), el.id()),
                active: primary == Some(el.id()),
            })
            .collect()
    }

    /// Mark the scene for saving on the next [`Editor::tick`], e.g. after a
    /// load the host wants persisted.
    pub fn request_save(&mut self) {
        if let Some(autosave) = &mut self.autosave {
            autosave.request();
        }
    }

    /// Animation-frame tick: flush a pending autosave. Returns whether a
    /// write happened.
    pub fn tick(&mut self) -> bool {
        let Some(autosave) = self.autosave.as_mut() else {
            return false;
        };
        let elements = self.store.elements();
        let result = autosave.tick(|| {
            snapshot::to_json(elements, false).map_err(|e| StorageError::Serialization(e.to_string()))
        });
        match result {
            Ok(saved) => saved,
            Err(e) => {
                log::warn!("Autosave failed: {e}");
                false
            }
        }
    }

    /// Load the autosaved layout, if any. Returns whether a layout was
    /// applied.
    pub fn restore(&mut self) -> bool {
        let Some(autosave) = self.autosave.as_ref() else {
            return false;
        };
        let json = match autosave.restore() {
            Ok(Some(json)) => json,
            Ok(None) => return false,
            Err(e) => {
                log::warn!("Could not read saved layout: {e}");
                return false;
            }
        };
        self.load_json(&json).is_ok()
    }

    /// The host reports the device-space canvas rect (after layout or a
    /// window resize). Elements are re-clamped to the new logical size.
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.camera.set_canvas_rect(rect);
        if self.store.set_canvas_size(self.camera.logical_size()) {
            self.commit();
        } else {
            self.refresh();
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
        self.refresh();
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.camera.zoom_by(factor);
        self.refresh();
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snapper.set_enabled(enabled);
    }

    pub fn set_grid_size(&mut self, grid_size: f64) {
        self.snapper.set_grid_size(grid_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, Modifiers};
    use crate::render::RecordingSurface;
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn editor() -> Editor<RecordingSurface> {
        Editor::new(EditorConfig::default(), RecordingSurface::new())
    }

    fn press(id: i32, x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(id, Point::new(x, y))
    }

    fn rect_of(editor: &Editor<RecordingSurface>, id: &ElementId) -> Rect {
        editor.get(id).map(Element::rect).unwrap_or(Rect::ZERO)
    }

    #[test]
    fn test_add_element_does_not_change_selection() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        assert_eq!(id.as_str(), "el_1");
        assert!(editor.selection().is_empty());
        assert_eq!(editor.history().len(), 1);
        assert!(editor.surface().get(&id).is_some());
    }

    #[test]
    fn test_press_selects_then_second_press_drags() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);

        assert!(editor.pointer_down(&press(1, 34.0, 34.0)));
        assert!(!editor.is_gesture_active());
        assert_eq!(editor.selection().primary(), Some(&id));

        assert!(editor.pointer_down(&press(1, 34.0, 34.0)));
        assert_eq!(editor.gesture_kind(), Some(GestureKind::Drag));
        assert!(editor.pointer_move(&press(1, 84.0, 64.0)));
        assert!(editor.pointer_up(&press(1, 84.0, 64.0)));

        let r = rect_of(&editor, &id);
        assert!((r.x0 - 74.0).abs() < 1e-9);
        assert!((r.y0 - 54.0).abs() < 1e-9);
        // add + drag
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_click_without_movement_records_nothing() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        editor.select_only(Some(&id));
        editor.pointer_down(&press(1, 34.0, 34.0));
        assert!(!editor.pointer_move(&press(1, 34.0, 34.0)));
        editor.pointer_up(&press(1, 34.0, 34.0));
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_gesture_is_bound_to_its_pointer() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        editor.select_only(Some(&id));
        editor.pointer_down(&press(1, 34.0, 34.0));

        assert!(!editor.pointer_down(&press(2, 100.0, 100.0)));
        assert!(!editor.pointer_move(&press(2, 300.0, 300.0)));
        assert!(!editor.pointer_up(&press(2, 300.0, 300.0)));
        assert!(editor.is_gesture_active());
        assert!(editor.pointer_cancel(&press(1, 34.0, 34.0)));
        assert!(!editor.is_gesture_active());
    }

    #[test]
    fn test_secondary_button_is_ignored() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        editor.select_only(Some(&id));
        let event = press(1, 34.0, 34.0).with_button(PointerButton::Secondary);
        assert!(!editor.pointer_down(&event));
        assert!(!editor.is_gesture_active());
    }

    #[test]
    fn test_press_on_empty_canvas_clears_selection() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        editor.select_only(Some(&id));
        assert!(editor.pointer_down(&press(1, 900.0, 600.0)));
        assert!(editor.selection().is_empty());
        assert_eq!(editor.decoration(), &Decoration::None);
    }

    #[test]
    fn test_shift_press_toggles_membership() {
        let mut editor = editor();
        let a = editor.add_element(ElementKind::Rectangle);
        let b = editor.add_element(ElementKind::Text);
        editor.select_only(Some(&a));
        editor.set_size(&b, Dimension::X, 400.0);

        let shift = press(1, 410.0, 30.0).with_modifiers(Modifiers::SHIFT);
        assert!(editor.pointer_down(&shift));
        assert_eq!(editor.selection().len(), 2);
        assert!(matches!(editor.decoration(), Decoration::Group { .. }));
        assert!(editor.pointer_down(&shift));
        assert_eq!(editor.selection().ids(), &[a]);
    }

    #[test]
    fn test_resize_from_handle() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        editor.select_only(Some(&id));
        // bottom-right corner of (24,24)-(184,144)
        assert_eq!(editor.hit_test(Point::new(186.0, 146.0)), HitTarget::Handle(Corner::BottomRight));
        editor.pointer_down(&press(1, 184.0, 144.0));
        assert_eq!(editor.gesture_kind(), Some(GestureKind::Resize));
        editor.pointer_move(&press(1, 0.0, 0.0));
        editor.pointer_up(&press(1, 0.0, 0.0));
        let r = rect_of(&editor, &id);
        assert!((r.width() - 40.0).abs() < 1e-9);
        assert!((r.height() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_undo_rejected_during_gesture() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        editor.select_only(Some(&id));
        editor.pointer_down(&press(1, 34.0, 34.0));
        editor.pointer_move(&press(1, 64.0, 34.0));
        assert!(!editor.undo());
        editor.pointer_up(&press(1, 64.0, 34.0));
        assert!(editor.undo());
        assert!((rect_of(&editor, &id).x0 - 24.0).abs() < 1e-9);
        assert!(editor.redo());
        assert!((rect_of(&editor, &id).x0 - 54.0).abs() < 1e-9);
    }

    #[test]
    fn test_geometry_commands_rejected_during_drag() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        editor.select_only(Some(&id));
        editor.pointer_down(&press(1, 34.0, 34.0));

        assert!(!editor.key_down(&KeyEvent::named("ArrowRight")));
        assert!(!editor.set_size(&id, Dimension::Width, 300.0));
        assert!(editor.duplicate_primary().is_none());
        assert!((rect_of(&editor, &id).x0 - 24.0).abs() < 1e-9);

        editor.pointer_move(&press(1, 134.0, 34.0));
        editor.pointer_up(&press(1, 134.0, 34.0));
        assert!((rect_of(&editor, &id).x0 - 124.0).abs() < 1e-9);
        // add + drag, nothing else
        assert_eq!(editor.history().len(), 2);

        assert!(editor.undo());
        assert!((rect_of(&editor, &id).x0 - 24.0).abs() < 1e-9);
        assert!(editor.redo());
        assert!((rect_of(&editor, &id).x0 - 124.0).abs() < 1e-9);

        assert!(editor.key_down(&KeyEvent::named("ArrowRight")));
        assert!(rect_of(&editor, &id).x0 > 124.0);
    }

    #[test]
    fn test_removing_dragged_element_abandons_gesture() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        editor.select_only(Some(&id));
        editor.pointer_down(&press(1, 34.0, 34.0));
        assert!(editor.remove_element(&id));
        assert!(!editor.is_gesture_active());
        assert!(editor.selection().is_empty());
        assert!(editor.surface().get(&id).is_none());
        assert!(!editor.pointer_move(&press(1, 80.0, 80.0)));
    }

    #[test]
    fn test_panel_edits_coalesce_per_field() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        editor.set_size(&id, Dimension::Width, 170.0);
        editor.set_size(&id, Dimension::Width, 180.0);
        editor.set_size(&id, Dimension::Width, 190.0);
        assert_eq!(editor.history().len(), 2);
        editor.set_size(&id, Dimension::Height, 100.0);
        assert_eq!(editor.history().len(), 3);

        editor.undo();
        editor.undo();
        assert!((rect_of(&editor, &id).width() - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_size_ignores_non_finite_and_clamps() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        assert!(!editor.set_size(&id, Dimension::Width, f64::NAN));
        assert!(editor.set_size(&id, Dimension::Width, 5.0));
        assert!((rect_of(&editor, &id).width() - 40.0).abs() < 1e-9);
        assert!(editor.set_size(&id, Dimension::X, 5000.0));
        assert!((rect_of(&editor, &id).x1 - 960.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_aspect_sets_both_sides() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Ellipse);
        editor.set_size(&id, Dimension::Height, 200.0);
        let r = rect_of(&editor, &id);
        assert!((r.width() - 200.0).abs() < 1e-9);
        assert!((r.height() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_payload_setters_respect_capabilities() {
        let mut editor = editor();
        let rect = editor.add_element(ElementKind::Rectangle);
        let text = editor.add_element(ElementKind::Text);
        assert!(!editor.set_text(&rect, "nope"));
        assert!(editor.set_text(&text, "Hello"));
        assert_eq!(editor.get(&text).and_then(Element::text), Some("Hello"));
        assert!(editor.set_style_property(&rect, "background", "#ff0000"));
        assert!(!editor.set_image_source(&rect, "a.png"));
    }

    #[test]
    fn test_image_source_for_removed_element_is_dropped() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Image);
        editor.remove_element(&id);
        let history = editor.history().len();
        assert!(!editor.set_image_source(&id, ImageSource::bytes(vec![0x89, b'P', b'N', b'G'])));
        assert_eq!(editor.history().len(), history);
        assert!(editor.elements().is_empty());
    }

    #[test]
    fn test_keyboard_commands() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        editor.select_only(Some(&id));

        assert!(editor.key_down(&KeyEvent::named("ArrowRight")));
        assert!((rect_of(&editor, &id).x0 - 29.0).abs() < 1e-9);

        let mut typing = KeyEvent::named("Delete");
        typing.in_text_target = true;
        assert!(!editor.key_down(&typing));
        assert_eq!(editor.elements().len(), 1);

        assert!(editor.key_down(&KeyEvent::new(Key::Character('d'), Modifiers::CTRL)));
        assert_eq!(editor.elements().len(), 2);
        assert_eq!(editor.selection().primary().map(ElementId::as_str), Some("el_2"));

        assert!(editor.key_down(&KeyEvent::named("Delete")));
        assert_eq!(editor.elements().len(), 1);
        assert!(editor.key_down(&KeyEvent::new(Key::Character('z'), Modifiers::CTRL)));
        assert_eq!(editor.elements().len(), 2);
    }

    #[test]
    fn test_layers_list_top_first() {
        let mut editor = editor();
        let a = editor.add_element(ElementKind::Rectangle);
        let b = editor.add_element(ElementKind::Button);
        editor.select_only(Some(&a));
        let rows = editor.layers();
        assert_eq!(rows[0].id, b);
        assert_eq!(rows[0].label, "Button \u{2022} el_2");
        assert!(!rows[0].active);
        assert!(rows[1].active);

        editor.reorder(&a, ZDirection::Forward);
        assert_eq!(editor.layers()[0].id, a);
        assert_eq!(editor.surface().get(&a).map(|v| v.z_index), Some(2));
    }

    #[test]
    fn test_load_replaces_scene_and_history() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        editor.select_only(Some(&id));

        let json = r#"[{"id": "el_7", "kind": "text", "x": 5000, "y": 10, "width": 100, "height": 30, "zIndex": 1}]"#;
        assert_eq!(editor.load_json(json).unwrap(), 1);
        assert!(editor.selection().is_empty());
        assert!(!editor.history().can_undo());
        assert!(editor.surface().get(&id).is_none());

        let loaded = ElementId::new("el_7");
        assert!((rect_of(&editor, &loaded).x1 - 960.0).abs() < 1e-9);
        assert_eq!(editor.add_element(ElementKind::Rectangle).as_str(), "el_8");
    }

    #[test]
    fn test_failed_load_changes_nothing() {
        let mut editor = editor();
        editor.add_element(ElementKind::Rectangle);
        assert!(editor.load_json("{not json").is_err());
        assert_eq!(editor.elements().len(), 1);
        assert!(editor.history().can_undo());
    }

    #[test]
    fn test_autosave_round_trip() {
        let autosave = AutoSave::new(Box::new(MemoryStorage::new()), "layout");
        let mut editor = editor().with_autosave(autosave);
        assert!(!editor.restore());
        assert!(!editor.tick());

        let id = editor.add_element(ElementKind::Button);
        editor.set_text(&id, "Buy");
        assert!(editor.tick());
        assert!(!editor.tick());
        assert_eq!(editor.autosave().map(AutoSave::saves), Some(1));

        editor.remove_element(&id);
        assert!(editor.restore());
        assert_eq!(editor.get(&id).and_then(Element::text), Some("Buy"));
    }

    struct Counter(Rc<RefCell<Vec<usize>>>);

    impl SceneObserver for Counter {
        fn scene_changed(&mut self, elements: &[Element], _selection: &Selection) {
            self.0.borrow_mut().push(elements.len());
        }
    }

    #[test]
    fn test_observers_see_every_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut editor = editor();
        editor.add_observer(Box::new(Counter(seen.clone())));
        editor.add_element(ElementKind::Rectangle);
        editor.add_element(ElementKind::Ellipse);
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_zoom_maps_pointer_positions() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        editor.set_zoom(2.0);
        assert!((editor.surface().zoom() - 2.0).abs() < f64::EPSILON);
        assert_eq!(editor.hit_test(Point::new(60.0, 60.0)), HitTarget::Element(id.clone()));
        assert_eq!(editor.hit_test(Point::new(34.0, 34.0)), HitTarget::Canvas);
        assert_eq!(editor.store().canvas_size(), kurbo::Size::new(960.0, 640.0));
    }

    #[test]
    fn test_canvas_shrink_reclamps_elements() {
        let mut editor = editor();
        let id = editor.add_element(ElementKind::Rectangle);
        editor.set_size(&id, Dimension::X, 700.0);
        editor.set_canvas_rect(Rect::new(0.0, 0.0, 500.0, 400.0));
        let r = rect_of(&editor, &id);
        assert!(r.x1 <= 500.0 + 1e-9);
        assert!(editor.surface().get(&id).is_some_and(|v| v.rect == r));
    }
}
