//! Element store: the ordered scene and the id counter.

use crate::element::{Element, ElementId, ElementKind};
use kurbo::{Rect, Size, Vec2};

/// Direction for a one-step z-order change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZDirection {
    /// Towards the top of the stack.
    Forward,
    /// Towards the bottom of the stack.
    Backward,
}

/// Owns the scene. Vector order is z-order: index 0 is the bottom.
///
/// Every geometry write goes through [`ElementStore::set_geometry`], which
/// re-establishes the resting invariants before returning.
#[derive(Debug, Clone)]
pub struct ElementStore {
    elements: Vec<Element>,
    counter: u64,
    canvas: Size,
    limits: Size,
}

impl ElementStore {
    /// Create an empty store for a canvas of `canvas` logical units with
    /// minimum element size `limits`.
    pub fn new(canvas: Size, limits: Size) -> Self {
        Self {
            elements: Vec::new(),
            counter: 0,
            canvas,
            limits,
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Highest counter value handed out so far.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    /// General minimum element size.
    pub fn limits(&self) -> Size {
        self.limits
    }

    /// Create an element of `kind` at the top of the z-order.
    pub fn create(&mut self, kind: ElementKind) -> ElementId {
        let id = self.next_id();
        let mut element = Element::new(id.clone(), kind);
        element.clamp_to_canvas(self.canvas, self.limits);
        self.elements.push(element);
        log::debug!("Created {kind} element {id}");
        id
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == *id)
    }

    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|el| el.id == *id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Element at the top of the z-order whose box contains `point`.
    pub fn topmost_at(&self, point: kurbo::Point) -> Option<&Element> {
        self.elements.iter().rev().find(|el| {
            let r = el.rect();
            point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
        })
    }

    /// Remove an element. Callers are responsible for pruning selection and
    /// gesture state.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        Some(self.elements.remove(index))
    }

    /// Swap with the adjacent neighbour. Returns false at either end or for
    /// an unknown id.
    pub fn reorder(&mut self, id: &ElementId, direction: ZDirection) -> bool {
        let Some(pos) = self.index_of(id) else {
            return false;
        };
        match direction {
            ZDirection::Forward if pos + 1 < self.elements.len() => {
                self.elements.swap(pos, pos + 1);
                true
            }
            ZDirection::Backward if pos > 0 => {
                self.elements.swap(pos, pos - 1);
                true
            }
            _ => false,
        }
    }

    /// Re-establish the resting invariants on one element.
    pub fn clamp_to_canvas(&mut self, id: &ElementId) {
        let (canvas, limits) = (self.canvas, self.limits);
        if let Some(el) = self.get_mut(id) {
            el.clamp_to_canvas(canvas, limits);
        }
    }

    pub fn clamp_all(&mut self) {
        let (canvas, limits) = (self.canvas, self.limits);
        for el in &mut self.elements {
            el.clamp_to_canvas(canvas, limits);
        }
    }

    /// Write position and size from an edge rect, then clamp.
    /// Returns whether anything changed.
    pub fn set_geometry(&mut self, id: &ElementId, rect: Rect) -> bool {
        let (canvas, limits) = (self.canvas, self.limits);
        let Some(el) = self.get_mut(id) else {
            return false;
        };
        let before = el.rect();
        el.set_rect(rect);
        el.clamp_to_canvas(canvas, limits);
        el.rect() != before
    }

    /// Move an element by `delta`, clamped to the canvas.
    pub fn translate(&mut self, id: &ElementId, delta: Vec2) -> bool {
        let Some(rect) = self.get(id).map(Element::rect) else {
            return false;
        };
        self.set_geometry(id, rect + delta)
    }

    pub fn set_style_property(&mut self, id: &ElementId, key: &str, value: &str) -> bool {
        let Some(el) = self.get_mut(id) else {
            return false;
        };
        if el.style.get(key).map(String::as_str) == Some(value) {
            return false;
        }
        el.style.insert(key.to_string(), value.to_string());
        true
    }

    /// Set the text payload. Ignored for kinds without text.
    pub fn set_text(&mut self, id: &ElementId, text: &str) -> bool {
        let Some(el) = self.get_mut(id) else {
            return false;
        };
        if !el.capabilities().has_text || el.text.as_deref() == Some(text) {
            return false;
        }
        el.text = Some(text.to_string());
        true
    }

    /// Set the image source. Ignored for kinds without an image payload.
    pub fn set_image_source(&mut self, id: &ElementId, source: String) -> bool {
        let Some(el) = self.get_mut(id) else {
            return false;
        };
        if !el.capabilities().has_image_source || el.image_source.as_ref() == Some(&source) {
            return false;
        }
        el.image_source = Some(source);
        true
    }

    /// Copy an element under a fresh id, shifted by `offset`, on top of the
    /// z-order.
    pub fn duplicate(&mut self, id: &ElementId, offset: Vec2) -> Option<ElementId> {
        let mut copy = self.get(id)?.clone();
        copy.id = self.next_id();
        copy.x += offset.x;
        copy.y += offset.y;
        copy.clamp_to_canvas(self.canvas, self.limits);
        let new_id = copy.id.clone();
        self.elements.push(copy);
        Some(new_id)
    }

    /// Advance the counter to the next free id. Loaded files may carry any
    /// suffix, so the counter wraps from `u64::MAX` back to 1 and skips ids
    /// in use.
    fn next_id(&mut self) -> ElementId {
        loop {
            self.counter = self.counter.checked_add(1).unwrap_or(1);
            let id = ElementId::from_counter(self.counter);
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Replace the whole scene, e.g. from a history snapshot.
    pub fn restore(&mut self, elements: Vec<Element>, counter: u64) {
        self.elements = elements;
        self.counter = counter;
        // The canvas may have shrunk since the snapshot was taken.
        self.clamp_all();
    }

    /// Drop every element. The counter is kept so ids are never reused.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Append an already-built element (from a load), clamping it and
    /// advancing the counter past its numeric suffix. Duplicate ids are
    /// rejected.
    pub fn insert_loaded(&mut self, mut element: Element) -> bool {
        if self.contains(&element.id) {
            log::warn!("Skipping duplicate element id {}", element.id);
            return false;
        }
        element.clamp_to_canvas(self.canvas, self.limits);
        if let Some(n) = element.id.counter_suffix() {
            self.advance_counter(n);
        }
        self.elements.push(element);
        true
    }

    /// Make sure future ids start after `n`.
    pub fn advance_counter(&mut self, n: u64) {
        self.counter = self.counter.max(n);
    }

    /// Change the logical canvas size and re-clamp every element. Returns
    /// false (and changes nothing) for non-finite or negative sizes.
    pub fn set_canvas_size(&mut self, canvas: Size) -> bool {
        let valid = canvas.width.is_finite()
            && canvas.height.is_finite()
            && canvas.width >= 0.0
            && canvas.height >= 0.0;
        if !valid || canvas == self.canvas {
            return false;
        }
        self.canvas = canvas;
        self.clamp_all();
        true
    }

    fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == *id)
    }
}
