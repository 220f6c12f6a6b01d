//! One-way projection of the scene onto a rendering surface.
//!
//! The store and selection are authoritative. Surfaces are write-only from
//! the engine's side; nothing here ever reads state back from them.

use crate::element::{Element, ElementId, ElementKind, Style};
use crate::geometry::union_bounds;
use crate::selection::{Handle, Selection, corner_handles};
use kurbo::Rect;
use std::collections::{BTreeMap, HashMap};

/// How one element is expressed on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxView {
    pub id: ElementId,
    pub kind: ElementKind,
    pub rect: Rect,
    /// 1-based stacking index; higher is on top.
    pub z_index: usize,
    pub selected: bool,
    pub text: Option<String>,
    pub image_source: Option<String>,
    pub style: Style,
}

impl BoxView {
    fn of(el: &Element, index: usize, selected: bool) -> Self {
        Self {
            id: el.id().clone(),
            kind: el.kind(),
            rect: el.rect(),
            z_index: index + 1,
            selected,
            text: el.text().map(str::to_string),
            image_source: el.image_source().map(str::to_string),
            style: el.style().clone(),
        }
    }
}

/// Selection decoration.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Decoration {
    #[default]
    None,
    /// Resize handles on a lone selection.
    Single { id: ElementId, handles: [Handle; 4] },
    /// Aggregate bounding box with corner handles for a multi-selection.
    Group { bounds: Rect, handles: [Handle; 4] },
}

impl Decoration {
    /// Derive the decoration for `selection`. Ids without a live element are
    /// skipped.
    pub fn derive(elements: &[Element], selection: &Selection) -> Self {
        let selected: Vec<&Element> = selection
            .ids()
            .iter()
            .filter_map(|id| elements.iter().find(|el| el.id() == id))
            .collect();
        match selected.as_slice() {
            [] => Decoration::None,
            [el] => Decoration::Single {
                id: el.id().clone(),
                handles: corner_handles(el.rect()),
            },
            many => match union_bounds(many.iter().copied()) {
                Some(bounds) => Decoration::Group {
                    bounds,
                    handles: corner_handles(bounds),
                },
                None => Decoration::None,
            },
        }
    }

    pub fn handles(&self) -> Option<&[Handle; 4]> {
        match self {
            Decoration::None => None,
            Decoration::Single { handles, .. } | Decoration::Group { handles, .. } => Some(handles),
        }
    }
}

/// A rendering target (DOM, canvas, test recorder).
pub trait Surface {
    /// Create or update the box for `view.id`.
    fn upsert_box(&mut self, view: &BoxView);

    /// Remove the box for a deleted element.
    fn remove_box(&mut self, id: &ElementId);

    /// Replace the selection decoration.
    fn set_decoration(&mut self, decoration: &Decoration);

    /// Apply a zoom factor to the whole surface.
    fn set_zoom(&mut self, _zoom: f64) {}
}

/// Tracks what was last projected so only differences are written.
#[derive(Debug, Default)]
pub struct RenderSync {
    projected: HashMap<ElementId, BoxView>,
    decoration: Decoration,
    zoom: Option<f64>,
}

impl RenderSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring `surface` in line with the scene. Returns the number of surface
    /// writes issued.
    pub fn project(
        &mut self,
        elements: &[Element],
        selection: &Selection,
        zoom: f64,
        surface: &mut dyn Surface,
    ) -> usize {
        let mut writes = 0;

        if self.zoom != Some(zoom) {
            surface.set_zoom(zoom);
            self.zoom = Some(zoom);
            writes += 1;
        }

        let stale: Vec<ElementId> = self
            .projected
            .keys()
            .filter(|id| !elements.iter().any(|el| el.id() == *id))
            .cloned()
            .collect();
        for id in stale {
            surface.remove_box(&id);
            self.projected.remove(&id);
            writes += 1;
        }

        for (index, el) in elements.iter().enumerate() {
            let view = BoxView::of(el, index, selection.contains(el.id()));
            if self.projected.get(el.id()) != Some(&view) {
                surface.upsert_box(&view);
                self.projected.insert(view.id.clone(), view);
                writes += 1;
            }
        }

        let decoration = Decoration::derive(elements, selection);
        if decoration != self.decoration {
            surface.set_decoration(&decoration);
            self.decoration = decoration;
            writes += 1;
        }

        if writes > 0 {
            log::trace!("Projected scene with {writes} surface writes");
        }
        writes
    }

    /// Current decoration as last projected.
    pub fn decoration(&self) -> &Decoration {
        &self.decoration
    }
}

/// In-memory surface that records the projected state. Used by headless
/// hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    boxes: BTreeMap<ElementId, BoxView>,
    decoration: Decoration,
    zoom: f64,
    writes: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            ..Self::default()
        }
    }

    pub fn get(&self, id: &ElementId) -> Option<&BoxView> {
        self.boxes.get(id)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Boxes bottom to top.
    pub fn stacked(&self) -> Vec<&BoxView> {
        let mut views: Vec<&BoxView> = self.boxes.values().collect();
        views.sort_by_key(|v| v.z_index);
        views
    }

    pub fn decoration(&self) -> &Decoration {
        &self.decoration
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Total number of write calls received.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Surface for RecordingSurface {
    fn upsert_box(&mut self, view: &BoxView) {
        self.boxes.insert(view.id.clone(), view.clone());
        self.writes += 1;
    }

    fn remove_box(&mut self, id: &ElementId) {
        self.boxes.remove(id);
        self.writes += 1;
    }

    fn set_decoration(&mut self, decoration: &Decoration) {
        self.decoration = decoration.clone();
        self.writes += 1;
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
        self.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Corner;
    use kurbo::Point;

    fn element(n: u64, rect: Rect) -> Element {
        let mut el = Element::new(ElementId::from_counter(n), ElementKind::Rectangle);
        el.set_rect(rect);
        el
    }

    #[test]
    fn test_decoration_single_and_group() {
        let elements = vec![
            element(1, Rect::new(0.0, 0.0, 100.0, 50.0)),
            element(2, Rect::new(120.0, 30.0, 200.0, 100.0)),
        ];
        let mut selection = Selection::new();
        assert_eq!(Decoration::derive(&elements, &selection), Decoration::None);

        selection.toggle(ElementId::from_counter(1));
        match Decoration::derive(&elements, &selection) {
            Decoration::Single { id, handles } => {
                assert_eq!(id, ElementId::from_counter(1));
                assert_eq!(handles[3].position, Point::new(100.0, 50.0));
            }
            other => panic!("expected single decoration, got {other:?}"),
        }

        selection.toggle(ElementId::from_counter(2));
        match Decoration::derive(&elements, &selection) {
            Decoration::Group { bounds, handles } => {
                assert_eq!(bounds, Rect::new(0.0, 0.0, 200.0, 100.0));
                assert_eq!(handles[0].corner, Corner::TopLeft);
            }
            other => panic!("expected group decoration, got {other:?}"),
        }
    }

    #[test]
    fn test_project_writes_only_differences() {
        let mut elements = vec![
            element(1, Rect::new(0.0, 0.0, 100.0, 50.0)),
            element(2, Rect::new(120.0, 30.0, 200.0, 100.0)),
        ];
        let selection = Selection::new();
        let mut sync = RenderSync::new();
        let mut surface = RecordingSurface::new();

        // zoom + two boxes
        assert_eq!(sync.project(&elements, &selection, 1.0, &mut surface), 3);
        assert_eq!(sync.project(&elements, &selection, 1.0, &mut surface), 0);

        elements[0].set_rect(Rect::new(10.0, 0.0, 110.0, 50.0));
        assert_eq!(sync.project(&elements, &selection, 1.0, &mut surface), 1);
        assert_eq!(
            surface.get(&ElementId::from_counter(1)).map(|v| v.rect),
            Some(Rect::new(10.0, 0.0, 110.0, 50.0))
        );

        elements.remove(1);
        assert_eq!(sync.project(&elements, &selection, 1.0, &mut surface), 1);
        assert_eq!(surface.len(), 1);
    }

    #[test]
    fn test_reorder_updates_z_index() {
        let mut elements = vec![
            element(1, Rect::new(0.0, 0.0, 100.0, 50.0)),
            element(2, Rect::new(0.0, 0.0, 100.0, 50.0)),
        ];
        let selection = Selection::new();
        let mut sync = RenderSync::new();
        let mut surface = RecordingSurface::new();
        sync.project(&elements, &selection, 1.0, &mut surface);

        elements.swap(0, 1);
        sync.project(&elements, &selection, 1.0, &mut surface);
        let stacked: Vec<&str> = surface.stacked().iter().map(|v| v.id.as_str()).collect();
        assert_eq!(stacked, vec!["el_2", "el_1"]);
    }
}
