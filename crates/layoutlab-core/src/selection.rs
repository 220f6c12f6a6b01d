//! Selection model and resize handle geometry.

use crate::element::ElementId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Corner positions of a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Whether dragging this corner moves the left edge (otherwise the right).
    pub fn moves_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    /// Whether dragging this corner moves the top edge (otherwise the bottom).
    pub fn moves_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    /// Position of this corner on `rect`.
    pub fn position(self, rect: Rect) -> Point {
        let x = if self.moves_left() { rect.x0 } else { rect.x1 };
        let y = if self.moves_top() { rect.y0 } else { rect.y1 };
        Point::new(x, y)
    }

    /// The diagonally opposite corner, which stays fixed during a resize.
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// Short handle name (`tl`, `tr`, `bl`, `br`).
    pub fn short_name(self) -> &'static str {
        match self {
            Corner::TopLeft => "tl",
            Corner::TopRight => "tr",
            Corner::BottomLeft => "bl",
            Corner::BottomRight => "br",
        }
    }
}

/// A resize handle with its position in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub position: Point,
    pub corner: Corner,
}

impl Handle {
    pub fn new(position: Point, corner: Corner) -> Self {
        Self { position, corner }
    }

    /// Check if a point hits this handle. `tolerance` is in canvas units and
    /// should already account for zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// The four corner handles of `bounds`.
pub fn corner_handles(bounds: Rect) -> [Handle; 4] {
    Corner::ALL.map(|corner| Handle::new(corner.position(bounds), corner))
}

/// Which corner handle of `bounds`, if any, lies under `point`.
pub fn hit_test_handles(bounds: Rect, point: Point, tolerance: f64) -> Option<Corner> {
    corner_handles(bounds)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.corner)
}

/// Ordered set of selected element ids. Insertion order is click order; the
/// last id is the primary selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `{id}`, or clear it for `None`.
    pub fn select_only(&mut self, id: Option<ElementId>) {
        self.ids.clear();
        self.ids.extend(id);
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.ids.iter().position(|s| *s == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Most recently added id.
    pub fn primary(&self) -> Option<&ElementId> {
        self.ids.last()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop ids for which `live` returns false.
    pub fn prune(&mut self, mut live: impl FnMut(&ElementId) -> bool) {
        self.ids.retain(|id| live(id));
    }

    /// Remove a single id. Returns whether it was selected.
    pub fn remove(&mut self, id: &ElementId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| s != id);
        self.ids.len() != before
    }

    /// Replace the whole selection, dropping duplicates.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> ElementId {
        ElementId::from_counter(n)
    }

    #[test]
    fn test_select_only_and_clear() {
        let mut selection = Selection::new();
        selection.select_only(Some(id(1)));
        selection.select_only(Some(id(2)));
        assert_eq!(selection.ids(), &[id(2)]);
        selection.select_only(None);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_tracks_primary() {
        let mut selection = Selection::new();
        selection.toggle(id(1));
        selection.toggle(id(2));
        assert_eq!(selection.primary(), Some(&id(2)));
        selection.toggle(id(2));
        assert_eq!(selection.primary(), Some(&id(1)));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_prune() {
        let mut selection = Selection::new();
        selection.replace([id(1), id(2), id(3), id(2)]);
        assert_eq!(selection.len(), 3);
        selection.prune(|s| *s != id(2));
        assert_eq!(selection.ids(), &[id(1), id(3)]);
    }

    #[test]
    fn test_corner_handles() {
        let handles = corner_handles(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(handles[0].corner, Corner::TopLeft);
        assert_eq!(handles[3].position, Point::new(100.0, 50.0));
    }

    #[test]
    fn test_handle_hit_test() {
        let bounds = Rect::new(10.0, 10.0, 110.0, 60.0);
        assert_eq!(
            hit_test_handles(bounds, Point::new(112.0, 58.0), 8.0),
            Some(Corner::BottomRight)
        );
        assert_eq!(hit_test_handles(bounds, Point::new(60.0, 35.0), 8.0), None);
    }

    #[test]
    fn test_corner_opposite() {
        for corner in Corner::ALL {
            assert_eq!(corner.opposite().opposite(), corner);
            assert_ne!(corner.moves_left(), corner.opposite().moves_left());
        }
    }
}
