//! Drag, resize and group-resize gestures.
//!
//! A gesture is bound to the pointer that started it. Move events from any
//! other pointer are ignored, and a second gesture cannot start until the
//! first has ended. All geometry is computed from the state captured at
//! gesture start, so moves are absolute rather than incremental.

use crate::camera::CanvasPointer;
use crate::element::{Element, ElementId, ElementKind};
use crate::geometry::{clamp, union_bounds};
use crate::history::Snapshot;
use crate::input::PointerId;
use crate::selection::Corner;
use crate::snap::Snapper;
use kurbo::{Point, Rect, Size, Vec2};

/// How a kind couples its width and height while resizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coupling {
    Free,
    /// Height is pinned; only the horizontal edges move.
    FixedThickness(f64),
    /// Width always equals height.
    FixedAspect,
}

impl Coupling {
    pub fn of(kind: ElementKind) -> Self {
        let caps = kind.capabilities();
        if caps.fixed_thickness {
            Coupling::FixedThickness(crate::element::LINE_THICKNESS)
        } else if caps.fixed_aspect {
            Coupling::FixedAspect
        } else {
            Coupling::Free
        }
    }
}

/// Constraints for resolving a resize.
#[derive(Debug, Clone, Copy)]
pub struct ResizeParams {
    pub min: Size,
    pub canvas: Size,
    pub snapper: Snapper,
    pub coupling: Coupling,
}

/// Move the edges implicated by `corner` by `delta` and resolve them against
/// the minimum size and the canvas.
///
/// The fixed edges never move. When the pointer crosses the opposite edge,
/// the moving edge is pulled back to keep the minimum size.
pub fn resize_edges(start: Rect, corner: Corner, delta: Vec2, params: &ResizeParams) -> Rect {
    let ResizeParams {
        min,
        canvas,
        snapper,
        coupling,
    } = *params;
    let moves_left = corner.moves_left();
    let moves_top = corner.moves_top();
    let vertical = !matches!(coupling, Coupling::FixedThickness(_));

    let (mut left, mut top, mut right, mut bottom) = (start.x0, start.y0, start.x1, start.y1);
    if moves_left {
        left = snapper.snap(start.x0 + delta.x);
    } else {
        right = snapper.snap(start.x1 + delta.x);
    }
    if vertical {
        if moves_top {
            top = snapper.snap(start.y0 + delta.y);
        } else {
            bottom = snapper.snap(start.y1 + delta.y);
        }
    }

    if coupling == Coupling::FixedAspect {
        return square_edges(start, corner, Rect::new(left, top, right, bottom), params);
    }

    // Pull the moving edge back towards the fixed one.
    if right - left < min.width {
        if moves_left {
            left = right - min.width;
        } else {
            right = left + min.width;
        }
    }
    if moves_left {
        left = clamp(left, 0.0, right - min.width);
    } else {
        right = clamp(right, left + min.width, canvas.width);
    }

    if vertical {
        if bottom - top < min.height {
            if moves_top {
                top = bottom - min.height;
            } else {
                bottom = top + min.height;
            }
        }
        if moves_top {
            top = clamp(top, 0.0, bottom - min.height);
        } else {
            bottom = clamp(bottom, top + min.height, canvas.height);
        }
    }

    left = left.max(0.0);
    top = top.max(0.0);
    right = right.min(canvas.width);
    bottom = bottom.min(canvas.height);

    if right - left < min.width {
        if moves_left {
            left = (right - min.width).max(0.0);
        } else {
            right = (left + min.width).min(canvas.width);
        }
    }
    if bottom - top < min.height {
        if moves_top {
            top = (bottom - min.height).max(0.0);
        } else {
            bottom = (top + min.height).min(canvas.height);
        }
    }

    Rect::new(left, top, right, bottom)
}

/// Fixed-aspect resolution: the larger proposed side wins, anchored at the
/// corner opposite the handle.
fn square_edges(start: Rect, corner: Corner, proposed: Rect, params: &ResizeParams) -> Rect {
    let anchor = corner.opposite().position(start);
    let moves_left = corner.moves_left();
    let moves_top = corner.moves_top();

    let w = if moves_left { anchor.x - proposed.x0 } else { proposed.x1 - anchor.x };
    let h = if moves_top { anchor.y - proposed.y0 } else { proposed.y1 - anchor.y };
    let room_x = if moves_left { anchor.x } else { params.canvas.width - anchor.x };
    let room_y = if moves_top { anchor.y } else { params.canvas.height - anchor.y };

    let min_side = params.min.width.max(params.min.height);
    let side = clamp(w.max(h), min_side, room_x.min(room_y).max(min_side));

    let x0 = if moves_left { anchor.x - side } else { anchor.x };
    let y0 = if moves_top { anchor.y - side } else { anchor.y };
    Rect::new(x0, y0, x0 + side, y0 + side)
}

/// New origin for a single-element drag: clamped, snapped, then clamped
/// again so snapping can never push the element off the canvas.
pub fn drag_position(pointer: Point, offset: Vec2, size: Size, canvas: Size, snapper: &Snapper) -> Point {
    let max_x = (canvas.width - size.width).max(0.0);
    let max_y = (canvas.height - size.height).max(0.0);
    let x = clamp(pointer.x - offset.x, 0.0, max_x);
    let y = clamp(pointer.y - offset.y, 0.0, max_y);
    let snapped = snapper.snap_point(Point::new(x, y));
    Point::new(clamp(snapped.x, 0.0, max_x), clamp(snapped.y, 0.0, max_y))
}

/// Translation applied to every member of a multi-element drag.
///
/// The delta is limited so the union stays on the canvas. With snapping on,
/// it is re-derived from the snapped union origin, so individual members
/// that were off-grid stay off-grid.
pub fn group_drag_delta(start_bounds: Rect, raw: Vec2, canvas: Size, snapper: &Snapper) -> Vec2 {
    let dx = clamp(raw.x, -start_bounds.x0, canvas.width - start_bounds.x1);
    let dy = clamp(raw.y, -start_bounds.y0, canvas.height - start_bounds.y1);
    if !snapper.is_enabled() {
        return Vec2::new(dx, dy);
    }
    let max_x = (canvas.width - start_bounds.width()).max(0.0);
    let max_y = (canvas.height - start_bounds.height()).max(0.0);
    let x = clamp(snapper.snap(start_bounds.x0 + dx), 0.0, max_x);
    let y = clamp(snapper.snap(start_bounds.y0 + dy), 0.0, max_y);
    Vec2::new(x - start_bounds.x0, y - start_bounds.y0)
}

/// Start geometry of one member of a group resize.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMember {
    pub id: ElementId,
    pub start: Rect,
    pub min: Size,
    pub coupling: Coupling,
}

impl GroupMember {
    fn capture(el: &Element, limits: Size) -> Self {
        Self {
            id: el.id().clone(),
            start: el.rect(),
            min: el.kind().min_size(limits),
            coupling: Coupling::of(el.kind()),
        }
    }
}

/// Map each member from `start_bounds` into `new_bounds`, scaling offsets
/// and sizes by the same factors. Each member's size is floored at its own
/// minimum independently.
pub fn scale_members(start_bounds: Rect, new_bounds: Rect, members: &[GroupMember]) -> Vec<(ElementId, Rect)> {
    let sx = if start_bounds.width() > 0.0 {
        new_bounds.width() / start_bounds.width()
    } else {
        1.0
    };
    let sy = if start_bounds.height() > 0.0 {
        new_bounds.height() / start_bounds.height()
    } else {
        1.0
    };

    members
        .iter()
        .map(|m| {
            let x = new_bounds.x0 + (m.start.x0 - start_bounds.x0) * sx;
            let y = new_bounds.y0 + (m.start.y0 - start_bounds.y0) * sy;
            let (w, h) = match m.coupling {
                Coupling::Free => (
                    (m.start.width() * sx).max(m.min.width),
                    (m.start.height() * sy).max(m.min.height),
                ),
                Coupling::FixedThickness(t) => ((m.start.width() * sx).max(m.min.width), t),
                Coupling::FixedAspect => {
                    let side = (m.start.width() * sx)
                        .max(m.start.height() * sy)
                        .max(m.min.width.max(m.min.height));
                    (side, side)
                }
            };
            (m.id.clone(), Rect::new(x, y, x + w, y + h))
        })
        .collect()
}

/// Discriminant of [`Gesture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    MultiDrag,
    Resize,
    GroupResize,
}

/// Captured start state of a gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Move one element; `offset` is pointer minus element origin.
    Drag { id: ElementId, offset: Vec2, size: Size },
    /// Move several elements by a shared delta.
    MultiDrag {
        start_pointer: Point,
        start_bounds: Rect,
        members: Vec<(ElementId, Rect)>,
    },
    /// Resize one element from a corner handle.
    Resize {
        id: ElementId,
        corner: Corner,
        start_pointer: Point,
        start_edges: Rect,
        min: Size,
        coupling: Coupling,
    },
    /// Proportionally resize a selection from a corner of its union bounds.
    GroupResize {
        corner: Corner,
        start_pointer: Point,
        start_bounds: Rect,
        members: Vec<GroupMember>,
    },
}

impl Gesture {
    pub fn drag(el: &Element, pointer: Point) -> Self {
        Gesture::Drag {
            id: el.id().clone(),
            offset: pointer - el.origin(),
            size: el.size(),
        }
    }

    /// Multi-element drag. `None` for an empty set.
    pub fn multi_drag(elements: &[&Element], pointer: Point) -> Option<Self> {
        let start_bounds = union_bounds(elements.iter().copied())?;
        Some(Gesture::MultiDrag {
            start_pointer: pointer,
            start_bounds,
            members: elements
                .iter()
                .map(|el| (el.id().clone(), el.rect()))
                .collect(),
        })
    }

    pub fn resize(el: &Element, corner: Corner, pointer: Point, limits: Size) -> Self {
        Gesture::Resize {
            id: el.id().clone(),
            corner,
            start_pointer: pointer,
            start_edges: el.rect(),
            min: el.kind().min_size(limits),
            coupling: Coupling::of(el.kind()),
        }
    }

    /// Group resize over the union bounds. `None` for an empty set.
    pub fn group_resize(elements: &[&Element], corner: Corner, pointer: Point, limits: Size) -> Option<Self> {
        let start_bounds = union_bounds(elements.iter().copied())?;
        Some(Gesture::GroupResize {
            corner,
            start_pointer: pointer,
            start_bounds,
            members: elements
                .iter()
                .map(|el| GroupMember::capture(el, limits))
                .collect(),
        })
    }

    pub fn kind(&self) -> GestureKind {
        match self {
            Gesture::Drag { .. } => GestureKind::Drag,
            Gesture::MultiDrag { .. } => GestureKind::MultiDrag,
            Gesture::Resize { .. } => GestureKind::Resize,
            Gesture::GroupResize { .. } => GestureKind::GroupResize,
        }
    }

    /// Whether the gesture references `id`.
    pub fn involves(&self, id: &ElementId) -> bool {
        match self {
            Gesture::Drag { id: target, .. } | Gesture::Resize { id: target, .. } => target == id,
            Gesture::MultiDrag { members, .. } => members.iter().any(|(m, _)| m == id),
            Gesture::GroupResize { members, .. } => members.iter().any(|m| m.id == *id),
        }
    }

    /// Target geometry for every affected element at pointer position `at`.
    /// `limits` is the general minimum element size, used for the union
    /// bounds of a group resize.
    pub fn targets(&self, at: CanvasPointer, snapper: &Snapper, limits: Size) -> Vec<(ElementId, Rect)> {
        let canvas = at.canvas_size;
        match self {
            Gesture::Drag { id, offset, size } => {
                let origin = drag_position(at.point, *offset, *size, canvas, snapper);
                vec![(id.clone(), Rect::from_origin_size(origin, *size))]
            }
            Gesture::MultiDrag {
                start_pointer,
                start_bounds,
                members,
            } => {
                let delta = group_drag_delta(*start_bounds, at.point - *start_pointer, canvas, snapper);
                members
                    .iter()
                    .map(|(id, start)| (id.clone(), *start + delta))
                    .collect()
            }
            Gesture::Resize {
                id,
                corner,
                start_pointer,
                start_edges,
                min,
                coupling,
            } => {
                let params = ResizeParams {
                    min: *min,
                    canvas,
                    snapper: *snapper,
                    coupling: *coupling,
                };
                let edges = resize_edges(*start_edges, *corner, at.point - *start_pointer, &params);
                vec![(id.clone(), edges)]
            }
            Gesture::GroupResize {
                corner,
                start_pointer,
                start_bounds,
                members,
            } => {
                let params = ResizeParams {
                    min: limits,
                    canvas,
                    snapper: *snapper,
                    coupling: Coupling::Free,
                };
                let bounds = resize_edges(*start_bounds, *corner, at.point - *start_pointer, &params);
                scale_members(*start_bounds, bounds, members)
            }
        }
    }

    /// Drop `id` from the gesture. Returns false when the gesture has no
    /// targets left and must be abandoned.
    fn forget(&mut self, id: &ElementId) -> bool {
        match self {
            Gesture::Drag { id: target, .. } | Gesture::Resize { id: target, .. } => target != id,
            Gesture::MultiDrag { members, .. } => {
                members.retain(|(m, _)| m != id);
                !members.is_empty()
            }
            Gesture::GroupResize { members, .. } => {
                members.retain(|m| m.id != *id);
                !members.is_empty()
            }
        }
    }
}

/// Result of feeding a move event to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// No gesture, or the event came from another pointer.
    Ignored,
    /// The gesture is live but nothing moved.
    Unchanged,
    /// Geometry changed. Carries the pre-gesture snapshot the first time
    /// the gesture actually mutates the scene.
    Changed { checkpoint: Option<Snapshot> },
}

#[derive(Debug, Clone)]
struct ActiveGesture {
    pointer: PointerId,
    gesture: Gesture,
    pending_checkpoint: Option<Snapshot>,
}

/// The gesture state machine: Idle, or exactly one active gesture.
#[derive(Debug, Clone, Default)]
pub struct TransformEngine {
    active: Option<ActiveGesture>,
}

impl TransformEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn kind(&self) -> Option<GestureKind> {
        self.active.as_ref().map(|a| a.gesture.kind())
    }

    pub fn pointer(&self) -> Option<PointerId> {
        self.active.as_ref().map(|a| a.pointer)
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.active.as_ref().map(|a| &a.gesture)
    }

    /// Start a gesture bound to `pointer`, carrying the pre-gesture
    /// snapshot. Refused while another gesture is active.
    ///
    /// The snapshot is held, not pushed: it becomes a history checkpoint on
    /// the first move that changes geometry (see [`MoveOutcome::Changed`]),
    /// so a press and release without movement leaves history untouched.
    pub fn begin(&mut self, pointer: PointerId, gesture: Gesture, checkpoint: Snapshot) -> bool {
        if let Some(active) = &self.active {
            log::debug!(
                "Ignoring {:?} start from pointer {pointer}: {:?} active for pointer {}",
                gesture.kind(),
                active.gesture.kind(),
                active.pointer
            );
            return false;
        }
        log::debug!("Begin {:?} gesture for pointer {pointer}", gesture.kind());
        self.active = Some(ActiveGesture {
            pointer,
            gesture,
            pending_checkpoint: Some(checkpoint),
        });
        true
    }

    /// Resolve a move event into target geometry, writing it through
    /// `apply`. `apply` returns whether that element actually changed.
    pub fn update(
        &mut self,
        pointer: PointerId,
        at: CanvasPointer,
        snapper: &Snapper,
        limits: Size,
        mut apply: impl FnMut(&ElementId, Rect) -> bool,
    ) -> MoveOutcome {
        let Some(active) = self.active.as_mut() else {
            return MoveOutcome::Ignored;
        };
        if active.pointer != pointer {
            return MoveOutcome::Ignored;
        }

        let mut changed = false;
        for (id, rect) in active.gesture.targets(at, snapper, limits) {
            changed |= apply(&id, rect);
        }
        if changed {
            MoveOutcome::Changed {
                checkpoint: active.pending_checkpoint.take(),
            }
        } else {
            MoveOutcome::Unchanged
        }
    }

    /// End the gesture on release or cancel from the bound pointer.
    pub fn end(&mut self, pointer: PointerId) -> Option<GestureKind> {
        if self.pointer() != Some(pointer) {
            return None;
        }
        let active = self.active.take()?;
        log::debug!("End {:?} gesture for pointer {pointer}", active.gesture.kind());
        Some(active.gesture.kind())
    }

    /// Abandon any gesture unconditionally.
    pub fn cancel(&mut self) -> Option<GestureKind> {
        self.active.take().map(|a| a.gesture.kind())
    }

    /// Remove a deleted element from the active gesture, abandoning the
    /// gesture if nothing is left to move.
    pub fn forget(&mut self, id: &ElementId) {
        let keep = match self.active.as_mut() {
            Some(active) => active.gesture.forget(id),
            None => return,
        };
        if !keep {
            log::debug!("Abandoning gesture: element {id} was removed");
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Size = Size::new(800.0, 600.0);
    const LIMITS: Size = Size::new(40.0, 24.0);

    fn params(coupling: Coupling) -> ResizeParams {
        ResizeParams {
            min: LIMITS,
            canvas: CANVAS,
            snapper: Snapper::default(),
            coupling,
        }
    }

    fn at(x: f64, y: f64) -> CanvasPointer {
        CanvasPointer {
            point: Point::new(x, y),
            canvas_size: CANVAS,
        }
    }

    fn checkpoint() -> Snapshot {
        Snapshot {
            elements: Vec::new(),
            selection: Vec::new(),
            counter: 0,
        }
    }

    fn element(n: u64, kind: ElementKind, rect: Rect) -> Element {
        let mut el = Element::new(ElementId::from_counter(n), kind);
        el.set_rect(rect);
        el
    }

    #[test]
    fn test_resize_bottom_right() {
        let start = Rect::new(100.0, 100.0, 200.0, 150.0);
        let rect = resize_edges(start, Corner::BottomRight, Vec2::new(30.0, 20.0), &params(Coupling::Free));
        assert_eq!(rect, Rect::new(100.0, 100.0, 230.0, 170.0));
    }

    #[test]
    fn test_resize_past_opposite_edge_keeps_minimum() {
        let start = Rect::new(100.0, 100.0, 200.0, 150.0);
        for corner in Corner::ALL {
            for delta in [Vec2::new(-500.0, -500.0), Vec2::new(500.0, 500.0), Vec2::new(-90.0, 70.0)] {
                let rect = resize_edges(start, corner, delta, &params(Coupling::Free));
                assert!(rect.width() >= LIMITS.width - 1e-9, "{corner:?} {delta:?} {rect:?}");
                assert!(rect.height() >= LIMITS.height - 1e-9, "{corner:?} {delta:?} {rect:?}");
                assert!(rect.x0 >= 0.0 && rect.y0 >= 0.0);
                assert!(rect.x1 <= CANVAS.width && rect.y1 <= CANVAS.height);
            }
        }
    }

    #[test]
    fn test_resize_fixed_edge_never_moves() {
        let start = Rect::new(100.0, 100.0, 200.0, 150.0);
        let rect = resize_edges(start, Corner::TopLeft, Vec2::new(300.0, 300.0), &params(Coupling::Free));
        assert!((rect.x1 - 200.0).abs() < f64::EPSILON);
        assert!((rect.y1 - 150.0).abs() < f64::EPSILON);
        assert!((rect.x0 - 160.0).abs() < f64::EPSILON);
        assert!((rect.y0 - 126.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_clamps_to_canvas() {
        let start = Rect::new(700.0, 500.0, 760.0, 560.0);
        let rect = resize_edges(start, Corner::BottomRight, Vec2::new(400.0, 400.0), &params(Coupling::Free));
        assert_eq!(rect, Rect::new(700.0, 500.0, 800.0, 600.0));
    }

    #[test]
    fn test_resize_snaps_moved_edges() {
        let mut p = params(Coupling::Free);
        p.snapper = Snapper::new(true, 10.0);
        let start = Rect::new(103.0, 100.0, 203.0, 150.0);
        let rect = resize_edges(start, Corner::BottomRight, Vec2::new(14.0, 3.0), &p);
        // Only the moving edges land on the grid.
        assert_eq!(rect, Rect::new(103.0, 100.0, 220.0, 150.0));
    }

    #[test]
    fn test_line_keeps_thickness() {
        let start = Rect::new(100.0, 100.0, 300.0, 104.0);
        let mut p = params(Coupling::FixedThickness(4.0));
        p.min = Size::new(40.0, 4.0);
        let rect = resize_edges(start, Corner::BottomRight, Vec2::new(50.0, 80.0), &p);
        assert_eq!(rect, Rect::new(100.0, 100.0, 350.0, 104.0));
    }

    #[test]
    fn test_ellipse_stays_square_anchored_opposite() {
        let start = Rect::new(100.0, 100.0, 220.0, 220.0);
        let mut p = params(Coupling::FixedAspect);
        p.min = Size::new(40.0, 40.0);
        let rect = resize_edges(start, Corner::TopLeft, Vec2::new(-30.0, -10.0), &p);
        assert_eq!(rect, Rect::new(70.0, 70.0, 220.0, 220.0));

        let shrunk = resize_edges(start, Corner::BottomRight, Vec2::new(-500.0, -500.0), &p);
        assert_eq!(shrunk, Rect::new(100.0, 100.0, 140.0, 140.0));

        let grown = resize_edges(start, Corner::BottomRight, Vec2::new(900.0, 0.0), &p);
        assert_eq!(grown, Rect::new(100.0, 100.0, 600.0, 600.0));
    }

    #[test]
    fn test_drag_position_clamps_then_snaps() {
        let offset = Vec2::new(10.0, 10.0);
        let size = Size::new(160.0, 120.0);
        let free = drag_position(Point::new(84.0, 64.0), offset, size, CANVAS, &Snapper::default());
        assert_eq!(free, Point::new(74.0, 54.0));
        let snapped = drag_position(Point::new(84.0, 64.0), offset, size, CANVAS, &Snapper::new(true, 10.0));
        assert_eq!(snapped, Point::new(70.0, 50.0));
        let edge = drag_position(Point::new(5000.0, -50.0), offset, size, CANVAS, &Snapper::new(true, 7.0));
        assert_eq!(edge, Point::new(637.0, 0.0));
    }

    #[test]
    fn test_group_drag_delta_keeps_union_inside() {
        let bounds = Rect::new(100.0, 100.0, 300.0, 200.0);
        let delta = group_drag_delta(bounds, Vec2::new(-500.0, 1000.0), CANVAS, &Snapper::default());
        assert_eq!(delta, Vec2::new(-100.0, 400.0));
    }

    #[test]
    fn test_group_drag_snaps_union_corner() {
        let bounds = Rect::new(13.0, 27.0, 113.0, 77.0);
        let delta = group_drag_delta(bounds, Vec2::new(20.0, 20.0), CANVAS, &Snapper::new(true, 10.0));
        assert_eq!(delta, Vec2::new(17.0, 23.0));
    }

    #[test]
    fn test_scale_members_proportional() {
        let start = Rect::new(0.0, 0.0, 200.0, 100.0);
        let members = vec![
            GroupMember {
                id: ElementId::from_counter(1),
                start: Rect::new(0.0, 0.0, 80.0, 40.0),
                min: LIMITS,
                coupling: Coupling::Free,
            },
            GroupMember {
                id: ElementId::from_counter(2),
                start: Rect::new(100.0, 50.0, 200.0, 100.0),
                min: LIMITS,
                coupling: Coupling::Free,
            },
        ];
        let out = scale_members(start, Rect::new(0.0, 0.0, 400.0, 100.0), &members);
        assert_eq!(out[0].1, Rect::new(0.0, 0.0, 160.0, 40.0));
        assert_eq!(out[1].1, Rect::new(200.0, 50.0, 400.0, 100.0));
    }

    #[test]
    fn test_scale_members_floors_each_member() {
        let start = Rect::new(0.0, 0.0, 400.0, 200.0);
        let members = vec![
            GroupMember {
                id: ElementId::from_counter(1),
                start: Rect::new(0.0, 0.0, 400.0, 200.0),
                min: LIMITS,
                coupling: Coupling::Free,
            },
            GroupMember {
                id: ElementId::from_counter(2),
                start: Rect::new(0.0, 0.0, 50.0, 30.0),
                min: LIMITS,
                coupling: Coupling::Free,
            },
        ];
        let out = scale_members(start, Rect::new(0.0, 0.0, 100.0, 50.0), &members);
        assert_eq!(out[0].1.size(), Size::new(100.0, 50.0));
        assert_eq!(out[1].1.size(), LIMITS);
    }

    #[test]
    fn test_zero_start_dimension_is_noop_scale() {
        let start = Rect::new(10.0, 10.0, 10.0, 10.0);
        let members = vec![GroupMember {
            id: ElementId::from_counter(1),
            start: Rect::new(10.0, 10.0, 50.0, 34.0),
            min: LIMITS,
            coupling: Coupling::Free,
        }];
        let out = scale_members(start, Rect::new(10.0, 10.0, 90.0, 60.0), &members);
        assert_eq!(out[0].1.size(), Size::new(40.0, 24.0));
    }

    #[test]
    fn test_engine_binds_pointer() {
        let el = element(1, ElementKind::Rectangle, Rect::new(24.0, 24.0, 184.0, 144.0));
        let mut engine = TransformEngine::new();
        assert!(engine.begin(1, Gesture::drag(&el, Point::new(30.0, 30.0)), checkpoint()));
        assert!(!engine.begin(2, Gesture::drag(&el, Point::new(30.0, 30.0)), checkpoint()));

        let outcome = engine.update(2, at(80.0, 60.0), &Snapper::default(), LIMITS, |_, _| true);
        assert_eq!(outcome, MoveOutcome::Ignored);

        let mut seen = Vec::new();
        let outcome = engine.update(1, at(80.0, 60.0), &Snapper::default(), LIMITS, |id, rect| {
            seen.push((id.clone(), rect));
            true
        });
        assert_eq!(outcome, MoveOutcome::Changed { checkpoint: Some(checkpoint()) });
        assert_eq!(seen[0].1, Rect::new(74.0, 54.0, 234.0, 174.0));

        // The checkpoint is handed out only once.
        let outcome = engine.update(1, at(90.0, 60.0), &Snapper::default(), LIMITS, |_, _| true);
        assert_eq!(outcome, MoveOutcome::Changed { checkpoint: None });

        assert_eq!(engine.end(2), None);
        assert_eq!(engine.end(1), Some(GestureKind::Drag));
        assert!(!engine.is_active());
    }

    #[test]
    fn test_forget_abandons_single_target_gesture() {
        let el = element(1, ElementKind::Rectangle, Rect::new(24.0, 24.0, 184.0, 144.0));
        let mut engine = TransformEngine::new();
        engine.begin(1, Gesture::resize(&el, Corner::BottomRight, Point::ZERO, LIMITS), checkpoint());
        engine.forget(&ElementId::from_counter(9));
        assert!(engine.is_active());
        engine.forget(el.id());
        assert!(!engine.is_active());
    }

    #[test]
    fn test_forget_drops_group_member() {
        let a = element(1, ElementKind::Rectangle, Rect::new(0.0, 0.0, 50.0, 50.0));
        let b = element(2, ElementKind::Rectangle, Rect::new(100.0, 0.0, 150.0, 50.0));
        let gesture = Gesture::multi_drag(&[&a, &b], Point::ZERO).unwrap();
        let mut engine = TransformEngine::new();
        engine.begin(1, gesture, checkpoint());
        engine.forget(a.id());
        assert!(engine.is_active());
        assert!(!engine.gesture().unwrap().involves(a.id()));
        engine.forget(b.id());
        assert!(!engine.is_active());
    }
}
