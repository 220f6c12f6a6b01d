//! Edge and center alignment across a selection.

use crate::element::{Element, ElementId};
use crate::geometry::union_bounds;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Which edge or center line to align on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

impl AlignMode {
    pub const ALL: [AlignMode; 6] = [
        AlignMode::Left,
        AlignMode::Center,
        AlignMode::Right,
        AlignMode::Top,
        AlignMode::Middle,
        AlignMode::Bottom,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Some(AlignMode::Left),
            "center" | "hcenter" => Some(AlignMode::Center),
            "right" => Some(AlignMode::Right),
            "top" => Some(AlignMode::Top),
            "middle" | "vcenter" => Some(AlignMode::Middle),
            "bottom" => Some(AlignMode::Bottom),
            _ => None,
        }
    }

    /// Whether this mode moves elements along x.
    pub fn is_horizontal(self) -> bool {
        matches!(self, AlignMode::Left | AlignMode::Center | AlignMode::Right)
    }
}

/// Per-element translation that aligns `members` on `mode` against their
/// union bounds. Empty when fewer than two members are given.
pub fn align_deltas<'a>(
    members: impl IntoIterator<Item = &'a Element>,
    mode: AlignMode,
) -> Vec<(ElementId, Vec2)> {
    let members: Vec<&Element> = members.into_iter().collect();
    if members.len() < 2 {
        return Vec::new();
    }
    let Some(overall) = union_bounds(members.iter().copied()) else {
        return Vec::new();
    };

    members
        .into_iter()
        .map(|el| {
            let b = el.rect();
            let delta = match mode {
                AlignMode::Left => Vec2::new(overall.x0 - b.x0, 0.0),
                AlignMode::Center => Vec2::new(overall.center().x - b.center().x, 0.0),
                AlignMode::Right => Vec2::new(overall.x1 - b.x1, 0.0),
                AlignMode::Top => Vec2::new(0.0, overall.y0 - b.y0),
                AlignMode::Middle => Vec2::new(0.0, overall.center().y - b.center().y),
                AlignMode::Bottom => Vec2::new(0.0, overall.y1 - b.y1),
            };
            (el.id().clone(), delta)
        })
        .collect()
}
