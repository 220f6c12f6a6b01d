//! Serialized scene snapshots: the export/persistence record format and the
//! lenient loader for previously saved layouts.

use crate::element::{DEFAULT_POSITION, Element, ElementId, ElementKind, Style};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that abandon a whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid layout JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Layout is not a list of elements")]
    NotAList,
}

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// One element as written by the snapshot API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedElement {
    pub id: ElementId,
    #[serde(alias = "type")]
    pub kind: ElementKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, alias = "styles")]
    pub style: Style,
    /// 1-based stacking position.
    pub z_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_source: Option<String>,
}

impl SerializedElement {
    fn of(el: &Element, index: usize) -> Self {
        Self {
            id: el.id().clone(),
            kind: el.kind(),
            x: el.x,
            y: el.y,
            width: el.width,
            height: el.height,
            style: el.style().clone(),
            z_index: index + 1,
            text: el.text().map(str::to_string),
            image_source: el.image_source().map(str::to_string),
        }
    }
}

/// Read the scene in z-order.
pub fn serialize(elements: &[Element]) -> Vec<SerializedElement> {
    elements
        .iter()
        .enumerate()
        .map(|(index, el)| SerializedElement::of(el, index))
        .collect()
}

/// Serialize the scene to a JSON array.
pub fn to_json(elements: &[Element], pretty: bool) -> Result<String, serde_json::Error> {
    let records = serialize(elements);
    if pretty {
        serde_json::to_string_pretty(&records)
    } else {
        serde_json::to_string(&records)
    }
}

/// Parse a saved layout.
///
/// Entries are re-sorted by their recorded `zIndex`. Entries without an id
/// or kind, or repeating an earlier id, are skipped. Unknown kinds load as
/// rectangles. Missing or invalid fields fall back to the kind's defaults.
/// Elements are not clamped here; the store does that on insert.
pub fn parse_elements(json: &str) -> LoadResult<Vec<Element>> {
    let value: Value = serde_json::from_str(json)?;
    elements_from_value(&value)
}

/// Like [`parse_elements`], from an already-parsed JSON value.
pub fn elements_from_value(value: &Value) -> LoadResult<Vec<Element>> {
    let entries = value.as_array().ok_or(LoadError::NotAList)?;

    let mut sorted: Vec<&Value> = entries.iter().collect();
    // Stable, so entries with equal zIndex keep file order.
    sorted.sort_by(|a, b| z_index_of(a).total_cmp(&z_index_of(b)));

    let mut elements: Vec<Element> = Vec::with_capacity(sorted.len());
    for entry in sorted {
        let Some(el) = element_from_value(entry) else {
            log::warn!("Skipping layout entry without id or kind");
            continue;
        };
        if elements.iter().any(|e| e.id == el.id) {
            log::warn!("Skipping duplicate layout entry {}", el.id);
            continue;
        }
        elements.push(el);
    }
    Ok(elements)
}

fn z_index_of(entry: &Value) -> f64 {
    number(entry.get("zIndex")).unwrap_or(0.0)
}

/// A finite number, accepting numeric strings.
fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn element_from_value(entry: &Value) -> Option<Element> {
    let id = entry.get("id")?.as_str().filter(|s| !s.is_empty())?;
    let kind_name = entry.get("kind").or_else(|| entry.get("type"))?.as_str()?;
    let kind = ElementKind::parse(kind_name).unwrap_or_else(|| {
        log::debug!("Unknown element kind {kind_name:?} for {id}; loading as rectangle");
        ElementKind::Rectangle
    });

    let mut el = Element::new(ElementId::new(id), kind);
    let size = kind.default_size();
    el.x = number(entry.get("x")).unwrap_or(DEFAULT_POSITION.x);
    el.y = number(entry.get("y")).unwrap_or(DEFAULT_POSITION.y);
    el.width = number(entry.get("width")).unwrap_or(size.width);
    el.height = number(entry.get("height")).unwrap_or(size.height);

    if let Some(style) = entry.get("style").or_else(|| entry.get("styles")).and_then(style_from_value) {
        el.style = style;
    }

    let caps = kind.capabilities();
    if caps.has_text {
        if let Some(text) = entry.get("text").and_then(Value::as_str) {
            el.text = Some(text.to_string());
        }
    }
    if caps.has_image_source {
        el.image_source = entry
            .get("imageSource")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }
    Some(el)
}

/// String, number and boolean values are kept (as strings); anything else
/// is dropped. Non-objects yield `None`.
fn style_from_value(value: &Value) -> Option<Style> {
    let map = value.as_object()?;
    Some(
        map.iter()
            .filter_map(|(key, v)| {
                let v = match v {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((key.clone(), v))
            })
            .collect(),
    )
}
