//! Element definitions for the layout scene.

use crate::geometry::{clamp, finite_or};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Prefix of identifiers assigned by the element store.
pub const ID_PREFIX: &str = "el_";

/// Default top-left position of newly created elements.
pub const DEFAULT_POSITION: Point = Point::new(24.0, 24.0);

/// Fixed height of `line` elements.
pub const LINE_THICKNESS: f64 = 4.0;

/// Presentational properties, keyed by property name (camelCase CSS names).
pub type Style = BTreeMap<String, String>;

/// Opaque, stable element identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier for the `n`-th element created by a store.
    pub fn from_counter(n: u64) -> Self {
        Self(format!("{ID_PREFIX}{n}"))
    }

    /// The numeric suffix of a store-assigned identifier (`el_12` -> 12).
    pub fn counter_suffix(&self) -> Option<u64> {
        self.0.strip_prefix(ID_PREFIX)?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an element kind is able to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub resizable: bool,
    pub has_text: bool,
    pub has_image_source: bool,
    /// Width and height are always equal.
    pub fixed_aspect: bool,
    /// Height is pinned to [`LINE_THICKNESS`].
    pub fixed_thickness: bool,
}

const BOX: Capabilities = Capabilities {
    resizable: true,
    has_text: false,
    has_image_source: false,
    fixed_aspect: false,
    fixed_thickness: false,
};

const TEXT: Capabilities = Capabilities { has_text: true, ..BOX };
const ROUND: Capabilities = Capabilities { fixed_aspect: true, ..BOX };
const RULE: Capabilities = Capabilities { fixed_thickness: true, ..BOX };
const PICTURE: Capabilities = Capabilities { has_image_source: true, ..BOX };

/// The closed set of element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    #[serde(alias = "rect")]
    Rectangle,
    Text,
    Ellipse,
    Line,
    Image,
    Button,
}

impl ElementKind {
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Rectangle,
        ElementKind::Text,
        ElementKind::Ellipse,
        ElementKind::Line,
        ElementKind::Image,
        ElementKind::Button,
    ];

    /// Capability table entry for this kind.
    pub fn capabilities(self) -> Capabilities {
        match self {
            ElementKind::Rectangle => BOX,
            ElementKind::Text | ElementKind::Button => TEXT,
            ElementKind::Ellipse => ROUND,
            ElementKind::Line => RULE,
            ElementKind::Image => PICTURE,
        }
    }

    /// Serialized name.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Rectangle => "rectangle",
            ElementKind::Text => "text",
            ElementKind::Ellipse => "ellipse",
            ElementKind::Line => "line",
            ElementKind::Image => "image",
            ElementKind::Button => "button",
        }
    }

    /// Human-readable label for layer lists.
    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Rectangle => "Rectangle",
            ElementKind::Text => "Text",
            ElementKind::Ellipse => "Ellipse",
            ElementKind::Line => "Line",
            ElementKind::Image => "Image",
            ElementKind::Button => "Button",
        }
    }

    /// Parse a kind name, accepting the legacy `rect` spelling.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rect" => Some(ElementKind::Rectangle),
            "text" => Some(ElementKind::Text),
            "ellipse" => Some(ElementKind::Ellipse),
            "line" => Some(ElementKind::Line),
            "image" => Some(ElementKind::Image),
            "button" => Some(ElementKind::Button),
            _ => None,
        }
    }

    /// Size of a freshly created element.
    pub fn default_size(self) -> Size {
        match self {
            ElementKind::Rectangle | ElementKind::Image => Size::new(160.0, 120.0),
            ElementKind::Text => Size::new(200.0, 40.0),
            ElementKind::Ellipse => Size::new(120.0, 120.0),
            ElementKind::Line => Size::new(200.0, LINE_THICKNESS),
            ElementKind::Button => Size::new(120.0, 40.0),
        }
    }

    /// Text payload of a freshly created element.
    pub fn default_text(self) -> Option<&'static str> {
        match self {
            ElementKind::Text => Some("Double click to edit"),
            ElementKind::Button => Some("Button"),
            _ => None,
        }
    }

    /// Style of a freshly created element.
    pub fn default_style(self) -> Style {
        let pairs: &[(&str, &str)] = match self {
            ElementKind::Rectangle => &[("backgroundColor", "#4f46e5"), ("borderRadius", "6px")],
            ElementKind::Text => &[
                ("color", "#f3f4f6"),
                ("fontSize", "16px"),
                ("fontFamily", "system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif"),
                ("padding", "8px"),
            ],
            ElementKind::Ellipse => &[("backgroundColor", "#22c55e"), ("borderRadius", "50%")],
            ElementKind::Line => &[("backgroundColor", "#e5e7eb")],
            ElementKind::Image => &[("objectFit", "cover")],
            ElementKind::Button => &[
                ("backgroundColor", "#0ea5e9"),
                ("color", "#ffffff"),
                ("borderRadius", "6px"),
            ],
        };
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    /// Minimum resting size of this kind given the general limits.
    pub fn min_size(self, limits: Size) -> Size {
        let caps = self.capabilities();
        if caps.fixed_thickness {
            Size::new(limits.width, LINE_THICKNESS)
        } else if caps.fixed_aspect {
            let side = limits.width.max(limits.height);
            Size::new(side, side)
        } else {
            limits
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One placed scene object.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) kind: ElementKind,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) style: Style,
    pub(crate) text: Option<String>,
    pub(crate) image_source: Option<String>,
}

impl Element {
    /// Create an element of `kind` with the kind's default geometry and style.
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        let size = kind.default_size();
        Self {
            id,
            kind,
            x: DEFAULT_POSITION.x,
            y: DEFAULT_POSITION.y,
            width: size.width,
            height: size.height,
            style: kind.default_style(),
            text: kind.default_text().map(str::to_string),
            image_source: None,
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// Top-left position.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Bounding box in logical canvas units.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn image_source(&self) -> Option<&str> {
        self.image_source.as_deref()
    }

    /// Write position and size from an edge rect.
    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x0;
        self.y = rect.y0;
        self.width = rect.width();
        self.height = rect.height();
    }

    /// Enforce the resting invariants: minimum size, kind coupling and
    /// containment inside a `canvas`-sized box anchored at the origin.
    pub fn clamp_to_canvas(&mut self, canvas: Size, limits: Size) {
        let min = self.kind.min_size(limits);
        let caps = self.capabilities();

        let mut w = finite_or(self.width, min.width);
        let mut h = finite_or(self.height, min.height);
        w = clamp(w, min.width, min.width.max(canvas.width));
        h = clamp(h, min.height, min.height.max(canvas.height));

        if caps.fixed_thickness {
            h = LINE_THICKNESS;
        } else if caps.fixed_aspect {
            let room = min.width.max(canvas.width.min(canvas.height));
            let side = clamp(w.max(h), min.width, room);
            w = side;
            h = side;
        }

        self.width = w;
        self.height = h;
        self.x = clamp(finite_or(self.x, 0.0), 0.0, (canvas.width - w).max(0.0));
        self.y = clamp(finite_or(self.y, 0.0), 0.0, (canvas.height - h).max(0.0));
    }
}
