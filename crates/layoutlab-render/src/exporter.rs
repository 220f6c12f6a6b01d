//! Exporter trait abstraction.

use kurbo::Size;
use layoutlab_core::SerializedElement;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Export failed: {0}")]
    Other(String),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Everything an exporter reads. Built from a snapshot, never from a live
/// surface.
#[derive(Debug, Clone)]
pub struct ExportContext<'a> {
    /// Records in z-order, bottom first.
    pub elements: &'a [SerializedElement],
    /// Logical canvas size.
    pub canvas_size: Size,
    /// Document title (HTML only).
    pub title: String,
    /// Background color of the exported page (HTML only).
    pub background: String,
    /// Pretty-print structured output.
    pub pretty: bool,
}

impl<'a> ExportContext<'a> {
    /// Create a new export context.
    pub fn new(elements: &'a [SerializedElement], canvas_size: Size) -> Self {
        Self {
            elements,
            canvas_size,
            title: "LayoutLab Export".to_string(),
            background: "#0c0c0c".to_string(),
            pretty: true,
        }
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the page background color.
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Toggle pretty-printing.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Trait for export backends.
pub trait Exporter {
    /// Short format name, e.g. "json".
    fn name(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str {
        self.name()
    }

    /// MIME type of the produced document.
    fn mime_type(&self) -> &'static str;

    /// Render the whole document.
    fn export(&self, ctx: &ExportContext) -> ExportResult<String>;
}
