//! LayoutLab Render Library
//!
//! Exporters that turn a read-only scene snapshot into standalone
//! documents: a JSON layout file and a self-contained HTML page.

mod exporter;
mod html;
mod json;

pub use exporter::{ExportContext, ExportError, ExportResult, Exporter};
pub use html::{HtmlExporter, escape_html, style_to_css};
pub use json::JsonExporter;
