//! Standalone HTML page export.

use crate::exporter::{ExportContext, ExportError, ExportResult, Exporter};
use layoutlab_core::{ElementKind, SerializedElement, Style};
use std::fmt::Write;

/// Escape text for HTML content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Convert a camelCase property name to its kebab-case CSS spelling.
fn css_property(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Inline CSS declarations for a style map. Empty values are skipped.
pub fn style_to_css(style: &Style) -> String {
    style
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}:{};", css_property(k), v))
        .collect()
}

/// Writes one absolutely positioned box per element inside a fixed-size
/// container.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExporter;

impl HtmlExporter {
    pub fn new() -> Self {
        Self
    }

    fn write_element(out: &mut String, el: &SerializedElement) {
        let mut css = format!(
            "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
            el.x.round(),
            el.y.round(),
            el.width.round(),
            el.height.round(),
            el.z_index
        );
        css.push_str(&style_to_css(&el.style));
        let css = escape_html(&css);

        let _ = write!(out, "<div style=\"{css}\">");
        match (el.kind, el.image_source.as_deref()) {
            (ElementKind::Image, Some(src)) => {
                let _ = write!(
                    out,
                    "<img src=\"{}\" alt=\"\" style=\"width:100%;height:100%;display:block;\" />",
                    escape_html(src)
                );
            }
            _ => {
                if el.kind.capabilities().has_text {
                    out.push_str(&escape_html(el.text.as_deref().unwrap_or_default()));
                }
            }
        }
        out.push_str("</div>");
    }
}

impl Exporter for HtmlExporter {
    fn name(&self) -> &'static str {
        "html"
    }

    fn mime_type(&self) -> &'static str {
        "text/html"
    }

    fn export(&self, ctx: &ExportContext) -> ExportResult<String> {
        let size = ctx.canvas_size;
        if !(size.width.is_finite() && size.height.is_finite()) {
            return Err(ExportError::Other(format!("invalid canvas size {size:?}")));
        }
        let width = size.width.round().max(1.0);
        let height = size.height.round().max(1.0);

        let mut body = String::new();
        for el in ctx.elements {
            Self::write_element(&mut body, el);
        }

        let mut html = String::new();
        html.push_str("<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\" />");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />");
        let _ = write!(html, "<title>{}</title></head>", escape_html(&ctx.title));
        let _ = write!(
            html,
            "<body style=\"margin:0;background:{};\">",
            escape_html(&ctx.background)
        );
        let _ = write!(
            html,
            "<div style=\"position:relative;width:{width}px;height:{height}px;overflow:hidden;\">"
        );
        html.push_str(&body);
        html.push_str("</div></body></html>");
        if ctx.pretty {
            html.push('\n');
        }

        log::debug!("Exported {} elements as HTML ({width}x{height})", ctx.elements.len());
        Ok(html)
    }
}
