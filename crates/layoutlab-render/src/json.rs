//! JSON layout export.

use crate::exporter::{ExportContext, ExportResult, Exporter};
use layoutlab_core::SerializedElement;

/// Writes the snapshot list as a JSON array, loadable again through the
/// editor's load API. Style entries with empty values are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for JsonExporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn export(&self, ctx: &ExportContext) -> ExportResult<String> {
        let records: Vec<SerializedElement> = ctx
            .elements
            .iter()
            .map(|record| {
                let mut record = record.clone();
                record.style.retain(|_, v| !v.trim().is_empty());
                record
            })
            .collect();
        let json = if ctx.pretty {
            serde_json::to_string_pretty(&records)?
        } else {
            serde_json::to_string(&records)?
        };
        log::debug!("Exported {} elements as JSON", records.len());
        Ok(json)
    }
}
