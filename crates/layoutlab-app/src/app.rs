//! Headless application state: one editor, its configuration and the
//! export/persistence operations the command line drives.

use kurbo::Size;
use layoutlab_core::storage::{AutoSave, Storage};
use layoutlab_core::{
    ConfigError, Editor, EditorConfig, ElementKind, LoadError, RecordingSurface, StorageError,
};
use layoutlab_render::{ExportContext, ExportError, Exporter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No saved layout under {0:?}")]
    NothingSaved(String),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Where exports go when no explicit output path is given.
    pub output_dir: PathBuf,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Title of exported HTML pages.
    pub title: String,
    /// Page background of exported HTML.
    pub background: String,
    pub editor: EditorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            pretty: true,
            title: "LayoutLab Export".to_string(),
            background: "#0c0c0c".to_string(),
            editor: EditorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&json).map_err(ConfigError::from)?;
        config.editor = config.editor.sanitized();
        Ok(config)
    }
}

/// Summary of a loaded layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutReport {
    pub elements: usize,
    pub by_kind: BTreeMap<&'static str, usize>,
    /// Union of all element bounds, if any.
    pub extent: Option<kurbo::Rect>,
    pub canvas: Size,
}

impl std::fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} elements on a {}x{} canvas",
            self.elements, self.canvas.width, self.canvas.height
        )?;
        for (kind, count) in &self.by_kind {
            writeln!(f, "  {kind:10} {count}")?;
        }
        if let Some(extent) = self.extent {
            writeln!(
                f,
                "  extent     ({}, {}) - ({}, {})",
                extent.x0, extent.y0, extent.x1, extent.y1
            )?;
        }
        Ok(())
    }
}

/// The headless application.
pub struct App {
    config: AppConfig,
    editor: Editor<RecordingSurface>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let editor = Editor::new(config.editor.clone(), RecordingSurface::new());
        Self { config, editor }
    }

    /// Attach persistent storage under the configured storage key.
    pub fn with_storage(config: AppConfig, storage: Box<dyn Storage>) -> Self {
        let autosave = AutoSave::new(storage, config.editor.storage_key.clone());
        let editor = Editor::new(config.editor.clone(), RecordingSurface::new()).with_autosave(autosave);
        Self { config, editor }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn editor(&self) -> &Editor<RecordingSurface> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor<RecordingSurface> {
        &mut self.editor
    }

    /// Load a layout from JSON text, replacing the scene.
    pub fn load(&mut self, json: &str) -> AppResult<usize> {
        Ok(self.editor.load_json(json)?)
    }

    /// Load a layout file.
    pub fn open(&mut self, path: impl AsRef<Path>) -> AppResult<usize> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let loaded = self.load(&json)?;
        log::info!("Opened {} ({loaded} elements)", path.display());
        Ok(loaded)
    }

    /// Render the current scene with `exporter`.
    pub fn export(&self, exporter: &dyn Exporter) -> AppResult<String> {
        let records = self.editor.serialize();
        let ctx = ExportContext::new(&records, self.editor.store().canvas_size())
            .with_title(self.config.title.clone())
            .with_background(self.config.background.clone())
            .with_pretty(self.config.pretty);
        Ok(exporter.export(&ctx)?)
    }

    /// Default output path for an export of `input`.
    pub fn output_path(&self, input: &Path, exporter: &dyn Exporter) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "layout".to_string());
        self.config
            .output_dir
            .join(format!("{stem}.{}", exporter.extension()))
    }

    /// The scene as it would be saved: clamped, de-duplicated, z-ordered.
    pub fn normalized(&self) -> AppResult<String> {
        Ok(self.editor.to_json(self.config.pretty)?)
    }

    pub fn report(&self) -> LayoutReport {
        let elements = self.editor.elements();
        let mut by_kind = BTreeMap::new();
        for kind in ElementKind::ALL {
            let count = elements.iter().filter(|el| el.kind() == kind).count();
            if count > 0 {
                by_kind.insert(kind.name(), count);
            }
        }
        LayoutReport {
            elements: elements.len(),
            by_kind,
            extent: layoutlab_core::geometry::union_bounds(elements),
            canvas: self.editor.store().canvas_size(),
        }
    }

    /// Persist the current scene to storage.
    pub fn save(&mut self) -> AppResult<()> {
        self.editor.request_save();
        if !self.editor.tick() {
            return Err(AppError::Storage(StorageError::Other(
                "no storage attached or write failed".to_string(),
            )));
        }
        Ok(())
    }

    /// Load the scene saved in storage.
    pub fn restore(&mut self) -> AppResult<usize> {
        if !self.editor.restore() {
            return Err(AppError::NothingSaved(self.config.editor.storage_key.clone()));
        }
        Ok(self.editor.elements().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutlab_core::MemoryStorage;
    use layoutlab_render::{HtmlExporter, JsonExporter};

    const LAYOUT: &str = r#"[
        {"id": "el_2", "type": "text", "x": 2000, "y": 10, "width": 100, "height": 30, "text": "Hi", "zIndex": 2},
        {"id": "el_1", "type": "rect", "x": 0, "y": 0, "width": 50, "height": 50, "zIndex": 1}
    ]"#;

    #[test]
    fn test_load_and_report() {
        let mut app = App::new(AppConfig::default());
        assert_eq!(app.load(LAYOUT).unwrap(), 2);
        let report = app.report();
        assert_eq!(report.elements, 2);
        assert_eq!(report.by_kind.get("rectangle"), Some(&1));
        assert_eq!(report.extent.map(|r| r.x1), Some(960.0));
        assert!(report.to_string().contains("2 elements"));
    }

    #[test]
    fn test_normalized_output_is_clamped() {
        let mut app = App::new(AppConfig::default());
        app.load(LAYOUT).unwrap();
        let json = app.normalized().unwrap();
        assert!(json.contains("\"x\": 860.0"));
        assert!(json.contains("\"kind\": \"rectangle\""));
    }

    #[test]
    fn test_export_uses_config() {
        let config = AppConfig {
            title: "Landing".into(),
            output_dir: PathBuf::from("out"),
            ..AppConfig::default()
        };
        let mut app = App::new(config);
        app.load(LAYOUT).unwrap();
        let html = app.export(&HtmlExporter::new()).unwrap();
        assert!(html.contains("<title>Landing</title>"));
        assert_eq!(
            app.output_path(Path::new("pages/home.json"), &JsonExporter::new()),
            PathBuf::from("out/home.json")
        );
    }

    #[test]
    fn test_save_and_restore() {
        let storage = MemoryStorage::new();
        let mut app = App::with_storage(AppConfig::default(), Box::new(storage));
        assert!(matches!(app.restore(), Err(AppError::NothingSaved(_))));
        app.load(LAYOUT).unwrap();
        app.save().unwrap();
        app.load("[]").unwrap();
        assert_eq!(app.restore().unwrap(), 2);
    }

    #[test]
    fn test_save_without_storage_fails() {
        let mut app = App::new(AppConfig::default());
        assert!(matches!(app.save(), Err(AppError::Storage(_))));
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layoutlab.json");
        std::fs::write(&path, r#"{"pretty": false, "editor": {"canvasWidth": 500, "gridSize": 0}}"#).unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert!(!config.pretty);
        assert_eq!(config.title, "LayoutLab Export");
        assert!((config.editor.canvas_width - 500.0).abs() < f64::EPSILON);
        assert!((config.editor.grid_size - 1.0).abs() < f64::EPSILON);
    }
}
