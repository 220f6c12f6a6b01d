//! LayoutLab Application
//!
//! Headless shell around the editor: configuration, layout files,
//! persistence and exports.

mod app;
mod shortcuts;

pub use app::{App, AppConfig, AppError, AppResult, LayoutReport};
pub use shortcuts::{Shortcut, ShortcutRegistry};
