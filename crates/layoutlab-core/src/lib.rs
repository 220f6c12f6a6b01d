//! LayoutLab Core Library
//!
//! Platform-agnostic scene model and interactive geometry engine for the
//! LayoutLab layout editor: element store, selection, drag/resize gestures,
//! snapping, alignment, undo history and the one-way projection onto a
//! rendering surface.

pub mod align;
pub mod camera;
pub mod config;
pub mod editor;
pub mod element;
pub mod geometry;
pub mod history;
pub mod image;
pub mod input;
pub mod render;
pub mod selection;
pub mod snap;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod transform;

pub use align::AlignMode;
pub use camera::Camera;
pub use config::{ConfigError, EditorConfig};
pub use editor::{Dimension, Editor, HitTarget, LayerRow, SceneObserver};
pub use element::{Capabilities, Element, ElementId, ElementKind, Style};
pub use history::{History, Snapshot};
pub use image::{ImageFormat, ImageSource};
pub use input::{Key, KeyEvent, Modifiers, PointerButton, PointerEvent, PointerId};
pub use render::{BoxView, Decoration, RecordingSurface, RenderSync, Surface};
pub use selection::{Corner, Handle, Selection};
pub use snap::{Snapper, snap_to_grid};
pub use snapshot::{LoadError, LoadResult, SerializedElement};
pub use storage::{AutoSave, MemoryStorage, Storage, StorageError, StorageResult};
pub use store::{ElementStore, ZDirection};
pub use transform::{Gesture, GestureKind, TransformEngine};
