//! FreePlay Core Library
//!
//! Platform-agnostic canvas engine for the FreePlay vector drawing app:
//! the shape model, view transform, hit-testing, the interaction state
//! machine, text editing and scene persistence. Windowing, rendering and
//! toolbar UI live in the embedding application and drive the engine
//! through [`CanvasSession`].

pub mod camera;
pub mod handles;
pub mod input;
pub mod scene;
pub mod session;
pub mod shapes;
pub mod storage;
pub mod text_editor;

pub use camera::Camera;
pub use input::{Key, Modifiers, MouseButton, PointerEvent};
pub use scene::{PersistenceError, Scene, StyleDefaults};
pub use session::{CanvasSession, ToolKind};
pub use shapes::{Rgba, Shape, ShapeId};
pub use storage::{AutoSaveManager, FileStorage, MemoryStorage, Storage, StorageError};
pub use text_editor::TextEditor;
