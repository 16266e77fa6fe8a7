//! Storage abstraction for scene persistence.

mod autosave;
mod file;
mod memory;

pub use autosave::{AutoSaveManager, DEFAULT_AUTOSAVE_INTERVAL_SECS, LAST_SCENE_KEY};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::scene::Scene;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("scene not found: {0}")]
    NotFound(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for scene storage backends.
///
/// All operations are synchronous and atomic from the caller's point of
/// view: a save or load either completes or fails, never half-applies.
/// The engine is single-threaded, so blocking file I/O on explicit
/// save/load is part of the contract; an embedder that moves autosave to
/// a background thread must wrap scene access in its own lock and
/// snapshot before calling in.
pub trait Storage: Send + Sync {
    /// Save a scene under an id.
    fn save(&self, id: &str, scene: &Scene) -> StorageResult<()>;

    /// Load a scene by id.
    fn load(&self, id: &str) -> StorageResult<Scene>;

    /// Delete a scene.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// List all stored scene ids.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a scene exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}
