//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use crate::scene::Scene;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    scenes: RwLock<HashMap<String, Scene>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, scene: &Scene) -> StorageResult<()> {
        let mut scenes = self
            .scenes
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        scenes.insert(id.to_string(), scene.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<Scene> {
        let scenes = self
            .scenes
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        scenes
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let mut scenes = self
            .scenes
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        scenes.remove(id);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let scenes = self
            .scenes
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(scenes.keys().cloned().collect())
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        let scenes = self
            .scenes
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(scenes.contains_key(id))
    }
}
