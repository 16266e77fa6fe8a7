//! Auto-save functionality for scene persistence.
//!
//! A collaborator-side timer calls [`AutoSaveManager::maybe_save`]
//! periodically; the manager decides whether a save is due and funnels
//! it through the exact same [`Storage::save`] path as an explicit save,
//! so the persisted format cannot diverge between the two.

use super::{Storage, StorageResult};
use crate::scene::Scene;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Key for the "last opened" scene.
pub const LAST_SCENE_KEY: &str = "__last_scene__";

/// Fallback id when no scene id has been set.
const UNTITLED_ID: &str = "untitled";

/// Manages automatic scene persistence.
pub struct AutoSaveManager<S: Storage> {
    /// Storage backend.
    storage: Arc<S>,
    /// Auto-save interval.
    interval: Duration,
    /// Last save timestamp.
    last_save: Option<Instant>,
    /// Whether the scene has unsaved changes.
    dirty: bool,
    /// Current scene id being edited.
    current_id: Option<String>,
}

impl<S: Storage> AutoSaveManager<S> {
    /// Create a new auto-save manager with the given storage backend.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            current_id: None,
        }
    }

    /// Set the auto-save interval.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Get the auto-save interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Mark the scene as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check if the scene has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set the current scene id.
    pub fn set_scene_id(&mut self, id: Option<String>) {
        self.current_id = id;
    }

    /// Get the current scene id.
    pub fn scene_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Check if enough time has passed for an auto-save.
    pub fn should_save(&self) -> bool {
        if !self.dirty {
            return false;
        }

        match self.last_save {
            Some(last) => last.elapsed() >= self.interval,
            None => true, // Never saved, should save
        }
    }

    /// The periodic autosave entry point: saves when dirty and the
    /// interval has elapsed. Returns true if a save was performed.
    ///
    /// Failures here never interrupt editing -- they are logged and
    /// swallowed, and the attempt still resets the timer so a broken
    /// backend is retried once per interval, not on every tick.
    pub fn maybe_save(&mut self, scene: &Scene) -> bool {
        if !self.should_save() {
            return false;
        }

        match self.save(scene) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("autosave failed: {err}");
                self.last_save = Some(Instant::now());
                false
            }
        }
    }

    /// Save the scene immediately. This is the explicit-save path:
    /// failures are surfaced to the caller.
    pub fn save(&mut self, scene: &Scene) -> StorageResult<()> {
        let id = self
            .current_id
            .clone()
            .unwrap_or_else(|| UNTITLED_ID.to_string());

        self.storage.save(&id, scene)?;

        // Also save as the "last scene" for auto-restore on startup
        self.storage.save(LAST_SCENE_KEY, scene)?;

        self.last_save = Some(Instant::now());
        self.dirty = false;

        Ok(())
    }

    /// Load a scene by id.
    pub fn load(&mut self, id: &str) -> StorageResult<Scene> {
        let scene = self.storage.load(id)?;
        self.current_id = Some(id.to_string());
        self.dirty = false;
        self.last_save = Some(Instant::now());
        Ok(scene)
    }

    /// Try to load the last opened scene. Returns None if there is none.
    pub fn load_last(&mut self) -> Option<Scene> {
        match self.storage.load(LAST_SCENE_KEY) {
            Ok(scene) => {
                self.dirty = false;
                self.last_save = Some(Instant::now());
                Some(scene)
            }
            Err(_) => None,
        }
    }

    /// Delete a scene by id.
    pub fn delete(&self, id: &str) -> StorageResult<()> {
        self.storage.delete(id)
    }

    /// List all saved scene ids.
    pub fn list_scenes(&self) -> StorageResult<Vec<String>> {
        let mut ids = self.storage.list()?;
        // The special "last scene" key is bookkeeping, not a scene
        ids.retain(|id| id != LAST_SCENE_KEY);
        Ok(ids)
    }

    /// Check if a scene exists.
    pub fn exists(&self, id: &str) -> StorageResult<bool> {
        self.storage.exists(id)
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}
