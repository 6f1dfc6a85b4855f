//! ProgressStore - whole-document persistence for the progress file
//!
//! Pure data access: load the document, save the document, create the
//! default document when none exists. Business rules live in the engine.
//!
//! The file is mutated via naive read-modify-write with no locking;
//! concurrent writers can lose updates. Accepted limitation.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::document::{self, ProgressDocument};
use crate::engine::ProgressError;

/// Persistence for a single progress document
pub struct ProgressStore {
    path: PathBuf,
    project_name: String,
}

impl ProgressStore {
    /// Create a store over the given file path
    pub fn new(path: impl AsRef<Path>, project_name: impl Into<String>) -> Self {
        let path = path.as_ref().to_path_buf();
        let project_name = project_name.into();
        debug!(path = %path.display(), %project_name, "ProgressStore::new: called");
        Self { path, project_name }
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, creating the default document when the file is absent
    pub fn load(&self) -> Result<ProgressDocument, ProgressError> {
        debug!(path = %self.path.display(), "ProgressStore::load: called");
        if !self.path.exists() {
            debug!("ProgressStore::load: no file, returning default document");
            return Ok(ProgressDocument::new(self.project_name.clone()));
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| ProgressError::Persistence(format!("failed to read {}: {}", self.path.display(), e)))?;

        let mut doc: ProgressDocument = serde_json::from_str(&content)
            .map_err(|e| ProgressError::Persistence(format!("failed to parse {}: {}", self.path.display(), e)))?;

        document::migrate(&mut doc);
        Ok(doc)
    }

    /// Write the whole document back to disk
    pub fn save(&self, doc: &ProgressDocument) -> Result<(), ProgressError> {
        debug!(path = %self.path.display(), "ProgressStore::save: called");
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| ProgressError::Persistence(format!("failed to create {}: {}", parent.display(), e)))?;
        }

        let content = serde_json::to_string_pretty(doc)
            .map_err(|e| ProgressError::Persistence(format!("failed to serialize document: {}", e)))?;

        fs::write(&self.path, content)
            .map_err(|e| ProgressError::Persistence(format!("failed to write {}: {}", self.path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp = tempdir().unwrap();
        let store = ProgressStore::new(temp.path().join("progress.json"), "demo");

        let doc = store.load().unwrap();
        assert_eq!(doc.project_name, "demo");
        assert!(doc.milestones.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = tempdir().unwrap();
        let store = ProgressStore::new(temp.path().join("progress.json"), "demo");

        let mut doc = store.load().unwrap();
        doc.project_name = "renamed".to_string();
        store.save(&doc).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.project_name, "renamed");
    }

    #[test]
    fn test_load_corrupt_file_is_persistence_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("progress.json");
        fs::write(&path, "{ not json").unwrap();

        let store = ProgressStore::new(&path, "demo");
        let err = store.load().unwrap_err();
        assert!(matches!(err, ProgressError::Persistence(_)));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("progress.json");
        let store = ProgressStore::new(&path, "demo");

        store.save(&ProgressDocument::new("demo")).unwrap();
        assert!(path.exists());
    }
}
