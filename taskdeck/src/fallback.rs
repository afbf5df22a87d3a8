//! On-device fallback persistence for the full task collection.
//!
//! [`FallbackStore`] keeps the entire task list as one JSON blob at a fixed
//! path. It has no query capability; the task store filters and sorts in
//! memory after reading. A missing or unparsable blob reads as an empty
//! collection — corruption is never fatal.

use std::path::{Path, PathBuf};

use taskdeck_proto::task::Task;

/// Single-blob JSON persistence of the task collection.
pub struct FallbackStore {
    path: PathBuf,
}

impl FallbackStore {
    /// Creates a store over the blob at `path`. Nothing is read or written
    /// until the first operation.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The blob's location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full collection.
    ///
    /// An absent file is an empty collection. An unparsable blob is logged
    /// and likewise read as empty; fields added after the blob was written
    /// deserialize to their defaults.
    #[must_use]
    pub fn read_all(&self) -> Vec<Task> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "fallback blob read failed");
                return Vec::new();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "fallback blob unparsable, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Overwrites the blob with the full collection. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the parent directory cannot be
    /// created or the file cannot be written.
    pub fn write_all(&self, tasks: &[Task]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec(tasks)?;
        std::fs::write(&self.path, bytes)
    }
}
