use std::path::PathBuf;

use thiserror::Error;

use crate::models::store::Store;

pub mod json;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to load store from '{path}': {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save store to '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize store to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create backup at '{path}': {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to cleanup old backups in '{dir}': {source}")]
    CleanupFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait Storage {
    /// Loads the snapshot. A missing file yields the seed default; corrupt
    /// content degrades to the seed default with a warning rather than
    /// failing startup.
    fn load(&self) -> Result<Store, StorageError>;

    /// Serializes and writes the full snapshot. Full overwrite, no diffs.
    fn save(&self, store: &Store) -> Result<(), StorageError>;
}
