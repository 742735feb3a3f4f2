//! Storage module for persisting catalog files
//!
//! Collectors persist decoded entity sequences as JSON. The crawler core never
//! touches storage; only collectors and the CLI call into this module.

mod json;

pub use json::{load, load_json, save, save_json};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while saving or loading catalog files
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error on {path}: {source}")]
    Serialization {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
