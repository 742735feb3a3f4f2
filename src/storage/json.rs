use crate::storage::{StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Writes the bytes produced by `serialize` to `path`
///
/// Missing parent directories are created. Nothing is written when
/// serialization fails.
pub fn save<F>(path: &Path, serialize: F) -> StorageResult<()>
where
    F: FnOnce() -> serde_json::Result<Vec<u8>>,
{
    let bytes = serialize().map_err(|source| StorageError::Serialization {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, bytes).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Saved {}", path.display());
    Ok(())
}

/// Reads `path` and hands its bytes to `deserialize`
pub fn load<T, F>(path: &Path, deserialize: F) -> StorageResult<T>
where
    F: FnOnce(&[u8]) -> serde_json::Result<T>,
{
    let bytes = fs::read(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    deserialize(&bytes).map_err(|source| StorageError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves `value` as pretty-printed JSON
pub fn save_json<T>(path: &Path, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
{
    save(path, || serde_json::to_vec_pretty(value))
}

/// Loads a JSON file into `T`
pub fn load_json<T>(path: &Path) -> StorageResult<T>
where
    T: DeserializeOwned,
{
    load(path, |bytes| serde_json::from_slice(bytes))
}
