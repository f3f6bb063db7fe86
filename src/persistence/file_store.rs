//! Directory-backed key-value store: one JSON file per key.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::TallyError;

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file that is synced to disk and then renamed
/// into place, so a crash mid-write leaves the previous value intact. A
/// failed write removes its temp file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) the storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::Io`] if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, TallyError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "file store opened");
        Ok(Self { dir })
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, TallyError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(TallyError::Persistence(format!("invalid storage key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, TallyError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TallyError> {
        let path = self.path(key)?;
        let tmp = path.with_extension("json.tmp");
        let replaced = write_synced(&tmp, value).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = replaced {
            let _ = fs::remove_file(&tmp);
            tracing::debug!(key, error = %e, "file store write failed");
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), TallyError> {
        match fs::remove_file(self.path(key)?) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

fn write_synced(path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}
