//! File-backed storage medium.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{CrossContextSignal, StorageListener, StorageMedium, validate_key};
use crate::error::Result;
use crate::notifier::Subscription;
use crate::state::ContextId;

/// Stores each key as `<dir>/<key>.json`.
///
/// Each write goes to its own uniquely named temporary sibling, which is then
/// renamed over the target. Concurrent writers (other instances, other
/// processes) therefore never share a temp file, and a reader sees either the
/// previous value or a complete new one. The change signal reaches
/// contexts sharing this instance (or a clone of it); other processes only
/// see the new value on their next load.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    signal: CrossContextSignal,
}

impl FileStorage {
    /// Use `dir` as the storage root. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            signal: CrossContextSignal::default(),
        }
    }

    /// The storage root.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StorageMedium for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, origin: ContextId, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{key}."))
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!(path = %path.display(), bytes = value.len(), "wrote storage file");

        self.signal.fire(origin, Some(key));
        Ok(())
    }

    fn remove_item(&self, origin: ContextId, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                self.signal.fire(origin, Some(key));
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn watch(&self, context: ContextId, listener: StorageListener) -> Subscription {
        self.signal.watch(context, listener)
    }
}
