use rankscore_core::PersistenceError;
use rankscore_core::game::ports::{Clock, SnapshotStore};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::debug;

/// Keeps the saved game in a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileStore {
    fn load(&mut self) -> Result<Option<Vec<u8>>, PersistenceError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, blob: &[u8]) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // Write then rename so a crash never leaves a half-written save.
        let staging = self.staging_path();
        fs::write(&staging, blob)?;
        fs::rename(&staging, &self.path)?;
        debug!(path = %self.path.display(), bytes = blob.len(), "game saved");
        Ok(())
    }

    fn discard(&mut self) -> Result<(), PersistenceError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Wall clock in the local offset, falling back to UTC when the offset
/// cannot be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::FileStore;
    use rankscore_core::game::ports::SnapshotStore;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempdir().expect("temp dir");
        let mut store = FileStore::new(dir.path().join("none.json"));
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn save_creates_parent_and_roundtrips() {
        let dir = tempdir().expect("temp dir");
        let mut store = FileStore::new(dir.path().join("nested/game.json"));
        store.save(b"{\"nextRoundNumber\": 3}").expect("save");
        assert_eq!(
            store.load().expect("load").as_deref(),
            Some(&b"{\"nextRoundNumber\": 3}"[..])
        );
        assert!(!dir.path().join("nested/game.json.tmp").exists());

        store.discard().expect("discard");
        store.discard().expect("discard twice");
        assert!(store.load().expect("load").is_none());
    }
}
