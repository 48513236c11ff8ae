use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::github::types::PrInfoGroups;

/// Where the previous run's snapshot lives between invocations.
pub trait SnapshotStore {
    /// Load the last saved snapshot.
    ///
    /// Returns `None` on the first run and when the stored data cannot be
    /// read back as a snapshot.
    fn load(&self) -> Option<PrInfoGroups>;

    /// Replace the stored snapshot with `groups`.
    fn save(&self, groups: &PrInfoGroups) -> Result<()>;
}

/// Get the default snapshot path (<cache dir>/my-prs/snapshot.json)
pub fn get_snapshot_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("my-prs/snapshot.json"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/my-prs/snapshot.json",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Snapshot persisted as pretty-printed JSON in a single file
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileSnapshotStore {
    fn default() -> Self {
        Self::new(get_snapshot_path())
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Option<PrInfoGroups> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no previous snapshot");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot open previous snapshot");
                return None;
            }
        };

        match serde_json::from_reader(file) {
            Ok(groups) => Some(groups),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable snapshot");
                None
            }
        }
    }

    /// Save atomically so an interrupted write never leaves a truncated file.
    /// Creates the parent directory if it doesn't exist.
    fn save(&self, groups: &PrInfoGroups) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create snapshot directory at {}", parent.display())
            })?;
        }

        let mut file = AtomicWriteFile::open(&self.path)
            .with_context(|| format!("Failed to open atomic write file at {}", self.path.display()))?;

        serde_json::to_writer_pretty(&mut file, groups).context("Failed to serialize snapshot")?;

        file.commit().context("Failed to save snapshot")?;

        debug!(
            path = %self.path.display(),
            open = groups.open.len(),
            closed = groups.closed.len(),
            "saved snapshot"
        );
        Ok(())
    }
}

/// Snapshot held in memory, for tests and for embedding without a disk.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    inner: Mutex<Option<PrInfoGroups>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(groups: PrInfoGroups) -> Self {
        Self {
            inner: Mutex::new(Some(groups)),
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Option<PrInfoGroups> {
        self.inner.lock().ok()?.clone()
    }

    fn save(&self, groups: &PrInfoGroups) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("Snapshot store lock poisoned"))?;
        *guard = Some(groups.clone());
        Ok(())
    }
}
