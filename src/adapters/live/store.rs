//! Live recording store reading YAML documents from a directory.
//!
//! Layout: `<root>/recordings/<id>.yaml`, one document per recording, as
//! exported by the capture system. All access is read-only.

use std::path::{Path, PathBuf};

use crate::ports::store::{RecordingStore, StoreFuture};
use crate::recording::{Recording, RecordingSummary};

/// Recording store backed by a directory of YAML files.
pub struct FileRecordingStore {
    root: PathBuf,
}

impl FileRecordingStore {
    /// Creates a store rooted at the given directory.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }

    fn recordings_dir(&self) -> PathBuf {
        self.root.join("recordings")
    }

    fn recording_path(&self, id: i64) -> PathBuf {
        self.recordings_dir().join(format!("{id}.yaml"))
    }
}

impl RecordingStore for FileRecordingStore {
    fn list(&self) -> StoreFuture<'_, Vec<RecordingSummary>> {
        Box::pin(async move {
            let dir = self.recordings_dir();
            if !dir.exists() {
                return Ok(Vec::new());
            }

            let mut summaries = Vec::new();
            for entry in std::fs::read_dir(&dir)
                .map_err(|e| format!("failed to read store directory {}: {e}", dir.display()))?
            {
                let entry =
                    entry.map_err(|e| format!("failed to read store directory entry: {e}"))?;
                let path = entry.path();
                if !path.extension().is_some_and(|ext| ext == "yaml") {
                    continue;
                }
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
                let recording: Recording = serde_yaml::from_str(&contents)
                    .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
                summaries.push(recording.summary());
            }
            Ok(summaries)
        })
    }

    fn fetch(&self, id: i64) -> StoreFuture<'_, Option<Recording>> {
        Box::pin(async move {
            let path = self.recording_path(id);
            if !path.exists() {
                return Ok(None);
            }
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            let recording: Recording = serde_yaml::from_str(&contents)
                .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
            Ok(Some(recording))
        })
    }
}
