//! In-memory fakes shared by unit tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::context::ServiceContext;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::llm::{CompletionRequest, LlmClient, LlmFuture};
use crate::ports::store::{RecordingStore, StoreFuture};
use crate::recording::{Recording, RecordingSummary};

/// Handle onto a [`MemFs`]'s backing map, for assertions after a run.
pub(crate) type SharedFiles = Arc<Mutex<HashMap<PathBuf, String>>>;

/// In-memory filesystem fake.
pub(crate) struct MemFs {
    files: SharedFiles,
}

impl MemFs {
    pub(crate) fn new() -> (Self, SharedFiles) {
        let files = SharedFiles::default();
        (Self { files: Arc::clone(&files) }, files)
    }
}

impl FileSystem for MemFs {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let files = self.files.lock().unwrap();
        files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("file not found: {}", path.display()).into())
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path)
    }

    fn rename(
        &self,
        from: &Path,
        to: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut files = self.files.lock().unwrap();
        let contents = files
            .remove(from)
            .ok_or_else(|| format!("rename source missing: {}", from.display()))?;
        files.insert(to.to_path_buf(), contents);
        Ok(())
    }
}

/// Clock fake returning a fixed instant.
pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The instant used by [`test_context`].
pub(crate) fn fixed_time() -> DateTime<Utc> {
    "2025-03-01T12:00:00Z".parse().unwrap()
}

/// Store fake with no recordings.
pub(crate) struct EmptyStore;

impl RecordingStore for EmptyStore {
    fn list(&self) -> StoreFuture<'_, Vec<RecordingSummary>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn fetch(&self, _id: i64) -> StoreFuture<'_, Option<Recording>> {
        Box::pin(async { Ok(None) })
    }
}

/// LLM fake for tests that must not reach the model.
pub(crate) struct NoLlm;

impl LlmClient for NoLlm {
    fn complete(&self, _request: &CompletionRequest) -> LlmFuture<'_> {
        Box::pin(async { Err("no llm configured in this test".into()) })
    }
}

/// Context of fakes: fixed clock, in-memory filesystem, empty store, and
/// an LLM that fails on contact. Tests override fields as needed.
pub(crate) fn test_context() -> (ServiceContext, SharedFiles) {
    let (fs, files) = MemFs::new();
    let ctx = ServiceContext {
        clock: Box::new(FixedClock(fixed_time())),
        fs: Box::new(fs),
        llm: Box::new(NoLlm),
        store: Box::new(EmptyStore),
    };
    (ctx, files)
}

/// [`test_context`] with the LLM port replaced.
pub(crate) fn context_with_llm(llm: Box<dyn LlmClient>) -> ServiceContext {
    let (mut ctx, _files) = test_context();
    ctx.llm = llm;
    ctx
}
