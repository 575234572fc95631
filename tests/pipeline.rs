//! End-to-end pipeline tests over in-memory adapters.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use recap::cli::Cli;
use recap::commands::generate;
use recap::config::Config;
use recap::context::ServiceContext;
use recap::error::PipelineError;
use recap::ports::clock::Clock;
use recap::ports::filesystem::FileSystem;
use recap::ports::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmFuture};
use recap::ports::store::{RecordingStore, StoreFuture};
use recap::recording::{ActionEvent, MouseButton, Recording};

type SharedFiles = Arc<Mutex<HashMap<PathBuf, String>>>;

struct MemFs {
    files: SharedFiles,
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
        self.files.lock().unwrap().contains_key(path)
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

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

struct MemStore {
    recordings: Vec<Recording>,
}

impl RecordingStore for MemStore {
    fn list(&self) -> StoreFuture<'_, Vec<recap::recording::RecordingSummary>> {
        let summaries = self.recordings.iter().map(Recording::summary).collect();
        Box::pin(async move { Ok(summaries) })
    }

    fn fetch(&self, id: i64) -> StoreFuture<'_, Option<Recording>> {
        let found = self.recordings.iter().find(|r| r.id == id).cloned();
        Box::pin(async move { Ok(found) })
    }
}

/// Maps each recognized event encoding to a canned sentence; answers
/// `true` to validation requests.
struct CannedLlm;

impl LlmClient for CannedLlm {
    fn complete(&self, request: &CompletionRequest) -> LlmFuture<'_> {
        let prompt = request.prompt.clone();
        Box::pin(async move {
            let text = if prompt.contains("Review the following") {
                "true"
            } else if prompt.contains("action: move mouse") {
                "Move mouse to 'Calculator icon'"
            } else if prompt.contains("action: left singleclick") {
                "Left singleclick 'Calculator icon'"
            } else {
                "Press the enter key"
            };
            Ok(CompletionResponse { text: text.into(), prompt_tokens: 50, completion_tokens: 10 })
        })
    }
}

/// Fails every completion call.
struct BrokenLlm;

impl LlmClient for BrokenLlm {
    fn complete(&self, _request: &CompletionRequest) -> LlmFuture<'_> {
        Box::pin(async { Err("service unreachable".into()) })
    }
}

/// Generates normally but rejects the validation request.
struct RejectingLlm;

impl LlmClient for RejectingLlm {
    fn complete(&self, request: &CompletionRequest) -> LlmFuture<'_> {
        let prompt = request.prompt.clone();
        Box::pin(async move {
            let text = if prompt.contains("Review the following") { "false" } else { "A sentence" };
            Ok(CompletionResponse { text: text.into(), prompt_tokens: 10, completion_tokens: 1 })
        })
    }
}

fn fixed_time() -> DateTime<Utc> {
    "2025-03-01T12:00:00Z".parse().unwrap()
}

fn context(store: MemStore, llm: Box<dyn LlmClient>) -> (ServiceContext, SharedFiles) {
    let files = SharedFiles::default();
    let ctx = ServiceContext {
        clock: Box::new(FixedClock(fixed_time())),
        fs: Box::new(MemFs { files: Arc::clone(&files) }),
        llm,
        store: Box::new(store),
    };
    (ctx, files)
}

fn calculator_recording() -> Recording {
    Recording {
        id: 42,
        task_description: "Calculator Demo".into(),
        created_at: fixed_time(),
        events: vec![
            ActionEvent::MouseMove { x: 50.0, y: 60.0, target: Some("Calculator icon".into()) },
            ActionEvent::Click {
                button: MouseButton::Left,
                double: false,
                x: 50.0,
                y: 60.0,
                target: Some("Calculator icon".into()),
            },
        ],
    }
}

fn quiet_cli(recording_id: Option<i64>) -> Cli {
    Cli { config: None, recording_id, force: false, validate: false, quiet: true }
}

#[tokio::test]
async fn calculator_demo_end_to_end() {
    let store = MemStore { recordings: vec![calculator_recording()] };
    let (ctx, files) = context(store, Box::new(CannedLlm));
    let cfg = Config::default();

    generate::run(&ctx, &cfg, &quiet_cli(None)).await.unwrap();

    let files = files.lock().unwrap();
    let path = cfg.output_dir.join("prompt_recording_42_Calculator_Demo.txt");
    assert_eq!(
        files.get(&path).map(String::as_str),
        Some("1. Move mouse to 'Calculator icon'\n2. Left singleclick 'Calculator icon'\n")
    );
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn by_id_selects_the_requested_recording() {
    let mut other = calculator_recording();
    other.id = 7;
    other.task_description = "Other Task".into();
    let store = MemStore { recordings: vec![calculator_recording(), other] };
    let (ctx, files) = context(store, Box::new(CannedLlm));
    let cfg = Config::default();

    generate::run(&ctx, &cfg, &quiet_cli(Some(7))).await.unwrap();

    let files = files.lock().unwrap();
    assert!(files.contains_key(&cfg.output_dir.join("prompt_recording_7_Other_Task.txt")));
}

#[tokio::test]
async fn empty_store_is_not_found_and_writes_nothing() {
    let store = MemStore { recordings: Vec::new() };
    let (ctx, files) = context(store, Box::new(CannedLlm));
    let cfg = Config::default();

    let err = generate::run(&ctx, &cfg, &quiet_cli(None)).await.unwrap_err();
    assert!(matches!(err, PipelineError::NotFound(_)));
    assert!(files.lock().unwrap().is_empty());
}

#[tokio::test]
async fn generation_failure_writes_nothing() {
    let store = MemStore { recordings: vec![calculator_recording()] };
    let (ctx, files) = context(store, Box::new(BrokenLlm));
    let cfg = Config::default();

    let err = generate::run(&ctx, &cfg, &quiet_cli(None)).await.unwrap_err();
    assert!(matches!(err, PipelineError::Generation(_)));
    assert!(files.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_validation_writes_nothing() {
    let store = MemStore { recordings: vec![calculator_recording()] };
    let (ctx, files) = context(store, Box::new(RejectingLlm));
    let cfg = Config::default();

    let cli = Cli { validate: true, ..quiet_cli(None) };
    let err = generate::run(&ctx, &cfg, &cli).await.unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));
    assert!(files.lock().unwrap().is_empty());
}

#[tokio::test]
async fn passing_validation_still_writes_the_file() {
    let store = MemStore { recordings: vec![calculator_recording()] };
    let (ctx, files) = context(store, Box::new(CannedLlm));
    let cfg = Config::default();

    let cli = Cli { validate: true, ..quiet_cli(None) };
    generate::run(&ctx, &cfg, &cli).await.unwrap();
    assert_eq!(files.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_recording_completes_without_output() {
    let mut recording = calculator_recording();
    recording.events.clear();
    let store = MemStore { recordings: vec![recording] };
    let (ctx, files) = context(store, Box::new(CannedLlm));
    let cfg = Config::default();

    generate::run(&ctx, &cfg, &quiet_cli(None)).await.unwrap();
    assert!(files.lock().unwrap().is_empty());
}

#[tokio::test]
async fn quiet_run_over_max_events_aborts() {
    let mut recording = calculator_recording();
    recording.events =
        vec![ActionEvent::KeyPress { key: "a".into() }; 5];
    let store = MemStore { recordings: vec![recording] };
    let (ctx, files) = context(store, Box::new(CannedLlm));
    let cfg = Config { max_events: 3, ..Config::default() };

    let err = generate::run(&ctx, &cfg, &quiet_cli(None)).await.unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
    assert!(err.to_string().contains("max_events"));
    assert!(files.lock().unwrap().is_empty());
}

#[tokio::test]
async fn quiet_rerun_without_force_versions_instead_of_overwriting() {
    let store = MemStore { recordings: vec![calculator_recording()] };
    let (ctx, files) = context(store, Box::new(CannedLlm));
    let cfg = Config::default();

    generate::run(&ctx, &cfg, &quiet_cli(None)).await.unwrap();
    generate::run(&ctx, &cfg, &quiet_cli(None)).await.unwrap();

    let files = files.lock().unwrap();
    assert_eq!(files.len(), 2);
    let contents: Vec<&String> = files.values().collect();
    assert_eq!(contents[0], contents[1]);
}

#[tokio::test]
async fn force_rerun_overwrites_in_place() {
    let store = MemStore { recordings: vec![calculator_recording()] };
    let (ctx, files) = context(store, Box::new(CannedLlm));
    let cfg = Config::default();

    let cli = Cli { force: true, ..quiet_cli(None) };
    generate::run(&ctx, &cfg, &cli).await.unwrap();
    let first: HashMap<PathBuf, String> = files.lock().unwrap().clone();
    generate::run(&ctx, &cfg, &cli).await.unwrap();
    let second: HashMap<PathBuf, String> = files.lock().unwrap().clone();

    assert_eq!(first, second);
    assert_eq!(second.len(), 1);
}

#[tokio::test]
async fn oversized_output_fails_before_writing() {
    let store = MemStore { recordings: vec![calculator_recording()] };
    let (ctx, files) = context(store, Box::new(CannedLlm));
    let cfg = Config { max_file_size: 10, ..Config::default() };

    let err = generate::run(&ctx, &cfg, &quiet_cli(None)).await.unwrap_err();
    assert!(matches!(err, PipelineError::FileTooLarge(_)));
    assert!(files.lock().unwrap().is_empty());
}
