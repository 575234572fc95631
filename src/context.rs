//! Service context bundling all port trait objects.

use crate::adapters::live::{AnthropicClient, FileRecordingStore, LiveClock, LiveFileSystem};
use crate::config::Config;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::llm::LlmClient;
use crate::ports::store::RecordingStore;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Tests construct
/// the struct directly with in-memory fakes.
pub struct ServiceContext {
    /// Clock for timestamp-versioned file naming.
    pub clock: Box<dyn Clock>,
    /// Filesystem used by the output writer.
    pub fs: Box<dyn FileSystem>,
    /// Language model for description generation.
    pub llm: Box<dyn LlmClient>,
    /// Read-only recording store.
    pub store: Box<dyn RecordingStore>,
}

impl ServiceContext {
    /// Creates a live context with real adapters for every port.
    #[must_use]
    pub fn live(cfg: &Config) -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            llm: Box::new(AnthropicClient::new()),
            store: Box::new(FileRecordingStore::new(&cfg.store_dir)),
        }
    }
}
