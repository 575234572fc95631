//! Recording store port for read-only access to captured recordings.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use crate::recording::{Recording, RecordingSummary};

/// Boxed future type alias used by [`RecordingStore`] to keep the trait
/// dyn-compatible while letting callers bound each query with a timeout.
pub type StoreFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// Read-only query interface over captured recordings.
///
/// The store is owned by the capture system; this pipeline never mutates
/// it. Connection handling and retry policy belong to the implementation.
pub trait RecordingStore: Send + Sync {
    /// Lists summaries of all recordings in the store.
    ///
    /// An empty list means the store is reachable but holds no recordings.
    fn list(&self) -> StoreFuture<'_, Vec<RecordingSummary>>;

    /// Fetches a single recording with its full event sequence.
    ///
    /// Returns `Ok(None)` when no recording has the given id.
    fn fetch(&self, id: i64) -> StoreFuture<'_, Option<Recording>>;
}
