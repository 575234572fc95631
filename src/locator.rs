//! Recording selection: a specific id, or the most recently created.

use std::cmp::Ordering;
use std::time::Duration;

use crate::error::PipelineError;
use crate::ports::store::RecordingStore;
use crate::recording::{Recording, RecordingSummary};

/// Picks the recording to process.
///
/// With an explicit id the store is queried directly. Without one, the
/// summaries are ordered by [`capture_order`] and the newest is fetched.
///
/// # Errors
///
/// Returns [`PipelineError::NotFound`] when the id does not exist or the
/// store is empty, and [`PipelineError::StoreUnavailable`] when a store
/// query fails or exceeds `timeout`.
pub async fn locate(
    store: &dyn RecordingStore,
    recording_id: Option<i64>,
    timeout: Duration,
) -> Result<Recording, PipelineError> {
    if let Some(id) = recording_id {
        log::info!("retrieving recording {id}");
        return fetch(store, id, timeout)
            .await?
            .ok_or_else(|| PipelineError::NotFound(format!("no recording with id {id}")));
    }

    log::info!("retrieving latest recording");
    let summaries = list(store, timeout).await?;
    let newest = summaries
        .iter()
        .max_by(|a, b| capture_order(a, b))
        .ok_or_else(|| PipelineError::NotFound("store has no recordings".into()))?;
    let id = newest.id;
    fetch(store, id, timeout)
        .await?
        .ok_or_else(|| PipelineError::NotFound(format!("recording {id} disappeared from store")))
}

/// Ordering for "most recent": creation time, ties broken by highest id.
fn capture_order(a: &RecordingSummary, b: &RecordingSummary) -> Ordering {
    a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
}

async fn list(
    store: &dyn RecordingStore,
    timeout: Duration,
) -> Result<Vec<RecordingSummary>, PipelineError> {
    tokio::time::timeout(timeout, store.list())
        .await
        .map_err(|_| {
            PipelineError::StoreUnavailable(format!(
                "store list timed out after {}s",
                timeout.as_secs()
            ))
        })?
        .map_err(|e| PipelineError::StoreUnavailable(format!("store list failed: {e}")))
}

async fn fetch(
    store: &dyn RecordingStore,
    id: i64,
    timeout: Duration,
) -> Result<Option<Recording>, PipelineError> {
    tokio::time::timeout(timeout, store.fetch(id))
        .await
        .map_err(|_| {
            PipelineError::StoreUnavailable(format!(
                "store fetch of recording {id} timed out after {}s",
                timeout.as_secs()
            ))
        })?
        .map_err(|e| {
            PipelineError::StoreUnavailable(format!("store fetch of recording {id} failed: {e}"))
        })
}
