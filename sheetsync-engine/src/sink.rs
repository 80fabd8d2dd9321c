//! Batch orchestration — per-stream lifecycle around the reconciler and the
//! upsert engine.
//!
//! The remote table is check-then-act territory (table exists? column
//! exists?), so each flush runs under a mutex keyed by worksheet name. The
//! engine is still sequential by design; the lock guards against an embedding
//! that flushes the same worksheet from two threads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};

use sheetsync_client::Transport;
use sheetsync_core::{Record, StreamName};

use crate::api::WorkbookApi;
use crate::error::SyncError;
use crate::schema;
use crate::upsert;

/// Batch-level success marker derived from the final transport response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Success,
    Failure,
}

/// Map a response status to a batch state: HTTP 201 (created) is success,
/// anything else is failure. No partial-success granularity at this layer.
pub fn classify(status: u16) -> BatchState {
    if status == 201 {
        BatchState::Success
    } else {
        BatchState::Failure
    }
}

/// Outcome of flushing one batch.
#[derive(Debug, Clone)]
pub struct FlushReport {
    pub stream: StreamName,
    pub updated: usize,
    pub appended: usize,
    pub state: BatchState,
    pub completed_at: DateTime<Utc>,
}

/// Per-stream sink: worksheet bootstrap plus batch flushes.
pub struct StreamSink<T: Transport> {
    transport: T,
    max_batch_size: usize,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<T: Transport> StreamSink<T> {
    pub fn new(transport: T, max_batch_size: usize) -> Self {
        Self {
            transport,
            max_batch_size,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn worksheet_lock(&self, stream: &StreamName) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(stream.0.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Idempotently ensure the stream's worksheet exists.
    pub fn start_batch(&self, stream: &StreamName) -> Result<(), SyncError> {
        let api = WorkbookApi::new(&self.transport);
        let worksheets = api.list_worksheets()?;
        if !worksheets.iter().any(|w| w.name == stream.0) {
            let response = api.add_worksheet(&stream.0)?;
            tracing::info!(
                "added worksheet '{stream}' to workbook (status {})",
                response.status
            );
        }
        Ok(())
    }

    /// Flush one batch: reconcile the schema, upsert the rows, classify.
    ///
    /// The resolved table id lives only for the duration of this call; no
    /// state is carried across batches.
    pub fn flush(
        &self,
        stream: &StreamName,
        primary_key: Option<&str>,
        records: &[Record],
    ) -> Result<FlushReport, SyncError> {
        if records.is_empty() {
            return Err(SyncError::EmptyBatch {
                stream: stream.to_string(),
            });
        }
        if records.len() > self.max_batch_size {
            return Err(SyncError::BatchTooLarge {
                stream: stream.to_string(),
                size: records.len(),
                max: self.max_batch_size,
            });
        }

        let lock = self.worksheet_lock(stream);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let api = WorkbookApi::new(&self.transport);
        let header = schema::batch_header(records);
        let reconciled = schema::reconcile(&api, stream, &header, records.len())?;
        let outcome = upsert::upsert(
            &api,
            stream,
            &reconciled.table_id,
            &reconciled.columns,
            primary_key,
            records,
        )?;

        // An all-matched batch issues no append; every patch already came
        // back 2xx or we would have errored, so that counts as success.
        let state = match outcome.append_status {
            Some(status) => classify(status),
            None => BatchState::Success,
        };

        tracing::info!(
            "flushed {} records to '{stream}' ({} updated, {} appended)",
            records.len(),
            outcome.updated,
            outcome.appended
        );

        Ok(FlushReport {
            stream: stream.clone(),
            updated: outcome.updated,
            appended: outcome.appended,
            state,
            completed_at: Utc::now(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_201_classifies_as_success() {
        assert_eq!(classify(201), BatchState::Success);
        for status in [200, 202, 204, 400, 404, 500] {
            assert_eq!(classify(status), BatchState::Failure, "HTTP {status}");
        }
    }
}
