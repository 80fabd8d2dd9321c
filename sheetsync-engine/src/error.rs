//! Error types for sheetsync-engine.

use thiserror::Error;

use sheetsync_client::ClientError;

/// All errors that can arise from a sync flush.
///
/// Transport failures propagate unchanged; nothing below the orchestrator
/// swallows them. The only demotion is [`crate::sink::classify`], which turns
/// a non-201 final status into a failure marker without erroring.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the transport (after its own retry budget).
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// `flush` was called with no records.
    #[error("empty batch for stream '{stream}'")]
    EmptyBatch { stream: String },

    /// The batch exceeds the configured maximum.
    #[error("batch of {size} records for stream '{stream}' exceeds max batch size {max}")]
    BatchTooLarge {
        stream: String,
        size: usize,
        max: usize,
    },

    /// The configured primary key has no column in the canonical order.
    #[error("primary key '{key}' is not a column of stream '{stream}'")]
    KeyColumnMissing { key: String, stream: String },

    /// A 2xx response carried a body the engine could not interpret.
    #[error("malformed response from {endpoint}: {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}
