//! # sheetsync-engine
//!
//! The tabular synchronization engine: reconcile a remote worksheet/table
//! schema against an incoming batch, then upsert the batch's records as rows.
//!
//! Call [`StreamSink::start_batch`] when a stream is first seen and
//! [`StreamSink::flush`] per batch; everything else is plumbing around those
//! two entrypoints.

pub mod api;
pub mod convert;
pub mod error;
pub mod schema;
pub mod sink;
pub mod upsert;

pub use api::WorkbookApi;
pub use error::SyncError;
pub use sink::{classify, BatchState, FlushReport, StreamSink};
pub use upsert::UpsertOutcome;
