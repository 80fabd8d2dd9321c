//! Sheetsync core library — domain types, configuration, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`error`] — [`ConfigError`]
//! - [`config`] — load / defaults / base-URL composition

pub mod config;
pub mod error;
pub mod types;

pub use config::{StreamSettings, SyncConfig, DEFAULT_MAX_BATCH_SIZE};
pub use error::ConfigError;
pub use types::{Batch, ColumnId, Record, StreamName, TableId};
