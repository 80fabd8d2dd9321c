//! # sheetsync-client
//!
//! Authenticated HTTP transport for the Graph workbook surface.
//!
//! [`GraphTransport`] issues blocking requests with bounded
//! exponential-backoff retry on transient failures. The [`Transport`] trait is
//! the seam the engine works against; tests substitute an in-memory fake.

pub mod auth;
pub mod error;
pub mod transport;

pub use auth::{Authenticator, BearerAuth};
pub use error::ClientError;
pub use transport::{ApiResponse, GraphTransport, Transport};
