//! Error types for sheetsync-client.

use thiserror::Error;

/// Statuses the transport treats as transient and retries.
const RETRIABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// All errors that can arise from transport operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with a non-2xx status after retries were exhausted
    /// (or immediately, for statuses classified as fatal).
    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Connection-level failure (DNS, TLS, socket, read timeout).
    #[error("transport error: {0}")]
    Transport(#[from] Box<ureq::Transport>),

    /// The response body could not be decoded as JSON.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response body could not be read off the wire.
    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),
}

impl ClientError {
    /// Whether the retry loop may attempt this request again.
    ///
    /// Retriable: throttling and server-side statuses, connection-level
    /// failures, and read timeouts — including one that hits while draining
    /// the response body (the retry re-issues the whole request, so a
    /// partially consumed body is safe). Everything else is fatal and
    /// surfaces immediately.
    pub fn is_retriable(&self) -> bool {
        match self {
            ClientError::Api { status, .. } => RETRIABLE_STATUSES.contains(status),
            ClientError::Transport(_) => true,
            ClientError::Body(source) => matches!(
                source.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            ClientError::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn throttle_and_server_errors_are_retriable() {
        for status in [408, 429, 500, 502, 503, 504] {
            let err = ClientError::Api {
                status,
                body: String::new(),
            };
            assert!(err.is_retriable(), "HTTP {status} must be retriable");
        }
    }

    #[test]
    fn client_errors_are_fatal() {
        for status in [400, 401, 403, 404, 409] {
            let err = ClientError::Api {
                status,
                body: String::new(),
            };
            assert!(!err.is_retriable(), "HTTP {status} must be fatal");
        }
    }

    #[test]
    fn read_timeout_while_reading_the_body_is_retriable() {
        for kind in [io::ErrorKind::TimedOut, io::ErrorKind::WouldBlock] {
            let err = ClientError::Body(io::Error::new(kind, "timed out reading response"));
            assert!(err.is_retriable(), "{kind:?} must be retriable");
        }
    }

    #[test]
    fn other_body_failures_are_fatal() {
        let err = ClientError::Body(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(!err.is_retriable());
    }
}
