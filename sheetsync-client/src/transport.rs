//! Blocking HTTP transport with bounded exponential-backoff retry.
//!
//! Transient failures (throttling/server statuses, connection errors) are
//! retried up to [`MAX_ATTEMPTS`] times with multiplier-2 backoff; everything
//! else surfaces immediately and aborts the in-flight flush.

use std::time::Duration;

use backoff::{retry, Error as BackoffError, ExponentialBackoffBuilder};
use serde_json::Value;

use sheetsync_core::SyncConfig;

use crate::auth::{Authenticator, BearerAuth};
use crate::error::ClientError;

/// Retry budget per request, counting the first attempt.
pub const MAX_ATTEMPTS: usize = 5;

const BACKOFF_MULTIPLIER: f64 = 2.0;
const INITIAL_INTERVAL_MS: u64 = 500;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// A decoded API response: status line plus JSON body (`Null` when empty).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

/// The seam between the sync engine and the wire.
///
/// `endpoint` is relative to the workbook base URL (e.g.
/// `workbook/worksheets/`). Implementations merge authenticator headers into
/// each request and return `Ok` only for 2xx responses.
pub trait Transport {
    fn request(
        &self,
        method: &str,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ClientError>;
}

impl<T: Transport> Transport for &T {
    fn request(
        &self,
        method: &str,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        (*self).request(method, endpoint, body)
    }
}

/// Production transport over `ureq`.
pub struct GraphTransport {
    base_url: String,
    agent: ureq::Agent,
    authenticator: Box<dyn Authenticator>,
}

impl GraphTransport {
    pub fn new(base_url: String, authenticator: Box<dyn Authenticator>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout_read(Duration::from_secs(READ_TIMEOUT_SECS))
            .build();
        Self {
            base_url,
            agent,
            authenticator,
        }
    }

    /// Build a transport from the target config, with bearer-token auth.
    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(
            config.base_url(),
            Box::new(BearerAuth::new(config.access_token.clone())),
        )
    }

    /// One attempt: issue the request, decode the body.
    fn execute(
        &self,
        method: &str,
        url: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        let mut request = self.agent.request(method, url);
        for (name, value) in self.authenticator.auth_headers() {
            request = request.set(&name, &value);
        }

        let result = match body {
            Some(json) => request.send_json(json),
            None => request.call(),
        };
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(ClientError::Api { status, body });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(ClientError::Transport(Box::new(transport)));
            }
        };

        let status = response.status();
        let text = response.into_string()?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };
        Ok(ApiResponse { status, body })
    }
}

impl Transport for GraphTransport {
    fn request(
        &self,
        method: &str,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let label = format!("{method} {url}");
        retry_request(&label, Duration::from_millis(INITIAL_INTERVAL_MS), || {
            self.execute(method, &url, body)
        })
    }
}

/// Run one attempt closure under the bounded backoff policy.
///
/// Transient errors (per [`ClientError::is_retriable`]) are retried until the
/// [`MAX_ATTEMPTS`] budget is spent, then surface as-is; fatal errors surface
/// on the first attempt.
fn retry_request<F>(
    label: &str,
    initial_interval: Duration,
    mut op: F,
) -> Result<ApiResponse, ClientError>
where
    F: FnMut() -> Result<ApiResponse, ClientError>,
{
    let policy = ExponentialBackoffBuilder::new()
        .with_initial_interval(initial_interval)
        .with_multiplier(BACKOFF_MULTIPLIER)
        .with_max_elapsed_time(None)
        .build();

    let mut attempt = 0usize;
    retry(policy, || {
        attempt += 1;
        match op() {
            Ok(response) => Ok(response),
            Err(err) if err.is_retriable() && attempt < MAX_ATTEMPTS => {
                tracing::warn!("{label} failed on attempt {attempt}/{MAX_ATTEMPTS}, retrying: {err}");
                Err(BackoffError::transient(err))
            }
            Err(err) => Err(BackoffError::permanent(err)),
        }
    })
    .map_err(|err| match err {
        BackoffError::Permanent(e) => e,
        BackoffError::Transient { err: e, .. } => e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Keep the backoff waits negligible for the test runs.
    const FAST: Duration = Duration::from_millis(1);

    fn api_error(status: u16) -> ClientError {
        ClientError::Api {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn transient_errors_exhaust_the_full_attempt_budget() {
        let mut calls = 0usize;
        let result = retry_request("GET test", FAST, || {
            calls += 1;
            Err(api_error(503))
        });
        assert_eq!(calls, MAX_ATTEMPTS, "must attempt exactly {MAX_ATTEMPTS} times");
        assert!(matches!(result, Err(ClientError::Api { status: 503, .. })));
    }

    #[test]
    fn fatal_error_is_not_retried() {
        let mut calls = 0usize;
        let result = retry_request("GET test", FAST, || {
            calls += 1;
            Err(api_error(404))
        });
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(ClientError::Api { status: 404, .. })));
    }

    #[test]
    fn recovery_mid_budget_returns_the_response() {
        let mut calls = 0usize;
        let result = retry_request("GET test", FAST, || {
            calls += 1;
            if calls < 3 {
                Err(api_error(429))
            } else {
                Ok(ApiResponse {
                    status: 200,
                    body: json!({ "ok": true }),
                })
            }
        });
        assert_eq!(calls, 3);
        assert_eq!(result.expect("response").status, 200);
    }

    #[test]
    fn body_read_timeout_is_retried() {
        let mut calls = 0usize;
        let result = retry_request("GET test", FAST, || {
            calls += 1;
            if calls == 1 {
                Err(ClientError::Body(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "timed out reading response",
                )))
            } else {
                Ok(ApiResponse {
                    status: 201,
                    body: json!({}),
                })
            }
        });
        assert_eq!(calls, 2);
        assert_eq!(result.expect("response").status, 201);
    }
}
