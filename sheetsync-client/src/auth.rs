//! Request authentication.
//!
//! Token acquisition and refresh live outside this crate; the transport only
//! asks its [`Authenticator`] for the headers to attach to each request.

/// Supplies authentication headers for outgoing requests.
pub trait Authenticator: Send + Sync {
    /// Header name/value pairs merged into every request.
    fn auth_headers(&self) -> Vec<(String, String)>;
}

/// Static bearer-token authenticator built from the target config.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Authenticator for BearerAuth {
    fn auth_headers(&self) -> Vec<(String, String)> {
        vec![(
            "Authorization".to_owned(),
            format!("Bearer {}", self.token),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_auth_formats_authorization_header() {
        let auth = BearerAuth::new("tok-123");
        let headers = auth.auth_headers();
        assert_eq!(
            headers,
            vec![("Authorization".to_owned(), "Bearer tok-123".to_owned())]
        );
    }
}
