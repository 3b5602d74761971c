//! Terminal OAuth responses: an authorization code or an error.

use url::Url;

use crate::error::ContinuationError;
use crate::response::matching::query_param;

fn parse(url: &str) -> Result<Url, ContinuationError> {
    Url::parse(url).map_err(|e| ContinuationError::InvalidResponse(format!("unparsable url: {}", e)))
}

/// Authorization code returned on the redirect URI.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthCodeResponse {
    code: String,
    state: Option<String>,
}

impl AuthCodeResponse {
    /// Parses `?code=..[&state=..]`.
    ///
    /// Fails with [`ContinuationError::InvalidResponse`] when there is no code.
    pub fn from_url(url: &str) -> Result<Self, ContinuationError> {
        let parsed = parse(url)?;
        let code = query_param(&parsed, "code")
            .ok_or_else(|| ContinuationError::InvalidResponse("no authorization code".into()))?;

        Ok(Self {
            code,
            state: query_param(&parsed, "state"),
        })
    }

    /// The authorization code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// State echoed by the server.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }
}

impl std::fmt::Debug for AuthCodeResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthCodeResponse")
            .field("code", &"[REDACTED]")
            .field("state", &self.state)
            .finish()
    }
}

/// OAuth error returned on the redirect URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthErrorResponse {
    error: String,
    error_description: Option<String>,
    state: Option<String>,
}

impl OAuthErrorResponse {
    /// Parses `?error=..[&error_description=..][&state=..]`.
    ///
    /// A bare `error_description` is accepted and reported with error
    /// `server_error`. Fails with [`ContinuationError::InvalidResponse`] when
    /// neither is present.
    pub fn from_url(url: &str) -> Result<Self, ContinuationError> {
        let parsed = parse(url)?;
        let error = query_param(&parsed, "error");
        let error_description = query_param(&parsed, "error_description");

        if error.is_none() && error_description.is_none() {
            return Err(ContinuationError::InvalidResponse("no oauth error".into()));
        }

        Ok(Self {
            error: error.unwrap_or_else(|| "server_error".to_string()),
            error_description,
            state: query_param(&parsed, "state"),
        })
    }

    /// OAuth error code.
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Human-readable description, if the server sent one.
    pub fn error_description(&self) -> Option<&str> {
        self.error_description.as_deref()
    }

    /// State echoed by the server.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }
}
