//! Configuration for response parsing.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ContinuationError;

/// Request settings for [`UrlResponseParser`](crate::parser::UrlResponseParser).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationConfig {
    /// Redirect URI the app registered (e.g. `msauth.com.contoso.app://auth`).
    pub redirect_uri: String,

    /// State sent with the authorization request.
    #[serde(default)]
    pub request_state: Option<String>,
}

impl ContinuationConfig {
    /// Creates a configuration with no request state.
    pub fn new(redirect_uri: impl Into<String>) -> Self {
        Self {
            redirect_uri: redirect_uri.into(),
            request_state: None,
        }
    }

    /// Sets the request state.
    pub fn with_request_state(mut self, state: impl Into<String>) -> Self {
        self.request_state = Some(state.into());
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ContinuationError> {
        if self.redirect_uri.trim().is_empty() {
            return Err(ContinuationError::Configuration(
                "redirect_uri must not be empty".into(),
            ));
        }
        Url::parse(&self.redirect_uri).map_err(|e| {
            ContinuationError::Configuration(format!("redirect_uri is not a valid URL: {}", e))
        })?;
        if matches!(&self.request_state, Some(state) if state.is_empty()) {
            return Err(ContinuationError::Configuration(
                "request_state must not be empty when set".into(),
            ));
        }
        Ok(())
    }
}
