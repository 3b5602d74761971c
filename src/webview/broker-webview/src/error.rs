//! Continuation protocol error types.

use thiserror::Error;

/// Error type produced by external collaborators (channel, response parser).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while parsing continuation responses or running
/// continuation operations.
#[derive(Debug, Error)]
pub enum ContinuationError {
    /// URL does not belong to this continuation step. The caller may try
    /// another matcher.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// URL belongs to this step but a required field is missing.
    #[error("server returned invalid response: {0}")]
    ServerInvalidResponse(String),

    /// A request state was expected but the response carried none.
    #[error("state parameter missing from response")]
    MissingState,

    /// Precondition violated by the caller.
    #[error("internal error: {0}")]
    Internal(String),

    /// Certificate auth channel reported a failure.
    #[error("certificate auth channel failed: {0}")]
    Channel(#[source] BoxError),

    /// Callback URL could not be turned into a response.
    #[error("web response parsing failed: {0}")]
    ResponseParsing(#[source] BoxError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ContinuationError {
    /// Returns `true` if another matcher may still accept the URL.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidResponse(_))
    }

    /// Human-readable description without the variant prefix.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::InvalidResponse(msg)
            | Self::ServerInvalidResponse(msg)
            | Self::Internal(msg)
            | Self::Configuration(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}
