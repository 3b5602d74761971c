//! Request and presentation context passed through an operation.

use serde::{Deserialize, Serialize};

/// Per-request context used for correlation and logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Correlation identifier shared with the identity provider.
    pub correlation_id: String,
}

impl RequestContext {
    /// Creates a context with the given correlation id.
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
        }
    }
}

/// Where and how the certificate channel presents its browser surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationContext {
    /// Opaque identifier of the parent window or view controller.
    pub anchor: Option<String>,

    /// Ask the browser for a private session that shares no cookies.
    pub prefers_ephemeral_session: bool,
}

impl PresentationContext {
    /// Returns a copy with the ephemeral-session preference replaced.
    pub fn with_ephemeral_session(&self, ephemeral: bool) -> Self {
        Self {
            anchor: self.anchor.clone(),
            prefers_ephemeral_session: ephemeral,
        }
    }
}

/// Parameters of the interactive request an operation runs on behalf of.
#[derive(Debug, Clone, Default)]
pub struct InteractiveParameters {
    /// Request context.
    pub context: RequestContext,

    /// Base presentation context.
    pub presentation: PresentationContext,

    /// Redirect URI the channel should treat as the end of the browser session.
    pub redirect_uri: Option<String>,
}

impl InteractiveParameters {
    /// Creates parameters for the given context with default presentation.
    pub fn new(context: RequestContext) -> Self {
        Self {
            context,
            ..Default::default()
        }
    }

    /// Sets the redirect URI.
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }
}
