//! Default [`WebResponseParser`] for redirect URLs.

use tracing::debug;

use crate::channel::{ResponseFactory, WebResponseParser};
use crate::config::ContinuationConfig;
use crate::context::RequestContext;
use crate::error::{BoxError, ContinuationError};
use crate::response::WebResponse;

/// Parses redirect URLs for one request.
///
/// Holds the request's redirect URI and state and hands both to the
/// [`ResponseFactory`] the operation supplies.
#[derive(Debug, Clone)]
pub struct UrlResponseParser {
    config: ContinuationConfig,
}

impl UrlResponseParser {
    /// Creates a parser.
    ///
    /// # Errors
    ///
    /// Returns [`ContinuationError::Configuration`] if `config` is invalid.
    pub fn new(config: ContinuationConfig) -> Result<Self, ContinuationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Parser configuration.
    pub fn config(&self) -> &ContinuationConfig {
        &self.config
    }

    /// Parses `url` with `factory`.
    pub fn parse(
        &self,
        url: &str,
        factory: &dyn ResponseFactory,
        context: &RequestContext,
    ) -> Result<WebResponse, ContinuationError> {
        factory.response_from_url(
            url,
            &self.config.redirect_uri,
            self.config.request_state.as_deref(),
            context,
        )
    }
}

impl WebResponseParser for UrlResponseParser {
    fn response(
        &self,
        result_url: &str,
        factory: &dyn ResponseFactory,
        context: &RequestContext,
    ) -> Result<WebResponse, BoxError> {
        let response = self.parse(result_url, factory, context)?;
        debug!(
            correlation_id = %context.correlation_id,
            kind = response.kind(),
            "Parsed web response"
        );
        Ok(response)
    }
}
