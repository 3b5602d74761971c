//! The initial switch-browser continuation response.

use crate::error::ContinuationError;
use crate::response::matching::{parse_continuation, ContinuationPayload};
use crate::response::{ContinuationResponse, ContinuationStep};

/// Server request to continue authentication in another browser.
///
/// Arrives as `<redirect_uri>/switch_browser?action_uri=..&code=..` with
/// optional `state` and `browser_modes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSwitchResponse {
    payload: ContinuationPayload,
}

impl BrowserSwitchResponse {
    /// Parses a switch-browser redirect.
    ///
    /// When `redirect_uri` is given the URL must be that URI followed by
    /// `/switch_browser`. When `request_state` is given the URL must carry a
    /// `state`.
    ///
    /// # Errors
    ///
    /// - [`ContinuationError::InvalidResponse`] if the URL is not a
    ///   switch-browser redirect
    /// - [`ContinuationError::ServerInvalidResponse`] if `action_uri` or
    ///   `code` is missing
    /// - [`ContinuationError::MissingState`] if a state was expected but
    ///   not returned
    pub fn from_url(
        url: &str,
        redirect_uri: Option<&str>,
        request_state: Option<&str>,
    ) -> Result<Self, ContinuationError> {
        let payload = parse_continuation(
            url,
            ContinuationStep::SwitchBrowser,
            redirect_uri,
            request_state,
        )?;
        Ok(Self { payload })
    }
}

impl ContinuationResponse for BrowserSwitchResponse {
    fn payload(&self) -> &ContinuationPayload {
        &self.payload
    }

    fn step(&self) -> ContinuationStep {
        ContinuationStep::SwitchBrowser
    }
}
