//! The switch-browser-resume continuation response.

use crate::error::ContinuationError;
use crate::response::arena::ResponseHandle;
use crate::response::matching::{parse_continuation, ContinuationPayload};
use crate::response::{ContinuationResponse, ContinuationStep};

/// Server request to resume authentication after a browser switch.
///
/// Parsed like [`BrowserSwitchResponse`](super::BrowserSwitchResponse) but
/// matched against `/switch_browser_resume`. The caller links it to the
/// response that started the switch before building a resume operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSwitchResumeResponse {
    payload: ContinuationPayload,
    parent: Option<ResponseHandle>,
}

impl BrowserSwitchResumeResponse {
    /// Parses a switch-browser-resume redirect.
    ///
    /// # Errors
    ///
    /// Same as [`BrowserSwitchResponse::from_url`](super::BrowserSwitchResponse::from_url).
    pub fn from_url(
        url: &str,
        redirect_uri: Option<&str>,
        request_state: Option<&str>,
    ) -> Result<Self, ContinuationError> {
        let payload = parse_continuation(
            url,
            ContinuationStep::SwitchBrowserResume,
            redirect_uri,
            request_state,
        )?;
        Ok(Self {
            payload,
            parent: None,
        })
    }

    /// Handle of the initiating switch-browser response.
    pub fn parent(&self) -> Option<ResponseHandle> {
        self.parent
    }

    /// Links this response to its initiating switch-browser response.
    pub fn set_parent(&mut self, parent: ResponseHandle) {
        self.parent = Some(parent);
    }
}

impl ContinuationResponse for BrowserSwitchResumeResponse {
    fn payload(&self) -> &ContinuationPayload {
        &self.payload
    }

    fn step(&self) -> ContinuationStep {
        ContinuationStep::SwitchBrowserResume
    }
}
