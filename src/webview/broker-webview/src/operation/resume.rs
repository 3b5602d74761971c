//! Operation that finishes a flow from a switch-browser-resume response.

use std::sync::Arc;

use crate::channel::{
    BrowserActionPolicy, CertificateAuthChannel, ResponseFactory, WebResponseParser,
};
use crate::context::InteractiveParameters;
use crate::error::ContinuationError;
use crate::operation::{ChannelRoundTrip, CompletionHandlers, CompletionRouting, OperationState};
use crate::response::{
    BrowserSwitchResumeResponse, ContinuationResponse, ContinuationStep, ResponseArena,
    WebResponse,
};

/// Resumes a switch-browser flow from a [`BrowserSwitchResumeResponse`].
///
/// An authorization code returned by the channel completes the flow and goes
/// to the auth-code handler along with the action URI of the initiating
/// switch-browser response. Anything else goes to the response handler.
pub struct BrowserSwitchResumeOperation {
    response: BrowserSwitchResumeResponse,
    parent_action_uri: String,
    channel: Arc<dyn CertificateAuthChannel>,
}

impl BrowserSwitchResumeOperation {
    /// Creates an operation for a resume response whose parent is stored in
    /// `arena`.
    ///
    /// # Errors
    ///
    /// Returns [`ContinuationError::Internal`] if `response` is not a resume
    /// response or its parent cannot be resolved in `arena`.
    pub fn new(
        response: WebResponse,
        arena: &ResponseArena,
        channel: Arc<dyn CertificateAuthChannel>,
    ) -> Result<Self, ContinuationError> {
        let WebResponse::BrowserSwitchResume(response) = response else {
            return Err(ContinuationError::Internal(
                "BrowserSwitchResumeResponse is required for creating BrowserSwitchResumeOperation"
                    .into(),
            ));
        };

        let parent = response
            .parent()
            .and_then(|handle| arena.get(handle))
            .ok_or_else(|| {
                ContinuationError::Internal(
                    "Parent response of type BrowserSwitchResponse is required for creating BrowserSwitchResumeOperation"
                        .into(),
                )
            })?;
        let parent_action_uri = parent.action_uri().to_string();

        Ok(Self {
            response,
            parent_action_uri,
            channel,
        })
    }

    /// The wrapped response.
    pub fn response(&self) -> &BrowserSwitchResumeResponse {
        &self.response
    }

    /// Runs the channel round trip and reports through `handlers`.
    ///
    /// `parser` turns the callback URL into a response with `factory`.
    /// `policy`, when given, may replace the start URL before the channel
    /// opens it.
    pub async fn invoke(
        self,
        params: &InteractiveParameters,
        parser: &dyn WebResponseParser,
        factory: &dyn ResponseFactory,
        policy: Option<&dyn BrowserActionPolicy>,
        handlers: CompletionHandlers,
    ) -> OperationState {
        let round_trip = ChannelRoundTrip {
            step: ContinuationStep::SwitchBrowserResume,
            action_uri: self.response.action_uri(),
            session_token: self.response.session_token(),
            ephemeral: self.response.use_ephemeral_session(),
            channel: self.channel.as_ref(),
            routing: CompletionRouting::AuthCodeToHandler {
                initiating_action_uri: self.parent_action_uri.clone(),
            },
        };

        round_trip
            .run(params, parser, factory, policy, handlers)
            .await
    }
}

impl std::fmt::Debug for BrowserSwitchResumeOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSwitchResumeOperation")
            .field("response", &self.response)
            .field("parent_action_uri", &self.parent_action_uri)
            .finish_non_exhaustive()
    }
}
