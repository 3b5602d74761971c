//! Operation that opens a switch-browser action URI.

use std::sync::Arc;

use crate::channel::{
    BrowserActionPolicy, CertificateAuthChannel, ResponseFactory, WebResponseParser,
};
use crate::context::InteractiveParameters;
use crate::error::ContinuationError;
use crate::operation::{ChannelRoundTrip, CompletionHandlers, CompletionRouting, OperationState};
use crate::response::{BrowserSwitchResponse, ContinuationResponse, ContinuationStep, WebResponse};

/// Opens the action URI of a [`BrowserSwitchResponse`] in the certificate
/// auth channel.
///
/// Every outcome, including an authorization code, goes to the response
/// handler.
pub struct BrowserSwitchOperation {
    response: BrowserSwitchResponse,
    channel: Arc<dyn CertificateAuthChannel>,
}

impl BrowserSwitchOperation {
    /// Creates an operation for a switch-browser response.
    ///
    /// # Errors
    ///
    /// Returns [`ContinuationError::Internal`] if `response` is not a
    /// switch-browser response.
    pub fn new(
        response: WebResponse,
        channel: Arc<dyn CertificateAuthChannel>,
    ) -> Result<Self, ContinuationError> {
        let WebResponse::BrowserSwitch(response) = response else {
            return Err(ContinuationError::Internal(
                "BrowserSwitchResponse is required for creating BrowserSwitchOperation".into(),
            ));
        };

        Ok(Self { response, channel })
    }

    /// The wrapped response.
    pub fn response(&self) -> &BrowserSwitchResponse {
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
            step: ContinuationStep::SwitchBrowser,
            action_uri: self.response.action_uri(),
            session_token: self.response.session_token(),
            ephemeral: self.response.use_ephemeral_session(),
            channel: self.channel.as_ref(),
            routing: CompletionRouting::ResponseOnly,
        };

        round_trip
            .run(params, parser, factory, policy, handlers)
            .await
    }
}

impl std::fmt::Debug for BrowserSwitchOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSwitchOperation")
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}
