//! Continuation operations.
//!
//! An operation wraps one validated continuation response and drives the
//! certificate auth channel through a single round trip:
//!
//! ```text
//! Created -> Invoking -> CompletedWithResponse
//!                     -> CompletedWithAuthCode
//!                     -> Failed
//! ```
//!
//! The outcome is delivered to exactly one of the two handlers in
//! [`CompletionHandlers`]. Operations are single use: `invoke` consumes them.

mod resume;
mod switch_browser;

pub use resume::BrowserSwitchResumeOperation;
pub use switch_browser::BrowserSwitchOperation;

use tracing::{debug, info, warn};
use url::{form_urlencoded, Url};

use crate::channel::{
    BrowserActionPolicy, CertificateAuthChannel, ResponseFactory, WebResponseParser,
};
use crate::context::InteractiveParameters;
use crate::error::ContinuationError;
use crate::response::{AuthCodeResponse, ContinuationStep, WebResponse};

/// Lifecycle of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationState {
    /// Built, not yet invoked.
    Created,
    /// Waiting on the channel or the parser.
    Invoking,
    /// Delivered a parsed response to the response handler.
    CompletedWithResponse,
    /// Delivered an authorization code to the auth-code handler.
    CompletedWithAuthCode,
    /// Delivered an error to the response handler.
    Failed,
}

impl OperationState {
    /// Returns `true` if no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::CompletedWithResponse | Self::CompletedWithAuthCode | Self::Failed
        )
    }

    /// Returns `true` if moving from `self` to `next` is allowed.
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Created, Self::Invoking) => true,
            (Self::Invoking, next) => next.is_terminal(),
            _ => false,
        }
    }

    fn advance(&mut self, next: Self) {
        debug_assert!(
            self.can_transition_to(next),
            "illegal operation transition {:?} -> {:?}",
            self,
            next
        );
        *self = next;
    }
}

/// Authorization code delivered by a resume operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCodeResult {
    /// The parsed authorization code response.
    pub code_response: AuthCodeResponse,
    /// Action URI of the switch-browser response that started the flow.
    pub initiating_action_uri: String,
}

/// Terminal result of an operation before it is handed to a handler.
#[derive(Debug)]
pub enum OperationOutcome {
    /// Parsed web response.
    Response(WebResponse),
    /// Authorization code completing the flow.
    AuthorizationCode(AuthorizationCodeResult),
    /// Channel or parser failure.
    Failed(ContinuationError),
}

type ResponseHandler = Box<dyn FnOnce(Result<WebResponse, ContinuationError>) + Send>;
type AuthCodeHandler = Box<dyn FnOnce(AuthorizationCodeResult) + Send>;

/// The two completion paths of an operation. Exactly one fires per invoke.
pub struct CompletionHandlers {
    on_response: ResponseHandler,
    on_authorization_code: AuthCodeHandler,
}

impl CompletionHandlers {
    /// Creates handlers. Both may run on any thread.
    pub fn new<R, A>(on_response: R, on_authorization_code: A) -> Self
    where
        R: FnOnce(Result<WebResponse, ContinuationError>) + Send + 'static,
        A: FnOnce(AuthorizationCodeResult) + Send + 'static,
    {
        Self {
            on_response: Box::new(on_response),
            on_authorization_code: Box::new(on_authorization_code),
        }
    }

    /// Hands `outcome` to its handler and returns the matching state.
    pub fn dispatch(self, outcome: OperationOutcome) -> OperationState {
        match outcome {
            OperationOutcome::Response(response) => {
                (self.on_response)(Ok(response));
                OperationState::CompletedWithResponse
            }
            OperationOutcome::AuthorizationCode(result) => {
                (self.on_authorization_code)(result);
                OperationState::CompletedWithAuthCode
            }
            OperationOutcome::Failed(error) => {
                (self.on_response)(Err(error));
                OperationState::Failed
            }
        }
    }
}

impl std::fmt::Debug for CompletionHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionHandlers").finish_non_exhaustive()
    }
}

/// Builds the URL the channel opens: `action_uri` with `code` set to the
/// session token.
///
/// The rest of the query is copied byte for byte, minus any existing `code`
/// parameter and empty segments. The fragment is kept. `action_uri` may be
/// relative.
pub fn compose_start_url(action_uri: &str, session_token: &str) -> String {
    let (without_fragment, fragment) = match action_uri.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (action_uri, None),
    };
    let (base, query) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (without_fragment, None),
    };

    let mut url = String::with_capacity(action_uri.len() + session_token.len() + 6);
    url.push_str(base);
    url.push('?');

    for segment in query.into_iter().flat_map(|q| q.split('&')) {
        let key = segment.split_once('=').map_or(segment, |(key, _)| key);
        if segment.is_empty() || key == "code" {
            continue;
        }
        url.push_str(segment);
        url.push('&');
    }

    url.push_str("code=");
    url.extend(form_urlencoded::byte_serialize(session_token.as_bytes()));

    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}

/// Where an operation sends a parsed response.
pub(crate) enum CompletionRouting {
    /// Every response goes to the response handler.
    ResponseOnly,
    /// Authorization codes go to the auth-code handler.
    AuthCodeToHandler { initiating_action_uri: String },
}

impl CompletionRouting {
    fn route(self, response: WebResponse) -> OperationOutcome {
        match (self, response) {
            (
                Self::AuthCodeToHandler {
                    initiating_action_uri,
                },
                WebResponse::AuthorizationCode(code_response),
            ) => OperationOutcome::AuthorizationCode(AuthorizationCodeResult {
                code_response,
                initiating_action_uri,
            }),
            (_, response) => OperationOutcome::Response(response),
        }
    }
}

/// Everything one channel round trip needs from an operation.
pub(crate) struct ChannelRoundTrip<'a> {
    pub step: ContinuationStep,
    pub action_uri: &'a str,
    pub session_token: &'a str,
    pub ephemeral: bool,
    pub channel: &'a dyn CertificateAuthChannel,
    pub routing: CompletionRouting,
}

impl ChannelRoundTrip<'_> {
    pub(crate) async fn run(
        self,
        params: &InteractiveParameters,
        parser: &dyn WebResponseParser,
        factory: &dyn ResponseFactory,
        policy: Option<&dyn BrowserActionPolicy>,
        handlers: CompletionHandlers,
    ) -> OperationState {
        let mut state = OperationState::Created;
        state.advance(OperationState::Invoking);

        let correlation_id = params.context.correlation_id.as_str();
        info!(
            step = %self.step,
            correlation_id = correlation_id,
            ephemeral = self.ephemeral,
            "Starting continuation operation"
        );

        if let Some(redirect_uri) = params.redirect_uri.as_deref() {
            match Url::parse(redirect_uri) {
                Ok(url) => self.channel.set_redirect_uri_prefix(redirect_uri, url.scheme()),
                Err(e) => debug!(error = %e, "Redirect URI not registered with channel"),
            }
        }

        let composed = compose_start_url(self.action_uri, self.session_token);
        let start_url = match policy.and_then(|policy| policy.decide(&composed)) {
            Some(replacement) => {
                debug!(
                    step = %self.step,
                    correlation_id = correlation_id,
                    "Browser action policy replaced the start URL"
                );
                replacement
            }
            None => composed,
        };
        let presentation = params.presentation.with_ephemeral_session(self.ephemeral);

        let result = self
            .channel
            .start(&start_url, &presentation, &params.context)
            .await;
        self.channel.reset_state();

        let outcome = match result {
            Err(e) => {
                warn!(step = %self.step, correlation_id = correlation_id, error = %e, "Certificate auth channel failed");
                OperationOutcome::Failed(ContinuationError::Channel(e))
            }
            Ok(callback_url) => match parser.response(&callback_url, factory, &params.context) {
                Err(e) => {
                    warn!(step = %self.step, correlation_id = correlation_id, error = %e, "Callback URL could not be parsed");
                    OperationOutcome::Failed(ContinuationError::ResponseParsing(e))
                }
                Ok(response) => self.routing.route(response),
            },
        };

        let terminal = handlers.dispatch(outcome);
        state.advance(terminal);

        info!(
            step = %self.step,
            correlation_id = correlation_id,
            state = ?state,
            "Continuation operation finished"
        );
        state
    }
}
