//! # Broker Webview
//!
//! Switch-browser continuation protocol for certificate-based authentication.
//!
//! The server may interrupt an interactive flow with a redirect to
//! `<redirect_uri>/switch_browser`, asking the client to continue in a
//! different browser surface. This crate parses such redirects into typed
//! responses and runs the operations that hand them to a
//! [`CertificateAuthChannel`].
//!
//! ## Flow
//!
//! 1. [`UrlResponseParser`] hands the redirect to a [`ResponseFactory`], by
//!    default [`ContinuationResponseFactory`], which builds a [`WebResponse`].
//! 2. [`BrowserSwitchOperation`] opens `action_uri?code=<token>` in the
//!    channel and parses the callback.
//! 3. A [`BrowserSwitchResumeResponse`] is linked to its initiating response
//!    through a [`ResponseArena`], then [`BrowserSwitchResumeOperation`]
//!    finishes the flow with an authorization code.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod channel;
pub mod config;
pub mod context;
pub mod error;
pub mod factory;
pub mod operation;
pub mod parser;
pub mod response;

pub use channel::{
    BrowserActionPolicy, CertificateAuthChannel, ResponseFactory, WebResponseParser,
};
pub use config::ContinuationConfig;
pub use context::{InteractiveParameters, PresentationContext, RequestContext};
pub use error::{BoxError, ContinuationError};
pub use factory::ContinuationResponseFactory;
pub use operation::{
    compose_start_url, AuthorizationCodeResult, BrowserSwitchOperation,
    BrowserSwitchResumeOperation, CompletionHandlers, OperationOutcome, OperationState,
};
pub use parser::UrlResponseParser;
pub use response::{
    is_continuation_url, verify_state, AuthCodeResponse, BrowserModes, BrowserSwitchResponse,
    BrowserSwitchResumeResponse, ContinuationResponse, ContinuationStep, OAuthErrorResponse,
    ResponseArena, ResponseHandle, WebResponse,
};
