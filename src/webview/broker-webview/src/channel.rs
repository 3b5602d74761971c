//! Ports to the collaborators an operation drives.

use async_trait::async_trait;

use crate::context::{PresentationContext, RequestContext};
use crate::error::{BoxError, ContinuationError};
use crate::response::WebResponse;

/// Browser surface that performs certificate-based authentication.
///
/// An operation calls [`start`](Self::start) once and
/// [`reset_state`](Self::reset_state) once after `start` resolves, whatever
/// the outcome. Implementations may resolve `start` from any thread.
#[async_trait]
pub trait CertificateAuthChannel: Send + Sync {
    /// Opens `start_url` and resolves with the callback URL the browser
    /// session ended on.
    async fn start(
        &self,
        start_url: &str,
        presentation: &PresentationContext,
        context: &RequestContext,
    ) -> Result<String, BoxError>;

    /// Completes a pending session with a callback URL delivered to the app.
    ///
    /// Returns `false` if no session is waiting or the URL is not for it.
    fn complete_with_callback_url(&self, url: &str) -> bool;

    /// Registers the redirect URI prefix that ends the session for `scheme`.
    fn set_redirect_uri_prefix(&self, prefix: &str, scheme: &str);

    /// Clears any per-session state.
    fn reset_state(&self);
}

/// Builds typed responses for the protocol flavour in use.
///
/// A [`WebResponseParser`] supplies what it knows about the request, the
/// factory decides which response the URL carries.
pub trait ResponseFactory: Send + Sync {
    /// Builds the response carried by `url`.
    ///
    /// # Errors
    ///
    /// [`ContinuationError::InvalidResponse`] if no response matches `url`,
    /// any other variant if a matching response is malformed.
    fn response_from_url(
        &self,
        url: &str,
        redirect_uri: &str,
        request_state: Option<&str>,
        context: &RequestContext,
    ) -> Result<WebResponse, ContinuationError>;
}

/// Turns a callback URL into a typed web response.
pub trait WebResponseParser: Send + Sync {
    /// Parses `result_url` with the help of `factory`.
    ///
    /// # Errors
    ///
    /// Any error is terminal for the operation that asked.
    fn response(
        &self,
        result_url: &str,
        factory: &dyn ResponseFactory,
        context: &RequestContext,
    ) -> Result<WebResponse, BoxError>;
}

/// Decides how the browser handles a navigation before it happens.
///
/// Returns a URL to open instead of `url`, or `None` to open `url` as is.
pub trait BrowserActionPolicy: Send + Sync {
    /// Decides the navigation to `url`.
    fn decide(&self, url: &str) -> Option<String>;
}

impl<F> BrowserActionPolicy for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn decide(&self, url: &str) -> Option<String> {
        self(url)
    }
}
