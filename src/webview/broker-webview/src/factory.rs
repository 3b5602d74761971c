//! Default [`ResponseFactory`] for the switch-browser protocol.

use std::sync::Arc;

use broker_flight::flights::{SUPPORT_STATE_SWITCH_BROWSER_CBA, SUPPORT_SWITCH_BROWSER_CBA};
use broker_flight::FlightManager;
use tracing::debug;

use crate::channel::ResponseFactory;
use crate::context::RequestContext;
use crate::error::ContinuationError;
use crate::response::{
    AuthCodeResponse, BrowserSwitchResponse, BrowserSwitchResumeResponse, OAuthErrorResponse,
    WebResponse,
};

/// Builds [`WebResponse`]s from redirect URLs.
///
/// Matchers run in order: switch-browser, switch-browser-resume, OAuth
/// error, authorization code. A matcher that reports
/// [`ContinuationError::InvalidResponse`] passes the URL on to the next;
/// any other error stops matching.
///
/// The continuation matchers only run while [`SUPPORT_SWITCH_BROWSER_CBA`]
/// is on, and the request state is only enforced while
/// [`SUPPORT_STATE_SWITCH_BROWSER_CBA`] is on.
pub struct ContinuationResponseFactory {
    flights: Arc<FlightManager>,
}

impl ContinuationResponseFactory {
    /// Creates a factory gated by `flights`.
    pub fn new(flights: Arc<FlightManager>) -> Self {
        Self { flights }
    }

    /// Flights consulted on every call.
    pub fn flights(&self) -> &Arc<FlightManager> {
        &self.flights
    }

    fn enforced_state<'a>(&self, request_state: Option<&'a str>) -> Option<&'a str> {
        if self.flights.bool_for_key(SUPPORT_STATE_SWITCH_BROWSER_CBA) {
            request_state
        } else {
            None
        }
    }
}

impl ResponseFactory for ContinuationResponseFactory {
    fn response_from_url(
        &self,
        url: &str,
        redirect_uri: &str,
        request_state: Option<&str>,
        context: &RequestContext,
    ) -> Result<WebResponse, ContinuationError> {
        if self.flights.bool_for_key(SUPPORT_SWITCH_BROWSER_CBA) {
            let request_state = self.enforced_state(request_state);

            match BrowserSwitchResponse::from_url(url, Some(redirect_uri), request_state) {
                Ok(response) => return Ok(response.into()),
                Err(e) if e.is_recoverable() => {}
                Err(e) => return Err(e),
            }

            match BrowserSwitchResumeResponse::from_url(url, Some(redirect_uri), request_state) {
                Ok(response) => return Ok(response.into()),
                Err(e) if e.is_recoverable() => {}
                Err(e) => return Err(e),
            }
        }

        if let Ok(response) = OAuthErrorResponse::from_url(url) {
            return Ok(response.into());
        }

        match AuthCodeResponse::from_url(url) {
            Ok(response) => Ok(response.into()),
            Err(e) => {
                debug!(
                    correlation_id = %context.correlation_id,
                    "No response matcher accepted the url"
                );
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for ContinuationResponseFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContinuationResponseFactory").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::response::ContinuationResponse;
    use broker_flight::{FlightDataProvider, StaticFlightProvider};

    const REDIRECT: &str = "msauth.com.contoso.app://auth";

    fn factory(switch_browser: bool, state: bool) -> ContinuationResponseFactory {
        let provider: Arc<dyn FlightDataProvider> = Arc::new(
            StaticFlightProvider::default()
                .with_bool(SUPPORT_SWITCH_BROWSER_CBA, switch_browser)
                .with_bool(SUPPORT_STATE_SWITCH_BROWSER_CBA, state),
        );
        ContinuationResponseFactory::new(Arc::new(FlightManager::with_provider(Some(provider))))
    }

    fn build(
        factory: &ContinuationResponseFactory,
        url: &str,
    ) -> Result<WebResponse, ContinuationError> {
        factory.response_from_url(url, REDIRECT, Some("state"), &RequestContext::new("corr"))
    }

    #[test]
    fn test_switch_browser() {
        let response = build(
            &factory(true, false),
            "msauth.com.contoso.app://auth/switch_browser?action_uri=a&code=c",
        )
        .unwrap();

        assert!(matches!(response, WebResponse::BrowserSwitch(_)));
    }

    #[test]
    fn test_switch_browser_resume() {
        let response = build(
            &factory(true, false),
            "msauth.com.contoso.app://auth/switch_browser_resume?action_uri=a&code=c",
        )
        .unwrap();

        match response {
            WebResponse::BrowserSwitchResume(resume) => assert_eq!(resume.action_uri(), "a"),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_flight_off_falls_back_to_auth_code() {
        let response = build(
            &factory(false, false),
            "msauth.com.contoso.app://auth/switch_browser?action_uri=a&code=c",
        )
        .unwrap();

        assert!(matches!(response, WebResponse::AuthorizationCode(_)));
    }

    #[test]
    fn test_state_enforced_only_with_flight() {
        let url = "msauth.com.contoso.app://auth/switch_browser?action_uri=a&code=c";

        assert!(build(&factory(true, false), url).is_ok());
        assert!(matches!(
            build(&factory(true, true), url),
            Err(ContinuationError::MissingState)
        ));
    }

    #[test]
    fn test_server_invalid_response_stops_matching() {
        let result = build(
            &factory(true, false),
            "msauth.com.contoso.app://auth/switch_browser?code=c",
        );

        assert!(matches!(
            result,
            Err(ContinuationError::ServerInvalidResponse(_))
        ));
    }

    #[test]
    fn test_other_redirect_uri_not_a_continuation() {
        let response = build(
            &factory(true, false),
            "msauth.com.fabrikam.app://auth/switch_browser?action_uri=a&code=c",
        )
        .unwrap();

        assert!(matches!(response, WebResponse::AuthorizationCode(_)));
    }

    #[test]
    fn test_oauth_error() {
        let response = build(
            &factory(true, false),
            "msauth.com.contoso.app://auth?error=access_denied",
        )
        .unwrap();

        match response {
            WebResponse::OAuthError(error) => assert_eq!(error.error(), "access_denied"),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_auth_code() {
        let response =
            build(&factory(true, false), "msauth.com.contoso.app://auth?code=abc").unwrap();

        match response {
            WebResponse::AuthorizationCode(code) => assert_eq!(code.code(), "abc"),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_url() {
        let result = build(&factory(true, false), "msauth.com.contoso.app://auth?foo=bar");
        assert!(matches!(result, Err(ContinuationError::InvalidResponse(_))));
    }
}
