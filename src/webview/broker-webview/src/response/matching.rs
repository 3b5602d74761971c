//! Redirect URL matching and query extraction shared by continuation responses.

use base64::{
    engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD},
    Engine,
};
use tracing::debug;
use url::Url;

use crate::error::ContinuationError;
use crate::response::modes::BrowserModes;
use crate::response::ContinuationStep;

/// Fields common to every continuation response.
#[derive(Clone, PartialEq, Eq)]
pub struct ContinuationPayload {
    pub(crate) action_uri: String,
    pub(crate) session_token: String,
    pub(crate) state: Option<String>,
    pub(crate) browser_modes: BrowserModes,
}

impl std::fmt::Debug for ContinuationPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContinuationPayload")
            .field("action_uri", &self.action_uri)
            .field("session_token", &"[REDACTED]")
            .field("state", &self.state)
            .field("browser_modes", &self.browser_modes)
            .finish()
    }
}

/// Returns the first non-empty value of query parameter `name`.
pub(crate) fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn parse_url(url: &str) -> Result<Url, ContinuationError> {
    Url::parse(url).map_err(|e| ContinuationError::InvalidResponse(format!("unparsable url: {}", e)))
}

fn trimmed_path(url: &Url) -> &str {
    url.path().trim_end_matches('/')
}

/// Checks that `url` is `redirect_uri` followed by the step's path.
fn match_redirect(
    url: &Url,
    redirect_uri: &str,
    step: ContinuationStep,
) -> Result<(), ContinuationError> {
    let expected = Url::parse(redirect_uri).map_err(|e| {
        ContinuationError::InvalidResponse(format!("unparsable redirect uri: {}", e))
    })?;

    if !url.scheme().eq_ignore_ascii_case(expected.scheme()) {
        return Err(ContinuationError::InvalidResponse("scheme mismatch".into()));
    }

    let host = url.host_str().unwrap_or_default();
    let expected_host = expected.host_str().unwrap_or_default();
    if !host.eq_ignore_ascii_case(expected_host) {
        return Err(ContinuationError::InvalidResponse("host mismatch".into()));
    }

    let remainder = trimmed_path(url)
        .strip_prefix(trimmed_path(&expected))
        .ok_or_else(|| ContinuationError::InvalidResponse("path prefix mismatch".into()))?;

    if remainder.trim_start_matches('/') != step.path() {
        return Err(ContinuationError::InvalidResponse(format!(
            "not a {} url",
            step.path()
        )));
    }

    Ok(())
}

/// Parses and validates a continuation redirect for `step`.
///
/// Validation runs in a fixed order: redirect match (only when
/// `redirect_uri` is given), `action_uri`, `code`, then `state` (only when
/// `request_state` is given). `browser_modes` never fails.
pub(crate) fn parse_continuation(
    url: &str,
    step: ContinuationStep,
    redirect_uri: Option<&str>,
    request_state: Option<&str>,
) -> Result<ContinuationPayload, ContinuationError> {
    let parsed = parse_url(url)?;

    if let Some(redirect_uri) = redirect_uri {
        match_redirect(&parsed, redirect_uri, step)?;
    }

    let action_uri = query_param(&parsed, "action_uri")
        .ok_or_else(|| ContinuationError::ServerInvalidResponse("action_uri is nil.".into()))?;

    let session_token = query_param(&parsed, "code")
        .ok_or_else(|| ContinuationError::ServerInvalidResponse("code is nil.".into()))?;

    let state = query_param(&parsed, "state");
    if request_state.is_some() && state.is_none() {
        debug!(step = step.path(), "Continuation response rejected: state missing");
        return Err(ContinuationError::MissingState);
    }

    let browser_modes = query_param(&parsed, "browser_modes")
        .map(|value| BrowserModes::decode(&value))
        .unwrap_or_default();

    Ok(ContinuationPayload {
        action_uri,
        session_token,
        state,
        browser_modes,
    })
}

/// Returns `true` if the last path segment of `url` names `step`.
///
/// A cheap pre-check: it ignores the redirect URI and the query.
pub fn is_continuation_url(url: &str, step: ContinuationStep) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    parsed
        .path()
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .is_some_and(|segment| segment == step.path())
}

/// Verifies a state echoed by the server against the one sent.
///
/// The server may echo the state verbatim or base64 encoded without padding.
pub fn verify_state(received: Option<&str>, expected: &str) -> Result<(), ContinuationError> {
    let received = received.ok_or(ContinuationError::MissingState)?;

    let matches = received == expected
        || received == URL_SAFE_NO_PAD.encode(expected)
        || received == STANDARD_NO_PAD.encode(expected);

    if !matches {
        return Err(ContinuationError::ServerInvalidResponse(
            "state did not match".into(),
        ));
    }

    Ok(())
}
