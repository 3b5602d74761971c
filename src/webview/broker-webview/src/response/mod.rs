//! Typed responses parsed from redirect URLs.
//!
//! Continuation responses ([`BrowserSwitchResponse`],
//! [`BrowserSwitchResumeResponse`]) are server-issued mid-flow redirects that
//! ask the client to continue authentication in another browser surface.
//! They share one parsing contract, see [`ContinuationResponse`].

pub mod arena;
mod matching;
pub mod modes;
pub mod oauth;
mod resume;
mod switch_browser;

pub use arena::{ResponseArena, ResponseHandle};
pub use matching::{is_continuation_url, verify_state, ContinuationPayload};
pub use modes::BrowserModes;
pub use oauth::{AuthCodeResponse, OAuthErrorResponse};
pub use resume::BrowserSwitchResumeResponse;
pub use switch_browser::BrowserSwitchResponse;

/// A step of the switch-browser protocol, identified by its redirect path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContinuationStep {
    /// Server asks the client to move to another browser.
    SwitchBrowser,
    /// Server asks the client to resume after the move.
    SwitchBrowserResume,
}

impl ContinuationStep {
    /// Path segment appended to the redirect URI for this step.
    pub const fn path(self) -> &'static str {
        match self {
            Self::SwitchBrowser => "switch_browser",
            Self::SwitchBrowserResume => "switch_browser_resume",
        }
    }
}

impl std::fmt::Display for ContinuationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Read access to the fields every continuation response carries.
pub trait ContinuationResponse {
    /// Parsed fields.
    fn payload(&self) -> &ContinuationPayload;

    /// Protocol step this response was matched against.
    fn step(&self) -> ContinuationStep;

    /// URI the client must open next. Never empty.
    fn action_uri(&self) -> &str {
        &self.payload().action_uri
    }

    /// Opaque token forwarded as `code` to the action URI. Never empty.
    fn session_token(&self) -> &str {
        &self.payload().session_token
    }

    /// State echoed by the server, if any.
    fn state(&self) -> Option<&str> {
        self.payload().state.as_deref()
    }

    /// Presentation modes requested by the server.
    fn browser_modes(&self) -> BrowserModes {
        self.payload().browser_modes
    }

    /// Whether the next browser session should be private.
    fn use_ephemeral_session(&self) -> bool {
        self.browser_modes().private_session()
    }
}

/// Any response a callback URL can be turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebResponse {
    /// Switch to another browser.
    BrowserSwitch(BrowserSwitchResponse),
    /// Resume after switching browser.
    BrowserSwitchResume(BrowserSwitchResumeResponse),
    /// Authorization code grant completed.
    AuthorizationCode(AuthCodeResponse),
    /// Server returned an OAuth error.
    OAuthError(OAuthErrorResponse),
}

impl WebResponse {
    /// Short name of the variant, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BrowserSwitch(_) => "browser_switch",
            Self::BrowserSwitchResume(_) => "browser_switch_resume",
            Self::AuthorizationCode(_) => "authorization_code",
            Self::OAuthError(_) => "oauth_error",
        }
    }

    /// Returns the continuation view of this response, if it is one.
    pub fn as_continuation(&self) -> Option<&dyn ContinuationResponse> {
        match self {
            Self::BrowserSwitch(r) => Some(r),
            Self::BrowserSwitchResume(r) => Some(r),
            _ => None,
        }
    }
}

impl From<BrowserSwitchResponse> for WebResponse {
    fn from(response: BrowserSwitchResponse) -> Self {
        Self::BrowserSwitch(response)
    }
}

impl From<BrowserSwitchResumeResponse> for WebResponse {
    fn from(response: BrowserSwitchResumeResponse) -> Self {
        Self::BrowserSwitchResume(response)
    }
}

impl From<AuthCodeResponse> for WebResponse {
    fn from(response: AuthCodeResponse) -> Self {
        Self::AuthorizationCode(response)
    }
}

impl From<OAuthErrorResponse> for WebResponse {
    fn from(response: OAuthErrorResponse) -> Self {
        Self::OAuthError(response)
    }
}
