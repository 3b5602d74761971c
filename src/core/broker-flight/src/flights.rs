//! Well-known flight names.

/// Enables the switch-browser certificate-based authentication flow.
pub const SUPPORT_SWITCH_BROWSER_CBA: &str = "support_switch_browser_cba";

/// Requires a `state` round-trip on switch-browser responses.
pub const SUPPORT_STATE_SWITCH_BROWSER_CBA: &str = "support_state_switch_browser_cba";
