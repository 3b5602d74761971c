//! Flight configuration error types.

use thiserror::Error;

/// Errors that can occur while loading flight configuration.
#[derive(Debug, Error)]
pub enum FlightError {
    /// Flight document could not be parsed.
    #[error("invalid flight configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
