//! Flight data providers and the query-key delegate.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::FlightError;

/// Source of flight values attached to a [`FlightManager`](crate::FlightManager).
pub trait FlightDataProvider: Send + Sync {
    /// Returns the boolean value of a flight.
    fn bool_for_key(&self, key: &str) -> bool;

    /// Returns the string value of a flight, if set.
    fn string_for_key(&self, key: &str) -> Option<String>;
}

/// Kind of identifier a query key carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKeyType {
    /// Tenant identifier.
    TenantId,
    /// Application bundle identifier.
    AppBundleId,
}

/// Produces providers for query-key scoped managers.
pub trait QueryKeyFlightDelegate: Send + Sync {
    /// Returns the provider for `query_key`, or `None` to leave the manager empty.
    fn flight_provider(
        &self,
        query_key: &str,
        key_type: QueryKeyType,
    ) -> Option<Arc<dyn FlightDataProvider>>;
}

/// Provider backed by a fixed set of values.
///
/// Loaded from JSON of the form:
///
/// ```json
/// { "bools": { "support_switch_browser_cba": true }, "strings": { "ring": "beta" } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticFlightProvider {
    /// Boolean flights.
    #[serde(default)]
    pub bools: HashMap<String, bool>,
    /// String flights.
    #[serde(default)]
    pub strings: HashMap<String, String>,
}

impl StaticFlightProvider {
    /// Parses a provider from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, FlightError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets a boolean flight.
    pub fn with_bool(mut self, key: impl Into<String>, value: bool) -> Self {
        self.bools.insert(key.into(), value);
        self
    }

    /// Sets a string flight.
    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.strings.insert(key.into(), value.into());
        self
    }
}

impl FlightDataProvider for StaticFlightProvider {
    fn bool_for_key(&self, key: &str) -> bool {
        self.bools.get(key).copied().unwrap_or(false)
    }

    fn string_for_key(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }
}
