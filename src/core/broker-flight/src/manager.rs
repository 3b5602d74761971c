//! Flight manager: a swappable provider behind a readers-writer lock.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::provider::FlightDataProvider;

/// Answers flight lookups from the currently attached provider.
///
/// The provider reference is swapped under an exclusive lock and read under
/// a shared lock, so readers never observe a partial update. Lookups clone
/// the `Arc` and release the lock before calling into the provider.
#[derive(Default)]
pub struct FlightManager {
    provider: RwLock<Option<Arc<dyn FlightDataProvider>>>,
}

impl FlightManager {
    /// Creates a manager with no provider attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager with an optional initial provider.
    pub fn with_provider(provider: Option<Arc<dyn FlightDataProvider>>) -> Self {
        Self {
            provider: RwLock::new(provider),
        }
    }

    /// Attaches (or with `None`, detaches) the provider.
    pub fn set_provider(&self, provider: Option<Arc<dyn FlightDataProvider>>) {
        *self.provider.write() = provider;
    }

    /// Returns the attached provider.
    pub fn provider(&self) -> Option<Arc<dyn FlightDataProvider>> {
        self.provider.read().clone()
    }

    /// Returns the boolean flight, or `false` without a provider.
    pub fn bool_for_key(&self, key: &str) -> bool {
        match self.provider() {
            Some(provider) => provider.bool_for_key(key),
            None => false,
        }
    }

    /// Returns the string flight, or `None` without a provider.
    pub fn string_for_key(&self, key: &str) -> Option<String> {
        self.provider()?.string_for_key(key)
    }
}

impl std::fmt::Debug for FlightManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightManager")
            .field("has_provider", &self.provider.read().is_some())
            .finish()
    }
}
