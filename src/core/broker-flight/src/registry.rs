//! Registry of flight managers: one default plus one per query key.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::debug;

use crate::manager::FlightManager;
use crate::provider::{QueryKeyFlightDelegate, QueryKeyType};

/// Owns the default flight manager and the per-query-key cache.
///
/// Meant to be created once by the application and shared by `Arc`.
/// Managers are created on first lookup and live as long as the registry.
///
/// The cache is keyed by the query key alone. Looking up the same key with a
/// different [`QueryKeyType`] returns the manager created by the first lookup.
#[derive(Default)]
pub struct FlightRegistry {
    default: OnceCell<Arc<FlightManager>>,
    instances: RwLock<HashMap<String, Arc<FlightManager>>>,
    delegate: RwLock<Option<Arc<dyn QueryKeyFlightDelegate>>>,
}

impl FlightRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the default manager, creating it on first use.
    pub fn shared_instance(&self) -> Arc<FlightManager> {
        self.default
            .get_or_init(|| Arc::new(FlightManager::new()))
            .clone()
    }

    /// Installs the delegate consulted when a new query key is seen.
    pub fn set_query_key_delegate(&self, delegate: Option<Arc<dyn QueryKeyFlightDelegate>>) {
        *self.delegate.write() = delegate;
    }

    /// Returns the manager for `query_key`.
    ///
    /// Blank or whitespace-only keys resolve to [`shared_instance`](Self::shared_instance).
    /// On a cache miss the delegate is asked for a provider; on a hit the
    /// cached manager is returned without consulting it.
    ///
    /// Racing first lookups of one key may each consult the delegate, but
    /// only the first manager inserted is ever returned.
    pub fn shared_instance_by_query_key(
        &self,
        query_key: &str,
        key_type: QueryKeyType,
    ) -> Arc<FlightManager> {
        if query_key.trim().is_empty() {
            return self.shared_instance();
        }

        if let Some(existing) = self.instances.read().get(query_key) {
            return existing.clone();
        }

        let delegate = self.delegate.read().clone();
        let provider = delegate.and_then(|d| d.flight_provider(query_key, key_type));
        let has_provider = provider.is_some();

        let mut instances = self.instances.write();
        instances
            .entry(query_key.to_string())
            .or_insert_with(|| {
                debug!(
                    query_key = query_key,
                    key_type = ?key_type,
                    has_provider = has_provider,
                    "Flight manager created"
                );
                Arc::new(FlightManager::with_provider(provider))
            })
            .clone()
    }

    /// Number of cached query-key managers.
    pub fn cached_instances(&self) -> usize {
        self.instances.read().len()
    }
}

impl std::fmt::Debug for FlightRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightRegistry")
            .field("cached_instances", &self.cached_instances())
            .finish()
    }
}
