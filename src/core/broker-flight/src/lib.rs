//! # Broker Flight
//!
//! Feature flights consulted by the protocol layer to decide which code
//! paths run (for example which certificate-based authentication variant).
//!
//! A [`FlightRegistry`] owns a lazily created default [`FlightManager`] and a
//! cache of per-query-key managers. Each manager forwards lookups to an
//! attached [`FlightDataProvider`] and answers `false` / `None` while none is
//! attached.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod flights;
pub mod manager;
pub mod provider;
pub mod registry;

pub use error::FlightError;
pub use manager::FlightManager;
pub use provider::{FlightDataProvider, QueryKeyFlightDelegate, QueryKeyType, StaticFlightProvider};
pub use registry::FlightRegistry;
