//! Data-access and local-state layer for a hosted real-estate listing service.
//!
//! The crate proxies a remote collection-query backend into typed entities
//! ([`models`]), absorbs every remote failure at the repository boundary
//! ([`repository`]), republishes the property snapshot as observable state
//! ([`store`]), and persists favorites and small scalar preferences on
//! device ([`prefs`]).

mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod prefs;
pub mod remote;
pub mod repository;
pub mod store;
pub mod telemetry;

pub use models::{Agent, PropertyKind, PropertyListing, ShowingRequest};
pub use prefs::PreferenceStore;
pub use remote::{RemoteDataSource, RemoteError, RestDataSource};
pub use repository::{PropertyRepository, DEFAULT_POPULAR_LIMIT};
pub use store::PropertyStore;
