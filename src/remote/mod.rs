//! Boundary to the hosted backend's collection-query service.
//!
//! The backend serves named collections of JSON records behind a small query
//! surface: select-all, equality filter, inclusive range filter, insert, and
//! update-with-filter. It also advertises a realtime subscription channel,
//! which nothing in this crate uses.

mod rest;

pub use rest::RestDataSource;

use async_trait::async_trait;
use serde_json::Value;

/// Query seam over the hosted record store.
///
/// The repository only ever talks to this trait, so tests substitute
/// in-memory or failing sources without touching the network.
#[async_trait]
pub trait RemoteDataSource: Send + Sync {
    /// Every record in `collection`.
    async fn select_all(&self, collection: &str) -> Result<Vec<Value>, RemoteError>;

    /// Records where `column` equals `value`.
    async fn select_eq(
        &self,
        collection: &str,
        column: &str,
        value: &str,
    ) -> Result<Vec<Value>, RemoteError>;

    /// Records where `column` lies in `[min, max]`, both bounds inclusive.
    async fn select_range(
        &self,
        collection: &str,
        column: &str,
        min: f64,
        max: f64,
    ) -> Result<Vec<Value>, RemoteError>;

    /// Inserts a single record.
    async fn insert(&self, collection: &str, record: Value) -> Result<(), RemoteError>;

    /// Applies `patch` to every record where `column` equals `value`.
    async fn update_eq(
        &self,
        collection: &str,
        column: &str,
        value: &str,
        patch: Value,
    ) -> Result<(), RemoteError>;
}

/// Failure taxonomy for remote calls. None of these cross the repository
/// boundary; they are absorbed into documented fallback values there.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("malformed record: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no matching record")]
    NotFound,
    #[error("expected one record, backend returned {0}")]
    Ambiguous(usize),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}
