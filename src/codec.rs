//! Wire-record codec between backend rows and in-memory entities.
//!
//! The backend has no partial-batch success: one malformed record fails the
//! whole call, and the repository turns that into its empty/absent fallback.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::remote::RemoteError;

pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, RemoteError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(RemoteError::from))
        .collect()
}

/// Decodes a fetch that must resolve to exactly one record. Zero rows is
/// `NotFound`; several rows for a supposedly unique key is `Ambiguous`.
pub(crate) fn decode_single<T: DeserializeOwned>(rows: Vec<Value>) -> Result<T, RemoteError> {
    let mut decoded = decode_rows::<T>(rows)?;
    match decoded.len() {
        1 => Ok(decoded.remove(0)),
        0 => Err(RemoteError::NotFound),
        n => Err(RemoteError::Ambiguous(n)),
    }
}

pub(crate) fn encode<T: Serialize>(entity: &T) -> Result<Value, RemoteError> {
    serde_json::to_value(entity).map_err(RemoteError::from)
}
