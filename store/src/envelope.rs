use crate::error::StoreError;
use serde::{de::DeserializeOwned, Serialize};

/// Wraps a stored record together with the exact secondary-index keys it
/// registered, so an overwrite or deletion can remove precisely those index
/// entries without a reverse scan.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Envelope<R> {
    pub record: R,
    pub index_keys: Vec<Vec<u8>>,
}

pub fn encode<R: Serialize>(envelope: &Envelope<R>) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(envelope).map_err(StoreError::from)
}

pub fn decode<R: DeserializeOwned>(bytes: &[u8]) -> Result<Envelope<R>, StoreError> {
    bincode::deserialize(bytes).map_err(StoreError::from)
}
