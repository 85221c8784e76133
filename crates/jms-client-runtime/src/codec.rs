//! Persisted form of destination values.
//!
//! The encoding is JSON with a fixed field order (`kind`, `name`,
//! `temporary`). The deleted flag is connection-local state and is never
//! written, so a decoded destination always starts out not deleted.

use crate::destination::Destination;
use crate::error::SerializationError;

/// Encode a destination to bytes
pub fn encode_destination(destination: &Destination) -> Result<Vec<u8>, SerializationError> {
    Ok(serde_json::to_vec(destination)?)
}

/// Decode a destination previously produced by [`encode_destination`]
pub fn decode_destination(bytes: &[u8]) -> Result<Destination, SerializationError> {
    if bytes.is_empty() {
        return Err(SerializationError::Empty);
    }

    Ok(serde_json::from_slice(bytes)?)
}
