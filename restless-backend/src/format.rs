//! Serialization of cached responses into raw backend values.

use restless_core::{CachedResponse, Raw};
use thiserror::Error;

/// Serialization or deserialization failure.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to serialize cached response: {0}")]
    Serialize(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to deserialize cached response: {0}")]
    Deserialize(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Encoding of [`CachedResponse`] values stored in a backend.
pub trait Format: Send + Sync {
    fn serialize(&self, response: &CachedResponse) -> Result<Raw, FormatError>;

    fn deserialize(&self, data: &[u8]) -> Result<CachedResponse, FormatError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// JSON format, readable when inspecting a backend by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn serialize(&self, response: &CachedResponse) -> Result<Raw, FormatError> {
        serde_json::to_vec(response)
            .map(Raw::from)
            .map_err(|error| FormatError::Serialize(Box::new(error)))
    }

    fn deserialize(&self, data: &[u8]) -> Result<CachedResponse, FormatError> {
        serde_json::from_slice(data).map_err(|error| FormatError::Deserialize(Box::new(error)))
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
