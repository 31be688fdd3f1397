/// 编解码器实现
///
/// The engine never serializes on its own; it exposes plain structured
/// state (`Order`, `BookSnapshot`) and lets a pluggable codec turn it into
/// bytes. Codec failures propagate to the caller and never touch book
/// state. `JsonCodec` mirrors the legacy engine's JSON serializer;
/// `BincodeCodec` is the compact binary path.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// 编解码错误
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("encode failed: {0}")]
    Encode(String),

    #[error("decode failed: {0}")]
    Decode(String),
}

/// Pluggable wire encoding for orders and book snapshots.
pub trait Codec: Send + Sync {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// JSON codec, the default collaborator.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// Bincode codec using the standard configuration via serde support.
#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        bincode::serde::encode_to_vec(value, bincode::config::standard())
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map(|(value, _read)| value)
            .map_err(|e| CodecError::Decode(e.to_string()))
    }
}
