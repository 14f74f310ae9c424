//! Value codecs
//!
//! Cached payloads are stored as bytes. The codec decides how a typed value
//! becomes those bytes.

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};

/// Encodes typed values into the opaque payload stored by a backend
pub trait ValueCodec: Send + Sync + Clone + 'static {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CacheError>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CacheError>;
}

/// JSON codec (default)
///
/// Payloads stay readable with `redis-cli GET` or a memcached telnet session,
/// which helps when debugging a shared store.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ValueCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CacheError> {
        serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CacheError> {
        serde_json::from_slice(bytes).map_err(|e| CacheError::Deserialization(e.to_string()))
    }
}

/// MessagePack codec, enabled with the `msgpack` feature
#[cfg(feature = "msgpack")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackCodec;

#[cfg(feature = "msgpack")]
impl ValueCodec for MsgPackCodec {
    fn name(&self) -> &'static str {
        "msgpack"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CacheError> {
        rmp_serde::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CacheError> {
        rmp_serde::from_slice(bytes).map_err(|e| CacheError::Deserialization(e.to_string()))
    }
}

/// Bincode codec, enabled with the `bincode` feature
///
/// Smallest payloads; only readable by Rust processes using the same config.
#[cfg(feature = "bincode")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

#[cfg(feature = "bincode")]
impl ValueCodec for BincodeCodec {
    fn name(&self) -> &'static str {
        "bincode"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CacheError> {
        bincode::serde::encode_to_vec(value, bincode::config::standard())
            .map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CacheError> {
        let (val, _len) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map_err(|e| CacheError::Deserialization(e.to_string()))?;
        Ok(val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_json_payload_is_plain_json() {
        let mut option = BTreeMap::new();
        option.insert("siteurl", "https://example.org");

        let bytes = JsonCodec.encode(&option).unwrap();
        assert_eq!(bytes, br#"{"siteurl":"https://example.org"}"#.to_vec());

        let decoded: BTreeMap<String, String> = JsonCodec.decode(&bytes).unwrap();
        assert_eq!(decoded["siteurl"], "https://example.org");
    }

    #[test]
    fn test_json_decode_type_mismatch() {
        let bytes = JsonCodec.encode("not a number").unwrap();
        let err = JsonCodec.decode::<u64>(&bytes).unwrap_err();
        assert!(matches!(err, CacheError::Deserialization(_)));
    }

    #[cfg(feature = "msgpack")]
    #[test]
    fn test_msgpack_is_smaller_than_json() {
        let value: Vec<u32> = (0..64).collect();
        let packed = MsgPackCodec.encode(&value).unwrap();
        let json = JsonCodec.encode(&value).unwrap();
        assert!(packed.len() < json.len());
        let back: Vec<u32> = MsgPackCodec.decode(&packed).unwrap();
        assert_eq!(back, value);
    }
}
