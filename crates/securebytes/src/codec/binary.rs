//! Compact binary adapter backed by `bincode`.

use common::SecureBytesError;
use serde::{de::DeserializeOwned, Serialize};

use super::Codec;

/// Compact, format-native encoding.
///
/// Field names are not written, so the decoding side must use exactly the
/// type shape the encoding side used. Not portable across schema changes.
///
/// Encoding accepts every `Serialize` value, but decoding is not
/// self-describing: types that need `deserialize_any` (`serde_json::Value`,
/// `#[serde(untagged)]` or `#[serde(flatten)]` shapes) and fields skipped with
/// `skip_serializing_if` encrypt fine and then fail on decrypt with
/// `Deserialization`. Use the JSON or TLV serializer for such types.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl Codec for BinaryCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, SecureBytesError> {
        bincode::serialize(value).map_err(|e| SecureBytesError::Serialization(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, SecureBytesError> {
        bincode::deserialize(bytes).map_err(|e| SecureBytesError::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_fixed_width_little_endian() {
        let bytes = BinaryCodec.encode(&(1u32, "ab")).unwrap();
        assert_eq!(bytes, [1, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, b'a', b'b']);
    }

    #[test]
    fn self_describing_types_encode_but_do_not_decode() {
        let value = serde_json::json!({ "user_id": 1, "tags": ["a"] });
        let bytes = BinaryCodec.encode(&value).unwrap();
        let err = BinaryCodec.decode::<serde_json::Value>(&bytes).unwrap_err();
        assert!(matches!(err, SecureBytesError::Deserialization(_)));
    }

    #[test]
    fn truncated_input_fails_to_decode() {
        let bytes = BinaryCodec.encode(&(7u64, String::from("message"))).unwrap();
        let err = BinaryCodec
            .decode::<(u64, String)>(&bytes[..bytes.len() - 1])
            .unwrap_err();
        assert!(matches!(err, SecureBytesError::Deserialization(_)));
    }
}
