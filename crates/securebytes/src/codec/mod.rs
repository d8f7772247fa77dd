//! Serializer adapters: typed values to plaintext bytes and back.
//!
//! # Variants
//!
//! | Variant | Format | Trade-off |
//! |---|---|---|
//! | [`Serializer::Json`] | JSON text | self-describing, tolerant of added fields |
//! | [`Serializer::Binary`] | bincode | compact and fast, both ends need the same type |
//! | [`Serializer::Tlv`] | tag-length-value | typed binary, strict on decode |
//!
//! Variants are not interchangeable: bytes produced by one must be decoded by
//! the same one.
//!
//! # Module invariants
//!
//! - **No crypto dependencies.** This module never sees keys or ciphertext.

pub mod binary;
pub mod json;
pub mod tlv;

pub use binary::BinaryCodec;
pub use json::JsonCodec;
pub use tlv::TlvCodec;

use std::fmt;

use common::SecureBytesError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Encodes typed values into bytes and decodes them back.
pub trait Codec {
    /// Encode `value` into a byte sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SecureBytesError::Serialization`] if the value shape is not
    /// supported by this codec.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, SecureBytesError>;

    /// Decode `bytes` into a value of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SecureBytesError::Deserialization`] if the bytes are malformed
    /// or do not match the shape of `T`.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, SecureBytesError>;
}

/// The closed set of serializers an instance can use.
///
/// Deserialises from the lowercase variant name, so it can be read straight
/// from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Serializer {
    /// JSON via `serde_json`.
    #[default]
    Json,
    /// bincode.
    Binary,
    /// Typed tag-length-value encoding.
    Tlv,
}

impl Serializer {
    /// Lowercase name, as accepted in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Serializer::Json => "json",
            Serializer::Binary => "binary",
            Serializer::Tlv => "tlv",
        }
    }
}

impl fmt::Display for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Codec for Serializer {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, SecureBytesError> {
        match self {
            Serializer::Json => JsonCodec.encode(value),
            Serializer::Binary => BinaryCodec.encode(value),
            Serializer::Tlv => TlvCodec.encode(value),
        }
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, SecureBytesError> {
        match self {
            Serializer::Json => JsonCodec.decode(bytes),
            Serializer::Binary => BinaryCodec.decode(bytes),
            Serializer::Tlv => TlvCodec.decode(bytes),
        }
    }
}
