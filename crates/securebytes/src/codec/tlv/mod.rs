//! Schema-typed tag-length-value encoding.
//!
//! Every value is written as
//!
//! ```text
//! tag: u8 || len: u32 BE || value[len]
//! ```
//!
//! | Tag | Meaning | Value |
//! |---|---|---|
//! | `0x01` | bool | 1 byte, `0` or `1` |
//! | `0x02` | signed integer | `i64` big-endian |
//! | `0x03` | unsigned integer | `u64` big-endian |
//! | `0x04` | float | `f64` bits big-endian |
//! | `0x05` | byte string | raw bytes |
//! | `0x06` | null | empty (unit, `None`, unit struct) |
//! | `0x07` | present option | one nested element |
//! | `0x0C` | UTF-8 string | raw bytes (also `char`) |
//! | `0x10` | sequence | nested elements (seq, tuple, struct fields in order) |
//! | `0x11` | map | nested key, value, key, value, ... |
//! | `0x12` | enum variant | unsigned index element, then payload element |
//!
//! Struct field names are not written; fields are positional, like an ASN.1
//! SEQUENCE. Decoding is strict: leftover bytes inside a container or after the
//! top-level value are rejected, as are unknown tags and out-of-range integers.
//! Containers may nest at most [`MAX_DEPTH`] levels deep.

mod de;
mod ser;

pub use de::TlvDeserializer;
pub use ser::TlvSerializer;

use common::SecureBytesError;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::Codec;

pub(crate) const TAG_BOOL: u8 = 0x01;
pub(crate) const TAG_INT: u8 = 0x02;
pub(crate) const TAG_UINT: u8 = 0x03;
pub(crate) const TAG_FLOAT: u8 = 0x04;
pub(crate) const TAG_BYTES: u8 = 0x05;
pub(crate) const TAG_NULL: u8 = 0x06;
pub(crate) const TAG_SOME: u8 = 0x07;
pub(crate) const TAG_UTF8: u8 = 0x0C;
pub(crate) const TAG_SEQ: u8 = 0x10;
pub(crate) const TAG_MAP: u8 = 0x11;
pub(crate) const TAG_VARIANT: u8 = 0x12;

/// Tag byte plus 4-byte length.
pub(crate) const HEADER_LEN: usize = 1 + 4;

/// Deepest container nesting accepted on decode. Same limit as `serde_json`.
pub const MAX_DEPTH: u8 = 128;

/// Errors produced while encoding or decoding TLV data.
#[derive(Debug, Error)]
pub enum TlvError {
    /// Error raised by a `Serialize` or `Deserialize` implementation.
    #[error("{0}")]
    Message(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unknown tag 0x{0:02x}")]
    UnknownTag(u8),

    #[error("expected {expected}, found tag 0x{found:02x}")]
    UnexpectedTag { expected: &'static str, found: u8 },

    #[error("invalid {what}: {len}-byte value")]
    InvalidLength { what: &'static str, len: usize },

    #[error("invalid bool byte 0x{0:02x}")]
    InvalidBool(u8),

    #[error("invalid UTF-8 in string")]
    InvalidUtf8,

    #[error("{0} trailing bytes")]
    TrailingBytes(usize),

    #[error("{0} is not supported")]
    Unsupported(&'static str),

    #[error("element of {0} bytes exceeds the u32 length field")]
    TooLarge(usize),

    #[error("containers nested deeper than {MAX_DEPTH} levels")]
    RecursionLimit,
}

impl serde::ser::Error for TlvError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        TlvError::Message(msg.to_string())
    }
}

impl serde::de::Error for TlvError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        TlvError::Message(msg.to_string())
    }
}

/// Encode `value` as TLV bytes.
///
/// # Errors
///
/// Returns [`TlvError`] for 128-bit integers, elements longer than `u32::MAX`,
/// or errors raised by the value's `Serialize` implementation.
pub fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, TlvError> {
    let mut serializer = TlvSerializer::new();
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Decode TLV bytes into a `T`, rejecting any trailing data.
///
/// # Errors
///
/// Returns [`TlvError`] if the bytes are malformed or do not match `T`.
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, TlvError> {
    let mut deserializer = TlvDeserializer::new(bytes);
    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

/// Typed binary encoding with explicit tags and lengths.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlvCodec;

impl Codec for TlvCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, SecureBytesError> {
        to_vec(value).map_err(|e| SecureBytesError::Serialization(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, SecureBytesError> {
        from_slice(bytes).map_err(|e| SecureBytesError::Deserialization(e.to_string()))
    }
}
