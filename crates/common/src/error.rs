//! Common error types shared across crates.

use thiserror::Error;

use crate::protocol::NONCE_LEN;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, SecureBytesError>;

/// Every failure the encryption core can report.
///
/// Variants map to stable machine-readable codes via [`SecureBytesError::code`]:
/// - [`SecureBytesError::CipherInit`] → `cipher_init`
/// - [`SecureBytesError::RandomSource`] → `random_source`
/// - [`SecureBytesError::MalformedInput`] → `malformed_input`
/// - [`SecureBytesError::Authentication`] → `authentication`
/// - [`SecureBytesError::Serialization`] → `serialization`
/// - [`SecureBytesError::Deserialization`] → `deserialization`
/// - [`SecureBytesError::Encoding`] → `encoding`
#[derive(Debug, Error)]
pub enum SecureBytesError {
    /// The key handed to the block cipher has the wrong length.
    #[error("cipher initialisation failed: expected {expected}-byte key, got {actual}")]
    CipherInit { expected: usize, actual: usize },

    /// The secure random source could not produce a nonce.
    #[error("secure random source unavailable: {0}")]
    RandomSource(String),

    /// The blob is too short to even hold a nonce.
    #[error("malformed input: {0} bytes is shorter than the {NONCE_LEN}-byte nonce")]
    MalformedInput(usize),

    /// Tag verification failed. Wrong key, corruption and truncation are
    /// reported identically.
    #[error("authentication failed")]
    Authentication,

    /// The value cannot be represented by the selected serializer.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The plaintext does not decode into the requested shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The text is not valid padded standard base64.
    #[error("invalid base64 text: {0}")]
    Encoding(String),
}

impl SecureBytesError {
    /// Returns the short code that identifies this error class.
    pub fn code(&self) -> &'static str {
        match self {
            SecureBytesError::CipherInit { .. } => "cipher_init",
            SecureBytesError::RandomSource(_) => "random_source",
            SecureBytesError::MalformedInput(_) => "malformed_input",
            SecureBytesError::Authentication => "authentication",
            SecureBytesError::Serialization(_) => "serialization",
            SecureBytesError::Deserialization(_) => "deserialization",
            SecureBytesError::Encoding(_) => "encoding",
        }
    }
}
