//! Ciphertext blob wire format.
//!
//! ```text
//! [ nonce: 12 bytes ][ sealed payload: plaintext_len + 16 bytes ]
//! ```
//!
//! There is no version byte and no length prefix. The nonce length is a
//! compile-time constant shared by both ends and the sealed length is whatever
//! remains after the nonce.
//!
//! The text form is the whole blob in standard base64 with `=` padding.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::SecureBytesError;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// A parsed ciphertext blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw ciphertext + authentication tag bytes.
    pub sealed: Vec<u8>,
}

impl EncryptedBlob {
    /// Split a blob into nonce and sealed payload.
    ///
    /// Only the nonce length is checked here. A sealed payload shorter than
    /// [`TAG_LEN`] is left for the AEAD layer to reject as an authentication
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns [`SecureBytesError::MalformedInput`] if `data` is shorter than
    /// [`NONCE_LEN`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, SecureBytesError> {
        if data.len() < NONCE_LEN {
            return Err(SecureBytesError::MalformedInput(data.len()));
        }
        let (nonce_bytes, sealed) = data.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);
        Ok(Self {
            nonce,
            sealed: sealed.to_vec(),
        })
    }

    /// Concatenate nonce and sealed payload into the wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_LEN + self.sealed.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.sealed);
        out
    }

    /// Encode the wire form as padded standard base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Parse a padded standard base64 string back into an [`EncryptedBlob`].
    ///
    /// # Errors
    ///
    /// Returns [`SecureBytesError::Encoding`] if the text is not valid base64,
    /// then [`SecureBytesError::MalformedInput`] if the decoded bytes are too
    /// short.
    pub fn from_base64(text: &str) -> Result<Self, SecureBytesError> {
        let data = decode_base64(text)?;
        Self::from_bytes(&data)
    }
}

/// Encode arbitrary bytes as padded standard base64.
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode padded standard base64 text.
///
/// # Errors
///
/// Returns [`SecureBytesError::Encoding`] on any invalid character, bad
/// padding or truncated quantum.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, SecureBytesError> {
    STANDARD
        .decode(text)
        .map_err(|e| SecureBytesError::Encoding(e.to_string()))
}
