//! AES-192-GCM encryption and decryption of byte payloads.
//!
//! **Algorithm choice:** AES-GCM with a 24-byte key from [`crate::kdf`], a
//! 96-bit random nonce per call and a 128-bit tag. GCM provides both
//! confidentiality and integrity, so no separate signature is computed.
//!
//! **Never reuse a nonce under the same key.** Nonce reuse in GCM breaks both
//! confidentiality and authentication. Every seal draws a fresh nonce from the
//! supplied [`NonceSource`] and ships it in front of the ciphertext.

use aes_gcm::{
    aead::{consts::U12, Aead, KeyInit, Payload},
    aes::Aes192,
    AesGcm, Nonce,
};
use common::{EncryptedBlob, SecureBytesError, NONCE_LEN};
use tracing::trace;

use super::nonce::NonceSource;
use crate::kdf::KEY_LEN;

/// AES-192 in Galois/Counter Mode with the standard 12-byte nonce.
pub type Aes192Gcm = AesGcm<Aes192, U12>;

/// Encrypt `plaintext` and return `nonce || ciphertext || tag`.
///
/// `binding_tag` is authenticated as associated data but not encrypted.
///
/// # Errors
///
/// Returns [`SecureBytesError::CipherInit`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`SecureBytesError::RandomSource`] if `nonces` cannot produce a nonce.
/// Returns [`SecureBytesError::Serialization`] if the plaintext exceeds the GCM
/// message limit.
pub fn seal(
    key: &[u8],
    binding_tag: &[u8],
    nonces: &dyn NonceSource,
    plaintext: &[u8],
) -> Result<Vec<u8>, SecureBytesError> {
    let cipher = build_cipher(key)?;

    let mut nonce = [0u8; NONCE_LEN];
    nonces.fill_nonce(&mut nonce)?;

    let payload = Payload {
        msg: plaintext,
        aad: binding_tag,
    };
    let sealed = cipher
        .encrypt(Nonce::<U12>::from_slice(&nonce), payload)
        .map_err(|_| {
            SecureBytesError::Serialization("plaintext exceeds the AES-GCM message limit".into())
        })?;

    let blob = EncryptedBlob { nonce, sealed }.to_bytes();
    trace!(plaintext_len = plaintext.len(), blob_len = blob.len(), "sealed");
    Ok(blob)
}

/// Verify and decrypt a blob produced by [`seal`].
///
/// # Errors
///
/// Returns [`SecureBytesError::CipherInit`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`SecureBytesError::MalformedInput`] if `blob` is shorter than the nonce.
/// Returns [`SecureBytesError::Authentication`] if the tag does not verify
/// (wrong key, wrong binding tag, tampered or truncated data).
pub fn open(key: &[u8], binding_tag: &[u8], blob: &[u8]) -> Result<Vec<u8>, SecureBytesError> {
    let cipher = build_cipher(key)?;
    let parsed = EncryptedBlob::from_bytes(blob)?;

    let payload = Payload {
        msg: parsed.sealed.as_slice(),
        aad: binding_tag,
    };
    let plaintext = cipher
        .decrypt(Nonce::<U12>::from_slice(&parsed.nonce), payload)
        .map_err(|_| SecureBytesError::Authentication)?;

    trace!(blob_len = blob.len(), plaintext_len = plaintext.len(), "opened");
    Ok(plaintext)
}

fn build_cipher(key: &[u8]) -> Result<Aes192Gcm, SecureBytesError> {
    let invalid = || SecureBytesError::CipherInit {
        expected: KEY_LEN,
        actual: key.len(),
    };
    if key.len() != KEY_LEN {
        return Err(invalid());
    }
    Aes192Gcm::new_from_slice(key).map_err(|_| invalid())
}
