//! [`SecureBytes`]: a derived key plus a serializer, exposing value and raw
//! encryption in byte and base64 forms.

use std::sync::Arc;

use common::protocol::{decode_base64, encode_base64};
use common::SecureBytesError;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::codec::{Codec, Serializer};
use crate::config::Settings;
use crate::crypto::{self, NonceSource, OsNonceSource};
use crate::kdf::{self, DerivedKey, RECOMMENDED_MIN_KEY_LEN};

/// Encrypts and decrypts values under one derived key.
///
/// The key material is read-only after construction, so a shared reference can
/// be used from many threads at once. The serializer is the only mutable part
/// and can only be swapped through `&mut self`.
#[derive(Clone)]
pub struct SecureBytes {
    key: DerivedKey,
    serializer: Serializer,
    nonces: Arc<dyn NonceSource>,
}

impl SecureBytes {
    /// Derive key material from `raw_key` and use the JSON serializer.
    ///
    /// Never fails. `raw_key` should carry 256 bits of entropy: at least 50
    /// random alphanumeric characters. An empty key is accepted but produces a
    /// publicly computable key.
    pub fn new(raw_key: impl AsRef<[u8]>) -> Self {
        let raw_key = raw_key.as_ref();
        if raw_key.is_empty() {
            warn!("empty key: derived key material is publicly computable");
        } else if raw_key.len() < RECOMMENDED_MIN_KEY_LEN {
            warn!(
                key_len = raw_key.len(),
                recommended = RECOMMENDED_MIN_KEY_LEN,
                "key shorter than recommended"
            );
        }

        let serializer = Serializer::default();
        debug!(%serializer, key_len = raw_key.len(), "securebytes instance created");
        Self {
            key: kdf::derive(raw_key),
            serializer,
            nonces: Arc::new(OsNonceSource),
        }
    }

    /// Build an instance from loaded [`Settings`].
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.key.as_bytes()).with_serializer(settings.serializer)
    }

    /// Replace the serializer, builder style.
    pub fn with_serializer(mut self, serializer: Serializer) -> Self {
        self.set_serializer(serializer);
        self
    }

    /// Replace the entropy source used for nonces.
    pub fn with_nonce_source(mut self, nonces: Arc<dyn NonceSource>) -> Self {
        self.nonces = nonces;
        self
    }

    /// The serializer currently applied to values.
    pub fn serializer(&self) -> Serializer {
        self.serializer
    }

    /// Swap the serializer. Blobs written with the previous serializer can
    /// still be opened with [`raw_decrypt`](Self::raw_decrypt), but decoding
    /// them needs the serializer that wrote them.
    pub fn set_serializer(&mut self, serializer: Serializer) {
        if serializer != self.serializer {
            debug!(from = %self.serializer, to = %serializer, "serializer swapped");
        }
        self.serializer = serializer;
    }

    /// Serialize `value` and seal it.
    ///
    /// # Errors
    ///
    /// Returns [`SecureBytesError::Serialization`] if the serializer rejects
    /// the value, or [`SecureBytesError::RandomSource`] if no nonce can be drawn.
    pub fn encrypt<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, SecureBytesError> {
        let plaintext = self.serializer.encode(value)?;
        self.raw_encrypt(&plaintext)
    }

    /// Seal bytes without serialization.
    ///
    /// # Errors
    ///
    /// Returns [`SecureBytesError::RandomSource`] if no nonce can be drawn.
    pub fn raw_encrypt(&self, data: &[u8]) -> Result<Vec<u8>, SecureBytesError> {
        crypto::seal(
            self.key.encryption_key(),
            self.key.binding_tag(),
            self.nonces.as_ref(),
            data,
        )
    }

    /// Open a blob produced by [`encrypt`](Self::encrypt) and decode it as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SecureBytesError::MalformedInput`] for blobs shorter than the
    /// nonce, [`SecureBytesError::Authentication`] if verification fails, and
    /// [`SecureBytesError::Deserialization`] if the plaintext is not a `T`.
    pub fn decrypt<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, SecureBytesError> {
        let plaintext = self.raw_decrypt(data)?;
        self.serializer.decode(&plaintext)
    }

    /// Open a blob produced by [`raw_encrypt`](Self::raw_encrypt).
    ///
    /// # Errors
    ///
    /// Returns [`SecureBytesError::MalformedInput`] or
    /// [`SecureBytesError::Authentication`].
    pub fn raw_decrypt(&self, data: &[u8]) -> Result<Vec<u8>, SecureBytesError> {
        crypto::open(self.key.encryption_key(), self.key.binding_tag(), data)
    }

    /// [`encrypt`](Self::encrypt), then padded standard base64.
    ///
    /// # Errors
    ///
    /// Same as [`encrypt`](Self::encrypt).
    pub fn encrypt_to_base64<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<String, SecureBytesError> {
        Ok(encode_base64(&self.encrypt(value)?))
    }

    /// [`raw_encrypt`](Self::raw_encrypt), then padded standard base64.
    ///
    /// # Errors
    ///
    /// Same as [`raw_encrypt`](Self::raw_encrypt).
    pub fn raw_encrypt_to_base64(&self, data: &[u8]) -> Result<String, SecureBytesError> {
        Ok(encode_base64(&self.raw_encrypt(data)?))
    }

    /// Decode base64 text, then [`decrypt`](Self::decrypt).
    ///
    /// # Errors
    ///
    /// Returns [`SecureBytesError::Encoding`] for invalid base64 before any
    /// cryptographic work, otherwise the same as [`decrypt`](Self::decrypt).
    pub fn decrypt_base64<T: DeserializeOwned>(&self, text: &str) -> Result<T, SecureBytesError> {
        let data = decode_base64(text)?;
        self.decrypt(&data)
    }

    /// Decode base64 text, then [`raw_decrypt`](Self::raw_decrypt).
    ///
    /// # Errors
    ///
    /// Returns [`SecureBytesError::Encoding`] for invalid base64, otherwise the
    /// same as [`raw_decrypt`](Self::raw_decrypt).
    pub fn raw_decrypt_base64(&self, text: &str) -> Result<Vec<u8>, SecureBytesError> {
        let data = decode_base64(text)?;
        self.raw_decrypt(&data)
    }
}

impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("key", &self.key)
            .field("serializer", &self.serializer)
            .finish_non_exhaustive()
    }
}
