//! Injectable entropy for nonce generation.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use common::{SecureBytesError, NONCE_LEN};

/// Supplies a fresh nonce for every seal.
///
/// A (key, nonce) pair must never repeat, so production code should only use
/// [`OsNonceSource`]. Alternative sources exist for tests.
#[cfg_attr(test, mockall::automock)]
pub trait NonceSource: Send + Sync {
    /// Overwrite `nonce` with fresh bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SecureBytesError::RandomSource`] if no entropy is available.
    fn fill_nonce(&self, nonce: &mut [u8; NONCE_LEN]) -> Result<(), SecureBytesError>;
}

/// Nonce source backed by the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn fill_nonce(&self, nonce: &mut [u8; NONCE_LEN]) -> Result<(), SecureBytesError> {
        OsRng
            .try_fill_bytes(nonce)
            .map_err(|e| SecureBytesError::RandomSource(e.to_string()))
    }
}
