//! Key derivation: one SHA-256 digest of the caller's key, split in two.
//!
//! ```text
//! digest = SHA-256(raw_key)
//! encryption key = digest[0..24]   (AES-192)
//! binding tag    = digest[24..32]  (associated data on every seal/open)
//! ```
//!
//! There is no salt and no iteration count. Callers are expected to supply a
//! high-entropy key (roughly 50 random alphanumeric characters for 256 bits);
//! passwords get no stretching here. An empty key is accepted and yields a
//! fixed, publicly computable key. Both behaviours are kept so that existing
//! blobs stay decryptable.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte length of the derived AES-192 key.
pub const KEY_LEN: usize = 24;

/// Byte length of the derived associated-data tag.
pub const BINDING_TAG_LEN: usize = 8;

/// Raw keys shorter than this many bytes are unlikely to carry 256 bits of
/// entropy.
pub const RECOMMENDED_MIN_KEY_LEN: usize = 50;

/// Fixed-size key material derived from a caller-supplied key.
///
/// Never printed, not even in debug builds. Zeroized on drop; copies held by
/// the cipher while sealing or opening are not covered.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    encryption_key: [u8; KEY_LEN],
    binding_tag: [u8; BINDING_TAG_LEN],
}

impl DerivedKey {
    pub(crate) fn encryption_key(&self) -> &[u8; KEY_LEN] {
        &self.encryption_key
    }

    pub(crate) fn binding_tag(&self) -> &[u8; BINDING_TAG_LEN] {
        &self.binding_tag
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive the encryption key and binding tag from `raw_key`.
///
/// Total and deterministic: the same input always yields the same output.
pub fn derive(raw_key: &[u8]) -> DerivedKey {
    let digest = Sha256::digest(raw_key);
    let mut encryption_key = [0u8; KEY_LEN];
    let mut binding_tag = [0u8; BINDING_TAG_LEN];
    encryption_key.copy_from_slice(&digest[..KEY_LEN]);
    binding_tag.copy_from_slice(&digest[KEY_LEN..]);
    DerivedKey {
        encryption_key,
        binding_tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn split_covers_whole_digest() {
        assert_eq!(KEY_LEN + BINDING_TAG_LEN, 32);
    }

    #[test]
    fn empty_key_derives_sha256_of_nothing() {
        // SHA-256("") = e3b0c442 98fc1c14 9afbf4c8 996fb924 27ae41e4 649b934c a495991b 7852b855
        let key = derive(b"");
        assert_eq!(
            hex(key.encryption_key()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934c"
        );
        assert_eq!(hex(key.binding_tag()), "a495991b7852b855");
    }

    #[test]
    fn abc_matches_known_digest() {
        // SHA-256("abc") = ba7816bf 8f01cfea 414140de 5dae2223 b00361a3 96177a9c b410ff61 f20015ad
        let key = derive(b"abc");
        assert_eq!(
            hex(key.encryption_key()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9c"
        );
        assert_eq!(hex(key.binding_tag()), "b410ff61f20015ad");
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = derive(b"correct horse battery staple");
        let b = derive(b"correct horse battery staple");
        assert_eq!(a.encryption_key(), b.encryption_key());
        assert_eq!(a.binding_tag(), b.binding_tag());
    }

    #[test]
    fn different_keys_diverge() {
        let a = derive(b"key-one");
        let b = derive(b"key-two");
        assert_ne!(a.encryption_key(), b.encryption_key());
        assert_ne!(a.binding_tag(), b.binding_tag());
    }

    #[test]
    fn zeroize_clears_both_halves() {
        let mut key = derive(b"abc");
        key.zeroize();
        assert_eq!(key.encryption_key(), &[0u8; KEY_LEN]);
        assert_eq!(key.binding_tag(), &[0u8; BINDING_TAG_LEN]);
    }

    #[test]
    fn derived_key_redacted_in_debug() {
        let key = derive(b"abc");
        let printed = format!("{key:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("ba7816bf"));
    }
}
