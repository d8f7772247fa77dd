//! AES-192-GCM sealing and opening of byte payloads.
//!
//! This module is intentionally free of serialization and configuration
//! concerns. It provides the low-level seal/open operations used by the
//! [`SecureBytes`](crate::SecureBytes) facade.
//!
//! # Ciphertext format
//!
//! ```text
//! nonce[12] || ciphertext || tag[16]
//! ```
//!
//! The binding tag derived alongside the key is passed as associated data on
//! every call: it is authenticated but never written into the blob.

pub mod cipher;
pub mod nonce;

pub use cipher::{open, seal};
pub use nonce::{NonceSource, OsNonceSource};
