//! # securebytes
//!
//! Authenticated encryption of arbitrary serialisable values.
//!
//! ```text
//! value -> Serializer::encode -> bytes -> AES-192-GCM seal -> nonce || ciphertext || tag -> base64
//! ```
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use securebytes::{SecureBytes, Serializer};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Session {
//!     user_id: u64,
//!     message: String,
//! }
//!
//! let sb = SecureBytes::new("a6CyUTDxwS6Xxd9BhyJBBNqEbztTLKiBAtstXu7vNd8YyP9Fc2")
//!     .with_serializer(Serializer::Tlv);
//! let session = Session { user_id: 123123123, message: "secret".into() };
//!
//! let token = sb.encrypt_to_base64(&session).unwrap();
//! let back: Session = sb.decrypt_base64(&token).unwrap();
//! assert_eq!(back, session);
//! ```
//!
//! ## Key handling
//!
//! The raw key is hashed once with SHA-256; there is no salt or stretching.
//! Supply a high-entropy key (50+ random alphanumeric characters). An empty
//! key is accepted and yields a publicly computable key.
//!
//! ## Not provided
//!
//! - Key management or rotation
//! - Password-based key stretching
//! - Compression
//! - Transport or storage of the resulting bytes

#![deny(unsafe_code)]

pub mod codec;
pub mod config;
pub mod crypto;
pub mod kdf;

mod instance;

pub use codec::{Codec, Serializer};
pub use common::{EncryptedBlob, Result, SecureBytesError, NONCE_LEN, TAG_LEN};
pub use config::Settings;
pub use crypto::{NonceSource, OsNonceSource};
pub use instance::SecureBytes;
