//! Common types shared across `securebytes` crates: the error taxonomy and the
//! ciphertext blob wire format.

pub mod error;
pub mod protocol;

pub use error::{Result, SecureBytesError};
pub use protocol::{EncryptedBlob, NONCE_LEN, TAG_LEN};
