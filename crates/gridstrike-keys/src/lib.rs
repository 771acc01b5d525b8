//! Ed25519 identities for gridstrike.
//!
//! Keys, addresses and signatures follow the ledger's conventions: addresses
//! are the Blake2b-256 hash of the scheme flag and public key, and
//! transactions are signed through a Blake2b-256 digest of the intent-prefixed
//! bytes.

#![forbid(unsafe_code)]

mod keypair;
mod verify;

pub use keypair::{Ed25519Identity, PRIVATE_KEY_HRP, address_from_public_key};
pub use verify::{intent_digest, verify};

use thiserror::Error;

/// Signature scheme flag for Ed25519.
pub const ED25519_FLAG: u8 = 0x00;

/// Serialized signature length: flag, signature, public key.
pub const SERIALIZED_SIGNATURE_LENGTH: usize = 1 + 64 + 32;

#[derive(Error, Debug)]
pub enum KeyError {
    #[error("private key is not valid bech32: {0}")]
    Bech32(String),

    #[error("private key has prefix `{0}`, expected `suiprivkey`")]
    WrongPrefix(String),

    #[error("unsupported signature scheme flag {0:#04x}")]
    UnsupportedScheme(u8),

    #[error("expected {expected} bytes, got {actual}")]
    BadLength { expected: usize, actual: usize },

    #[error("private key is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("signature does not verify: {0}")]
    BadSignature(#[from] ed25519_dalek::SignatureError),
}

impl From<KeyError> for gridstrike_core::Error {
    fn from(e: KeyError) -> Self {
        gridstrike_core::Error::Signing(e.to_string())
    }
}
