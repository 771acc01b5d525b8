//! Signing identities.

use crate::address::Address;
use crate::error::Result;
use std::future::Future;

/// A serialized signature as the ledger expects it (scheme flag, signature
/// and public key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Wraps already serialized signature bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The bytes submitted alongside the transaction.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A party that can sign transactions.
///
/// Both methods are deterministic for a given identity. Signing may suspend,
/// so hardware or remote signers fit behind the same trait.
pub trait Identity {
    /// The account this identity signs for.
    fn address(&self) -> Address;

    /// Signs canonical transaction bytes.
    fn sign(&self, tx_bytes: &[u8]) -> impl Future<Output = Result<Signature>> + Send;
}
