//! The remote ledger as seen by the submitter.

use crate::address::{Address, ObjectRef};
use crate::error::Result;
use crate::identity::Signature;
use crate::intent::MoveCall;
use std::future::Future;

/// Remote operations a submission needs.
///
/// Implementations report every failure as [`crate::Error::Transport`] except
/// calls they cannot encode, which are [`crate::Error::InvalidIntent`].
pub trait Ledger {
    /// Encodes `calls` as transaction-kind bytes. The output must not depend
    /// on who will send, sponsor or sign the transaction.
    fn build_kind(&self, calls: &[MoveCall]) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Coins owned by `owner` that together cover `budget`.
    fn gas_payment(
        &self,
        owner: Address,
        budget: u64,
    ) -> impl Future<Output = Result<Vec<ObjectRef>>> + Send;

    /// Submits signed bytes and returns the transaction digest without
    /// waiting for finality.
    fn submit_signed(
        &self,
        tx_bytes: &[u8],
        signatures: &[Signature],
    ) -> impl Future<Output = Result<String>> + Send;
}
