//! Sponsored transaction submission.
//!
//! A transaction is built once from the call list, addressed to the actor as
//! sender and the sponsor as gas owner, encoded once, signed by one or two
//! parties over those exact bytes and submitted with the sponsor's signature
//! first.

use crate::address::Address;
use crate::config::SubmitterConfig;
use crate::error::{Error, Result};
use crate::identity::{Identity, Signature};
use crate::intent::TransactionIntent;
use crate::ledger::Ledger;
use crate::tx::TransactionEnvelope;
use tracing::{debug, info};

/// Result of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    /// Transaction digest, the key for later finality lookups.
    pub digest: String,

    /// Number of signatures sent with the transaction.
    pub signature_count: usize,

    /// Whether the gas owner differs from the sender.
    pub is_sponsored: bool,
}

/// Who signs a transaction, resolved once per submission.
///
/// The ledger verifies signatures in order, so `SponsorAndActor` always
/// yields the sponsor's signature first.
#[derive(Debug)]
pub enum SignerSet<'a, S, A> {
    /// Sponsor and actor derive the same address; one signature covers both
    /// roles.
    Solo(&'a S),
    SponsorAndActor { sponsor: &'a S, actor: &'a A },
}

impl<'a, S: Identity, A: Identity> SignerSet<'a, S, A> {
    /// Compares derived addresses, not references.
    pub fn resolve(sponsor: &'a S, actor: &'a A) -> Self {
        if sponsor.address() == actor.address() {
            SignerSet::Solo(sponsor)
        } else {
            SignerSet::SponsorAndActor { sponsor, actor }
        }
    }

    pub fn signature_count(&self) -> usize {
        match self {
            SignerSet::Solo(_) => 1,
            SignerSet::SponsorAndActor { .. } => 2,
        }
    }

    pub fn is_sponsored(&self) -> bool {
        matches!(self, SignerSet::SponsorAndActor { .. })
    }

    /// Signs `tx_bytes` with every member, sequentially.
    pub async fn sign(&self, tx_bytes: &[u8]) -> Result<Vec<Signature>> {
        match self {
            SignerSet::Solo(sponsor) => Ok(vec![sponsor.sign(tx_bytes).await?]),
            SignerSet::SponsorAndActor { sponsor, actor } => {
                let sponsor_sig = sponsor.sign(tx_bytes).await?;
                let actor_sig = actor.sign(tx_bytes).await?;
                Ok(vec![sponsor_sig, actor_sig])
            }
        }
    }
}

/// Builds, signs and submits sponsor-funded transactions.
///
/// Submissions are independent attempts: nothing is cached, deduplicated or
/// retried, and a second submission of the same calls is a second
/// transaction.
pub struct SponsoredSubmitter<L> {
    ledger: L,
    config: SubmitterConfig,
}

impl<L: Ledger> SponsoredSubmitter<L> {
    pub fn new(ledger: L, config: SubmitterConfig) -> Self {
        Self { ledger, config }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &SubmitterConfig {
        &self.config
    }

    /// Submit `intent` with `actor` as sender and `sponsor` paying gas.
    ///
    /// Returns as soon as the ledger accepts the bytes; use the digest to
    /// wait for effects.
    pub async fn submit<S: Identity, A: Identity>(
        &self,
        intent: TransactionIntent,
        sponsor: &S,
        actor: &A,
    ) -> Result<SubmissionResult> {
        check_calls(&intent)?;

        let sponsor_address = sponsor.address();
        let actor_address = actor.address();
        debug!(
            calls = intent.calls().len(),
            sender = %actor_address,
            sponsor = %sponsor_address,
            endpoint = %self.config.endpoint,
            "building sponsored transaction"
        );

        let kind_bytes = self.ledger.build_kind(intent.calls()).await?;
        let tx_bytes = self
            .envelope_bytes(&kind_bytes, sponsor_address, actor_address)
            .await?;

        let signers = SignerSet::resolve(sponsor, actor);
        let signatures = signers.sign(&tx_bytes).await?;
        debug_assert_eq!(signatures.len(), signers.signature_count());
        debug!(
            signatures = signatures.len(),
            bytes = tx_bytes.len(),
            "transaction signed"
        );

        let digest = self.ledger.submit_signed(&tx_bytes, &signatures).await?;
        if digest.is_empty() {
            return Err(Error::Transport(
                "ledger returned an empty transaction digest".to_string(),
            ));
        }

        info!(
            digest = %digest,
            sender = %actor_address,
            sponsor = %sponsor_address,
            signatures = signatures.len(),
            "transaction submitted"
        );

        Ok(SubmissionResult {
            digest,
            signature_count: signatures.len(),
            is_sponsored: signers.is_sponsored(),
        })
    }

    async fn envelope_bytes(
        &self,
        kind_bytes: &[u8],
        sponsor: Address,
        actor: Address,
    ) -> Result<Vec<u8>> {
        let payment = self
            .ledger
            .gas_payment(sponsor, self.config.fee_budget)
            .await?;
        TransactionEnvelope::from_kind(kind_bytes)?
            .with_sender(actor)
            .with_gas_owner(sponsor)
            .with_gas_price(self.config.fee_unit_price)
            .with_gas_budget(self.config.fee_budget)
            .with_gas_payment(payment)
            .to_bytes()
    }
}

fn check_calls(intent: &TransactionIntent) -> Result<()> {
    if intent.calls().is_empty() {
        return Err(Error::InvalidIntent("call list is empty".to_string()));
    }
    for call in intent.calls() {
        if call.module.is_empty() || call.function.is_empty() {
            return Err(Error::InvalidIntent(format!(
                "call target {} is incomplete",
                call.target()
            )));
        }
    }
    Ok(())
}
