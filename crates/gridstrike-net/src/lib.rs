//! JSON-RPC access to the ledger for gridstrike.
//!
//! [`LedgerClient`] implements [`gridstrike_core::Ledger`] for the submitter
//! and adds the reads the game loop needs: object content and finality
//! polling.

#![forbid(unsafe_code)]

mod client;
mod error;
mod ledger;
pub mod objects;
#[cfg(test)]
mod test_node;

pub use client::{AuthScheme, LedgerClient, RpcAuth, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT};
pub use error::RpcError;
