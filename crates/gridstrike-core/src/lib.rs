//! Core types for the gridstrike game client.
//!
//! Everything here is transport-agnostic: the remote ledger is reached through
//! the [`Ledger`] trait and keys through the [`Identity`] trait. The one piece
//! of real protocol is [`SponsoredSubmitter`], which turns a call list into a
//! sponsor-funded transaction signed by both parties over the same bytes.

#![forbid(unsafe_code)]

pub mod address;
pub mod board;
pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod identity;
pub mod intent;
pub mod ledger;
pub mod submitter;
pub mod tx;

pub use address::{Address, ObjectDigest, ObjectRef};
pub use config::SubmitterConfig;
pub use error::{Error, Result};
pub use identity::{Identity, Signature};
pub use intent::{Arg, IntentBuilder, MoveCall, ObjectInput, PureArg, TransactionIntent};
pub use ledger::Ledger;
pub use submitter::{SignerSet, SponsoredSubmitter, SubmissionResult};
