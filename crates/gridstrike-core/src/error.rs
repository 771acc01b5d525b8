//! Error types for transaction submission.

use thiserror::Error;

/// Submission error.
///
/// Every variant is terminal for the attempt that raised it. Nothing in this
/// crate retries; the caller decides whether to build a fresh intent.
#[derive(Error, Debug)]
pub enum Error {
    /// The call list is empty or cannot be encoded as a transaction.
    #[error("invalid intent: {0}")]
    InvalidIntent(String),

    /// An identity could not produce a signature.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The remote ledger was unreachable or rejected the request.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<bcs::Error> for Error {
    fn from(e: bcs::Error) -> Self {
        Error::InvalidIntent(format!("bcs: {e}"))
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
