//! Error types for ledger RPC.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    /// The request never produced an HTTP response, or the status was not 2xx.
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("response to `{0}` has neither result nor error")]
    MissingResult(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("object {0} does not exist")]
    ObjectNotFound(String),

    #[error("gas owner {owner} holds {available} but the budget is {budget}")]
    InsufficientGas {
        owner: String,
        budget: u64,
        available: u64,
    },

    #[error("transaction {digest} not found after {waited:?}")]
    Timeout { digest: String, waited: Duration },
}

impl From<RpcError> for gridstrike_core::Error {
    fn from(e: RpcError) -> Self {
        gridstrike_core::Error::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(e: serde_json::Error) -> Self {
        RpcError::Malformed(e.to_string())
    }
}
