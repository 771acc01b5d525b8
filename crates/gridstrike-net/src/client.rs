//! JSON-RPC 2.0 over HTTP.

use crate::error::RpcError;
use crate::objects;
use gridstrike_core::{Address, SubmitterConfig};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Scheme of the `Authorization` header sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    Basic,
    Bearer,
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Basic" => Ok(AuthScheme::Basic),
            "Bearer" => Ok(AuthScheme::Bearer),
            other => Err(format!("unknown auth scheme `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RpcAuth {
    pub scheme: AuthScheme,
    pub token: String,
}

impl RpcAuth {
    pub fn header_value(&self) -> String {
        let scheme = match self.scheme {
            AuthScheme::Basic => "Basic",
            AuthScheme::Bearer => "Bearer",
        };
        format!("{scheme} {}", self.token)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct Response<T> {
    result: Option<T>,
    error: Option<ErrorBody>,
}

impl<T> Response<T> {
    fn into_result(self, method: &str) -> Result<T, RpcError> {
        if let Some(error) = self.error {
            return Err(RpcError::Remote {
                code: error.code,
                message: error.message,
            });
        }
        self.result
            .ok_or_else(|| RpcError::MissingResult(method.to_string()))
    }
}

/// Client for one ledger node.
pub struct LedgerClient {
    http: reqwest::Client,
    endpoint: String,
    auth: Option<RpcAuth>,
    poll_interval: Duration,
    next_id: AtomicU64,
}

impl LedgerClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), endpoint)
    }

    pub(crate) fn with_http_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            auth: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from_config(config: &SubmitterConfig) -> Self {
        Self::new(config.endpoint.clone())
    }

    pub fn with_auth(mut self, auth: RpcAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Delay between polls in [`LedgerClient::wait_for_transaction`].
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sends one request and returns its `result`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "rpc request");

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(auth) = &self.auth {
            request = request.header(reqwest::header::AUTHORIZATION, auth.header_value());
        }

        let response: Response<T> = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        response.into_result(method)
    }

    /// The `data` section of an object with owner and content.
    pub async fn get_object(&self, id: Address) -> Result<Value, RpcError> {
        let response: Value = self
            .call(
                "sui_getObject",
                json!([id.to_string(), { "showOwner": true, "showContent": true }]),
            )
            .await?;
        objects::object_data(&response, id)
    }

    pub async fn get_transaction(&self, digest: &str) -> Result<Value, RpcError> {
        self.call(
            "sui_getTransactionBlock",
            json!([
                digest,
                {
                    "showInput": true,
                    "showRawInput": true,
                    "showEffects": true,
                    "showEvents": true,
                    "showObjectChanges": true,
                    "showBalanceChanges": true,
                }
            ]),
        )
        .await
    }

    /// Polls until the transaction is known to the node or `timeout` passes.
    ///
    /// Remote errors while polling mean "not indexed yet"; transport errors
    /// end the wait.
    pub async fn wait_for_transaction(
        &self,
        digest: &str,
        timeout: Duration,
    ) -> Result<Value, RpcError> {
        let started = Instant::now();
        loop {
            match self.get_transaction(digest).await {
                Ok(response) => return Ok(response),
                Err(RpcError::Remote { code, message }) => {
                    debug!(digest, code, %message, "transaction not available yet");
                }
                Err(e) => return Err(e),
            }
            if started.elapsed() + self.poll_interval > timeout {
                warn!(digest, "gave up waiting for transaction");
                return Err(RpcError::Timeout {
                    digest: digest.to_string(),
                    waited: started.elapsed(),
                });
            }
            sleep(self.poll_interval).await;
        }
    }
}
