//! Decoding object and coin responses into ledger types.

use crate::error::RpcError;
use gridstrike_core::address::ADDRESS_LENGTH;
use gridstrike_core::tx::ObjectOwnership;
use gridstrike_core::{Address, ObjectDigest, ObjectRef};
use serde::Deserialize;
use serde_json::Value;

/// Upper bound on coins in one gas payment.
pub const MAX_GAS_COINS: usize = 256;

/// Unwraps `{ "data": … }`, turning `{ "error": … }` into
/// [`RpcError::ObjectNotFound`].
pub fn object_data(response: &Value, id: Address) -> Result<Value, RpcError> {
    if let Some(data) = response.get("data").filter(|d| !d.is_null()) {
        return Ok(data.clone());
    }
    if response.get("error").is_some() {
        return Err(RpcError::ObjectNotFound(id.to_string()));
    }
    Err(RpcError::Malformed(format!("object {id} has no data")))
}

/// How the object in `data` must be passed to a call.
pub fn ownership(data: &Value) -> Result<ObjectOwnership, RpcError> {
    let owner = data
        .get("owner")
        .ok_or_else(|| RpcError::Malformed("object has no owner".to_string()))?;

    if let Some(shared) = owner.get("Shared") {
        let version = shared
            .get("initial_shared_version")
            .ok_or_else(|| RpcError::Malformed("shared owner without version".to_string()))?;
        return Ok(ObjectOwnership::Shared {
            initial_shared_version: parse_u64(version)?,
        });
    }

    let owned = owner.as_str() == Some("Immutable")
        || owner.get("AddressOwner").is_some()
        || owner.get("ObjectOwner").is_some();
    if owned {
        return Ok(ObjectOwnership::Owned(object_ref(data)?));
    }
    Err(RpcError::Malformed(format!("unsupported owner {owner}")))
}

/// The `objectId`/`version`/`digest` triple of an object.
pub fn object_ref(data: &Value) -> Result<ObjectRef, RpcError> {
    let id = field_str(data, "objectId")?;
    let version = data
        .get("version")
        .ok_or_else(|| RpcError::Malformed("object has no version".to_string()))?;
    Ok(ObjectRef::new(
        parse_address(id)?,
        parse_u64(version)?,
        parse_digest(field_str(data, "digest")?)?,
    ))
}

/// One entry of a coin listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub coin_object_id: String,
    pub version: String,
    pub digest: String,
    pub balance: String,
}

impl Coin {
    pub fn object_ref(&self) -> Result<ObjectRef, RpcError> {
        Ok(ObjectRef::new(
            parse_address(&self.coin_object_id)?,
            self.version
                .parse()
                .map_err(|_| RpcError::Malformed(format!("coin version `{}`", self.version)))?,
            parse_digest(&self.digest)?,
        ))
    }

    pub fn balance(&self) -> Result<u64, RpcError> {
        self.balance
            .parse()
            .map_err(|_| RpcError::Malformed(format!("coin balance `{}`", self.balance)))
    }
}

/// A page of coins owned by one address.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPage {
    pub data: Vec<Coin>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// Accumulates coins for a gas payment.
#[derive(Debug, Default)]
pub struct GasSelection {
    pub coins: Vec<ObjectRef>,
    pub total: u64,
}

impl GasSelection {
    /// Takes coins from `page` until `budget` is covered. Returns whether it
    /// is covered.
    pub fn extend(&mut self, page: &[Coin], budget: u64) -> Result<bool, RpcError> {
        for coin in page {
            if self.is_covered(budget) || self.coins.len() == MAX_GAS_COINS {
                break;
            }
            let balance = coin.balance()?;
            if balance == 0 {
                continue;
            }
            self.coins.push(coin.object_ref()?);
            self.total = self.total.saturating_add(balance);
        }
        Ok(self.is_covered(budget))
    }

    pub fn is_covered(&self, budget: u64) -> bool {
        !self.coins.is_empty() && self.total >= budget
    }
}

fn field_str<'a>(data: &'a Value, name: &str) -> Result<&'a str, RpcError> {
    data.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| RpcError::Malformed(format!("missing `{name}`")))
}

/// Versions arrive as numbers or decimal strings depending on the field.
fn parse_u64(value: &Value) -> Result<u64, RpcError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| RpcError::Malformed(format!("`{value}` is not a u64")))
}

fn parse_address(s: &str) -> Result<Address, RpcError> {
    s.parse()
        .map_err(|e| RpcError::Malformed(format!("address `{s}`: {e}")))
}

fn parse_digest(s: &str) -> Result<ObjectDigest, RpcError> {
    let bytes = bs58::decode(s)
        .into_vec()
        .map_err(|e| RpcError::Malformed(format!("digest `{s}`: {e}")))?;
    let array: [u8; ADDRESS_LENGTH] = bytes
        .try_into()
        .map_err(|_| RpcError::Malformed(format!("digest `{s}` is not 32 bytes")))?;
    Ok(ObjectDigest::new(array))
}
