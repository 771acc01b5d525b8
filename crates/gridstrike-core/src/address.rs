//! Ledger addresses and object references.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length in bytes of addresses, object ids and digests.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte account address or object id.
///
/// Encodes as a fixed-size byte array in BCS and prints as `0x` followed by
/// 64 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Address whose last byte is `value`, as used by system objects (`0x6`,
    /// `0x8`).
    pub const fn from_low_byte(value: u8) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = value;
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum AddressParseError {
    #[error("address is empty")]
    Empty,
    #[error("address is longer than 32 bytes")]
    TooLong,
    #[error("address is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl FromStr for Address {
    type Err = AddressParseError;

    /// Parses `0x`-prefixed or bare hex. Short forms such as `0x8` are
    /// left-padded with zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() {
            return Err(AddressParseError::Empty);
        }
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(AddressParseError::TooLong);
        }
        let padded = format!("{digits:0>width$}", width = ADDRESS_LENGTH * 2);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(padded, &mut bytes)?;
        Ok(Self(bytes))
    }
}

/// Content digest of an object version.
///
/// Unlike [`Address`] this is a length-prefixed byte vector on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectDigest([u8; ADDRESS_LENGTH]);

impl ObjectDigest {
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

impl Serialize for ObjectDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for ObjectDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        let array: [u8; ADDRESS_LENGTH] = bytes.try_into().map_err(|b: Vec<u8>| {
            serde::de::Error::invalid_length(b.len(), &"a 32-byte object digest")
        })?;
        Ok(Self(array))
    }
}

/// A specific version of an owned or immutable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub object_id: Address,
    pub version: u64,
    pub digest: ObjectDigest,
}

impl ObjectRef {
    pub fn new(object_id: Address, version: u64, digest: ObjectDigest) -> Self {
        Self {
            object_id,
            version,
            digest,
        }
    }
}
