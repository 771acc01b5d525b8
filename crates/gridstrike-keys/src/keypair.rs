use crate::verify::{Blake2b256, intent_digest};
use crate::{ED25519_FLAG, KeyError, SERIALIZED_SIGNATURE_LENGTH};
use blake2::Digest;
use ed25519_dalek::{Signer, SigningKey};
use gridstrike_core::{Address, Identity, Signature};
use tracing::debug;

/// Human-readable prefix of bech32-encoded private keys.
pub const PRIVATE_KEY_HRP: &str = "suiprivkey";

/// Derives the account address of an Ed25519 public key.
pub fn address_from_public_key(public_key: &[u8; 32]) -> Address {
    let mut hasher = Blake2b256::new();
    hasher.update([ED25519_FLAG]);
    hasher.update(public_key);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    Address::new(bytes)
}

/// An Ed25519 keypair acting as a transaction signer.
pub struct Ed25519Identity {
    signing_key: SigningKey,
    address: Address,
}

impl Ed25519Identity {
    pub fn from_secret_bytes(secret: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&secret);
        let address = address_from_public_key(signing_key.verifying_key().as_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Accepts a bech32 `suiprivkey1…` key or 32 bytes of hex.
    pub fn from_encoded(encoded: &str) -> Result<Self, KeyError> {
        let encoded = encoded.trim();
        if encoded.starts_with(PRIVATE_KEY_HRP) {
            Self::from_bech32(encoded)
        } else {
            let bytes = hex::decode(encoded.trim_start_matches("0x"))?;
            Ok(Self::from_secret_bytes(to_secret(&bytes)?))
        }
    }

    fn from_bech32(encoded: &str) -> Result<Self, KeyError> {
        let (hrp, data) =
            bech32::decode(encoded).map_err(|e| KeyError::Bech32(e.to_string()))?;
        if hrp.as_str() != PRIVATE_KEY_HRP {
            return Err(KeyError::WrongPrefix(hrp.to_string()));
        }
        let (&flag, secret) = data.split_first().ok_or(KeyError::BadLength {
            expected: 33,
            actual: 0,
        })?;
        if flag != ED25519_FLAG {
            return Err(KeyError::UnsupportedScheme(flag));
        }
        Ok(Self::from_secret_bytes(to_secret(secret)?))
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Signs and serializes as flag, signature, public key.
    pub fn sign_bytes(&self, tx_bytes: &[u8]) -> Signature {
        let digest = intent_digest(tx_bytes);
        let signature = self.signing_key.sign(&digest);

        let mut serialized = Vec::with_capacity(SERIALIZED_SIGNATURE_LENGTH);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(&self.public_key());
        Signature::new(serialized)
    }
}

impl std::fmt::Debug for Ed25519Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Identity")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Identity for Ed25519Identity {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign(&self, tx_bytes: &[u8]) -> gridstrike_core::Result<Signature> {
        debug!(address = %self.address, bytes = tx_bytes.len(), "signing transaction");
        Ok(self.sign_bytes(tx_bytes))
    }
}

fn to_secret(bytes: &[u8]) -> Result<[u8; 32], KeyError> {
    bytes.try_into().map_err(|_| KeyError::BadLength {
        expected: 32,
        actual: bytes.len(),
    })
}
