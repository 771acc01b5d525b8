use crate::keypair::address_from_public_key;
use crate::{ED25519_FLAG, KeyError, SERIALIZED_SIGNATURE_LENGTH};
use blake2::Blake2b;
use blake2::Digest;
use blake2::digest::consts::U32;
use ed25519_dalek::{Verifier, VerifyingKey};
use gridstrike_core::{Address, Signature};

pub(crate) type Blake2b256 = Blake2b<U32>;

/// Intent prefix for transaction data: scope, version, app id.
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

/// The 32-byte message actually signed for `tx_bytes`.
pub fn intent_digest(tx_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(TRANSACTION_INTENT);
    hasher.update(tx_bytes);
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

/// Checks a serialized signature against `tx_bytes` and returns the signer's
/// address.
pub fn verify(signature: &Signature, tx_bytes: &[u8]) -> Result<Address, KeyError> {
    let bytes = signature.as_bytes();
    if bytes.len() != SERIALIZED_SIGNATURE_LENGTH {
        return Err(KeyError::BadLength {
            expected: SERIALIZED_SIGNATURE_LENGTH,
            actual: bytes.len(),
        });
    }
    if bytes[0] != ED25519_FLAG {
        return Err(KeyError::UnsupportedScheme(bytes[0]));
    }

    let mut sig = [0u8; 64];
    sig.copy_from_slice(&bytes[1..65]);
    let mut public_key = [0u8; 32];
    public_key.copy_from_slice(&bytes[65..]);

    let verifying_key = VerifyingKey::from_bytes(&public_key)?;
    verifying_key.verify(
        &intent_digest(tx_bytes),
        &ed25519_dalek::Signature::from_bytes(&sig),
    )?;
    Ok(address_from_public_key(&public_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ed25519Identity;
    use gridstrike_core::Identity;

    #[test]
    fn verifies_own_signature() {
        let identity = Ed25519Identity::from_secret_bytes([3u8; 32]);
        let signature = identity.sign_bytes(b"transaction bytes");
        let signer = verify(&signature, b"transaction bytes").expect("verify");
        assert_eq!(signer, identity.address());
    }

    #[test]
    fn rejects_other_bytes() {
        let identity = Ed25519Identity::from_secret_bytes([3u8; 32]);
        let signature = identity.sign_bytes(b"transaction bytes");
        assert!(matches!(
            verify(&signature, b"other bytes"),
            Err(KeyError::BadSignature(_))
        ));
        assert!(matches!(
            verify(&Signature::new(vec![0; 10]), b"x"),
            Err(KeyError::BadLength { .. })
        ));
    }

    #[test]
    fn digest_includes_intent_prefix() {
        let mut hasher = Blake2b256::new();
        hasher.update(b"tx");
        assert_ne!(intent_digest(b"tx")[..], hasher.finalize()[..]);
    }
}
