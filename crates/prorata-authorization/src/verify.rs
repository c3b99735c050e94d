//! Ed25519 verification with expiry.
//!
//! The principal's [`Address`] doubles as its ed25519 public key, so
//! verification needs nothing beyond the digest, the signature bytes, and
//! the clock reading supplied by the caller.

use ed25519_dalek::{Signature, VerifyingKey};

use prorata_types::{Address, ProrataError, Result, Timestamp};

/// Verify a signed digest against an expected principal.
///
/// Check order is fixed: expiry, then signature shape, then the
/// cryptographic verification itself.
///
/// # Errors
/// - [`ProrataError::SignatureExpired`] when `now >= expires_at` —
///   equality counts as expired.
/// - [`ProrataError::InvalidSignature`] when the signature bytes are
///   malformed or the principal's bytes are not a valid ed25519 key.
/// - [`ProrataError::SignerMismatch`] when the signature does not verify
///   under the expected signer's key.
pub fn verify(
    digest: &[u8; 32],
    signature: &[u8],
    expected_signer: Address,
    expires_at: Timestamp,
    now: Timestamp,
) -> Result<()> {
    if now >= expires_at {
        return Err(ProrataError::SignatureExpired);
    }

    let signature =
        Signature::from_slice(signature).map_err(|e| ProrataError::InvalidSignature {
            reason: format!("malformed signature: {e}"),
        })?;

    let key = VerifyingKey::from_bytes(expected_signer.as_bytes()).map_err(|e| {
        ProrataError::InvalidSignature {
            reason: format!("principal is not a valid ed25519 key: {e}"),
        }
    })?;

    key.verify_strict(digest, &signature)
        .map_err(|_| ProrataError::SignerMismatch)
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signer, SigningKey};

    use super::*;

    fn setup() -> (SigningKey, Address, [u8; 32]) {
        let key = SigningKey::from_bytes(&[9u8; 32]);
        let addr = Address::from_pubkey(key.verifying_key().to_bytes());
        let digest = [0xD1u8; 32];
        (key, addr, digest)
    }

    #[test]
    fn valid_signature_passes() {
        let (key, addr, digest) = setup();
        let sig = key.sign(&digest);
        assert!(verify(&digest, &sig.to_bytes(), addr, 2_000, 1_000).is_ok());
    }

    #[test]
    fn expiry_equality_is_expired() {
        let (key, addr, digest) = setup();
        let sig = key.sign(&digest);
        let err = verify(&digest, &sig.to_bytes(), addr, 1_000, 1_000).unwrap_err();
        assert!(matches!(err, ProrataError::SignatureExpired));
    }

    #[test]
    fn past_expiry_is_expired() {
        let (key, addr, digest) = setup();
        let sig = key.sign(&digest);
        let err = verify(&digest, &sig.to_bytes(), addr, 999, 1_000).unwrap_err();
        assert!(matches!(err, ProrataError::SignatureExpired));
    }

    #[test]
    fn one_second_before_expiry_passes() {
        let (key, addr, digest) = setup();
        let sig = key.sign(&digest);
        assert!(verify(&digest, &sig.to_bytes(), addr, 1_001, 1_000).is_ok());
    }

    #[test]
    fn truncated_signature_is_invalid() {
        let (key, addr, digest) = setup();
        let sig = key.sign(&digest);
        let err = verify(&digest, &sig.to_bytes()[..40], addr, 2_000, 1_000).unwrap_err();
        assert!(matches!(err, ProrataError::InvalidSignature { .. }));
    }

    #[test]
    fn wrong_signer_is_mismatch() {
        let (_, addr, digest) = setup();
        let other = SigningKey::from_bytes(&[8u8; 32]);
        let sig = other.sign(&digest);
        let err = verify(&digest, &sig.to_bytes(), addr, 2_000, 1_000).unwrap_err();
        assert!(matches!(err, ProrataError::SignerMismatch));
    }

    #[test]
    fn wrong_digest_is_mismatch() {
        let (key, addr, digest) = setup();
        let sig = key.sign(&digest);
        let other_digest = [0xD2u8; 32];
        let err = verify(&other_digest, &sig.to_bytes(), addr, 2_000, 1_000).unwrap_err();
        assert!(matches!(err, ProrataError::SignerMismatch));
    }

    #[test]
    fn empty_signature_is_invalid() {
        let (_, addr, digest) = setup();
        let err = verify(&digest, &[], addr, 2_000, 1_000).unwrap_err();
        assert!(matches!(err, ProrataError::InvalidSignature { .. }));
    }
}
