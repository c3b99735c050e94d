//! Typed signed intents and their digests.
//!
//! An intent is the struct a principal signs off-chain: a type tag, the
//! mutation's fields, a nonce, and an expiry. The digest a principal
//! actually signs commits to both the domain and the struct, so neither
//! can be swapped after the fact.

use sha2::{Digest, Sha256};

use prorata_types::{Address, Timestamp};

use crate::DomainSeparator;

/// A struct that can be signed by a principal to authorize one mutation.
///
/// Implementors provide a version-tagged type identifier and a
/// deterministic field encoding; the struct hash and final digest are
/// derived here so every intent hashes the same way.
pub trait SignedIntent {
    /// Version-tagged type identifier, e.g. `b"prorata:update-beneficiary:v1:"`.
    const TYPE_TAG: &'static [u8];

    /// The principal whose signature authorizes this intent.
    fn principal(&self) -> Address;

    /// The nonce to check against the principal's counter.
    fn nonce(&self) -> u64;

    /// Expiry timestamp; the intent is dead once `now >= expires_at`.
    fn expires_at(&self) -> Timestamp;

    /// Deterministic encoding of every signed field (including nonce and
    /// expiry — they must be covered by the signature).
    fn encode_fields(&self) -> Vec<u8>;

    /// Tagged SHA-256 hash of the typed struct.
    fn struct_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(Self::TYPE_TAG);
        hasher.update(self.encode_fields());
        hasher.finalize().into()
    }
}

/// The digest a principal signs: domain hash ‖ struct hash under a
/// version tag.
#[must_use]
pub fn intent_digest<I: SignedIntent>(domain: &DomainSeparator, intent: &I) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"prorata:intent:v1:");
    hasher.update(domain.hash());
    hasher.update(intent.struct_hash());
    hasher.finalize().into()
}
