//! # prorata-authorization
//!
//! Signature-based authorization for delegated state changes.
//!
//! A caller submits an off-chain-signed, typed intent on behalf of a
//! third-party principal. The pipeline is always the same:
//!
//! 1. Digest the intent under a [`DomainSeparator`] (name + chain identity
//!    + contract identity), so a signature for one ledger can never be
//!    presented to another.
//! 2. [`verify`] the ed25519 signature against the principal's key, with a
//!    hard expiry (`now >= expires_at` is expired).
//! 3. Consume the principal's monotonic nonce in the [`NonceRegistry`],
//!    making the intent single-use.
//!
//! [`authorize`] runs the whole pipeline around a caller-supplied mutation;
//! consumers that need no nonce (or no signature) can call the pieces
//! individually.

pub mod domain;
pub mod intent;
pub mod nonce;
pub mod verify;

pub use domain::DomainSeparator;
pub use intent::{SignedIntent, intent_digest};
pub use nonce::NonceRegistry;
pub use verify::verify;

use prorata_types::{Result, Timestamp};

/// Authorize a signed intent and apply its mutation: digest, verify, check
/// nonce, run `apply`, then bump the nonce.
///
/// The nonce is consumed only once `apply` has succeeded — any failure
/// (signature, nonce, or the mutation itself) leaves the registry
/// untouched, so a rejected intent can be resubmitted unchanged.
///
/// # Errors
/// Propagates [`verify`] failures (`SignatureExpired`, `InvalidSignature`,
/// `SignerMismatch`), [`NonceRegistry::check`] failures (`InvalidNonce`),
/// and whatever `apply` returns.
pub fn authorize<I: SignedIntent, T>(
    domain: &DomainSeparator,
    intent: &I,
    signature: &[u8],
    nonces: &mut NonceRegistry,
    now: Timestamp,
    apply: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let digest = intent_digest(domain, intent);
    verify(
        &digest,
        signature,
        intent.principal(),
        intent.expires_at(),
        now,
    )?;
    nonces.check(intent.principal(), intent.nonce())?;
    let outcome = apply()?;
    nonces.consume(intent.principal(), intent.nonce())?;
    Ok(outcome)
}
