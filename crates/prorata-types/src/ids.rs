//! Account identifiers used throughout Pro-Rata.
//!
//! An [`Address`] is an opaque 32-byte account key. For principals that can
//! sign delegations it is the raw ed25519 public key, so signature
//! verification needs no separate key registry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 32-byte account identifier.
///
/// Contributors, beneficiaries, custody contracts and fund recipients are
/// all addressed this way. When an address must authorize an off-chain
/// delegation, its bytes are interpreted as an ed25519 public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    #[must_use]
    pub fn from_pubkey(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short hex prefix for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "addr:{}", hex::encode(&self.0[..8]))
    }
}
