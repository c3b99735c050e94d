//! Domain separation for signed intents.
//!
//! A domain binds every digest to `{name, chain identity, contract
//! identity}` so that a signature produced for one deployment can never be
//! replayed against another ledger, another chain, or another application.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use prorata_types::Address;

/// The two-part domain a signed intent is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSeparator {
    /// Application name (e.g., "ProRataVesting").
    pub name: String,
    /// Chain identity the ledger is deployed on.
    pub chain_id: u64,
    /// The ledger's own custody address.
    pub contract: Address,
}

impl DomainSeparator {
    #[must_use]
    pub fn new(name: impl Into<String>, chain_id: u64, contract: Address) -> Self {
        Self {
            name: name.into(),
            chain_id,
            contract,
        }
    }

    /// Tagged SHA-256 hash of the domain.
    ///
    /// Format: `SHA-256("prorata:domain:v1:" || len(name) || name || chain_id || contract)`
    #[must_use]
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"prorata:domain:v1:");
        hasher.update((self.name.len() as u64).to_le_bytes());
        hasher.update(self.name.as_bytes());
        hasher.update(self.chain_id.to_le_bytes());
        hasher.update(self.contract.as_bytes());
        hasher.finalize().into()
    }
}
