//! Token-transfer capability and the in-memory vault.
//!
//! The engines never mint or burn; they only move balances between holders
//! through the [`TokenTransfer`] capability. Production embeds the kernel
//! against a real asset ledger; tests and examples use [`TokenVault`],
//! which also tracks per-asset minted supply so conservation can be
//! asserted after every scenario.

use std::collections::HashMap;

use crate::{Address, ProrataError, Result, Wad};

/// Asset identifier (e.g., "USDC", "MCB").
pub type Asset = String;

/// The external fungible-asset collaborator consumed by both engines.
///
/// Every mutation is atomic: either the full transfer succeeds or the
/// ledger is unchanged.
pub trait TokenTransfer {
    /// Move `amount` of `asset` from `from` to `to`.
    ///
    /// # Errors
    /// Returns [`ProrataError::InsufficientBalance`] if `from` lacks funds.
    fn transfer(&mut self, asset: &str, from: Address, to: Address, amount: Wad) -> Result<()>;

    /// Current balance of `holder` in `asset`.
    fn balance_of(&self, asset: &str, holder: Address) -> Wad;
}

/// In-memory token ledger with per-asset supply accounting.
#[derive(Debug, Default)]
pub struct TokenVault {
    /// Per-(holder, asset) balances.
    balances: HashMap<(Address, Asset), Wad>,
    /// Total minted per asset since genesis.
    minted: HashMap<Asset, Wad>,
}

impl TokenVault {
    /// Create an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` of `asset` to `holder` (test setup only — the engines
    /// themselves never mint).
    pub fn mint(&mut self, asset: &str, holder: Address, amount: Wad) {
        *self
            .balances
            .entry((holder, asset.to_string()))
            .or_insert(0) += amount;
        *self.minted.entry(asset.to_string()).or_insert(0) += amount;
    }

    /// Total minted supply for an asset.
    #[must_use]
    pub fn total_minted(&self, asset: &str) -> Wad {
        self.minted.get(asset).copied().unwrap_or(0)
    }

    /// Sum of all holders' balances in `asset`.
    ///
    /// Transfers conserve supply, so this always equals
    /// [`total_minted`](Self::total_minted) — asserting the pair after a
    /// scenario catches any double-credit or lost debit.
    #[must_use]
    pub fn total_supply(&self, asset: &str) -> Wad {
        self.balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, amount)| amount)
            .sum()
    }
}

impl TokenTransfer for TokenVault {
    fn transfer(&mut self, asset: &str, from: Address, to: Address, amount: Wad) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let key = (from, asset.to_string());
        let available = self.balances.get(&key).copied().unwrap_or(0);
        if available < amount {
            return Err(ProrataError::InsufficientBalance {
                asset: asset.to_string(),
                needed: amount,
                available,
            });
        }
        *self.balances.entry(key).or_insert(0) -= amount;
        *self.balances.entry((to, asset.to_string())).or_insert(0) += amount;
        Ok(())
    }

    fn balance_of(&self, asset: &str, holder: Address) -> Wad {
        self.balances
            .get(&(holder, asset.to_string()))
            .copied()
            .unwrap_or(0)
    }
}
