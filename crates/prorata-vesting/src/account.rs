//! Beneficiary slot records and the share table.
//!
//! A slot's `share_weight` is immutable once assigned; reassignment moves
//! the whole slot to a new key. Records are never deleted — a reassigned
//! key keeps its weight-zero record so claim history stays auditable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use prorata_types::{Address, ProrataError, Result, VestingConfig, Wad};

/// One beneficiary slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingAccount {
    /// Static numerator of this slot's share. Zero after reassignment.
    pub share_weight: Wad,
    /// Tokens paid out against this key (or force-set by correction).
    pub claimed: Wad,
}

/// All beneficiary slots, keyed by current holder address.
#[derive(Debug)]
pub struct ShareTable {
    accounts: HashMap<Address, VestingAccount>,
    /// Fixed denominator: the weight sum at construction. Reassignment
    /// never changes it.
    denominator: Wad,
}

impl ShareTable {
    /// Build the table from validated config.
    #[must_use]
    pub fn from_config(config: &VestingConfig) -> Self {
        let accounts = config
            .beneficiaries
            .iter()
            .map(|(addr, weight)| {
                (
                    *addr,
                    VestingAccount {
                        share_weight: *weight,
                        claimed: 0,
                    },
                )
            })
            .collect();
        Self {
            accounts,
            denominator: config.denominator(),
        }
    }

    /// The fixed share denominator.
    #[must_use]
    pub fn denominator(&self) -> Wad {
        self.denominator
    }

    /// Share weight of a key (0 for unknown or reassigned keys).
    #[must_use]
    pub fn weight_of(&self, addr: Address) -> Wad {
        self.accounts.get(&addr).map_or(0, |a| a.share_weight)
    }

    /// Claimed amount recorded against a key.
    #[must_use]
    pub fn claimed_of(&self, addr: Address) -> Wad {
        self.accounts.get(&addr).map_or(0, |a| a.claimed)
    }

    /// Look up a slot record.
    #[must_use]
    pub fn get(&self, addr: Address) -> Option<&VestingAccount> {
        self.accounts.get(&addr)
    }

    /// Record a payout against a key.
    ///
    /// # Errors
    /// Returns [`ProrataError::ArithmeticOverflow`] if the running claimed
    /// amount would exceed `u128`.
    pub fn add_claimed(&mut self, addr: Address, amount: Wad) -> Result<()> {
        let account = self.accounts.entry(addr).or_default();
        account.claimed = account
            .claimed
            .checked_add(amount)
            .ok_or(ProrataError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Force-set a key's claimed amount (privileged correction path).
    pub fn set_claimed(&mut self, addr: Address, amount: Wad) {
        self.accounts.entry(addr).or_default().claimed = amount;
    }

    /// Move a slot from `old` to `new`: the new key inherits the weight
    /// and claim history, the old key's weight is zeroed and its record
    /// retained.
    ///
    /// Returns `(share_weight, claimed)` as carried to the new key.
    ///
    /// # Errors
    /// Returns [`ProrataError::BeneficiarySlotOccupied`] if `new` already
    /// holds a live (non-zero-weight) slot — merging slots would corrupt
    /// the fixed denominator's meaning.
    pub fn reassign(&mut self, old: Address, new: Address) -> Result<(Wad, Wad)> {
        if self.weight_of(new) > 0 {
            return Err(ProrataError::BeneficiarySlotOccupied(new));
        }
        let (weight, claimed) = {
            let record = self.accounts.entry(old).or_default();
            let carried = (record.share_weight, record.claimed);
            record.share_weight = 0;
            carried
        };
        self.accounts.insert(
            new,
            VestingAccount {
                share_weight: weight,
                claimed,
            },
        );
        Ok((weight, claimed))
    }

    /// Number of slot records (live and historical).
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the table has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
