//! Per-contributor commitment records.
//!
//! A [`Commitment`] accumulates across repeated contributions and carries a
//! one-way `settled` latch. Once settled, the record is immutable — every
//! later mutating call for that account fails. Records are never deleted,
//! so settled history stays auditable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use prorata_types::{Address, ProrataError, Result, Wad};

/// One contributor's recorded intent to acquire pool units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// Pool units committed (wad). Accumulates across contributions.
    pub amount: Wad,
    /// One-way settlement latch. **Irreversible.**
    pub settled: bool,
}

/// The ledger of all commitments, keyed by contributor address.
#[derive(Debug, Default)]
pub struct CommitmentBook {
    commitments: HashMap<Address, Commitment>,
}

impl CommitmentBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed pool units for an account (0 if unknown).
    #[must_use]
    pub fn amount_of(&self, account: Address) -> Wad {
        self.commitments.get(&account).map_or(0, |c| c.amount)
    }

    /// Whether the account's commitment has been settled.
    #[must_use]
    pub fn is_settled(&self, account: Address) -> bool {
        self.commitments.get(&account).is_some_and(|c| c.settled)
    }

    /// Look up a commitment record.
    #[must_use]
    pub fn get(&self, account: Address) -> Option<&Commitment> {
        self.commitments.get(&account)
    }

    /// Accumulate `amount` onto the account's commitment, creating the
    /// record on first contribution.
    ///
    /// # Errors
    /// - [`ProrataError::AlreadySettled`] if the record is latched
    /// - [`ProrataError::ArithmeticOverflow`] if the sum exceeds `u128`
    pub fn record(&mut self, account: Address, amount: Wad) -> Result<()> {
        let commitment = self.commitments.entry(account).or_default();
        if commitment.settled {
            return Err(ProrataError::AlreadySettled(account));
        }
        commitment.amount = commitment
            .amount
            .checked_add(amount)
            .ok_or(ProrataError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Latch the account's commitment as settled (check-then-set).
    ///
    /// Creates an empty record for an unknown account — settling an address
    /// that never contributed is permitted and moves nothing.
    ///
    /// # Errors
    /// Returns [`ProrataError::AlreadySettled`] if already latched.
    pub fn mark_settled(&mut self, account: Address) -> Result<()> {
        let commitment = self.commitments.entry(account).or_default();
        if commitment.settled {
            return Err(ProrataError::AlreadySettled(account));
        }
        commitment.settled = true;
        Ok(())
    }

    /// Number of commitment records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commitments.len()
    }

    /// Whether the book has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commitments.is_empty()
    }

    /// Number of settled records.
    #[must_use]
    pub fn settled_count(&self) -> usize {
        self.commitments.values().filter(|c| c.settled).count()
    }
}
