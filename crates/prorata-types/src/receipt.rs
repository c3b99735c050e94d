//! Audit receipts for fund-moving operations.
//!
//! Every operation that moves custody balances returns a typed receipt so
//! callers can build an append-only audit trail without re-deriving the
//! amounts. Receipts are plain data — serialization is the caller's choice.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Address, Timestamp, Wad};

/// Globally unique receipt identifier. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ReceiptId(pub Uuid);

impl ReceiptId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ReceiptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rcpt:{}", self.0)
    }
}

/// Outcome of a pro-rata settlement for one account.
///
/// `collateral_released + collateral_refunded` equals the account's full
/// collateral escrow; `quote_refunded + quote_retained` equals its full
/// quote escrow. The retained quote stays in custody for the fund sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub id: ReceiptId,
    pub account: Address,
    /// Pool units originally committed (wad).
    pub committed: Wad,
    /// Pool units allocated after pro-rata scaling (wad).
    pub allocated: Wad,
    /// Collateral released for the allocated units.
    pub collateral_released: Wad,
    /// Collateral refunded for the unallocated units.
    pub collateral_refunded: Wad,
    /// Quote refunded for the unallocated units.
    pub quote_refunded: Wad,
    /// Quote retained in custody for the beneficiary sweep.
    pub quote_retained: Wad,
    pub issued_at: Timestamp,
}

/// Outcome of an emergency unwind for one account: the full original
/// escrow of both assets, unscaled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyReceipt {
    pub id: ReceiptId,
    pub account: Address,
    pub quote_refunded: Wad,
    pub collateral_refunded: Wad,
    pub issued_at: Timestamp,
}

/// Outcome of the one-shot fund sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardReceipt {
    pub id: ReceiptId,
    pub beneficiary: Address,
    /// Entire remaining quote custody balance, dust included.
    pub quote_swept: Wad,
    pub issued_at: Timestamp,
}

/// Outcome of a vesting claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimReceipt {
    pub id: ReceiptId,
    pub beneficiary: Address,
    pub amount: Wad,
    /// Cumulative deposits at claim time (the accrual basis).
    pub cumulative_received: Wad,
    pub issued_at: Timestamp,
}

/// Outcome of a beneficiary reassignment (direct or delegated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignmentReceipt {
    pub id: ReceiptId,
    pub old_beneficiary: Address,
    pub new_beneficiary: Address,
    /// Share weight carried to the new key.
    pub share_weight: Wad,
    /// Claim history carried to the new key.
    pub claimed_carried: Wad,
    /// Whether the reassignment was authorized by an off-chain signature.
    pub delegated: bool,
    pub issued_at: Timestamp,
}
