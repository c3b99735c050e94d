//! Immutable configuration for sales and vesting ledgers.
//!
//! Both configs are validated once at construction and never mutated.
//! Pricing and collateral ratios are deployment constants, not algorithmic
//! content — they live here as plain fields.

use serde::{Deserialize, Serialize};

use crate::{Address, Asset, ProrataError, Result, Timestamp, Wad};

/// Immutable parameters of a subscription sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleConfig {
    /// Asset paid by contributors and forwarded to the beneficiary.
    pub quote_asset: Asset,
    /// Asset staked alongside the quote and returned at settlement.
    pub collateral_asset: Asset,
    /// Recipient of the fund sweep.
    pub beneficiary: Address,
    /// Commit window opens (inclusive).
    pub open_time: Timestamp,
    /// Commit window closes (exclusive).
    pub close_time: Timestamp,
    /// Settlement becomes available (inclusive).
    pub settle_time: Timestamp,
    /// Maximum allocatable pool units (wad).
    pub subscription_cap: Wad,
    /// Quote escrowed per pool unit (wad).
    pub unit_quote: Wad,
    /// Collateral escrowed per pool unit (wad).
    pub unit_collateral: Wad,
}

impl SaleConfig {
    /// Validate and construct a sale config.
    ///
    /// # Errors
    /// Returns [`ProrataError::InvalidConfig`] unless
    /// `open_time < close_time <= settle_time`, the cap and both exchange
    /// constants are non-zero, and the two assets are distinct.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        quote_asset: impl Into<Asset>,
        collateral_asset: impl Into<Asset>,
        beneficiary: Address,
        open_time: Timestamp,
        close_time: Timestamp,
        settle_time: Timestamp,
        subscription_cap: Wad,
        unit_quote: Wad,
        unit_collateral: Wad,
    ) -> Result<Self> {
        let quote_asset = quote_asset.into();
        let collateral_asset = collateral_asset.into();
        if open_time >= close_time {
            return Err(ProrataError::InvalidConfig {
                reason: format!("open_time {open_time} must precede close_time {close_time}"),
            });
        }
        if close_time > settle_time {
            return Err(ProrataError::InvalidConfig {
                reason: format!("close_time {close_time} must not exceed settle_time {settle_time}"),
            });
        }
        if subscription_cap == 0 {
            return Err(ProrataError::InvalidConfig {
                reason: "subscription_cap must be non-zero".to_string(),
            });
        }
        if unit_quote == 0 || unit_collateral == 0 {
            return Err(ProrataError::InvalidConfig {
                reason: "per-unit exchange constants must be non-zero".to_string(),
            });
        }
        if quote_asset == collateral_asset {
            return Err(ProrataError::InvalidConfig {
                reason: format!("quote and collateral assets must differ: {quote_asset}"),
            });
        }
        Ok(Self {
            quote_asset,
            collateral_asset,
            beneficiary,
            open_time,
            close_time,
            settle_time,
            subscription_cap,
            unit_quote,
            unit_collateral,
        })
    }
}

/// Immutable parameters of a streaming vesting ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VestingConfig {
    /// The vested asset.
    pub token_asset: Asset,
    /// Recorded start of the schedule. Distribution itself is purely
    /// deposit-driven; this field gates nothing.
    pub start_time: Timestamp,
    /// Ordered `(beneficiary, share_weight)` pairs.
    pub beneficiaries: Vec<(Address, Wad)>,
}

impl VestingConfig {
    /// Validate and construct a vesting config.
    ///
    /// # Errors
    /// Returns [`ProrataError::InvalidConfig`] if the beneficiary list is
    /// empty, any weight is zero, any address repeats, or the weight sum
    /// overflows.
    pub fn new(
        token_asset: impl Into<Asset>,
        start_time: Timestamp,
        beneficiaries: Vec<(Address, Wad)>,
    ) -> Result<Self> {
        if beneficiaries.is_empty() {
            return Err(ProrataError::InvalidConfig {
                reason: "at least one beneficiary required".to_string(),
            });
        }
        let mut sum: Wad = 0;
        for (i, (addr, weight)) in beneficiaries.iter().enumerate() {
            if *weight == 0 {
                return Err(ProrataError::InvalidConfig {
                    reason: format!("zero share weight for {addr}"),
                });
            }
            if beneficiaries[..i].iter().any(|(seen, _)| seen == addr) {
                return Err(ProrataError::InvalidConfig {
                    reason: format!("duplicate beneficiary {addr}"),
                });
            }
            sum = sum.checked_add(*weight).ok_or_else(|| {
                ProrataError::InvalidConfig {
                    reason: "share weight sum overflows".to_string(),
                }
            })?;
        }
        Ok(Self {
            token_asset: token_asset.into(),
            start_time,
            beneficiaries,
        })
    }

    /// Sum of all share weights — the fixed denominator of every share.
    #[must_use]
    pub fn denominator(&self) -> Wad {
        self.beneficiaries.iter().map(|(_, w)| w).sum()
    }
}
