//! The subscription sale state machine.
//!
//! Phases are never stored. Every operation derives the current phase from
//! the clock and the emergency latch, so state and time can never fall out
//! of sync. All latches (emergency, forwarded, per-account settled) are
//! one-way check-then-set transitions enforced inside the operation.

use prorata_types::{
    Address, Clock, EmergencyReceipt, ForwardReceipt, ProrataError, ReceiptId, Result,
    SaleConfig, SalePhase, SettlementReceipt, Timestamp, TokenTransfer, Wad,
    wad::{self, WAD},
};

use crate::commitment::CommitmentBook;

/// A deployed subscription sale holding two-asset escrow in custody.
#[derive(Debug)]
pub struct SubscriptionSale {
    config: SaleConfig,
    /// The sale's own custody address on the token ledger.
    custody: Address,
    book: CommitmentBook,
    /// Sum of all committed pool units (wad).
    total_committed: Wad,
    /// One-way emergency latch. **Irreversible.**
    emergency: bool,
    /// One-way forwarding latch. **Irreversible.**
    funds_forwarded: bool,
    clock: Clock,
}

impl SubscriptionSale {
    /// Create a sale from validated config.
    #[must_use]
    pub fn new(config: SaleConfig, custody: Address, clock: Clock) -> Self {
        Self {
            config,
            custody,
            book: CommitmentBook::new(),
            total_committed: 0,
            emergency: false,
            funds_forwarded: false,
            clock,
        }
    }

    /// The immutable sale parameters.
    #[must_use]
    pub fn config(&self) -> &SaleConfig {
        &self.config
    }

    /// The sale's custody address.
    #[must_use]
    pub fn custody(&self) -> Address {
        self.custody
    }

    /// Pin the clock (test support).
    pub fn set_timestamp(&mut self, ts: Timestamp) {
        self.clock.set_timestamp(ts);
    }

    // ------------------------------------------------------------------
    // Phase derivation
    // ------------------------------------------------------------------

    /// Derive the current phase from the clock and the emergency latch.
    #[must_use]
    pub fn phase(&self) -> SalePhase {
        if self.emergency {
            return SalePhase::Emergency;
        }
        let now = self.clock.now();
        if now < self.config.open_time {
            SalePhase::Pending
        } else if now < self.config.close_time {
            SalePhase::Open
        } else if now < self.config.settle_time {
            SalePhase::Closed
        } else {
            SalePhase::Settleable
        }
    }

    /// Whether contributions are currently accepted.
    #[must_use]
    pub fn is_commitable(&self) -> bool {
        self.phase() == SalePhase::Open
    }

    /// Alias for [`is_commitable`](Self::is_commitable).
    #[must_use]
    pub fn is_purchaseable(&self) -> bool {
        self.is_commitable()
    }

    /// Whether settlement and forwarding are currently available.
    #[must_use]
    pub fn is_settleable(&self) -> bool {
        self.phase() == SalePhase::Settleable
    }

    /// Whether the emergency latch is set.
    #[must_use]
    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    /// Whether the fund sweep has run.
    #[must_use]
    pub fn is_forwarded(&self) -> bool {
        self.funds_forwarded
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Sum of all committed pool units.
    #[must_use]
    pub fn total_commitment(&self) -> Wad {
        self.total_committed
    }

    /// Pool units that will actually be distributed:
    /// `min(total_committed, subscription_cap)`.
    #[must_use]
    pub fn total_allocated_supply(&self) -> Wad {
        self.total_committed.min(self.config.subscription_cap)
    }

    /// Uniform pro-rata scaling factor, fixed point, always ≥ WAD.
    ///
    /// Under-subscription (and the empty sale) yield exactly WAD.
    pub fn commitment_rate(&self) -> Result<Wad> {
        if self.total_committed == 0 {
            return Ok(WAD);
        }
        let rate = wad::wdiv(self.total_committed, self.total_allocated_supply())?;
        Ok(rate.max(WAD))
    }

    /// Pool units committed by an account (0 if unknown).
    #[must_use]
    pub fn commitment_of(&self, account: Address) -> Wad {
        self.book.amount_of(account)
    }

    /// Whether an account has been settled.
    #[must_use]
    pub fn is_settled(&self, account: Address) -> bool {
        self.book.is_settled(account)
    }

    /// The account's allocated share under the current totals:
    /// `commitment / rate`, floored.
    ///
    /// Computable before or after settlement — it only reads aggregates.
    pub fn share_of(&self, account: Address) -> Result<Wad> {
        let committed = self.book.amount_of(account);
        if committed == 0 {
            return Ok(0);
        }
        wad::wdiv(committed, self.commitment_rate()?)
    }

    /// Alias for [`share_of`](Self::share_of).
    pub fn quota_of(&self, account: Address) -> Result<Wad> {
        self.share_of(account)
    }

    /// Quote escrowed by an account: `commitment × unit_quote`.
    pub fn escrowed_quote(&self, account: Address) -> Result<Wad> {
        wad::wmul(self.book.amount_of(account), self.config.unit_quote)
    }

    /// Collateral escrowed by an account: `commitment × unit_collateral`.
    pub fn escrowed_collateral(&self, account: Address) -> Result<Wad> {
        wad::wmul(self.book.amount_of(account), self.config.unit_collateral)
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Commit `amount` pool units, escrowing both assets from `caller`.
    ///
    /// There is no cap check here: commitment is uncapped and
    /// oversubscription is resolved at settlement.
    ///
    /// # Errors
    /// - [`ProrataError::NotActive`] outside the OPEN phase
    /// - [`ProrataError::ZeroAmount`] for a zero contribution
    /// - [`ProrataError::InsufficientBalance`] if either escrow leg is
    ///   unfunded (checked before any transfer, so the operation is
    ///   all-or-nothing)
    pub fn contribute(
        &mut self,
        vault: &mut impl TokenTransfer,
        caller: Address,
        amount: Wad,
    ) -> Result<()> {
        let phase = self.phase();
        if phase != SalePhase::Open {
            return Err(ProrataError::NotActive {
                operation: "contribute",
                phase,
            });
        }
        if amount == 0 {
            return Err(ProrataError::ZeroAmount);
        }
        if self.book.is_settled(caller) {
            return Err(ProrataError::AlreadySettled(caller));
        }

        let quote_due = wad::wmul(amount, self.config.unit_quote)?;
        let collateral_due = wad::wmul(amount, self.config.unit_collateral)?;
        let new_total = self
            .total_committed
            .checked_add(amount)
            .ok_or(ProrataError::ArithmeticOverflow)?;

        // Both escrow legs must be funded before either moves.
        ensure_funded(vault, &self.config.quote_asset, caller, quote_due)?;
        ensure_funded(vault, &self.config.collateral_asset, caller, collateral_due)?;

        vault.transfer(&self.config.quote_asset, caller, self.custody, quote_due)?;
        vault.transfer(
            &self.config.collateral_asset,
            caller,
            self.custody,
            collateral_due,
        )?;

        self.book.record(caller, amount)?;
        self.total_committed = new_total;

        tracing::debug!(
            caller = %caller,
            amount,
            total = self.total_committed,
            "commitment recorded"
        );
        Ok(())
    }

    /// Settle one account pro-rata.
    ///
    /// Releases collateral for the allocated units and refunds the
    /// unallocated remainder of the stake (together: the full collateral
    /// escrow), refunds quote for the unallocated units, and retains
    /// `allocated × unit_quote` in custody for the fund sweep. One-shot per
    /// account.
    ///
    /// # Errors
    /// - [`ProrataError::NotAvailableInEmergency`] once the latch is set
    /// - [`ProrataError::NotActive`] before the settle time
    /// - [`ProrataError::AlreadySettled`] on a second call
    pub fn settle(
        &mut self,
        vault: &mut impl TokenTransfer,
        account: Address,
    ) -> Result<SettlementReceipt> {
        if self.emergency {
            return Err(ProrataError::NotAvailableInEmergency {
                operation: "settle",
            });
        }
        let phase = self.phase();
        if phase != SalePhase::Settleable {
            return Err(ProrataError::NotActive {
                operation: "settle",
                phase,
            });
        }
        if self.book.is_settled(account) {
            return Err(ProrataError::AlreadySettled(account));
        }

        let committed = self.book.amount_of(account);
        let allocated = self.share_of(account)?;
        let unallocated = committed - allocated;

        // The full collateral stake goes back: the allocated part released,
        // the rest refunded. Flooring dust lands in the refund leg so
        // custody holds no collateral once every account settles.
        let escrowed_collateral = wad::wmul(committed, self.config.unit_collateral)?;
        let collateral_released = wad::wmul(allocated, self.config.unit_collateral)?;
        let collateral_refunded = escrowed_collateral - collateral_released;

        // Quote refund floors toward zero: dust stays in custody and is
        // absorbed by the sweep.
        let escrowed_quote = wad::wmul(committed, self.config.unit_quote)?;
        let quote_refunded = wad::wmul(unallocated, self.config.unit_quote)?;
        let quote_retained = escrowed_quote - quote_refunded;

        self.book.mark_settled(account)?;
        vault.transfer(
            &self.config.collateral_asset,
            self.custody,
            account,
            escrowed_collateral,
        )?;
        vault.transfer(&self.config.quote_asset, self.custody, account, quote_refunded)?;

        tracing::info!(
            account = %account,
            committed,
            allocated,
            quote_retained,
            "account settled"
        );

        Ok(SettlementReceipt {
            id: ReceiptId::new(),
            account,
            committed,
            allocated,
            collateral_released,
            collateral_refunded,
            quote_refunded,
            quote_retained,
            issued_at: self.clock.now(),
        })
    }

    /// Unwind one account at its full original escrow, unscaled.
    ///
    /// Emergency mode abandons pro-rata allocation entirely.
    ///
    /// # Errors
    /// - [`ProrataError::EmergencyOnly`] unless the latch is set
    /// - [`ProrataError::AlreadySettled`] on a second call
    pub fn emergency_settle(
        &mut self,
        vault: &mut impl TokenTransfer,
        account: Address,
    ) -> Result<EmergencyReceipt> {
        if !self.emergency {
            return Err(ProrataError::EmergencyOnly);
        }
        if self.book.is_settled(account) {
            return Err(ProrataError::AlreadySettled(account));
        }

        let committed = self.book.amount_of(account);
        let quote_refunded = wad::wmul(committed, self.config.unit_quote)?;
        let collateral_refunded = wad::wmul(committed, self.config.unit_collateral)?;

        self.book.mark_settled(account)?;
        vault.transfer(&self.config.quote_asset, self.custody, account, quote_refunded)?;
        vault.transfer(
            &self.config.collateral_asset,
            self.custody,
            account,
            collateral_refunded,
        )?;

        tracing::info!(
            account = %account,
            quote_refunded,
            collateral_refunded,
            "emergency unwind"
        );

        Ok(EmergencyReceipt {
            id: ReceiptId::new(),
            account,
            quote_refunded,
            collateral_refunded,
            issued_at: self.clock.now(),
        })
    }

    /// Sweep custody's entire remaining quote balance to the beneficiary.
    ///
    /// One-shot: the latch makes a second call fail — it never re-sweeps.
    ///
    /// # Errors
    /// - [`ProrataError::NotAvailableInEmergency`] once the latch is set
    /// - [`ProrataError::NotActive`] before the settle time
    /// - [`ProrataError::AlreadyForwarded`] on a second call
    pub fn forward_funds(&mut self, vault: &mut impl TokenTransfer) -> Result<ForwardReceipt> {
        if self.emergency {
            return Err(ProrataError::NotAvailableInEmergency {
                operation: "forward_funds",
            });
        }
        let phase = self.phase();
        if phase != SalePhase::Settleable {
            return Err(ProrataError::NotActive {
                operation: "forward_funds",
                phase,
            });
        }
        if self.funds_forwarded {
            return Err(ProrataError::AlreadyForwarded);
        }

        self.funds_forwarded = true;
        let quote_swept = vault.balance_of(&self.config.quote_asset, self.custody);
        vault.transfer(
            &self.config.quote_asset,
            self.custody,
            self.config.beneficiary,
            quote_swept,
        )?;

        tracing::info!(
            beneficiary = %self.config.beneficiary,
            quote_swept,
            "funds forwarded"
        );

        Ok(ForwardReceipt {
            id: ReceiptId::new(),
            beneficiary: self.config.beneficiary,
            quote_swept,
            issued_at: self.clock.now(),
        })
    }

    /// Declare an emergency. One-way, no time restriction.
    ///
    /// # Errors
    /// Returns [`ProrataError::AlreadyInEmergency`] if already latched.
    pub fn set_emergency(&mut self) -> Result<()> {
        if self.emergency {
            return Err(ProrataError::AlreadyInEmergency);
        }
        self.emergency = true;
        tracing::warn!("emergency latch set");
        Ok(())
    }
}

/// Fail with `InsufficientBalance` unless `holder` can cover `needed`.
fn ensure_funded(
    vault: &impl TokenTransfer,
    asset: &str,
    holder: Address,
    needed: Wad,
) -> Result<()> {
    let available = vault.balance_of(asset, holder);
    if available < needed {
        return Err(ProrataError::InsufficientBalance {
            asset: asset.to_string(),
            needed,
            available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use prorata_types::TokenVault;

    use super::*;

    const CUSTODY: Address = Address([0xCC; 32]);
    const BENEFICIARY: Address = Address([0xBB; 32]);
    const ALICE: Address = Address([1u8; 32]);
    const BOB: Address = Address([2u8; 32]);

    const QUOTE: &str = "USDC";
    const COLLATERAL: &str = "MCB";

    fn config() -> SaleConfig {
        SaleConfig::new(
            QUOTE,
            COLLATERAL,
            BENEFICIARY,
            1_000,
            2_000,
            3_000,
            100_000 * WAD,
            10 * WAD,
            4 * WAD,
        )
        .unwrap()
    }

    fn sale_at(ts: Timestamp) -> SubscriptionSale {
        SubscriptionSale::new(config(), CUSTODY, Clock::fixed(ts))
    }

    fn funded_vault() -> TokenVault {
        let mut vault = TokenVault::new();
        for user in [ALICE, BOB] {
            vault.mint(QUOTE, user, 10_000_000 * WAD);
            vault.mint(COLLATERAL, user, 10_000_000 * WAD);
        }
        vault
    }

    // ──────────────────── Phase derivation ────────────────────

    #[test]
    fn phase_follows_the_clock() {
        let mut sale = sale_at(0);
        assert_eq!(sale.phase(), SalePhase::Pending);
        sale.set_timestamp(1_000);
        assert_eq!(sale.phase(), SalePhase::Open);
        sale.set_timestamp(1_999);
        assert_eq!(sale.phase(), SalePhase::Open);
        sale.set_timestamp(2_000);
        assert_eq!(sale.phase(), SalePhase::Closed);
        sale.set_timestamp(3_000);
        assert_eq!(sale.phase(), SalePhase::Settleable);
    }

    #[test]
    fn emergency_overrides_time() {
        let mut sale = sale_at(1_500);
        sale.set_emergency().unwrap();
        assert_eq!(sale.phase(), SalePhase::Emergency);
        // Still EMERGENCY past the settle time.
        sale.set_timestamp(9_999);
        assert_eq!(sale.phase(), SalePhase::Emergency);
    }

    #[test]
    fn commitable_and_settleable_views() {
        let mut sale = sale_at(1_500);
        assert!(sale.is_commitable());
        assert!(sale.is_purchaseable());
        assert!(!sale.is_settleable());
        sale.set_timestamp(3_000);
        assert!(!sale.is_commitable());
        assert!(sale.is_settleable());
    }

    // ──────────────────── Contribute ────────────────────

    #[test]
    fn contribute_escrows_both_assets() {
        let mut vault = funded_vault();
        let mut sale = sale_at(1_500);

        sale.contribute(&mut vault, ALICE, 1_000 * WAD).unwrap();

        assert_eq!(sale.commitment_of(ALICE), 1_000 * WAD);
        assert_eq!(sale.total_commitment(), 1_000 * WAD);
        assert_eq!(vault.balance_of(QUOTE, CUSTODY), 10_000 * WAD);
        assert_eq!(vault.balance_of(COLLATERAL, CUSTODY), 4_000 * WAD);
    }

    #[test]
    fn contribute_accumulates() {
        let mut vault = funded_vault();
        let mut sale = sale_at(1_500);
        sale.contribute(&mut vault, ALICE, 100 * WAD).unwrap();
        sale.contribute(&mut vault, ALICE, 200 * WAD).unwrap();
        assert_eq!(sale.commitment_of(ALICE), 300 * WAD);
    }

    #[test]
    fn contribute_zero_rejected() {
        let mut vault = funded_vault();
        let mut sale = sale_at(1_500);
        let err = sale.contribute(&mut vault, ALICE, 0).unwrap_err();
        assert!(matches!(err, ProrataError::ZeroAmount));
    }

    #[test]
    fn contribute_outside_open_rejected() {
        let mut vault = funded_vault();
        for ts in [0, 2_000, 3_000] {
            let mut sale = sale_at(ts);
            let err = sale.contribute(&mut vault, ALICE, WAD).unwrap_err();
            assert!(matches!(err, ProrataError::NotActive { .. }), "ts={ts}");
        }
    }

    #[test]
    fn contribute_in_emergency_rejected() {
        let mut vault = funded_vault();
        let mut sale = sale_at(1_500);
        sale.set_emergency().unwrap();
        let err = sale.contribute(&mut vault, ALICE, WAD).unwrap_err();
        assert!(matches!(
            err,
            ProrataError::NotActive {
                phase: SalePhase::Emergency,
                ..
            }
        ));
    }

    #[test]
    fn underfunded_contribution_moves_nothing() {
        let mut vault = TokenVault::new();
        // Enough quote, not enough collateral.
        vault.mint(QUOTE, ALICE, 10_000 * WAD);
        vault.mint(COLLATERAL, ALICE, WAD);
        let mut sale = sale_at(1_500);

        let err = sale.contribute(&mut vault, ALICE, 1_000 * WAD).unwrap_err();
        assert!(matches!(err, ProrataError::InsufficientBalance { .. }));
        // Neither escrow leg moved.
        assert_eq!(vault.balance_of(QUOTE, CUSTODY), 0);
        assert_eq!(vault.balance_of(COLLATERAL, CUSTODY), 0);
        assert_eq!(sale.total_commitment(), 0);
    }

    // ──────────────────── Rate & share views ────────────────────

    #[test]
    fn empty_sale_rate_is_one() {
        let sale = sale_at(1_500);
        assert_eq!(sale.commitment_rate().unwrap(), WAD);
        assert_eq!(sale.total_allocated_supply(), 0);
    }

    #[test]
    fn undersubscribed_rate_is_one() {
        let mut vault = funded_vault();
        let mut sale = sale_at(1_500);
        sale.contribute(&mut vault, ALICE, 40_000 * WAD).unwrap();
        sale.contribute(&mut vault, BOB, 20_000 * WAD).unwrap();

        assert_eq!(sale.total_allocated_supply(), 60_000 * WAD);
        assert_eq!(sale.commitment_rate().unwrap(), WAD);
        assert_eq!(sale.share_of(ALICE).unwrap(), 40_000 * WAD);
        assert_eq!(sale.share_of(BOB).unwrap(), 20_000 * WAD);
    }

    #[test]
    fn oversubscribed_rate_scales_shares() {
        let mut vault = funded_vault();
        let mut sale = sale_at(1_500);
        sale.contribute(&mut vault, ALICE, 120_000 * WAD).unwrap();
        sale.contribute(&mut vault, BOB, 40_000 * WAD).unwrap();

        assert_eq!(sale.total_allocated_supply(), 100_000 * WAD);
        // 160000 / 100000 = 1.6
        assert_eq!(sale.commitment_rate().unwrap(), 16 * WAD / 10);
        assert_eq!(sale.share_of(ALICE).unwrap(), 75_000 * WAD);
        assert_eq!(sale.share_of(BOB).unwrap(), 25_000 * WAD);
    }

    #[test]
    fn share_of_unknown_account_is_zero() {
        let sale = sale_at(1_500);
        assert_eq!(sale.share_of(ALICE).unwrap(), 0);
        assert_eq!(sale.quota_of(ALICE).unwrap(), 0);
    }

    // ──────────────────── Settle gating ────────────────────

    #[test]
    fn settle_before_settle_time_rejected() {
        let mut vault = funded_vault();
        let mut sale = sale_at(1_500);
        sale.contribute(&mut vault, ALICE, WAD).unwrap();
        let err = sale.settle(&mut vault, ALICE).unwrap_err();
        assert!(matches!(
            err,
            ProrataError::NotActive {
                operation: "settle",
                ..
            }
        ));
    }

    #[test]
    fn double_settle_rejected() {
        let mut vault = funded_vault();
        let mut sale = sale_at(1_500);
        sale.contribute(&mut vault, ALICE, 100 * WAD).unwrap();
        sale.set_timestamp(3_000);
        sale.settle(&mut vault, ALICE).unwrap();
        let err = sale.settle(&mut vault, ALICE).unwrap_err();
        assert!(matches!(err, ProrataError::AlreadySettled(a) if a == ALICE));
    }

    #[test]
    fn settle_in_emergency_rejected() {
        let mut vault = funded_vault();
        let mut sale = sale_at(1_500);
        sale.contribute(&mut vault, ALICE, WAD).unwrap();
        sale.set_emergency().unwrap();
        sale.set_timestamp(3_000);
        let err = sale.settle(&mut vault, ALICE).unwrap_err();
        assert!(matches!(err, ProrataError::NotAvailableInEmergency { .. }));
    }

    #[test]
    fn settle_unknown_account_moves_nothing() {
        let mut vault = funded_vault();
        let mut sale = sale_at(3_000);
        let receipt = sale.settle(&mut vault, BOB).unwrap();
        assert_eq!(receipt.committed, 0);
        assert_eq!(receipt.allocated, 0);
        assert!(sale.is_settled(BOB));
    }

    // ──────────────────── Emergency gating ────────────────────

    #[test]
    fn emergency_settle_requires_latch() {
        let mut vault = funded_vault();
        let mut sale = sale_at(1_500);
        sale.contribute(&mut vault, ALICE, WAD).unwrap();
        let err = sale.emergency_settle(&mut vault, ALICE).unwrap_err();
        assert!(matches!(err, ProrataError::EmergencyOnly));
    }

    #[test]
    fn set_emergency_is_one_way() {
        let mut sale = sale_at(1_500);
        sale.set_emergency().unwrap();
        let err = sale.set_emergency().unwrap_err();
        assert!(matches!(err, ProrataError::AlreadyInEmergency));
        assert!(sale.is_emergency());
    }

    #[test]
    fn emergency_callable_while_open_and_closed() {
        let mut sale = sale_at(1_500);
        assert!(sale.set_emergency().is_ok());

        let mut sale = sale_at(2_500);
        assert!(sale.set_emergency().is_ok());
    }

    // ──────────────────── Forwarding gating ────────────────────

    #[test]
    fn forward_before_settle_time_rejected() {
        let mut vault = funded_vault();
        let mut sale = sale_at(2_500);
        let err = sale.forward_funds(&mut vault).unwrap_err();
        assert!(matches!(err, ProrataError::NotActive { .. }));
    }

    #[test]
    fn double_forward_rejected() {
        let mut vault = funded_vault();
        let mut sale = sale_at(3_000);
        assert!(!sale.is_forwarded());
        sale.forward_funds(&mut vault).unwrap();
        assert!(sale.is_forwarded());
        let err = sale.forward_funds(&mut vault).unwrap_err();
        assert!(matches!(err, ProrataError::AlreadyForwarded));
    }

    #[test]
    fn forward_in_emergency_rejected() {
        let mut vault = funded_vault();
        let mut sale = sale_at(3_000);
        sale.set_emergency().unwrap();
        let err = sale.forward_funds(&mut vault).unwrap_err();
        assert!(matches!(err, ProrataError::NotAvailableInEmergency { .. }));
    }
}
