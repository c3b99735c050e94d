//! The streaming vesting ledger.
//!
//! Claim accounting is a pure function of `cumulative_received`, the
//! running total of the vesting asset ever pushed into custody. Nothing is
//! time-gated; the clock exists only to expire delegation signatures.

use prorata_authorization::{DomainSeparator, NonceRegistry, SignedIntent, intent_digest};
use prorata_types::{
    Address, ClaimReceipt, Clock, ProrataError, ReassignmentReceipt, ReceiptId, Result,
    Timestamp, TokenTransfer, VestingConfig, Wad, constants,
    wad,
};

use crate::account::{ShareTable, VestingAccount};

/// The typed struct an old beneficiary signs to delegate a reassignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateBeneficiaryIntent {
    pub old_beneficiary: Address,
    pub new_beneficiary: Address,
    pub nonce: u64,
    pub expires_at: Timestamp,
}

impl SignedIntent for UpdateBeneficiaryIntent {
    const TYPE_TAG: &'static [u8] = b"prorata:update-beneficiary:v1:";

    fn principal(&self) -> Address {
        self.old_beneficiary
    }

    fn nonce(&self) -> u64 {
        self.nonce
    }

    fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    fn encode_fields(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(80);
        out.extend_from_slice(self.old_beneficiary.as_bytes());
        out.extend_from_slice(self.new_beneficiary.as_bytes());
        out.extend_from_slice(&self.nonce.to_le_bytes());
        out.extend_from_slice(&self.expires_at.to_le_bytes());
        out
    }
}

/// A deployed vesting ledger holding the vesting asset in custody.
#[derive(Debug)]
pub struct VestingLedger {
    config: VestingConfig,
    /// The ledger's own custody address on the token ledger.
    custody: Address,
    /// Operator allowed to run privileged corrections.
    owner: Address,
    table: ShareTable,
    /// Running total of the vesting asset ever received.
    cumulative_received: Wad,
    /// Running total actually paid out to beneficiaries.
    total_claimed: Wad,
    nonces: NonceRegistry,
    domain: DomainSeparator,
    clock: Clock,
}

impl VestingLedger {
    /// Create a ledger from validated config.
    ///
    /// The delegation domain binds to `{VESTING_DOMAIN_NAME, chain_id,
    /// custody}`, so intents signed for one deployment are dead on every
    /// other.
    #[must_use]
    pub fn new(
        config: VestingConfig,
        custody: Address,
        owner: Address,
        chain_id: u64,
        clock: Clock,
    ) -> Self {
        let table = ShareTable::from_config(&config);
        let domain = DomainSeparator::new(constants::VESTING_DOMAIN_NAME, chain_id, custody);
        Self {
            config,
            custody,
            owner,
            table,
            cumulative_received: 0,
            total_claimed: 0,
            nonces: NonceRegistry::new(),
            domain,
            clock,
        }
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// The immutable vesting parameters.
    #[must_use]
    pub fn config(&self) -> &VestingConfig {
        &self.config
    }

    /// The ledger's custody address.
    #[must_use]
    pub fn custody(&self) -> Address {
        self.custody
    }

    /// The delegation domain.
    #[must_use]
    pub fn domain(&self) -> &DomainSeparator {
        &self.domain
    }

    /// Fixed share denominator (Σ weights at construction).
    #[must_use]
    pub fn denominator(&self) -> Wad {
        self.table.denominator()
    }

    /// Running total of tokens ever received.
    #[must_use]
    pub fn cumulative_received(&self) -> Wad {
        self.cumulative_received
    }

    /// Running total actually paid out.
    #[must_use]
    pub fn total_claimed(&self) -> Wad {
        self.total_claimed
    }

    /// The nonce the address's next delegation must carry.
    #[must_use]
    pub fn nonce_of(&self, addr: Address) -> u64 {
        self.nonces.expected(addr)
    }

    /// The slot record for a key, if any.
    #[must_use]
    pub fn account_of(&self, addr: Address) -> Option<&VestingAccount> {
        self.table.get(addr)
    }

    /// The address's share as a wad fraction (0 for severed/unknown keys).
    pub fn share_of(&self, addr: Address) -> Result<Wad> {
        wad::wdiv(self.table.weight_of(addr), self.table.denominator())
    }

    /// Currently claimable tokens:
    /// `⌊cumulative_received × weight / denominator⌋ − claimed`,
    /// saturating at zero.
    pub fn claimable(&self, addr: Address) -> Result<Wad> {
        Self::claimable_in(&self.table, self.cumulative_received, addr)
    }

    /// Pin the clock (test support).
    pub fn set_timestamp(&mut self, ts: Timestamp) {
        self.clock.set_timestamp(ts);
    }

    /// The digest an old beneficiary must sign to delegate a reassignment.
    #[must_use]
    pub fn delegation_digest(
        &self,
        old: Address,
        new: Address,
        nonce: u64,
        expires_at: Timestamp,
    ) -> [u8; 32] {
        let intent = UpdateBeneficiaryIntent {
            old_beneficiary: old,
            new_beneficiary: new,
            nonce,
            expires_at,
        };
        intent_digest(&self.domain, &intent)
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Push `amount` of the vesting asset from `from` into custody,
    /// growing every live slot's accrual basis.
    ///
    /// # Errors
    /// - [`ProrataError::ZeroAmount`] for a zero deposit
    /// - [`ProrataError::InsufficientBalance`] if `from` lacks funds
    pub fn deposit(
        &mut self,
        vault: &mut impl TokenTransfer,
        from: Address,
        amount: Wad,
    ) -> Result<()> {
        if amount == 0 {
            return Err(ProrataError::ZeroAmount);
        }
        let new_total = self
            .cumulative_received
            .checked_add(amount)
            .ok_or(ProrataError::ArithmeticOverflow)?;
        vault.transfer(&self.config.token_asset, from, self.custody, amount)?;
        self.cumulative_received = new_total;

        tracing::debug!(from = %from, amount, basis = new_total, "deposit received");
        Ok(())
    }

    /// Alias for [`deposit`](Self::deposit), kept for the original
    /// contract surface.
    pub fn donate(
        &mut self,
        vault: &mut impl TokenTransfer,
        from: Address,
        amount: Wad,
    ) -> Result<()> {
        self.deposit(vault, from, amount)
    }

    /// Pay out the beneficiary's full claimable balance.
    ///
    /// Callable by anyone: the destination is always the registered
    /// beneficiary address itself, so third-party invocation cannot
    /// redirect funds.
    ///
    /// # Errors
    /// Returns [`ProrataError::NothingToClaim`] when the claimable balance
    /// is zero.
    pub fn claim(
        &mut self,
        vault: &mut impl TokenTransfer,
        beneficiary: Address,
    ) -> Result<ClaimReceipt> {
        let amount = self.claimable(beneficiary)?;
        if amount == 0 {
            return Err(ProrataError::NothingToClaim(beneficiary));
        }

        self.table.add_claimed(beneficiary, amount)?;
        self.total_claimed = self
            .total_claimed
            .checked_add(amount)
            .ok_or(ProrataError::ArithmeticOverflow)?;
        vault.transfer(&self.config.token_asset, self.custody, beneficiary, amount)?;

        tracing::info!(beneficiary = %beneficiary, amount, "claim paid");

        Ok(ClaimReceipt {
            id: ReceiptId::new(),
            beneficiary,
            amount,
            cumulative_received: self.cumulative_received,
            issued_at: self.clock.now(),
        })
    }

    /// Reassign a slot directly: `old`'s weight and claim history move to
    /// `new`.
    ///
    /// # Errors
    /// - [`ProrataError::OldBeneficiaryExhausted`] unless `old` has a
    ///   non-zero claimable balance at the moment of the call
    /// - [`ProrataError::BeneficiarySlotOccupied`] if `new` holds a live
    ///   slot
    pub fn update_beneficiary(
        &mut self,
        old: Address,
        new: Address,
    ) -> Result<ReassignmentReceipt> {
        let (share_weight, claimed_carried) =
            Self::reassign_gated(&mut self.table, self.cumulative_received, old, new)?;
        tracing::info!(old = %old, new = %new, "beneficiary reassigned");
        Ok(ReassignmentReceipt {
            id: ReceiptId::new(),
            old_beneficiary: old,
            new_beneficiary: new,
            share_weight,
            claimed_carried,
            delegated: false,
            issued_at: self.clock.now(),
        })
    }

    /// Reassign a slot on the strength of the old beneficiary's off-chain
    /// signature over an [`UpdateBeneficiaryIntent`].
    ///
    /// Check order: expiry, signer, nonce, then the same claimable gate as
    /// the direct path. The nonce is consumed only when the whole
    /// operation succeeds, so a rejected intent can be resubmitted.
    ///
    /// # Errors
    /// [`ProrataError::SignatureExpired`], [`ProrataError::SignerMismatch`],
    /// [`ProrataError::InvalidSignature`], [`ProrataError::InvalidNonce`],
    /// plus the direct path's gating errors.
    pub fn update_beneficiary_by_signature(
        &mut self,
        old: Address,
        new: Address,
        nonce: u64,
        expires_at: Timestamp,
        signature: &[u8],
    ) -> Result<ReassignmentReceipt> {
        let intent = UpdateBeneficiaryIntent {
            old_beneficiary: old,
            new_beneficiary: new,
            nonce,
            expires_at,
        };
        let now = self.clock.now();
        let table = &mut self.table;
        let cumulative = self.cumulative_received;
        let (share_weight, claimed_carried) = prorata_authorization::authorize(
            &self.domain,
            &intent,
            signature,
            &mut self.nonces,
            now,
            || Self::reassign_gated(table, cumulative, old, new),
        )?;

        tracing::info!(old = %old, new = %new, nonce, "beneficiary reassigned by signature");
        Ok(ReassignmentReceipt {
            id: ReceiptId::new(),
            old_beneficiary: old,
            new_beneficiary: new,
            share_weight,
            claimed_carried,
            delegated: true,
            issued_at: now,
        })
    }

    /// Force-set a key's claimed amount (migration/correction path).
    ///
    /// Bypasses accrual checks entirely; the key's claimable balance may
    /// saturate at zero until the accrual curve catches up.
    ///
    /// # Errors
    /// Returns [`ProrataError::NotOwner`] unless `caller` is the
    /// configured operator.
    pub fn set_claimed(&mut self, caller: Address, account: Address, amount: Wad) -> Result<()> {
        if caller != self.owner {
            return Err(ProrataError::NotOwner);
        }
        self.table.set_claimed(account, amount);
        tracing::warn!(account = %account, amount, "claimed amount force-set");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn claimable_in(table: &ShareTable, cumulative: Wad, addr: Address) -> Result<Wad> {
        let weight = table.weight_of(addr);
        if weight == 0 {
            return Ok(0);
        }
        let accrued = wad::mul_div(cumulative, weight, table.denominator())?;
        Ok(accrued.saturating_sub(table.claimed_of(addr)))
    }

    /// The shared mutation behind both reassignment paths, including the
    /// claimable gate.
    fn reassign_gated(
        table: &mut ShareTable,
        cumulative: Wad,
        old: Address,
        new: Address,
    ) -> Result<(Wad, Wad)> {
        if Self::claimable_in(table, cumulative, old)? == 0 {
            return Err(ProrataError::OldBeneficiaryExhausted(old));
        }
        table.reassign(old, new)
    }
}
