//! # prorata-vesting
//!
//! **Streaming vesting ledger**: a fixed set of beneficiary slots, each
//! with a static share weight, continuously accruing claims against the
//! running total of tokens ever deposited.
//!
//! There are no phases. At any moment a beneficiary can claim
//! `⌊cumulative_received × weight / denominator⌋ − claimed`; every new
//! deposit grows every live slot's claimable balance in proportion.
//!
//! Beneficiary identity is reassignable two ways:
//! - **direct** — [`VestingLedger::update_beneficiary`];
//! - **delegated** — [`VestingLedger::update_beneficiary_by_signature`],
//!   an off-chain-signed, domain-separated, nonce-protected
//!   [`UpdateBeneficiaryIntent`] submitted by any caller on the old
//!   beneficiary's behalf.
//!
//! Reassignment is move semantics: the new key inherits the slot's weight
//! and claim history, the old key's weight is zeroed, and the old record
//! is kept forever for audit.

pub mod account;
pub mod ledger;

pub use account::{ShareTable, VestingAccount};
pub use ledger::{UpdateBeneficiaryIntent, VestingLedger};
