//! # prorata-subscription
//!
//! **Subscription settlement**: the time-gated sale state machine.
//!
//! ## Lifecycle
//!
//! ```text
//!   PENDING ──open──▶ OPEN ──close──▶ CLOSED ──settle──▶ SETTLEABLE
//!                       │               │
//!                       └── emergency ──┴──▶ EMERGENCY (permanent)
//! ```
//!
//! During OPEN, contributors escrow two assets per committed pool unit —
//! commitment is deliberately uncapped. At SETTLEABLE, each account settles
//! once: allocations are scaled down by a uniform commitment rate when the
//! pool is oversubscribed, the full collateral stake returns, and quote
//! for unallocated units is refunded. A one-shot sweep forwards the
//! retained quote revenue to the sale beneficiary. The EMERGENCY latch
//! abandons pro-rata allocation entirely and unwinds every position at its
//! original escrow.
//!
//! Accepting unlimited interest during the window and resolving fairness
//! from the final aggregate alone keeps the outcome independent of arrival
//! order — there is no first-come-first-served race to win.

pub mod commitment;
pub mod sale;

pub use commitment::{Commitment, CommitmentBook};
pub use sale::SubscriptionSale;
