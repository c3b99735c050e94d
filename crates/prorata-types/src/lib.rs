//! # prorata-types
//!
//! Shared types, errors, and configuration for the **Pro-Rata**
//! pooled-asset distribution engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`Asset`], [`ReceiptId`]
//! - **Fixed-point arithmetic**: the [`wad`] module (`mul_div`, `proportion`, `wmul`, `wdiv`)
//! - **Clock source**: [`Clock`], [`Timestamp`]
//! - **Token capability**: [`TokenTransfer`], [`TokenVault`]
//! - **Configuration**: [`SaleConfig`], [`VestingConfig`]
//! - **Phase model**: [`SalePhase`]
//! - **Receipts**: [`SettlementReceipt`], [`ClaimReceipt`], and friends
//! - **Errors**: [`ProrataError`] with `PR_ERR_` prefix codes

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod phase;
pub mod receipt;
pub mod token;
pub mod wad;

// Re-export all primary types at crate root for ergonomic imports:
//   use prorata_types::{Address, SaleConfig, SalePhase, ...};

pub use clock::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use phase::*;
pub use receipt::*;
pub use token::*;
pub use wad::Wad;

// Constants are accessed via `prorata_types::constants::FOO`
// (not re-exported to avoid name collisions). The `wad` module is used
// qualified (`wad::wmul`) except for the `Wad` alias itself.
