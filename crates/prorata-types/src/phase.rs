//! Sale phase model.
//!
//! Phases are never stored: the subscription engine derives the current
//! phase from `(now, emergency latch)` on every call. This enum is only the
//! *result* of that derivation, used for gating and error reporting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five derived phases of a subscription sale.
///
/// Time moves a sale PENDING → OPEN → CLOSED → SETTLEABLE. The emergency
/// latch overrides the time axis entirely and is permanent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalePhase {
    /// Before the open time. Nothing is accepted yet.
    Pending,
    /// Commit window: contributions are accepted.
    Open,
    /// Dead zone between close and settle: no contributions, no settlement.
    Closed,
    /// At or after the settle time: settlement and forwarding are available.
    Settleable,
    /// Emergency latch set: only the full-unwind path is available.
    /// **Irreversible.**
    Emergency,
}

impl fmt::Display for SalePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
            Self::Settleable => write!(f, "SETTLEABLE"),
            Self::Emergency => write!(f, "EMERGENCY"),
        }
    }
}
