//! Error types for the Pro-Rata distribution engine.
//!
//! All errors use the `PR_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Phase violations
//! - 2xx: Duplicate operations (monotonic latches)
//! - 3xx: Emergency-mode violations
//! - 4xx: Amounts / custody
//! - 5xx: Authorization
//! - 6xx: Entitlement
//! - 7xx: Arithmetic
//! - 9xx: Configuration

use thiserror::Error;

use crate::{Address, Asset, SalePhase, Wad};

/// Central error enum for all Pro-Rata operations.
///
/// Every failure is local, synchronous, and non-retryable: the operation
/// that raised it has applied no state change.
#[derive(Debug, Error)]
pub enum ProrataError {
    // =================================================================
    // Phase Violations (1xx)
    // =================================================================
    /// The operation was attempted outside its valid sale phase.
    #[error("PR_ERR_100: {operation} not available in {phase} phase")]
    NotActive {
        operation: &'static str,
        phase: SalePhase,
    },

    // =================================================================
    // Duplicate Operations (2xx)
    // =================================================================
    /// The account's commitment has already been settled.
    #[error("PR_ERR_200: Account already settled: {0}")]
    AlreadySettled(Address),

    /// Funds have already been forwarded to the beneficiary.
    #[error("PR_ERR_201: Funds already forwarded")]
    AlreadyForwarded,

    /// The emergency latch is already set.
    #[error("PR_ERR_202: Already in emergency state")]
    AlreadyInEmergency,

    // =================================================================
    // Emergency-Mode Violations (3xx)
    // =================================================================
    /// A normal-path operation was attempted while the emergency latch is set.
    #[error("PR_ERR_300: {operation} not available in emergency state")]
    NotAvailableInEmergency { operation: &'static str },

    /// The emergency-path operation was attempted without the latch set.
    #[error("PR_ERR_301: Emergency settle only available in emergency state")]
    EmergencyOnly,

    // =================================================================
    // Amounts / Custody (4xx)
    // =================================================================
    /// A contribution or deposit of zero.
    #[error("PR_ERR_400: Amount must be non-zero")]
    ZeroAmount,

    /// Not enough balance to perform the transfer.
    #[error("PR_ERR_401: Insufficient {asset} balance: need {needed}, have {available}")]
    InsufficientBalance {
        asset: Asset,
        needed: Wad,
        available: Wad,
    },

    // =================================================================
    // Authorization (5xx)
    // =================================================================
    /// The signed intent's expiry has passed (equality counts as expired).
    #[error("PR_ERR_500: Signature expired")]
    SignatureExpired,

    /// The signature does not verify under the expected principal's key.
    #[error("PR_ERR_501: Signer is not the expected principal")]
    SignerMismatch,

    /// The signature or the principal key is structurally malformed.
    #[error("PR_ERR_502: Invalid signature: {reason}")]
    InvalidSignature { reason: String },

    /// The supplied nonce does not match the principal's counter.
    #[error("PR_ERR_503: Invalid nonce: expected {expected}, got {got}")]
    InvalidNonce { expected: u64, got: u64 },

    /// The caller is not the privileged operator.
    #[error("PR_ERR_504: Caller is not the operator")]
    NotOwner,

    // =================================================================
    // Entitlement (6xx)
    // =================================================================
    /// The beneficiary has no claimable balance.
    #[error("PR_ERR_600: No token to claim for {0}")]
    NothingToClaim(Address),

    /// The old beneficiary has nothing claimable, blocking reassignment.
    #[error("PR_ERR_601: Old beneficiary has no more token to claim: {0}")]
    OldBeneficiaryExhausted(Address),

    /// The new beneficiary already holds a live vesting slot.
    #[error("PR_ERR_602: Beneficiary slot already occupied: {0}")]
    BeneficiarySlotOccupied(Address),

    // =================================================================
    // Arithmetic (7xx)
    // =================================================================
    /// The fixed-point result does not fit the 128-bit amount type.
    #[error("PR_ERR_700: Arithmetic overflow")]
    ArithmeticOverflow,

    /// Division by a zero denominator.
    #[error("PR_ERR_701: Division by zero")]
    DivisionByZero,

    // =================================================================
    // Configuration (9xx)
    // =================================================================
    /// Invalid immutable configuration (bad time window, zero weight, etc.).
    #[error("PR_ERR_900: Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ProrataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = ProrataError::AlreadySettled(Address([1u8; 32]));
        let msg = format!("{err}");
        assert!(msg.starts_with("PR_ERR_200"), "Got: {msg}");
    }

    #[test]
    fn insufficient_balance_display() {
        let err = ProrataError::InsufficientBalance {
            asset: "USDC".to_string(),
            needed: 100,
            available: 50,
        };
        let msg = format!("{err}");
        assert!(msg.contains("PR_ERR_401"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn not_active_display() {
        let err = ProrataError::NotActive {
            operation: "contribute",
            phase: SalePhase::Closed,
        };
        let msg = format!("{err}");
        assert!(msg.contains("PR_ERR_100"));
        assert!(msg.contains("contribute"));
        assert!(msg.contains("CLOSED"));
    }

    #[test]
    fn all_errors_have_pr_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(ProrataError::AlreadyForwarded),
            Box::new(ProrataError::AlreadyInEmergency),
            Box::new(ProrataError::EmergencyOnly),
            Box::new(ProrataError::ZeroAmount),
            Box::new(ProrataError::SignatureExpired),
            Box::new(ProrataError::SignerMismatch),
            Box::new(ProrataError::InvalidNonce {
                expected: 0,
                got: 1,
            }),
            Box::new(ProrataError::NothingToClaim(Address([0u8; 32]))),
            Box::new(ProrataError::ArithmeticOverflow),
            Box::new(ProrataError::DivisionByZero),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("PR_ERR_"),
                "Error missing PR_ERR_ prefix: {msg}"
            );
        }
    }
}
