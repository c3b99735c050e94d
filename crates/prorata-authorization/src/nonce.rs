//! Per-principal monotonic nonce registry.
//!
//! Every principal has a counter starting at zero. A signed intent carries
//! the counter's current value; consuming it increments the counter, so an
//! identical intent can never be applied twice. Counters are never reset.

use std::collections::HashMap;

use prorata_types::{Address, ProrataError, Result};

/// Replay protection: one monotonically increasing counter per principal.
#[derive(Debug, Default)]
pub struct NonceRegistry {
    counters: HashMap<Address, u64>,
}

impl NonceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The nonce the principal's next intent must carry.
    #[must_use]
    pub fn expected(&self, principal: Address) -> u64 {
        self.counters.get(&principal).copied().unwrap_or(0)
    }

    /// Compare `nonce` against the principal's counter without consuming.
    ///
    /// # Errors
    /// Returns [`ProrataError::InvalidNonce`] on mismatch.
    pub fn check(&self, principal: Address, nonce: u64) -> Result<()> {
        let expected = self.expected(principal);
        if expected != nonce {
            return Err(ProrataError::InvalidNonce {
                expected,
                got: nonce,
            });
        }
        Ok(())
    }

    /// Compare `nonce` against the principal's counter and increment on
    /// match.
    ///
    /// # Errors
    /// Returns [`ProrataError::InvalidNonce`] on mismatch; the counter is
    /// unchanged.
    pub fn consume(&mut self, principal: Address, nonce: u64) -> Result<()> {
        self.check(principal, nonce)?;
        *self.counters.entry(principal).or_insert(0) += 1;
        Ok(())
    }
}
