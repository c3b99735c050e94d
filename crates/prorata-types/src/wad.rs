//! 18-decimal fixed-point arithmetic over `u128` amounts.
//!
//! Every ratio computation in the engine flows through this module. All
//! division truncates toward zero — allocations and claims round down, so
//! residual dust accumulates in custody and is absorbed by the fund sweep,
//! never over-paid.
//!
//! Intermediate products are widened to 256 bits (`U256`), so
//! `mul_div(a, b, scale)` never overflows internally; the only overflow
//! case is a quotient that does not fit back into `u128`.

use primitive_types::U256;

use crate::{ProrataError, Result};

/// A fixed-point amount scaled by 10^18.
pub type Wad = u128;

/// One whole unit: 10^18.
pub const WAD: Wad = 1_000_000_000_000_000_000;

/// ⌊a · b / scale⌋ with a 256-bit intermediate.
///
/// # Errors
/// - [`ProrataError::DivisionByZero`] if `scale == 0`
/// - [`ProrataError::ArithmeticOverflow`] if the quotient exceeds `u128::MAX`
pub fn mul_div(a: Wad, b: Wad, scale: Wad) -> Result<Wad> {
    if scale == 0 {
        return Err(ProrataError::DivisionByZero);
    }
    let quotient = U256::from(a) * U256::from(b) / U256::from(scale);
    if quotient > U256::from(u128::MAX) {
        return Err(ProrataError::ArithmeticOverflow);
    }
    Ok(quotient.as_u128())
}

/// ⌊numerator · total / denominator⌋ — the pro-rata slice of `total`.
///
/// # Errors
/// Same contract as [`mul_div`].
pub fn proportion(numerator: Wad, denominator: Wad, total: Wad) -> Result<Wad> {
    mul_div(numerator, total, denominator)
}

/// Fixed-point multiply: ⌊a · b / WAD⌋.
pub fn wmul(a: Wad, b: Wad) -> Result<Wad> {
    mul_div(a, b, WAD)
}

/// Fixed-point divide: ⌊a · WAD / b⌋.
pub fn wdiv(a: Wad, b: Wad) -> Result<Wad> {
    mul_div(a, WAD, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_basic() {
        assert_eq!(mul_div(6, 7, 2).unwrap(), 21);
        assert_eq!(mul_div(0, 7, 2).unwrap(), 0);
    }

    #[test]
    fn mul_div_truncates_toward_zero() {
        // 7 * 3 / 2 = 10.5 -> 10
        assert_eq!(mul_div(7, 3, 2).unwrap(), 10);
        // 1 * 1 / 3 = 0.33 -> 0
        assert_eq!(mul_div(1, 1, 3).unwrap(), 0);
    }

    #[test]
    fn mul_div_zero_scale_fails() {
        let err = mul_div(1, 1, 0).unwrap_err();
        assert!(matches!(err, ProrataError::DivisionByZero));
    }

    #[test]
    fn mul_div_no_intermediate_overflow() {
        // a * b overflows u128, but the quotient fits.
        let a = u128::MAX;
        assert_eq!(mul_div(a, 1_000, 1_000).unwrap(), a);
    }

    #[test]
    fn mul_div_quotient_overflow_fails() {
        let err = mul_div(u128::MAX, 2, 1).unwrap_err();
        assert!(matches!(err, ProrataError::ArithmeticOverflow));
    }

    #[test]
    fn wmul_whole_units() {
        // 1.5 * 2.0 = 3.0
        assert_eq!(wmul(3 * WAD / 2, 2 * WAD).unwrap(), 3 * WAD);
    }

    #[test]
    fn wdiv_whole_units() {
        // 3.0 / 2.0 = 1.5
        assert_eq!(wdiv(3 * WAD, 2 * WAD).unwrap(), 3 * WAD / 2);
    }

    #[test]
    fn wdiv_truncates() {
        // 1 / 3 in wad: 0.333...333 (18 threes), floored
        assert_eq!(wdiv(WAD, 3 * WAD).unwrap(), 333_333_333_333_333_333);
    }

    #[test]
    fn wdiv_by_zero_fails() {
        assert!(matches!(
            wdiv(WAD, 0).unwrap_err(),
            ProrataError::DivisionByZero
        ));
    }

    #[test]
    fn proportion_splits_total() {
        // 2/10 of 5 wad = 1 wad
        assert_eq!(proportion(2, 10, 5 * WAD).unwrap(), WAD);
        // 3/10 of 5 wad = 1.5 wad
        assert_eq!(proportion(3, 10, 5 * WAD).unwrap(), 3 * WAD / 2);
    }

    #[test]
    fn proportion_dust_stays_behind() {
        // Splitting 10 units across weights {1, 1, 1}: each gets 3, 1 unit
        // of dust remains unassigned.
        let each = proportion(1, 3, 10).unwrap();
        assert_eq!(each, 3);
        assert_eq!(each * 3, 9);
    }
}
