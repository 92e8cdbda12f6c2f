//! Widening fixed-point arithmetic.
//!
//! The accumulator update multiplies three u128-sized quantities
//! (`elapsed * rate * UNIT`) before dividing, which can exceed `u128` for
//! realistic stakes. [`mul_div`] performs `a * b / d` through a 256-bit
//! intermediate so the product never wraps, and always rounds toward
//! zero. Rounding down keeps the engine conservative: it can only ever
//! promise slightly less than the exact pro-rata share, never more.

use prorata_core::error::MathError;

/// Full 256-bit product of two `u128`s, as `(hi, lo)` limbs.
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = (1u128 << 64) - 1;
    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    let mid = (ll >> 64) + (lh & MASK) + (hl & MASK);
    let lo = ((mid & MASK) << 64) | (ll & MASK);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (hi, lo)
}

/// Divide the 256-bit value `hi * 2^128 + lo` by `d`.
///
/// Caller guarantees `d != 0` and `hi < d`, which bounds the quotient
/// below `2^128`. Restoring binary long division, one quotient bit per
/// iteration.
fn div_wide(hi: u128, lo: u128, d: u128) -> u128 {
    debug_assert!(d != 0);
    debug_assert!(hi < d);

    let mut rem = hi;
    let mut quot: u128 = 0;
    for i in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> i) & 1);
        // The invariant rem < d before the shift bounds the true value of
        // the shifted remainder below 2^128 + d, so a wrapping subtract is
        // exact whenever the carry bit was set.
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            quot |= 1 << i;
        }
    }
    quot
}

/// Compute `a * b / d` exactly, rounding toward zero.
///
/// Fails with [`MathError::DivideByZero`] when `d == 0` and
/// [`MathError::ArithmeticOverflow`] when the quotient does not fit in
/// `u128`.
pub fn mul_div(a: u128, b: u128, d: u128) -> Result<u128, MathError> {
    if d == 0 {
        return Err(MathError::DivideByZero);
    }
    let (hi, lo) = mul_wide(a, b);
    if hi >= d {
        return Err(MathError::ArithmeticOverflow);
    }
    Ok(div_wide(hi, lo, d))
}
