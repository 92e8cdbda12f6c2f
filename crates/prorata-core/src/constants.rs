//! Protocol constants. All monetary values are integers scaled by [`UNIT`].

/// Fixed-point scale for all monetary quantities and for the
/// reward-per-token accumulator (1 token = 10^18 base units).
///
/// Reward-per-token values carry one extra factor of `UNIT` relative to
/// plain amounts: `earned = staked * rpt_delta / UNIT`.
///
/// # Examples
///
/// ```
/// use prorata_core::constants::UNIT;
/// assert_eq!(UNIT, 1_000_000_000_000_000_000);
/// ```
pub const UNIT: u128 = 1_000_000_000_000_000_000;

pub const SECS_PER_DAY: u64 = 86_400;

/// Default length of a reward distribution window: 30 days.
///
/// A freshly constructed engine distributes each injected reward amount
/// linearly over this many seconds unless the admin changes the duration
/// between windows.
///
/// # Examples
///
/// ```
/// use prorata_core::constants::{DEFAULT_WINDOW_DURATION_SECS, SECS_PER_DAY};
/// assert_eq!(DEFAULT_WINDOW_DURATION_SECS, 30 * SECS_PER_DAY);
/// ```
pub const DEFAULT_WINDOW_DURATION_SECS: u64 = 30 * SECS_PER_DAY;
