//! Distribution window state.
//!
//! Rewards are paid out linearly over fixed windows. A window is fully
//! described by its per-second rate and its end time; everything else
//! (the accumulator, the last settlement instant) rides along so the
//! whole distribution state serializes as one unit.

use prorata_core::error::MathError;
use prorata_core::types::{Amount, Timestamp};
use serde::{Deserialize, Serialize};

/// The active (or most recent) reward distribution window.
///
/// A freshly constructed engine has an empty window: zero rate, zero end
/// time. Until the first reward injection no one accrues anything.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DistributionWindow {
    /// Base units of reward distributed per second, unscaled.
    pub reward_rate: Amount,
    /// Instant the window stops paying.
    pub window_end: Timestamp,
    /// Last instant the accumulator was settled up to.
    pub last_update_time: Timestamp,
    /// Global reward-per-token accumulator, scaled by `UNIT`. Monotone
    /// non-decreasing for the engine's whole lifetime.
    pub reward_per_token_stored: Amount,
}

impl DistributionWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// The instant accrual math may advance to: `now`, clamped to the
    /// window end so an expired window stops paying.
    pub fn last_time_reward_applicable(&self, now: Timestamp) -> Timestamp {
        now.min(self.window_end)
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        now < self.window_end
    }

    pub fn remaining_secs(&self, now: Timestamp) -> u64 {
        self.window_end.saturating_sub(now)
    }

    /// Reward still owed by the current window from `now` to its end.
    pub fn leftover(&self, now: Timestamp) -> Result<Amount, MathError> {
        (self.remaining_secs(now) as u128)
            .checked_mul(self.reward_rate)
            .ok_or(MathError::ArithmeticOverflow)
    }

    /// Total reward a full window at the current rate pays out.
    pub fn reward_for_duration(&self, duration_secs: u64) -> Result<Amount, MathError> {
        (duration_secs as u128)
            .checked_mul(self.reward_rate)
            .ok_or(MathError::ArithmeticOverflow)
    }
}
