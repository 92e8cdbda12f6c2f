//! Lazy accrual settlement.
//!
//! The engine never iterates stakers. Instead a single global
//! reward-per-token accumulator advances whenever anyone interacts, and
//! each principal carries a checkpoint of the accumulator value they were
//! last settled against. The difference, times their stake, is what they
//! earned since.
//!
//! Settlement is computed as a pure value first and committed to engine
//! state only after any external transfer succeeds, so a failing call
//! leaves no trace.

use prorata_core::constants::UNIT;
use prorata_core::error::MathError;
use prorata_core::types::{Amount, Timestamp};
use serde::{Deserialize, Serialize};

use crate::math::mul_div;
use crate::window::DistributionWindow;

/// A principal's accrual checkpoint.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Checkpoint {
    /// Accumulator value this principal has already been credited up to.
    pub reward_per_token_paid: Amount,
    /// Reward accrued but not yet claimed, in base units.
    pub rewards: Amount,
}

/// Staged advance of the global accumulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalSettlement {
    pub reward_per_token: Amount,
    /// Instant the accumulator now covers, clamped to the window end.
    pub settled_at: Timestamp,
}

/// Staged settlement for one principal: the global advance plus their
/// refreshed checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub global: GlobalSettlement,
    pub checkpoint: Checkpoint,
}

/// Advance the accumulator to `now`.
///
/// With nothing staked the accumulator holds still: reward scheduled for
/// such a stretch is simply never distributed and stays in the vault.
pub fn reward_per_token(
    window: &DistributionWindow,
    total_staked: Amount,
    now: Timestamp,
) -> Result<Amount, MathError> {
    if total_staked == 0 {
        return Ok(window.reward_per_token_stored);
    }
    let until = window.last_time_reward_applicable(now);
    let elapsed = until.saturating_sub(window.last_update_time) as u128;
    let emitted = elapsed
        .checked_mul(window.reward_rate)
        .ok_or(MathError::ArithmeticOverflow)?;
    let delta = mul_div(emitted, UNIT, total_staked)?;
    window
        .reward_per_token_stored
        .checked_add(delta)
        .ok_or(MathError::ArithmeticOverflow)
}

/// Total reward `staked` base units have earned at accumulator value
/// `reward_per_token`, given the principal's checkpoint.
pub fn earned(
    staked: Amount,
    reward_per_token: Amount,
    checkpoint: &Checkpoint,
) -> Result<Amount, MathError> {
    let delta = reward_per_token
        .checked_sub(checkpoint.reward_per_token_paid)
        .ok_or(MathError::ArithmeticOverflow)?;
    let fresh = mul_div(staked, delta, UNIT)?;
    checkpoint
        .rewards
        .checked_add(fresh)
        .ok_or(MathError::ArithmeticOverflow)
}

pub fn settle_global(
    window: &DistributionWindow,
    total_staked: Amount,
    now: Timestamp,
) -> Result<GlobalSettlement, MathError> {
    Ok(GlobalSettlement {
        reward_per_token: reward_per_token(window, total_staked, now)?,
        settled_at: window.last_time_reward_applicable(now),
    })
}

/// Settle one principal up to `now` without mutating anything.
pub fn settle(
    window: &DistributionWindow,
    total_staked: Amount,
    now: Timestamp,
    staked: Amount,
    checkpoint: &Checkpoint,
) -> Result<Settlement, MathError> {
    let global = settle_global(window, total_staked, now)?;
    let rewards = earned(staked, global.reward_per_token, checkpoint)?;
    Ok(Settlement {
        global,
        checkpoint: Checkpoint {
            reward_per_token_paid: global.reward_per_token,
            rewards,
        },
    })
}
