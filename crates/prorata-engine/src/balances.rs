//! Per-principal stake bookkeeping.
//!
//! Mirrors what the token ledger holds in the vault for staking: the
//! engine never trusts the external balance for accrual math, it keeps
//! its own tally so a direct donation to the vault cannot inflate
//! anyone's share.

use std::collections::HashMap;

use prorata_core::error::{MathError, ValidationError};
use prorata_core::types::{Amount, PrincipalId};
use serde::{Deserialize, Serialize};

/// Stake positions and their running total.
///
/// The total is maintained incrementally rather than summed on demand;
/// it is read on every accumulator advance.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StakeLedger {
    stakes: HashMap<PrincipalId, Amount>,
    total: Amount,
}

impl StakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_staked(&self) -> Amount {
        self.total
    }

    pub fn amount_of(&self, principal: &PrincipalId) -> Amount {
        *self.stakes.get(principal).unwrap_or(&0)
    }

    /// Whether a credit of `amount` would stay within `u128`.
    ///
    /// Checked before pulling tokens so a failing credit never leaves the
    /// vault holding funds it cannot account for.
    pub fn can_credit(&self, amount: Amount) -> bool {
        self.total.checked_add(amount).is_some()
    }

    pub fn credit(&mut self, principal: &PrincipalId, amount: Amount) -> Result<(), MathError> {
        let total = self
            .total
            .checked_add(amount)
            .ok_or(MathError::ArithmeticOverflow)?;
        let entry = self.stakes.entry(*principal).or_insert(0);
        // Entry overflow implies total overflow, already ruled out.
        *entry += amount;
        self.total = total;
        Ok(())
    }

    pub fn debit(&mut self, principal: &PrincipalId, amount: Amount) -> Result<(), ValidationError> {
        let have = self.amount_of(principal);
        if have < amount {
            return Err(ValidationError::InsufficientStake { have, need: amount });
        }
        let remaining = have - amount;
        if remaining == 0 {
            self.stakes.remove(principal);
        } else {
            self.stakes.insert(*principal, remaining);
        }
        self.total -= amount;
        Ok(())
    }
}
