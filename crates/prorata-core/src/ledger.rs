//! Token ledger interface and an in-memory implementation.
//!
//! The accrual engine treats the token ledger as a trusted oracle for
//! moving funds: "pull N units from caller" and "push N units to
//! recipient". Any non-success return is a hard failure, never a
//! retryable condition. The engine holds ledgers by reference and
//! compares them by [`LedgerId`].
//!
//! The [`MemoryTokenLedger`] is suitable for testing; a production host
//! would adapt its real token system behind the same trait.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::types::{Amount, LedgerId, PrincipalId};

/// External fungible-token ledger consumed by the engine.
///
/// A single explicit-source `transfer` covers both pull and push: the
/// host has no ambient caller, so the engine always names both sides of
/// a movement.
pub trait TokenLedger: Send + Sync {
    /// Stable identity of this ledger.
    fn ledger_id(&self) -> LedgerId;

    /// Current balance of a principal. Unknown principals hold zero.
    fn balance_of(&self, principal: &PrincipalId) -> Amount;

    /// Move `amount` from `from` to `to`.
    ///
    /// Returns `false` if the ledger rejects the movement (insufficient
    /// balance, frozen account, …). A `false` must leave both balances
    /// untouched.
    fn transfer(&self, from: &PrincipalId, to: &PrincipalId, amount: Amount) -> bool;
}

/// In-memory token ledger for testing.
///
/// Balances live in a `HashMap` behind a mutex so the ledger can be
/// shared across threads like a real external service. No persistence.
pub struct MemoryTokenLedger {
    id: LedgerId,
    balances: Mutex<HashMap<PrincipalId, Amount>>,
}

impl MemoryTokenLedger {
    pub fn new(id: LedgerId) -> Self {
        Self {
            id,
            balances: Mutex::new(HashMap::new()),
        }
    }

    /// Credit `amount` to `to` out of thin air. Test fixture only; a real
    /// ledger mints through its own governance.
    pub fn mint(&self, to: &PrincipalId, amount: Amount) {
        let mut balances = self.balances.lock();
        let entry = balances.entry(*to).or_insert(0);
        *entry = entry.saturating_add(amount);
    }
}

impl TokenLedger for MemoryTokenLedger {
    fn ledger_id(&self) -> LedgerId {
        self.id
    }

    fn balance_of(&self, principal: &PrincipalId) -> Amount {
        *self.balances.lock().get(principal).unwrap_or(&0)
    }

    fn transfer(&self, from: &PrincipalId, to: &PrincipalId, amount: Amount) -> bool {
        if amount == 0 {
            return true;
        }
        let mut balances = self.balances.lock();
        let from_balance = *balances.get(from).unwrap_or(&0);
        if from_balance < amount {
            return false;
        }
        // Self-transfer must not double-apply.
        if from == to {
            return true;
        }
        balances.insert(*from, from_balance - amount);
        let to_balance = balances.entry(*to).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        true
    }
}
