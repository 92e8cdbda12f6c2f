//! Shared-access façade over the engine.
//!
//! [`StakingService`] is what a host embeds: it owns the engine behind a
//! mutex and layers the re-entrancy latch over every mutating call. The
//! latch is claimed before the mutex, so a token ledger calling back
//! into the service from inside `transfer` gets
//! [`EngineError::ReentrancyBlocked`](prorata_core::error::EngineError)
//! instead of deadlocking on the lock it already holds.
//!
//! Views take the mutex without the latch. Ledger callbacks must not
//! call views.

use parking_lot::Mutex;

use prorata_core::error::{EngineError, MathError};
use prorata_core::ledger::TokenLedger;
use prorata_core::types::{Amount, PrincipalId, Timestamp};

use crate::engine::RewardEngine;
use crate::events::EngineEvent;
use crate::guard::ReentrancyGuard;

pub struct StakingService {
    engine: Mutex<RewardEngine>,
    guard: ReentrancyGuard,
}

impl StakingService {
    pub fn new(engine: RewardEngine) -> Self {
        Self {
            engine: Mutex::new(engine),
            guard: ReentrancyGuard::new(),
        }
    }

    // ---- mutating operations, latched ----

    pub fn stake(
        &self,
        caller: &PrincipalId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let _entered = self.guard.enter()?;
        self.engine.lock().stake(caller, amount, now)
    }

    pub fn withdraw(
        &self,
        caller: &PrincipalId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let _entered = self.guard.enter()?;
        self.engine.lock().withdraw(caller, amount, now)
    }

    pub fn get_reward(&self, caller: &PrincipalId, now: Timestamp) -> Result<Amount, EngineError> {
        let _entered = self.guard.enter()?;
        self.engine.lock().get_reward(caller, now)
    }

    pub fn exit(&self, caller: &PrincipalId, now: Timestamp) -> Result<Amount, EngineError> {
        let _entered = self.guard.enter()?;
        self.engine.lock().exit(caller, now)
    }

    pub fn notify_reward_amount(
        &self,
        caller: &PrincipalId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let _entered = self.guard.enter()?;
        self.engine.lock().notify_reward_amount(caller, amount, now)
    }

    pub fn set_window_duration(
        &self,
        caller: &PrincipalId,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        let _entered = self.guard.enter()?;
        self.engine
            .lock()
            .set_window_duration(caller, duration_secs, now)
    }

    pub fn set_paused(&self, caller: &PrincipalId, paused: bool) -> Result<(), EngineError> {
        let _entered = self.guard.enter()?;
        self.engine.lock().set_paused(caller, paused)
    }

    pub fn recover_funds(
        &self,
        caller: &PrincipalId,
        ledger: &dyn TokenLedger,
        to: &PrincipalId,
        amount: Amount,
    ) -> Result<(), EngineError> {
        let _entered = self.guard.enter()?;
        self.engine.lock().recover_funds(caller, ledger, to, amount)
    }

    // ---- views ----

    pub fn total_staked(&self) -> Amount {
        self.engine.lock().total_staked()
    }

    pub fn staked_of(&self, principal: &PrincipalId) -> Amount {
        self.engine.lock().staked_of(principal)
    }

    pub fn earned(&self, principal: &PrincipalId, now: Timestamp) -> Result<Amount, MathError> {
        self.engine.lock().earned(principal, now)
    }

    pub fn reward_per_token(&self, now: Timestamp) -> Result<Amount, MathError> {
        self.engine.lock().reward_per_token(now)
    }

    pub fn reward_for_duration(&self) -> Result<Amount, MathError> {
        self.engine.lock().reward_for_duration()
    }

    pub fn last_time_reward_applicable(&self, now: Timestamp) -> Timestamp {
        self.engine.lock().last_time_reward_applicable(now)
    }

    pub fn is_paused(&self) -> bool {
        self.engine.lock().is_paused()
    }

    pub fn drain_events(&self) -> Vec<EngineEvent> {
        self.engine.lock().drain_events()
    }
}
