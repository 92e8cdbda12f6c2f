//! The reward accrual engine.
//!
//! One [`RewardEngine`] instance tracks one staking pool: who staked how
//! much, the active distribution window, and each principal's accrual
//! checkpoint. Token custody lives on external ledgers under the vault
//! principal; the engine only orchestrates transfers and keeps the
//! books.
//!
//! Every operation takes `now` explicitly. The engine never reads a
//! clock, so replaying the same call sequence reproduces the same state
//! bit for bit.
//!
//! All mutating operations follow the same shape: validate, settle into
//! a staged value, perform the external transfer, then commit. A failure
//! at any point leaves the engine exactly as it was.

use std::collections::HashMap;
use std::sync::Arc;

use prorata_core::error::{
    AuthorizationError, EngineError, MathError, SolvencyError, StateConflictError, ValidationError,
};
use prorata_core::ledger::TokenLedger;
use prorata_core::roles::{Role, RoleGate};
use prorata_core::types::{Amount, PrincipalId, Timestamp};
use tracing::{debug, info};

use crate::balances::StakeLedger;
use crate::config::EngineConfig;
use crate::events::EngineEvent;
use crate::settlement::{self, Checkpoint, GlobalSettlement, Settlement};
use crate::window::DistributionWindow;

pub struct RewardEngine {
    config: EngineConfig,
    stake_ledger: Arc<dyn TokenLedger>,
    reward_ledger: Arc<dyn TokenLedger>,
    role_gate: Arc<dyn RoleGate>,
    window: DistributionWindow,
    stakes: StakeLedger,
    checkpoints: HashMap<PrincipalId, Checkpoint>,
    paused: bool,
    events: Vec<EngineEvent>,
}

impl RewardEngine {
    pub fn new(
        config: EngineConfig,
        stake_ledger: Arc<dyn TokenLedger>,
        reward_ledger: Arc<dyn TokenLedger>,
        role_gate: Arc<dyn RoleGate>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            config,
            stake_ledger,
            reward_ledger,
            role_gate,
            window: DistributionWindow::new(),
            stakes: StakeLedger::new(),
            checkpoints: HashMap::new(),
            paused: false,
            events: Vec::new(),
        })
    }

    // ---- views ----

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn window(&self) -> &DistributionWindow {
        &self.window
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn total_staked(&self) -> Amount {
        self.stakes.total_staked()
    }

    pub fn staked_of(&self, principal: &PrincipalId) -> Amount {
        self.stakes.amount_of(principal)
    }

    pub fn last_time_reward_applicable(&self, now: Timestamp) -> Timestamp {
        self.window.last_time_reward_applicable(now)
    }

    /// Current value of the global accumulator, as if settled at `now`.
    pub fn reward_per_token(&self, now: Timestamp) -> Result<Amount, MathError> {
        settlement::reward_per_token(&self.window, self.stakes.total_staked(), now)
    }

    /// Reward `principal` could claim at `now`.
    pub fn earned(&self, principal: &PrincipalId, now: Timestamp) -> Result<Amount, MathError> {
        let rpt = self.reward_per_token(now)?;
        settlement::earned(
            self.stakes.amount_of(principal),
            rpt,
            &self.checkpoint_of(principal),
        )
    }

    /// Total payout a full window promises at the current rate.
    pub fn reward_for_duration(&self) -> Result<Amount, MathError> {
        self.window
            .reward_for_duration(self.config.window_duration_secs)
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Take all recorded events, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- operations ----

    /// Pull `amount` stake-token units from `caller` into the vault and
    /// start accruing on them.
    pub fn stake(
        &mut self,
        caller: &PrincipalId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        self.ensure_unpaused()?;
        if amount == 0 {
            return Err(ValidationError::ZeroStake.into());
        }
        if !self.stakes.can_credit(amount) {
            return Err(MathError::ArithmeticOverflow.into());
        }
        let settled = self.settle_for(caller, now)?;
        if !self
            .stake_ledger
            .transfer(caller, &self.config.vault, amount)
        {
            return Err(ValidationError::TransferRejected.into());
        }
        self.commit(caller, settled);
        // Credit checked above; the ledger pull already happened, so this
        // must not fail.
        self.stakes
            .credit(caller, amount)
            .map_err(EngineError::from)?;
        info!(principal = %caller, amount, total = self.stakes.total_staked(), "stake accepted");
        self.events.push(EngineEvent::Staked {
            principal: *caller,
            amount,
        });
        Ok(())
    }

    /// Return `amount` staked units from the vault to `caller`.
    pub fn withdraw(
        &mut self,
        caller: &PrincipalId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        self.ensure_unpaused()?;
        self.withdraw_internal(caller, amount, now)
    }

    /// Pay out `caller`'s accrued reward. Never pause-gated: claiming
    /// what is already earned stays available in an emergency.
    ///
    /// Returns the amount paid; a claim with nothing accrued settles the
    /// checkpoint and returns zero without touching the ledger.
    pub fn get_reward(
        &mut self,
        caller: &PrincipalId,
        now: Timestamp,
    ) -> Result<Amount, EngineError> {
        let settled = self.settle_for(caller, now)?;
        let reward = settled.checkpoint.rewards;
        if reward == 0 {
            self.commit(caller, settled);
            debug!(principal = %caller, "claim with nothing accrued");
            return Ok(0);
        }
        if !self
            .reward_ledger
            .transfer(&self.config.vault, caller, reward)
        {
            return Err(ValidationError::TransferRejected.into());
        }
        self.commit(
            caller,
            Settlement {
                global: settled.global,
                checkpoint: Checkpoint {
                    reward_per_token_paid: settled.checkpoint.reward_per_token_paid,
                    rewards: 0,
                },
            },
        );
        info!(principal = %caller, amount = reward, "reward paid");
        self.events.push(EngineEvent::RewardPaid {
            principal: *caller,
            amount: reward,
        });
        Ok(reward)
    }

    /// Withdraw the full stake, then claim. Available even while paused.
    ///
    /// The two halves are each atomic; if the claim transfer fails after
    /// the withdrawal committed, the withdrawal stands.
    pub fn exit(&mut self, caller: &PrincipalId, now: Timestamp) -> Result<Amount, EngineError> {
        let staked = self.stakes.amount_of(caller);
        self.withdraw_internal(caller, staked, now)?;
        self.get_reward(caller, now)
    }

    /// Inject `amount` reward units, opening a window of the configured
    /// duration at `now`. Injecting into an active window folds its
    /// undistributed remainder into the new rate.
    pub fn notify_reward_amount(
        &mut self,
        caller: &PrincipalId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        self.require_role(caller, Role::Funder)?;
        self.ensure_unpaused()?;
        let global = self.settle_global(now)?;

        let leftover = if self.window.is_active(now) {
            self.window.leftover(now)?
        } else {
            0
        };
        let total_payout = amount
            .checked_add(leftover)
            .ok_or(MathError::ArithmeticOverflow)?;
        let duration = self.config.window_duration_secs as u128;
        let reward_rate = total_payout / duration;
        // Integer division rounds the rate down, so this cannot exceed
        // total_payout.
        let required = reward_rate * duration;

        let mut available = self
            .reward_ledger
            .balance_of(&self.config.vault)
            .checked_add(amount)
            .ok_or(MathError::ArithmeticOverflow)?;
        if self.reward_ledger.ledger_id() == self.stake_ledger.ledger_id() {
            // Staked principal sits on the same ledger; it is not
            // available for distribution.
            available = available.saturating_sub(self.stakes.total_staked());
        }
        if required > available {
            return Err(SolvencyError::RewardExceedsBalance {
                required,
                available,
            }
            .into());
        }

        if !self
            .reward_ledger
            .transfer(caller, &self.config.vault, amount)
        {
            return Err(ValidationError::TransferRejected.into());
        }

        self.commit_global(global);
        self.window.reward_rate = reward_rate;
        self.window.window_end = now + self.config.window_duration_secs;
        self.window.last_update_time = now;
        info!(
            amount,
            reward_rate,
            window_end = self.window.window_end,
            "reward window opened"
        );
        self.events.push(EngineEvent::RewardAdded {
            amount,
            reward_rate,
            window_end: self.window.window_end,
        });
        Ok(())
    }

    /// Change the window duration for future injections. Refused while a
    /// window is still paying out, so an active window's promise is
    /// never re-shaped mid-flight.
    pub fn set_window_duration(
        &mut self,
        caller: &PrincipalId,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        self.require_role(caller, Role::Admin)?;
        if duration_secs == 0 {
            return Err(ValidationError::ZeroDuration.into());
        }
        if self.window.is_active(now) {
            return Err(StateConflictError::WindowActive {
                remaining: self.window.remaining_secs(now),
            }
            .into());
        }
        self.config.window_duration_secs = duration_secs;
        info!(duration_secs, "window duration updated");
        self.events.push(EngineEvent::DurationUpdated { duration_secs });
        Ok(())
    }

    /// Flip the pause flag. Setting the current value is a silent no-op.
    pub fn set_paused(&mut self, caller: &PrincipalId, paused: bool) -> Result<(), EngineError> {
        self.require_role(caller, Role::Admin)?;
        if self.paused == paused {
            return Ok(());
        }
        self.paused = paused;
        info!(paused, "pause flag set");
        self.events.push(EngineEvent::PausedSet { paused });
        Ok(())
    }

    /// Move stray tokens out of the vault. The stake ledger is off
    /// limits; everything there belongs to stakers.
    pub fn recover_funds(
        &mut self,
        caller: &PrincipalId,
        ledger: &dyn TokenLedger,
        to: &PrincipalId,
        amount: Amount,
    ) -> Result<(), EngineError> {
        self.require_role(caller, Role::Admin)?;
        if ledger.ledger_id() == self.stake_ledger.ledger_id() {
            return Err(ValidationError::CannotRecoverStakeLedger.into());
        }
        if !ledger.transfer(&self.config.vault, to, amount) {
            return Err(ValidationError::TransferRejected.into());
        }
        info!(ledger = %ledger.ledger_id(), to = %to, amount, "funds recovered");
        self.events.push(EngineEvent::Recovered {
            ledger: ledger.ledger_id(),
            to: *to,
            amount,
        });
        Ok(())
    }

    // ---- internals ----

    fn withdraw_internal(
        &mut self,
        caller: &PrincipalId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        if amount == 0 {
            return Err(ValidationError::ZeroWithdraw.into());
        }
        let have = self.stakes.amount_of(caller);
        if have < amount {
            return Err(ValidationError::InsufficientStake { have, need: amount }.into());
        }
        let settled = self.settle_for(caller, now)?;
        if !self
            .stake_ledger
            .transfer(&self.config.vault, caller, amount)
        {
            return Err(ValidationError::TransferRejected.into());
        }
        self.commit(caller, settled);
        // Balance checked above, before the push.
        self.stakes
            .debit(caller, amount)
            .map_err(EngineError::from)?;
        info!(principal = %caller, amount, total = self.stakes.total_staked(), "stake withdrawn");
        self.events.push(EngineEvent::Withdrawn {
            principal: *caller,
            amount,
        });
        Ok(())
    }

    fn checkpoint_of(&self, principal: &PrincipalId) -> Checkpoint {
        self.checkpoints
            .get(principal)
            .copied()
            .unwrap_or_default()
    }

    fn settle_for(
        &self,
        principal: &PrincipalId,
        now: Timestamp,
    ) -> Result<Settlement, MathError> {
        settlement::settle(
            &self.window,
            self.stakes.total_staked(),
            now,
            self.stakes.amount_of(principal),
            &self.checkpoint_of(principal),
        )
    }

    fn settle_global(&self, now: Timestamp) -> Result<GlobalSettlement, MathError> {
        settlement::settle_global(&self.window, self.stakes.total_staked(), now)
    }

    fn commit_global(&mut self, global: GlobalSettlement) {
        self.window.reward_per_token_stored = global.reward_per_token;
        self.window.last_update_time = global.settled_at;
    }

    fn commit(&mut self, principal: &PrincipalId, settled: Settlement) {
        self.commit_global(settled.global);
        self.checkpoints.insert(*principal, settled.checkpoint);
    }

    fn require_role(&self, caller: &PrincipalId, role: Role) -> Result<(), AuthorizationError> {
        if !self.role_gate.has_role(caller, role) {
            return Err(AuthorizationError::MissingRole { role });
        }
        Ok(())
    }

    fn ensure_unpaused(&self) -> Result<(), StateConflictError> {
        if self.paused {
            return Err(StateConflictError::Paused);
        }
        Ok(())
    }
}
