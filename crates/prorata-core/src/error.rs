//! Error types for the Prorata accrual ledger.
use thiserror::Error;

use crate::roles::Role;
use crate::types::Amount;

/// Bad caller input: zero amounts, insufficient balances, rejected transfers.
/// Always surfaced to the caller, never retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("cannot stake 0")] ZeroStake,
    #[error("cannot withdraw 0")] ZeroWithdraw,
    #[error("insufficient stake: have {have}, need {need}")] InsufficientStake { have: Amount, need: Amount },
    #[error("token transfer rejected by ledger")] TransferRejected,
    #[error("window duration must be positive")] ZeroDuration,
    #[error("cannot recover the stake ledger token")] CannotRecoverStakeLedger,
}

/// The permission gate denied the caller. The operation is fully reverted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("missing role: {role}")] MissingRole { role: Role },
}

/// The operation is valid in general but not in the engine's current state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateConflictError {
    #[error("reward window still active: {remaining}s remaining")] WindowActive { remaining: u64 },
    #[error("operation unavailable while paused")] Paused,
}

/// A reward injection would promise more than the vault actually holds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolvencyError {
    #[error("promised reward exceeds funded balance: required {required}, available {available}")]
    RewardExceedsBalance { required: Amount, available: Amount },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error("division by zero")] DivideByZero,
}

/// Unified error surface of the accrual engine.
///
/// Every failure is atomic: no state mutation performed earlier in the
/// failing call remains visible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)] Validation(#[from] ValidationError),
    #[error(transparent)] Authorization(#[from] AuthorizationError),
    #[error(transparent)] StateConflict(#[from] StateConflictError),
    #[error(transparent)] Solvency(#[from] SolvencyError),
    #[error(transparent)] Math(#[from] MathError),
    #[error("re-entrant call blocked")] ReentrancyBlocked,
}
