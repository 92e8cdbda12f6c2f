//! Engine event log.
//!
//! Every successful state-changing operation appends exactly one event.
//! Events are facts about committed state, so they are recorded after
//! the transfer-then-commit sequence completes, never speculatively.

use prorata_core::types::{Amount, LedgerId, PrincipalId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    Staked {
        principal: PrincipalId,
        amount: Amount,
    },
    Withdrawn {
        principal: PrincipalId,
        amount: Amount,
    },
    RewardPaid {
        principal: PrincipalId,
        amount: Amount,
    },
    RewardAdded {
        amount: Amount,
        reward_rate: Amount,
        window_end: Timestamp,
    },
    DurationUpdated {
        duration_secs: u64,
    },
    PausedSet {
        paused: bool,
    },
    Recovered {
        ledger: LedgerId,
        to: PrincipalId,
        amount: Amount,
    },
}
