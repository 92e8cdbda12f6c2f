//! Shared test helpers for E2E and adversarial tests.

use std::sync::Arc;

use prorata_core::constants::UNIT;
use prorata_core::ledger::MemoryTokenLedger;
use prorata_core::roles::{MemoryRoleGate, Role};
use prorata_core::types::{Amount, LedgerId, PrincipalId, Timestamp};
use prorata_engine::{EngineConfig, RewardEngine, StakingService};

pub const DAY: u64 = 86_400;

/// Arbitrary deployment instant. Nothing in the engine depends on the
/// epoch, only on differences.
pub const T0: Timestamp = 1_700_000_000;

/// Whole tokens to base units.
pub fn units(n: u128) -> Amount {
    n * UNIT
}

/// Deterministic principal from a seed byte.
pub fn principal(seed: u8) -> PrincipalId {
    PrincipalId([seed; 32])
}

/// A deployed service plus handles to everything around it.
pub struct TestRig {
    pub service: Arc<StakingService>,
    pub stake_ledger: Arc<MemoryTokenLedger>,
    pub reward_ledger: Arc<MemoryTokenLedger>,
    pub gate: Arc<MemoryRoleGate>,
    pub admin: PrincipalId,
    pub vault: PrincipalId,
}

impl TestRig {
    /// Mint stake tokens to `who` and stake them, starting accrual.
    pub fn fund_and_stake(&self, who: &PrincipalId, amount: Amount, now: Timestamp) {
        self.stake_ledger.mint(who, amount);
        self.service.stake(who, amount, now).unwrap();
    }
}

fn build(stake_ledger: Arc<MemoryTokenLedger>, reward_ledger: Arc<MemoryTokenLedger>) -> TestRig {
    init_tracing();
    let admin = principal(0xAD);
    let vault = principal(0xFA);
    let gate = Arc::new(MemoryRoleGate::new());
    gate.grant(&admin, Role::Admin);
    gate.grant(&admin, Role::Funder);
    reward_ledger.mint(&admin, units(10_000_000));
    let engine = RewardEngine::new(
        EngineConfig::new(admin, vault),
        stake_ledger.clone(),
        reward_ledger.clone(),
        gate.clone(),
    )
    .unwrap();
    TestRig {
        service: Arc::new(StakingService::new(engine)),
        stake_ledger,
        reward_ledger,
        gate,
        admin,
        vault,
    }
}

/// Deploy a service with distinct stake and reward ledgers. The admin
/// holds both roles and a large reward-token balance.
pub fn setup() -> TestRig {
    build(
        Arc::new(MemoryTokenLedger::new(LedgerId([1; 32]))),
        Arc::new(MemoryTokenLedger::new(LedgerId([2; 32]))),
    )
}

/// Deploy a service whose stake and reward token are the same ledger.
pub fn setup_shared_ledger() -> TestRig {
    let shared = Arc::new(MemoryTokenLedger::new(LedgerId([7; 32])));
    build(shared.clone(), shared)
}

/// Install a subscriber once so failing tests show engine logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_test_writer()
        .try_init();
}
