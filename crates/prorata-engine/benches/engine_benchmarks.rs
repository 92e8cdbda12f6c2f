//! Criterion benchmarks for prorata-engine critical operations.
//!
//! Covers: widening mul-div, accumulator settlement, and the full
//! stake/claim path against in-memory ledgers.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use prorata_core::constants::UNIT;
use prorata_core::ledger::MemoryTokenLedger;
use prorata_core::roles::{MemoryRoleGate, Role};
use prorata_core::types::{LedgerId, PrincipalId};
use prorata_engine::math::mul_div;
use prorata_engine::settlement::{self, Checkpoint};
use prorata_engine::window::DistributionWindow;
use prorata_engine::{EngineConfig, RewardEngine};

const T0: u64 = 1_700_000_000;

fn bench_mul_div(c: &mut Criterion) {
    // Representative accumulator update: a week of seconds times a
    // whole-token rate, scaled by UNIT.
    let emitted = 604_800u128 * 12 * UNIT;
    let total_staked = 5_000_000u128 * UNIT;

    c.bench_function("mul_div_256bit", |b| {
        b.iter(|| mul_div(black_box(emitted), black_box(UNIT), black_box(total_staked)))
    });
}

fn bench_settlement(c: &mut Criterion) {
    let window = DistributionWindow {
        reward_rate: 12 * UNIT,
        window_end: T0 + 2_592_000,
        last_update_time: T0,
        reward_per_token_stored: 3 * UNIT,
    };
    let checkpoint = Checkpoint {
        reward_per_token_paid: UNIT,
        rewards: 42 * UNIT,
    };

    c.bench_function("settle_one_principal", |b| {
        b.iter(|| {
            settlement::settle(
                black_box(&window),
                black_box(5_000_000 * UNIT),
                black_box(T0 + 604_800),
                black_box(1_000 * UNIT),
                black_box(&checkpoint),
            )
        })
    });
}

fn bench_stake_claim_cycle(c: &mut Criterion) {
    let admin = PrincipalId([0xAD; 32]);
    let staker = PrincipalId([1; 32]);
    let stake_ledger = Arc::new(MemoryTokenLedger::new(LedgerId([1; 32])));
    let reward_ledger = Arc::new(MemoryTokenLedger::new(LedgerId([2; 32])));
    let gate = Arc::new(MemoryRoleGate::new());
    gate.grant(&admin, Role::Admin);
    gate.grant(&admin, Role::Funder);
    stake_ledger.mint(&staker, u128::MAX / 2);
    reward_ledger.mint(&admin, 1_000_000 * UNIT);

    let mut engine = RewardEngine::new(
        EngineConfig::new(admin, PrincipalId([0xFA; 32])),
        stake_ledger,
        reward_ledger,
        gate,
    )
    .unwrap();
    engine
        .notify_reward_amount(&admin, 900_000 * UNIT, T0)
        .unwrap();

    let mut now = T0;
    c.bench_function("stake_then_claim", |b| {
        b.iter(|| {
            now += 1;
            engine.stake(&staker, black_box(UNIT), now).unwrap();
            engine.get_reward(&staker, now).unwrap();
            engine.drain_events();
        })
    });
}

criterion_group!(benches, bench_mul_div, bench_settlement, bench_stake_claim_cycle);
criterion_main!(benches);
