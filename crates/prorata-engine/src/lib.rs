//! # prorata-engine — Time-weighted reward accrual engine.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! This crate implements pro-rata distribution of injected reward amounts
//! over fixed-length windows:
//! - **Reward-per-token accumulator**: a monotone global accumulator
//!   advanced lazily at every interaction, so gas-free "view" reads and
//!   state changes agree to the second.
//! - **Window rollover**: injecting reward mid-window folds the
//!   undistributed remainder into a fresh window at a recomputed rate.
//! - **Solvency gate**: a window is only opened if the vault can cover
//!   everything it promises.
//! - **Re-entrancy guard**: a process-wide entry latch rejects nested
//!   calls made from inside token-ledger callbacks.

pub mod balances;
pub mod config;
pub mod engine;
pub mod events;
pub mod guard;
pub mod math;
pub mod service;
pub mod settlement;
pub mod window;

pub use config::EngineConfig;
pub use engine::RewardEngine;
pub use events::EngineEvent;
pub use service::StakingService;
