//! Core ledger types.
//!
//! All monetary values are `u128` base units scaled by
//! [`UNIT`](crate::constants::UNIT). Timestamps are Unix seconds and are
//! always supplied by the caller, never read from a system clock, so every
//! operation is deterministic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A monetary quantity in base units (fixed-point, scale 10^18).
pub type Amount = u128;

/// A point in time, in Unix seconds.
pub type Timestamp = u64;

/// Identity of a principal: an account capable of holding stake and
/// receiving reward.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct PrincipalId(pub [u8; 32]);

impl PrincipalId {
    /// The zero principal. Not a valid account; useful as a sentinel in tests.
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for PrincipalId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Identity of an external token ledger.
///
/// The engine never owns a ledger; it holds references and compares
/// ledgers by id (for example to refuse recovering the staked token).
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct LedgerId(pub [u8; 32]);

impl LedgerId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
