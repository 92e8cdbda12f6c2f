//! Engine configuration.

use prorata_core::constants::DEFAULT_WINDOW_DURATION_SECS;
use prorata_core::error::ValidationError;
use prorata_core::types::PrincipalId;
use serde::{Deserialize, Serialize};

/// Static deployment parameters of one engine instance.
///
/// The vault is the principal the engine moves tokens through on the
/// external ledgers; stake sits there between stake and withdraw, and
/// injected reward is paid out of it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub admin: PrincipalId,
    pub vault: PrincipalId,
    /// Length of each reward window opened by an injection.
    pub window_duration_secs: u64,
}

impl EngineConfig {
    pub fn new(admin: PrincipalId, vault: PrincipalId) -> Self {
        Self {
            admin,
            vault,
            window_duration_secs: DEFAULT_WINDOW_DURATION_SECS,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.window_duration_secs == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        Ok(())
    }
}
