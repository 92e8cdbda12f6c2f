//! Role/permission gate interface and an in-memory implementation.
//!
//! The accrual engine consults a [`RoleGate`] before state-changing
//! administrative operations. Modelling access control as a capability
//! check — a function from (principal, role) to bool — keeps role
//! hierarchies out of the engine entirely; granting and revoking is the
//! host's concern.

use std::collections::HashSet;
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::types::PrincipalId;

/// Recognized roles. Staking, withdrawing, and claiming need no role;
/// every principal may do those.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Configuration changes: duration, pause flag, fund recovery.
    Admin,
    /// Reward injection (`notify_reward_amount`).
    Funder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Funder => write!(f, "funder"),
        }
    }
}

/// Answers "is principal P authorized for role R?".
pub trait RoleGate: Send + Sync {
    fn has_role(&self, principal: &PrincipalId, role: Role) -> bool;
}

/// In-memory role gate with explicit grants. Suitable for tests and for
/// hosts without an external authorization service.
#[derive(Default)]
pub struct MemoryRoleGate {
    grants: Mutex<HashSet<(PrincipalId, Role)>>,
}

impl MemoryRoleGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, principal: &PrincipalId, role: Role) {
        self.grants.lock().insert((*principal, role));
    }

    pub fn revoke(&self, principal: &PrincipalId, role: Role) {
        self.grants.lock().remove(&(*principal, role));
    }
}

impl RoleGate for MemoryRoleGate {
    fn has_role(&self, principal: &PrincipalId, role: Role) -> bool {
        self.grants.lock().contains(&(*principal, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(seed: u8) -> PrincipalId {
        PrincipalId([seed; 32])
    }

    #[test]
    fn fresh_gate_denies_everyone() {
        let gate = MemoryRoleGate::new();
        assert!(!gate.has_role(&p(1), Role::Admin));
        assert!(!gate.has_role(&p(1), Role::Funder));
    }

    #[test]
    fn grant_is_per_role() {
        let gate = MemoryRoleGate::new();
        gate.grant(&p(1), Role::Funder);
        assert!(gate.has_role(&p(1), Role::Funder));
        assert!(!gate.has_role(&p(1), Role::Admin));
        assert!(!gate.has_role(&p(2), Role::Funder));
    }

    #[test]
    fn revoke_removes_only_that_grant() {
        let gate = MemoryRoleGate::new();
        gate.grant(&p(1), Role::Admin);
        gate.grant(&p(1), Role::Funder);
        gate.revoke(&p(1), Role::Admin);
        assert!(!gate.has_role(&p(1), Role::Admin));
        assert!(gate.has_role(&p(1), Role::Funder));
    }

    #[test]
    fn gate_is_object_safe() {
        let gate = MemoryRoleGate::new();
        let dyn_gate: &dyn RoleGate = &gate;
        assert!(!dyn_gate.has_role(&p(1), Role::Admin));
    }
}
