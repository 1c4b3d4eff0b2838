//! Trust gate - reconciles the trusted / restricted roles against vouch statistics
//!
//! The decision is a pure function of `(TrustStats, RoleState, TrustThresholds)`.
//! Nothing is persisted, so re-running it after a partial failure converges to
//! the same answer, and running it twice with unchanged inputs after the first
//! result was applied yields only no-ops.

use serde::Serialize;
use std::fmt;

use crate::entities::TrustStats;

/// Configured thresholds. The two roles are evaluated independently; a poorly
/// chosen set can make both conditions hold at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrustThresholds {
    pub trusted_min_vouches: i64,
    pub trusted_min_avg: f64,
    pub restricted_min_vouches: i64,
    pub restricted_max_avg: f64,
}

impl Default for TrustThresholds {
    fn default() -> Self {
        Self {
            trusted_min_vouches: 25,
            trusted_min_avg: 4.7,
            restricted_min_vouches: 5,
            restricted_max_avg: 2.5,
        }
    }
}

impl TrustThresholds {
    /// `None` when the user has no vouches (no average to compare)
    pub fn should_trust(&self, stats: &TrustStats) -> Option<bool> {
        let avg = stats.avg_rating?;
        Some(stats.total >= self.trusted_min_vouches && avg >= self.trusted_min_avg)
    }

    /// `None` when the user has no vouches (no average to compare)
    pub fn should_restrict(&self, stats: &TrustStats) -> Option<bool> {
        let avg = stats.avg_rating?;
        Some(stats.total >= self.restricted_min_vouches && avg <= self.restricted_max_avg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateRole {
    Trusted,
    Restricted,
}

impl fmt::Display for GateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trusted => f.write_str("trusted"),
            Self::Restricted => f.write_str("restricted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTransition {
    Grant,
    Revoke,
    NoOp,
}

impl RoleTransition {
    /// Transition that moves `has_role` towards `should_have`
    pub fn reconcile(should_have: bool, has_role: bool) -> Self {
        match (should_have, has_role) {
            (true, false) => Self::Grant,
            (false, true) => Self::Revoke,
            _ => Self::NoOp,
        }
    }

    #[inline]
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}

/// Current membership of the two gate roles, read live from the platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleState {
    pub has_trusted: bool,
    pub has_restricted: bool,
}

impl RoleState {
    pub fn has(&self, role: GateRole) -> bool {
        match role {
            GateRole::Trusted => self.has_trusted,
            GateRole::Restricted => self.has_restricted,
        }
    }
}

/// Intent per role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateDecision {
    pub trusted: RoleTransition,
    pub restricted: RoleTransition,
}

impl GateDecision {
    /// Decide both transitions, or `None` when the user has no vouches:
    /// absence of data never changes a role.
    pub fn decide(stats: &TrustStats, state: RoleState, thresholds: &TrustThresholds) -> Option<Self> {
        let should_trust = thresholds.should_trust(stats)?;
        let should_restrict = thresholds.should_restrict(stats)?;

        Some(Self {
            trusted: RoleTransition::reconcile(should_trust, state.has_trusted),
            restricted: RoleTransition::reconcile(should_restrict, state.has_restricted),
        })
    }

    pub fn for_role(&self, role: GateRole) -> RoleTransition {
        match role {
            GateRole::Trusted => self.trusted,
            GateRole::Restricted => self.restricted,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.trusted.is_noop() && self.restricted.is_noop()
    }

    /// Role state after this decision is applied in full
    pub fn applied_to(&self, state: RoleState) -> RoleState {
        let apply = |t: RoleTransition, has: bool| match t {
            RoleTransition::Grant => true,
            RoleTransition::Revoke => false,
            RoleTransition::NoOp => has,
        };
        RoleState {
            has_trusted: apply(self.trusted, state.has_trusted),
            has_restricted: apply(self.restricted, state.has_restricted),
        }
    }
}
