//! Trust gate service
//!
//! Reads a user's statistics and live role membership, asks the domain rule
//! what should change, and applies it through the platform's role manager.
//! Platform failures never abort the evaluation: each one becomes a skipped
//! outcome and is not retried.

use tracing::{info, instrument, warn};

use vouch_core::{
    GateDecision, GateRole, Role, RoleManager, RoleManagerError, RoleState, RoleTransition,
    Snowflake,
};

use crate::dto::{GateOutcome, GateReport, GateStatus, SkipReason};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::trust::TrustService;

/// Restricted first, then trusted
const EVALUATION_ORDER: [GateRole; 2] = [GateRole::Restricted, GateRole::Trusted];

/// Trust gate service
pub struct TrustGateService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TrustGateService<'a> {
    /// Create a new TrustGateService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn configured_role(&self, role: GateRole) -> Option<Snowflake> {
        let settings = self.ctx.settings();
        match role {
            GateRole::Trusted => settings.trusted_role,
            GateRole::Restricted => settings.restricted_role,
        }
    }

    fn configured(&self) -> Vec<(GateRole, Snowflake)> {
        EVALUATION_ORDER
            .into_iter()
            .filter_map(|role| self.configured_role(role).map(|id| (role, id)))
            .collect()
    }

    /// Reconcile both gate roles for one member.
    ///
    /// Only ledger reads can fail this call; every platform problem is
    /// reported as a skipped outcome in the returned report.
    #[instrument(skip(self, roles))]
    pub async fn evaluate(
        &self,
        roles: &dyn RoleManager,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<GateReport> {
        let mut report = GateReport::empty(guild_id, user_id);

        let configured = self.configured();
        if configured.is_empty() {
            return Ok(report);
        }

        let stats = TrustService::new(self.ctx).stats(guild_id, user_id).await?;
        if stats.is_empty() {
            return Ok(report);
        }

        let member_roles = match roles.member_role_ids(guild_id, user_id).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "cannot read member roles; skipping trust gate");
                report.outcomes = configured
                    .into_iter()
                    .map(|(role, role_id)| GateOutcome {
                        role,
                        role_id,
                        transition: RoleTransition::NoOp,
                        status: GateStatus::Skipped(skip_reason(&e)),
                    })
                    .collect();
                return Ok(report);
            }
        };

        let state = RoleState {
            has_trusted: self
                .configured_role(GateRole::Trusted)
                .is_some_and(|id| member_roles.contains(&id)),
            has_restricted: self
                .configured_role(GateRole::Restricted)
                .is_some_and(|id| member_roles.contains(&id)),
        };

        let Some(decision) = GateDecision::decide(&stats, state, &self.ctx.settings().thresholds) else {
            return Ok(report);
        };

        // Why every change must be skipped, if it must
        let blocked = match roles.can_manage_roles(guild_id).await {
            Ok(true) => None,
            Ok(false) => Some(SkipReason::MissingManageRoles),
            Err(e) => {
                warn!(error = %e, "cannot read manage-roles privilege");
                Some(skip_reason(&e))
            }
        };

        for (role, role_id) in configured {
            let transition = decision.for_role(role);
            let status = if transition.is_noop() {
                GateStatus::Unchanged
            } else if let Some(reason) = &blocked {
                GateStatus::Skipped(reason.clone())
            } else {
                self.apply(roles, guild_id, user_id, role, role_id, transition)
                    .await
            };

            match &status {
                GateStatus::Applied => {
                    info!(role = %role, role_id = %role_id, action = ?transition, "trust gate transition applied");
                }
                GateStatus::Skipped(reason) => {
                    warn!(role = %role, role_id = %role_id, action = ?transition, reason = ?reason, "trust gate transition skipped");
                }
                GateStatus::Unchanged => {}
            }

            report.outcomes.push(GateOutcome {
                role,
                role_id,
                transition,
                status,
            });
        }

        Ok(report)
    }

    async fn apply(
        &self,
        roles: &dyn RoleManager,
        guild_id: Snowflake,
        user_id: Snowflake,
        role: GateRole,
        role_id: Snowflake,
        transition: RoleTransition,
    ) -> GateStatus {
        let target: Role = match roles.find_role(guild_id, role_id).await {
            Ok(Some(target)) => target,
            Ok(None) => return GateStatus::Skipped(SkipReason::RoleNotFound),
            Err(e) => return GateStatus::Skipped(skip_reason(&e)),
        };

        match roles.can_manage(guild_id, &target).await {
            Ok(true) => {}
            Ok(false) => return GateStatus::Skipped(SkipReason::Hierarchy),
            Err(e) => return GateStatus::Skipped(skip_reason(&e)),
        }

        let result = match transition {
            RoleTransition::Grant => {
                roles
                    .grant(guild_id, user_id, &target, grant_reason(role))
                    .await
            }
            RoleTransition::Revoke => {
                roles
                    .revoke(guild_id, user_id, &target, revoke_reason(role))
                    .await
            }
            RoleTransition::NoOp => return GateStatus::Unchanged,
        };

        match result {
            Ok(()) => GateStatus::Applied,
            Err(e) => GateStatus::Skipped(skip_reason(&e)),
        }
    }
}

fn skip_reason(err: &RoleManagerError) -> SkipReason {
    match err {
        RoleManagerError::Forbidden(_) => SkipReason::Forbidden(err.to_string()),
        RoleManagerError::RoleNotFound(_) => SkipReason::RoleNotFound,
        RoleManagerError::MemberNotFound(_) | RoleManagerError::Platform(_) => {
            SkipReason::Platform(err.to_string())
        }
    }
}

/// Audit-log reason attached to a grant
fn grant_reason(role: GateRole) -> &'static str {
    match role {
        GateRole::Trusted => "Trust gate: trusted (high avg rating)",
        GateRole::Restricted => "Trust gate: restricted (low avg rating)",
    }
}

/// Audit-log reason attached to a revoke
fn revoke_reason(role: GateRole) -> &'static str {
    match role {
        GateRole::Trusted => "Trust gate: remove trusted (no longer meets criteria)",
        GateRole::Restricted => "Trust gate: remove restricted (no longer meets criteria)",
    }
}
