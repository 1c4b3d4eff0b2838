//! Response DTOs
//!
//! All response DTOs implement `Serialize` so the collaborator can render or
//! log them as-is. Snowflake IDs are serialized as strings.

use serde::Serialize;

use vouch_core::{GateRole, PageCursor, RoleTransition, Snowflake, SuspicionVerdict, VouchRecord};

// ============================================================================
// Listing
// ============================================================================

/// One page of a user's received vouches
#[derive(Debug, Clone, Serialize)]
pub struct VouchListing {
    pub user_id: Snowflake,
    /// Newest first
    pub records: Vec<VouchRecord>,
    pub cursor: PageCursor,
}

impl VouchListing {
    /// Records paired with their 1-based position in the whole listing ("Vouch #n")
    pub fn numbered(&self) -> impl Iterator<Item = (i64, &VouchRecord)> {
        let first = self.cursor.first_ordinal();
        self.records
            .iter()
            .enumerate()
            .map(move |(i, record)| (first + i as i64, record))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// Trust gate
// ============================================================================

/// Why an intended transition was not applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The acting identity lacks the manage-roles privilege
    MissingManageRoles,
    /// The configured role does not exist in the guild
    RoleNotFound,
    /// The role sits at or above the acting identity's highest role
    Hierarchy,
    /// The platform refused the change
    Forbidden(String),
    /// Any other platform failure
    Platform(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GateStatus {
    /// Grant or revoke went through
    Applied,
    /// Nothing to do
    Unchanged,
    Skipped(SkipReason),
}

/// What happened to one gate role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateOutcome {
    pub role: GateRole,
    pub role_id: Snowflake,
    pub transition: RoleTransition,
    pub status: GateStatus,
}

impl GateOutcome {
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self.status, GateStatus::Applied)
    }

    #[inline]
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, GateStatus::Skipped(_))
    }
}

/// Result of one trust-gate evaluation; empty when the gate is disabled or the
/// user has no vouches
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateReport {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub outcomes: Vec<GateOutcome>,
}

impl GateReport {
    pub fn empty(guild_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            guild_id,
            user_id,
            outcomes: Vec::new(),
        }
    }

    pub fn outcome(&self, role: GateRole) -> Option<&GateOutcome> {
        self.outcomes.iter().find(|o| o.role == role)
    }

    pub fn applied(&self) -> impl Iterator<Item = &GateOutcome> {
        self.outcomes.iter().filter(|o| o.is_applied())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &GateOutcome> {
        self.outcomes.iter().filter(|o| o.is_skipped())
    }

    /// True when nothing was (or would have been) changed
    pub fn is_noop(&self) -> bool {
        self.outcomes.iter().all(|o| o.transition.is_noop())
    }
}

// ============================================================================
// Submission
// ============================================================================

/// Everything a submit-and-reconcile call produced
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub record: VouchRecord,
    pub verdict: SuspicionVerdict,
    pub gate: GateReport,
}
