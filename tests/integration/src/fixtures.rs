//! Test fixtures and platform doubles
//!
//! Provides reusable ids, requests, a settable clock and in-memory stand-ins
//! for the chat platform's role manager and DM channel.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;

use vouch_core::{
    Clock, NotifyError, NotifyResult, Role, RoleManager, RoleManagerError, RoleResult, Snowflake,
    VouchNotifier, VouchRecord,
};
use vouch_service::dto::SubmitVouchRequest;

/// Counter for unique ids
static COUNTER: AtomicI64 = AtomicI64::new(1_000);

/// Get a unique snowflake for test data
pub fn unique_id() -> Snowflake {
    Snowflake::new(COUNTER.fetch_add(1, Ordering::SeqCst))
}

pub const TRUSTED_ROLE: Snowflake = Snowflake::new(900_001);
pub const RESTRICTED_ROLE: Snowflake = Snowflake::new(900_002);

/// Build a vouch request for `vouched` traded directly
pub fn vouch(guild: Snowflake, voucher: Snowflake, vouched: Snowflake, rating: i64) -> SubmitVouchRequest {
    SubmitVouchRequest {
        guild_id: guild,
        voucher_user_id: voucher,
        vouched_user_id: vouched,
        trader_user_id: vouched,
        middleman_user_id: None,
        rating,
        traded_item: "Golden Dragon".to_string(),
    }
}

/// Same as [`vouch`] with a middleman on the trade
pub fn vouch_via(
    guild: Snowflake,
    voucher: Snowflake,
    vouched: Snowflake,
    middleman: Snowflake,
    rating: i64,
) -> SubmitVouchRequest {
    SubmitVouchRequest {
        middleman_user_id: Some(middleman),
        ..vouch(guild, voucher, vouched, rating)
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Noon on 2026-03-01 UTC
    pub fn default_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

// ============================================================================
// Role manager
// ============================================================================

/// One grant or revoke the double was asked to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleChange {
    pub user_id: Snowflake,
    pub role_id: Snowflake,
    pub granted: bool,
    pub reason: String,
}

/// In-memory guild: a role table, member role sets and the acting identity's
/// own top role
pub struct MemoryRoleManager {
    guild_id: Snowflake,
    roles: DashMap<Snowflake, Role>,
    members: DashMap<Snowflake, HashSet<Snowflake>>,
    acting_role: Role,
    privileged: AtomicBool,
    unreachable: AtomicBool,
    changes: Mutex<Vec<RoleChange>>,
}

impl MemoryRoleManager {
    /// Guild with both gate roles below the acting identity
    pub fn new(guild_id: Snowflake) -> Self {
        let manager = Self {
            guild_id,
            roles: DashMap::new(),
            members: DashMap::new(),
            acting_role: Role::new(Snowflake::new(900_000), guild_id, "Vouch Bot", 10),
            privileged: AtomicBool::new(true),
            unreachable: AtomicBool::new(false),
            changes: Mutex::new(Vec::new()),
        };
        manager.add_role(TRUSTED_ROLE, "Trusted Trader", 3);
        manager.add_role(RESTRICTED_ROLE, "Restricted", 2);
        manager
    }

    pub fn add_role(&self, id: Snowflake, name: &str, position: i32) {
        self.roles.insert(id, Role::new(id, self.guild_id, name, position));
    }

    pub fn remove_role(&self, id: Snowflake) {
        self.roles.remove(&id);
    }

    pub fn give(&self, user_id: Snowflake, role_id: Snowflake) {
        self.members.entry(user_id).or_default().insert(role_id);
    }

    pub fn holds(&self, user_id: Snowflake, role_id: Snowflake) -> bool {
        self.members
            .get(&user_id)
            .is_some_and(|set| set.contains(&role_id))
    }

    /// Revoke the manage-roles privilege from the acting identity
    pub fn set_privileged(&self, privileged: bool) {
        self.privileged.store(privileged, Ordering::SeqCst);
    }

    /// Make every call fail as if the platform were down
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn changes(&self) -> Vec<RoleChange> {
        self.changes.lock().clone()
    }

    fn check_reachable(&self) -> RoleResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(RoleManagerError::Platform("gateway timeout".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RoleManager for MemoryRoleManager {
    async fn can_manage_roles(&self, _guild_id: Snowflake) -> RoleResult<bool> {
        self.check_reachable()?;
        Ok(self.privileged.load(Ordering::SeqCst))
    }

    async fn find_role(&self, _guild_id: Snowflake, role_id: Snowflake) -> RoleResult<Option<Role>> {
        self.check_reachable()?;
        Ok(self.roles.get(&role_id).map(|role| role.clone()))
    }

    async fn member_role_ids(&self, _guild_id: Snowflake, user_id: Snowflake) -> RoleResult<Vec<Snowflake>> {
        self.check_reachable()?;
        Ok(self
            .members
            .get(&user_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn can_manage(&self, _guild_id: Snowflake, role: &Role) -> RoleResult<bool> {
        self.check_reachable()?;
        Ok(self.acting_role.can_manage(role))
    }

    async fn grant(&self, _guild_id: Snowflake, user_id: Snowflake, role: &Role, reason: &str) -> RoleResult<()> {
        self.check_reachable()?;
        self.members.entry(user_id).or_default().insert(role.id);
        self.changes.lock().push(RoleChange {
            user_id,
            role_id: role.id,
            granted: true,
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn revoke(&self, _guild_id: Snowflake, user_id: Snowflake, role: &Role, reason: &str) -> RoleResult<()> {
        self.check_reachable()?;
        if let Some(mut set) = self.members.get_mut(&user_id) {
            set.remove(&role.id);
        }
        self.changes.lock().push(RoleChange {
            user_id,
            role_id: role.id,
            granted: false,
            reason: reason.to_string(),
        });
        Ok(())
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Records every receipt; can be told to fail like a user with closed DMs
#[derive(Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<VouchRecord>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let notifier = Self::default();
        notifier.fail.store(true, Ordering::SeqCst);
        Arc::new(notifier)
    }

    pub fn delivered(&self) -> Vec<VouchRecord> {
        self.delivered.lock().clone()
    }
}

#[async_trait]
impl VouchNotifier for RecordingNotifier {
    async fn vouch_recorded(&self, record: &VouchRecord) -> NotifyResult {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Unreachable("cannot send messages to this user".to_string()));
        }
        self.delivered.lock().push(record.clone());
        Ok(())
    }
}
