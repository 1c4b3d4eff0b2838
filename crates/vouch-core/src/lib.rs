//! # vouch-core
//!
//! Domain layer for the vouch ledger: records, derived trust statistics, the
//! suspicion heuristics, the trust-gate decision rule, and the ports the
//! infrastructure layer implements (storage, role management, notification, clock).
//! This crate has zero dependencies on infrastructure (database, chat platform, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod trust;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{GuildStats, NewVouch, RankedUser, Role, TrustStats, VouchRecord};
pub use error::DomainError;
pub use traits::{
    Clock, NotifyError, NotifyResult, RankingField, RepoResult, RoleManager, RoleManagerError,
    RoleResult, SystemClock, VouchAggregate, VouchNotifier, VouchPage, VouchRepository,
};
pub use trust::{
    GateDecision, GateRole, PageCursor, RoleState, RoleTransition, SuspicionEvidence,
    SuspicionReason, SuspicionVerdict, SuspicionWindows, TrustThresholds,
};
pub use value_objects::{Rating, Snowflake, SnowflakeParseError, VouchId};
