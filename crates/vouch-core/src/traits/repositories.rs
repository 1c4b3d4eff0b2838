//! Repository traits (ports) - define the interface for ledger storage
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every method is one logical storage operation:
//! implementations must run it under the ledger's ordering guard so that reads
//! observe either the full pre-insert or the full post-insert state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{NewVouch, RankedUser, VouchRecord};
use crate::error::DomainError;
use crate::value_objects::{Snowflake, VouchId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// One page of a user's vouches plus the size of the full scoped set
#[derive(Debug, Clone, Default)]
pub struct VouchPage {
    /// Newest first
    pub records: Vec<VouchRecord>,
    pub total: i64,
}

/// Raw aggregate row as returned by the store (SQL NULLs preserved)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VouchAggregate {
    pub total: i64,
    pub avg_rating: Option<f64>,
    pub suspicious_count: Option<i64>,
    pub middleman_count: Option<i64>,
    pub middleman_avg: Option<f64>,
}

/// Field a ranking groups by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankingField {
    /// Users who received vouches (leaderboard)
    VouchedUser,
    /// Middlemen named in vouches; vouches without a middleman are ignored
    Middleman,
}

#[async_trait]
pub trait VouchRepository: Send + Sync {
    /// Idempotently create the backing schema
    async fn initialize(&self) -> RepoResult<()>;

    /// Persist a vouch, assigning its id and creation timestamp
    async fn insert(&self, vouch: &NewVouch, suspicious: bool) -> RepoResult<VouchRecord>;

    /// Find a vouch by id within a guild
    async fn find_by_id(&self, guild_id: Snowflake, id: VouchId) -> RepoResult<Option<VouchRecord>>;

    /// Page `page` (0-based) of the vouches received by `user_id`, newest first.
    /// Out-of-range pages yield no records but the correct total.
    /// A `page_size` of zero is a validation error.
    async fn page(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        page: u32,
        page_size: u32,
    ) -> RepoResult<VouchPage>;

    /// Every vouch received by `user_id`, newest first
    async fn all_for_user(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Vec<VouchRecord>>;

    /// Aggregate over the vouches received by `user_id`
    async fn aggregate(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<VouchAggregate>;

    /// Aggregate over every vouch in the guild
    async fn aggregate_guild(&self, guild_id: Snowflake) -> RepoResult<VouchAggregate>;

    /// Ranking by vouch count descending, ties broken by average rating descending
    async fn top_by_count(
        &self,
        guild_id: Snowflake,
        field: RankingField,
        limit: u32,
    ) -> RepoResult<Vec<RankedUser>>;

    /// Number of vouches `voucher_id` gave `vouched_id` at or after `since`
    async fn count_since(
        &self,
        guild_id: Snowflake,
        voucher_id: Snowflake,
        vouched_id: Snowflake,
        since: DateTime<Utc>,
    ) -> RepoResult<i64>;
}
