//! Trust statistics service
//!
//! Always recomputed from the ledger; nothing here is cached, so the trust gate
//! can be reproduced from stored vouches alone.

use tracing::instrument;

use vouch_core::{GuildStats, RankedUser, RankingField, Snowflake, TrustStats};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Trust statistics and rankings
pub struct TrustService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TrustService<'a> {
    /// Create a new TrustService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Statistics over the vouches a user received in a guild
    #[instrument(skip(self))]
    pub async fn stats(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<TrustStats> {
        let raw = self.ctx.vouch_repo().aggregate(guild_id, user_id).await?;
        Ok(TrustStats::from(raw))
    }

    /// Most-vouched users, using the configured row count
    pub async fn leaderboard(&self, guild_id: Snowflake) -> ServiceResult<Vec<RankedUser>> {
        self.leaderboard_with_limit(guild_id, self.ctx.settings().leaderboard_limit)
            .await
    }

    #[instrument(skip(self))]
    pub async fn leaderboard_with_limit(
        &self,
        guild_id: Snowflake,
        limit: u32,
    ) -> ServiceResult<Vec<RankedUser>> {
        Ok(self
            .ctx
            .vouch_repo()
            .top_by_count(guild_id, RankingField::VouchedUser, limit)
            .await?)
    }

    /// Most-named middlemen, using the configured row count
    pub async fn top_middlemen(&self, guild_id: Snowflake) -> ServiceResult<Vec<RankedUser>> {
        self.top_middlemen_with_limit(guild_id, self.ctx.settings().top_middlemen_limit)
            .await
    }

    #[instrument(skip(self))]
    pub async fn top_middlemen_with_limit(
        &self,
        guild_id: Snowflake,
        limit: u32,
    ) -> ServiceResult<Vec<RankedUser>> {
        Ok(self
            .ctx
            .vouch_repo()
            .top_by_count(guild_id, RankingField::Middleman, limit)
            .await?)
    }

    /// Guild-wide totals plus the top middlemen
    #[instrument(skip(self))]
    pub async fn guild_stats(&self, guild_id: Snowflake) -> ServiceResult<GuildStats> {
        let totals = TrustStats::from(self.ctx.vouch_repo().aggregate_guild(guild_id).await?);
        let top_middlemen = self.top_middlemen(guild_id).await?;

        Ok(GuildStats {
            total: totals.total,
            avg_rating: totals.avg_rating,
            suspicious_count: totals.suspicious_count,
            top_middlemen,
        })
    }
}
