//! SQLite implementation of VouchRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info, instrument};

use vouch_core::entities::{NewVouch, RankedUser, VouchRecord};
use vouch_core::error::DomainError;
use vouch_core::traits::{
    Clock, RankingField, RepoResult, SystemClock, VouchAggregate, VouchPage, VouchRepository,
};
use vouch_core::value_objects::{Snowflake, VouchId};

use crate::mappers::{to_epoch_seconds, VouchInsert};
use crate::models::{AggregateModel, RankedModel, VouchModel};
use crate::pool::LedgerPool;
use crate::schema;

use super::error::map_db_error;

const SELECT_VOUCH: &str = r#"
    SELECT id, guild_id, vouched_user_id, voucher_user_id, trader_user_id, middleman_user_id,
           rating, traded_item, created_at, created_ts, suspicious
    FROM vouches
"#;

const SELECT_AGGREGATE: &str = r#"
    SELECT COUNT(*) AS total,
           AVG(rating) AS avg_rating,
           SUM(suspicious) AS suspicious_count,
           SUM(CASE WHEN middleman_user_id IS NOT NULL THEN 1 ELSE 0 END) AS middleman_count,
           AVG(CASE WHEN middleman_user_id IS NOT NULL THEN rating END) AS middleman_avg
    FROM vouches
"#;

/// SQLite implementation of VouchRepository
#[derive(Clone)]
pub struct SqliteVouchRepository {
    pool: LedgerPool,
    clock: Arc<dyn Clock>,
}

impl SqliteVouchRepository {
    /// Create a new SqliteVouchRepository stamping records with the system clock
    pub fn new(pool: LedgerPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// Create a repository with an explicit time source
    pub fn with_clock(pool: LedgerPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    fn ranking_column(field: RankingField) -> &'static str {
        match field {
            RankingField::VouchedUser => "vouched_user_id",
            RankingField::Middleman => "middleman_user_id",
        }
    }

    fn into_records(models: Vec<VouchModel>) -> RepoResult<Vec<VouchRecord>> {
        models.into_iter().map(VouchRecord::try_from).collect()
    }
}

#[async_trait]
impl VouchRepository for SqliteVouchRepository {
    #[instrument(skip(self))]
    async fn initialize(&self) -> RepoResult<()> {
        let session = self.pool.session().await;
        schema::apply(&session).await.map_err(map_db_error)
    }

    #[instrument(skip(self, vouch), fields(guild_id = %vouch.guild_id, vouched_user_id = %vouch.vouched_user_id))]
    async fn insert(&self, vouch: &NewVouch, suspicious: bool) -> RepoResult<VouchRecord> {
        let created_at = self.clock.now().trunc_subsecs(0);
        let row = VouchInsert::new(vouch, created_at, suspicious);

        let session = self.pool.session().await;
        let result = sqlx::query(
            r#"
            INSERT INTO vouches (guild_id, vouched_user_id, voucher_user_id, trader_user_id,
                                 middleman_user_id, rating, traded_item, created_at, created_ts,
                                 suspicious)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.guild_id)
        .bind(row.vouched_user_id)
        .bind(row.voucher_user_id)
        .bind(row.trader_user_id)
        .bind(row.middleman_user_id)
        .bind(row.rating)
        .bind(row.traded_item)
        .bind(&row.created_at)
        .bind(row.created_ts)
        .bind(row.suspicious)
        .execute(&*session)
        .await
        .map_err(map_db_error)?;
        drop(session);

        let id = VouchId::new(result.last_insert_rowid());
        info!(vouch_id = %id, suspicious, "vouch recorded");

        Ok(vouch.clone().into_record(id, created_at, suspicious))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, guild_id: Snowflake, id: VouchId) -> RepoResult<Option<VouchRecord>> {
        let sql = format!("{SELECT_VOUCH} WHERE guild_id = ? AND id = ?");

        let session = self.pool.session().await;
        let result = sqlx::query_as::<_, VouchModel>(&sql)
            .bind(guild_id.into_inner())
            .bind(id.into_inner())
            .fetch_optional(&*session)
            .await
            .map_err(map_db_error)?;

        result.map(VouchRecord::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn page(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        page: u32,
        page_size: u32,
    ) -> RepoResult<VouchPage> {
        if page_size == 0 {
            return Err(DomainError::ValidationError("page_size must be at least 1".into()));
        }
        let limit = i64::from(page_size);
        // Saturated offsets land past the end like any other out-of-range page
        let offset = i64::from(page).saturating_mul(limit);
        let sql = format!(
            "{SELECT_VOUCH} WHERE guild_id = ? AND vouched_user_id = ? ORDER BY id DESC LIMIT ? OFFSET ?"
        );

        // Count and slice come from one snapshot
        let session = self.pool.session().await;
        let mut tx = session.begin().await.map_err(map_db_error)?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM vouches
            WHERE guild_id = ? AND vouched_user_id = ?
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let models = sqlx::query_as::<_, VouchModel>(&sql)
            .bind(guild_id.into_inner())
            .bind(user_id.into_inner())
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        drop(session);

        debug!(total, returned = models.len(), "vouch page read");

        Ok(VouchPage {
            records: Self::into_records(models)?,
            total,
        })
    }

    #[instrument(skip(self))]
    async fn all_for_user(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Vec<VouchRecord>> {
        let sql = format!("{SELECT_VOUCH} WHERE guild_id = ? AND vouched_user_id = ? ORDER BY id DESC");

        let session = self.pool.session().await;
        let models = sqlx::query_as::<_, VouchModel>(&sql)
            .bind(guild_id.into_inner())
            .bind(user_id.into_inner())
            .fetch_all(&*session)
            .await
            .map_err(map_db_error)?;

        Self::into_records(models)
    }

    #[instrument(skip(self))]
    async fn aggregate(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<VouchAggregate> {
        let sql = format!("{SELECT_AGGREGATE} WHERE guild_id = ? AND vouched_user_id = ?");

        let session = self.pool.session().await;
        let model = sqlx::query_as::<_, AggregateModel>(&sql)
            .bind(guild_id.into_inner())
            .bind(user_id.into_inner())
            .fetch_one(&*session)
            .await
            .map_err(map_db_error)?;

        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn aggregate_guild(&self, guild_id: Snowflake) -> RepoResult<VouchAggregate> {
        let sql = format!("{SELECT_AGGREGATE} WHERE guild_id = ?");

        let session = self.pool.session().await;
        let model = sqlx::query_as::<_, AggregateModel>(&sql)
            .bind(guild_id.into_inner())
            .fetch_one(&*session)
            .await
            .map_err(map_db_error)?;

        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn top_by_count(
        &self,
        guild_id: Snowflake,
        field: RankingField,
        limit: u32,
    ) -> RepoResult<Vec<RankedUser>> {
        let column = Self::ranking_column(field);
        // user_id last so equal rows come back in a stable order
        let sql = format!(
            r#"
            SELECT {column} AS user_id, COUNT(*) AS vouch_count, AVG(rating) AS avg_rating
            FROM vouches
            WHERE guild_id = ? AND {column} IS NOT NULL
            GROUP BY {column}
            ORDER BY vouch_count DESC, avg_rating DESC, user_id ASC
            LIMIT ?
            "#
        );

        let session = self.pool.session().await;
        let rows = sqlx::query_as::<_, RankedModel>(&sql)
            .bind(guild_id.into_inner())
            .bind(i64::from(limit))
            .fetch_all(&*session)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(RankedUser::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_since(
        &self,
        guild_id: Snowflake,
        voucher_id: Snowflake,
        vouched_id: Snowflake,
        since: DateTime<Utc>,
    ) -> RepoResult<i64> {
        let session = self.pool.session().await;
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM vouches
            WHERE guild_id = ? AND voucher_user_id = ? AND vouched_user_id = ? AND created_ts >= ?
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(voucher_id.into_inner())
        .bind(vouched_id.into_inner())
        .bind(to_epoch_seconds(since))
        .fetch_one(&*session)
        .await
        .map_err(map_db_error)
    }
}
