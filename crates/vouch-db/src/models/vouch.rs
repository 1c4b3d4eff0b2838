//! Vouch database models

use sqlx::FromRow;

/// Database model for the vouches table
#[derive(Debug, Clone, FromRow)]
pub struct VouchModel {
    pub id: i64,
    pub guild_id: i64,
    pub vouched_user_id: i64,
    pub voucher_user_id: i64,
    pub trader_user_id: i64,
    pub middleman_user_id: Option<i64>,
    pub rating: i64,
    pub traded_item: String,
    /// Canonical `YYYY-MM-DD HH:MM:SS UTC` string, kept for humans reading the file
    pub created_at: String,
    /// Seconds since the Unix epoch; the authoritative timestamp
    pub created_ts: i64,
    pub suspicious: i64,
}

impl VouchModel {
    #[inline]
    pub fn is_suspicious(&self) -> bool {
        self.suspicious != 0
    }
}

/// Aggregate row (count, averages, sums); SQL NULLs are preserved
#[derive(Debug, Clone, Copy, FromRow)]
pub struct AggregateModel {
    pub total: i64,
    pub avg_rating: Option<f64>,
    pub suspicious_count: Option<i64>,
    pub middleman_count: Option<i64>,
    pub middleman_avg: Option<f64>,
}

/// One grouped ranking row
#[derive(Debug, Clone, Copy, FromRow)]
pub struct RankedModel {
    pub user_id: i64,
    pub vouch_count: i64,
    pub avg_rating: f64,
}
