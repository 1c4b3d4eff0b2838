//! Derived statistics - recomputed from the ledger on every read, never persisted

use serde::Serialize;

use crate::traits::VouchAggregate;
use crate::value_objects::Snowflake;

/// Per-user trust statistics scoped to one guild
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrustStats {
    pub total: i64,
    /// Mean rating; `None` exactly when `total == 0`
    pub avg_rating: Option<f64>,
    pub suspicious_count: i64,
    pub middleman_count: i64,
    /// Mean rating over vouches that named a middleman
    pub middleman_avg: Option<f64>,
}

impl TrustStats {
    /// Statistics of a user nobody has vouched for
    pub fn empty() -> Self {
        Self {
            total: 0,
            avg_rating: None,
            suspicious_count: 0,
            middleman_count: 0,
            middleman_avg: None,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl From<VouchAggregate> for TrustStats {
    fn from(raw: VouchAggregate) -> Self {
        if raw.total <= 0 {
            return Self::empty();
        }

        Self {
            total: raw.total,
            avg_rating: raw.avg_rating,
            suspicious_count: raw.suspicious_count.unwrap_or(0),
            middleman_count: raw.middleman_count.unwrap_or(0),
            middleman_avg: raw
                .middleman_avg
                .filter(|_| raw.middleman_count.unwrap_or(0) > 0),
        }
    }
}

/// A row of a ranking (leaderboard or top middlemen)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedUser {
    pub user_id: Snowflake,
    pub vouch_count: i64,
    pub avg_rating: f64,
}

/// Guild-wide summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuildStats {
    pub total: i64,
    pub avg_rating: Option<f64>,
    pub suspicious_count: i64,
    pub top_middlemen: Vec<RankedUser>,
}
