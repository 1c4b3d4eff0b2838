//! Vouch entity - a single reputation assertion about a trade

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DomainError;
use crate::value_objects::{Rating, Snowflake, VouchId};

/// Canonical rendering of `created_at`: `YYYY-MM-DD HH:MM:SS UTC`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// A vouch that passed validation but has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVouch {
    pub guild_id: Snowflake,
    pub voucher_user_id: Snowflake,
    pub vouched_user_id: Snowflake,
    pub trader_user_id: Snowflake,
    pub middleman_user_id: Option<Snowflake>,
    pub rating: Rating,
    pub traded_item: String,
}

impl NewVouch {
    /// Longest accepted traded-item description, in characters
    pub const MAX_ITEM_LEN: usize = 1024;

    /// Create a new vouch candidate, trimming and validating the item description
    pub fn new(
        guild_id: Snowflake,
        voucher_user_id: Snowflake,
        vouched_user_id: Snowflake,
        trader_user_id: Snowflake,
        middleman_user_id: Option<Snowflake>,
        rating: Rating,
        traded_item: &str,
    ) -> Result<Self, DomainError> {
        if guild_id.is_zero() {
            return Err(DomainError::MissingGuildContext);
        }

        let traded_item = traded_item.trim();
        if traded_item.is_empty() {
            return Err(DomainError::EmptyTradedItem);
        }
        if traded_item.chars().count() > Self::MAX_ITEM_LEN {
            return Err(DomainError::TradedItemTooLong {
                max: Self::MAX_ITEM_LEN,
            });
        }

        Ok(Self {
            guild_id,
            voucher_user_id,
            vouched_user_id,
            trader_user_id,
            middleman_user_id,
            rating,
            traded_item: traded_item.to_string(),
        })
    }

    /// Attach the store-assigned identity; only the repository calls this
    pub fn into_record(self, id: VouchId, created_at: DateTime<Utc>, suspicious: bool) -> VouchRecord {
        VouchRecord {
            id,
            guild_id: self.guild_id,
            vouched_user_id: self.vouched_user_id,
            voucher_user_id: self.voucher_user_id,
            trader_user_id: self.trader_user_id,
            middleman_user_id: self.middleman_user_id,
            rating: self.rating,
            traded_item: self.traded_item,
            created_at,
            suspicious,
        }
    }
}

/// A persisted vouch. Immutable: the ledger exposes no update or delete path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VouchRecord {
    pub id: VouchId,
    pub guild_id: Snowflake,
    pub vouched_user_id: Snowflake,
    pub voucher_user_id: Snowflake,
    pub trader_user_id: Snowflake,
    pub middleman_user_id: Option<Snowflake>,
    pub rating: Rating,
    pub traded_item: String,
    pub created_at: DateTime<Utc>,
    /// Heuristic flag computed once at submission time
    pub suspicious: bool,
}

impl VouchRecord {
    /// `created_at` in canonical form
    pub fn created_at_display(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }

    #[inline]
    pub fn has_middleman(&self) -> bool {
        self.middleman_user_id.is_some()
    }
}
