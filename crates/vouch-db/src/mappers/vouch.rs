//! Vouch entity <-> model mapper

use chrono::{DateTime, Utc};

use vouch_core::entities::TIMESTAMP_FORMAT;
use vouch_core::error::DomainError;
use vouch_core::traits::VouchAggregate;
use vouch_core::value_objects::{Rating, Snowflake, VouchId};
use vouch_core::{NewVouch, RankedUser, VouchRecord};

use crate::models::{AggregateModel, RankedModel, VouchModel};

/// Convert a stored row back into a record.
///
/// Fails only if the row was written outside this crate with values the
/// schema checks did not catch.
impl TryFrom<VouchModel> for VouchRecord {
    type Error = DomainError;

    fn try_from(model: VouchModel) -> Result<Self, Self::Error> {
        let created_at = DateTime::<Utc>::from_timestamp(model.created_ts, 0).ok_or_else(|| {
            DomainError::InternalError(format!(
                "vouch {} has an invalid timestamp {}",
                model.id, model.created_ts
            ))
        })?;
        let rating = Rating::new(model.rating)?;
        let suspicious = model.is_suspicious();

        Ok(VouchRecord {
            id: VouchId::new(model.id),
            guild_id: Snowflake::new(model.guild_id),
            vouched_user_id: Snowflake::new(model.vouched_user_id),
            voucher_user_id: Snowflake::new(model.voucher_user_id),
            trader_user_id: Snowflake::new(model.trader_user_id),
            middleman_user_id: model.middleman_user_id.map(Snowflake::new),
            rating,
            traded_item: model.traded_item,
            created_at,
            suspicious,
        })
    }
}

impl From<AggregateModel> for VouchAggregate {
    fn from(model: AggregateModel) -> Self {
        VouchAggregate {
            total: model.total,
            avg_rating: model.avg_rating,
            suspicious_count: model.suspicious_count,
            middleman_count: model.middleman_count,
            middleman_avg: model.middleman_avg,
        }
    }
}

impl From<RankedModel> for RankedUser {
    fn from(model: RankedModel) -> Self {
        RankedUser {
            user_id: Snowflake::new(model.user_id),
            vouch_count: model.vouch_count,
            avg_rating: model.avg_rating,
        }
    }
}

/// Column values for inserting a new vouch
pub struct VouchInsert<'a> {
    pub guild_id: i64,
    pub vouched_user_id: i64,
    pub voucher_user_id: i64,
    pub trader_user_id: i64,
    pub middleman_user_id: Option<i64>,
    pub rating: i64,
    pub traded_item: &'a str,
    pub created_at: String,
    pub created_ts: i64,
    pub suspicious: i64,
}

impl<'a> VouchInsert<'a> {
    /// `created_at` must already be truncated to whole seconds
    pub fn new(vouch: &'a NewVouch, created_at: DateTime<Utc>, suspicious: bool) -> Self {
        Self {
            guild_id: vouch.guild_id.into_inner(),
            vouched_user_id: vouch.vouched_user_id.into_inner(),
            voucher_user_id: vouch.voucher_user_id.into_inner(),
            trader_user_id: vouch.trader_user_id.into_inner(),
            middleman_user_id: vouch.middleman_user_id.map(Snowflake::into_inner),
            rating: i64::from(vouch.rating.get()),
            traded_item: &vouch.traded_item,
            created_at: created_at.format(TIMESTAMP_FORMAT).to_string(),
            created_ts: to_epoch_seconds(created_at),
            suspicious: i64::from(suspicious),
        }
    }
}

/// Window bounds are compared against `created_ts`
#[inline]
pub fn to_epoch_seconds(at: DateTime<Utc>) -> i64 {
    at.timestamp()
}
