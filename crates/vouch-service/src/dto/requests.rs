//! Request DTOs
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

use vouch_core::{NewVouch, Rating, RepoResult, Snowflake};

/// A vouch as collected by the platform's input flow
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitVouchRequest {
    pub guild_id: Snowflake,
    pub voucher_user_id: Snowflake,
    pub vouched_user_id: Snowflake,
    pub trader_user_id: Snowflake,
    #[serde(default)]
    pub middleman_user_id: Option<Snowflake>,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i64,

    #[validate(length(min = 1, max = 1024, message = "Traded item must be 1-1024 characters"))]
    pub traded_item: String,
}

impl SubmitVouchRequest {
    /// Domain-level checks (blank item after trimming, guild context)
    pub fn to_new_vouch(&self) -> RepoResult<NewVouch> {
        NewVouch::new(
            self.guild_id,
            self.voucher_user_id,
            self.vouched_user_id,
            self.trader_user_id,
            self.middleman_user_id,
            Rating::new(self.rating)?,
            &self.traded_item,
        )
    }
}
