//! Suspicious-vouch detection
//!
//! Gathers the two windowed counts from the ledger and hands them to the
//! domain rule. Runs before the candidate is inserted, so the new vouch is
//! never compared against itself.

use tracing::{info, instrument};

use vouch_core::{Snowflake, SuspicionEvidence, SuspicionVerdict};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Suspicious-vouch detector
pub struct SuspiciousDetector<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SuspiciousDetector<'a> {
    /// Create a new SuspiciousDetector
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Count prior vouches in both directions inside their windows
    #[instrument(skip(self))]
    pub async fn gather(
        &self,
        guild_id: Snowflake,
        voucher_id: Snowflake,
        vouched_id: Snowflake,
    ) -> ServiceResult<SuspicionEvidence> {
        let now = self.ctx.clock().now();
        let windows = self.ctx.settings().windows;
        let repo = self.ctx.vouch_repo();

        let recent_repeats = repo
            .count_since(guild_id, voucher_id, vouched_id, windows.repeat_since(now))
            .await?;
        let recent_reversals = repo
            .count_since(guild_id, vouched_id, voucher_id, windows.mutual_since(now))
            .await?;

        Ok(SuspicionEvidence {
            recent_repeats,
            recent_reversals,
        })
    }

    /// Evaluate both rules for a candidate vouch
    #[instrument(skip(self))]
    pub async fn evaluate(
        &self,
        guild_id: Snowflake,
        voucher_id: Snowflake,
        vouched_id: Snowflake,
    ) -> ServiceResult<SuspicionVerdict> {
        let verdict = self.gather(guild_id, voucher_id, vouched_id).await?.verdict();

        for reason in &verdict.reasons {
            info!(
                guild_id = %guild_id,
                voucher_id = %voucher_id,
                vouched_id = %vouched_id,
                rule = reason.as_str(),
                "suspicious vouch rule matched"
            );
        }

        Ok(verdict)
    }

    /// Shorthand for `evaluate(..).is_suspicious()`
    pub async fn is_suspicious(
        &self,
        guild_id: Snowflake,
        voucher_id: Snowflake,
        vouched_id: Snowflake,
    ) -> ServiceResult<bool> {
        Ok(self
            .evaluate(guild_id, voucher_id, vouched_id)
            .await?
            .is_suspicious())
    }
}
