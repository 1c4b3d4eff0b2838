//! Vouch service
//!
//! Submission, listing and export. Submission validates before touching the
//! store, runs the suspicion rules against the existing ledger, then inserts.
//! Only the receipt notification is allowed to fail quietly.

use tracing::{info, instrument, warn};
use validator::Validate;

use vouch_core::{PageCursor, RoleManager, Snowflake, VouchId, VouchRecord};

use crate::dto::{SubmissionOutcome, SubmitVouchRequest, VouchListing};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::gate::TrustGateService;
use super::suspicion::SuspiciousDetector;

/// Vouch service
pub struct VouchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VouchService<'a> {
    /// Create a new VouchService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Validate, flag and durably record a vouch.
    ///
    /// A storage error here means the vouch may not have been recorded and
    /// must be reported to the submitter as a failure.
    #[instrument(skip(self, request), fields(guild_id = %request.guild_id, vouched_user_id = %request.vouched_user_id))]
    pub async fn submit(&self, request: SubmitVouchRequest) -> ServiceResult<VouchRecord> {
        Ok(self.submit_inner(&request).await?.0)
    }

    async fn submit_inner(
        &self,
        request: &SubmitVouchRequest,
    ) -> ServiceResult<(VouchRecord, vouch_core::SuspicionVerdict)> {
        request.validate()?;
        let vouch = request.to_new_vouch()?;

        let verdict = SuspiciousDetector::new(self.ctx)
            .evaluate(vouch.guild_id, vouch.voucher_user_id, vouch.vouched_user_id)
            .await?;

        let record = self
            .ctx
            .vouch_repo()
            .insert(&vouch, verdict.is_suspicious())
            .await?;

        info!(
            vouch_id = %record.id,
            rating = record.rating.get(),
            suspicious = record.suspicious,
            "Vouch submitted"
        );

        self.notify(&record).await;

        Ok((record, verdict))
    }

    /// Submit, then reconcile the vouched user's gate roles.
    ///
    /// The gate runs only after the insert succeeded; its platform failures
    /// show up in the report, never as an error.
    #[instrument(skip(self, roles, request), fields(guild_id = %request.guild_id, vouched_user_id = %request.vouched_user_id))]
    pub async fn submit_and_reconcile(
        &self,
        roles: &dyn RoleManager,
        request: SubmitVouchRequest,
    ) -> ServiceResult<SubmissionOutcome> {
        let (record, verdict) = self.submit_inner(&request).await?;

        let gate = TrustGateService::new(self.ctx)
            .evaluate(roles, record.guild_id, record.vouched_user_id)
            .await?;

        Ok(SubmissionOutcome {
            record,
            verdict,
            gate,
        })
    }

    async fn notify(&self, record: &VouchRecord) {
        let Some(notifier) = self.ctx.notifier() else {
            return;
        };

        if let Err(e) = notifier.vouch_recorded(record).await {
            warn!(vouch_id = %record.id, error = %e, "vouch receipt not delivered");
        }
    }

    /// Page `page` (0-based) with the configured page size.
    ///
    /// Out-of-range pages come back empty with the real total; the cursor
    /// tells the caller whether to clamp.
    pub async fn list(&self, guild_id: Snowflake, user_id: Snowflake, page: u32) -> ServiceResult<VouchListing> {
        self.list_page(guild_id, user_id, page, self.ctx.settings().page_size)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_page(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        page: u32,
        page_size: u32,
    ) -> ServiceResult<VouchListing> {
        if page_size == 0 {
            return Err(ServiceError::validation("page_size must be at least 1"));
        }

        let result = self
            .ctx
            .vouch_repo()
            .page(guild_id, user_id, page, page_size)
            .await?;

        Ok(VouchListing {
            user_id,
            records: result.records,
            cursor: PageCursor::new(page, page_size, result.total),
        })
    }

    /// A single vouch by id
    #[instrument(skip(self))]
    pub async fn get(&self, guild_id: Snowflake, id: VouchId) -> ServiceResult<VouchRecord> {
        self.ctx
            .vouch_repo()
            .find_by_id(guild_id, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Vouch", id.to_string()))
    }

    /// Every vouch a user received, newest first, for the caller to serialize
    #[instrument(skip(self))]
    pub async fn export(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<Vec<VouchRecord>> {
        let records = self.ctx.vouch_repo().all_for_user(guild_id, user_id).await?;
        info!(count = records.len(), "Vouches exported");
        Ok(records)
    }
}
