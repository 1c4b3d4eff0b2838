//! Best-effort notification of newly recorded vouches (e.g. a direct-message receipt)

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::VouchRecord;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Recipient unreachable: {0}")]
    Unreachable(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

pub type NotifyResult = Result<(), NotifyError>;

/// Receives a record after it is durably stored. Failures never affect the ledger.
#[async_trait]
pub trait VouchNotifier: Send + Sync {
    async fn vouch_recorded(&self, record: &VouchRecord) -> NotifyResult;
}
