//! Submitter eligibility
//!
//! Presentation-layer policy the platform collaborator runs before it collects
//! a vouch: brand-new accounts and members who only just joined cannot vouch.
//! The ledger itself never enforces this.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use vouch_common::EligibilityConfig;
use vouch_core::Snowflake;

/// What the platform knows about the would-be voucher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitterProfile {
    pub user_id: Snowflake,
    pub account_created_at: Option<DateTime<Utc>>,
    pub joined_at: Option<DateTime<Utc>>,
}

impl SubmitterProfile {
    /// Profile with the account age read from the user's snowflake
    pub fn from_snowflake(user_id: Snowflake, joined_at: Option<DateTime<Utc>>) -> Self {
        Self {
            user_id,
            account_created_at: Some(user_id.created_at()),
            joined_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Ineligibility {
    #[error("account must be at least {min_days} days old to submit vouches")]
    AccountTooNew { min_days: i64 },

    #[error("you must be in this server for at least {min_hours} hours to submit vouches")]
    MembershipTooShort { min_hours: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityPolicy {
    pub min_account_age_days: i64,
    pub min_server_join_hours: i64,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            min_account_age_days: 7,
            min_server_join_hours: 6,
        }
    }
}

impl From<&EligibilityConfig> for EligibilityPolicy {
    fn from(config: &EligibilityConfig) -> Self {
        Self {
            min_account_age_days: config.min_account_age_days,
            min_server_join_hours: config.min_server_join_hours,
        }
    }
}

impl EligibilityPolicy {
    /// Account age is checked first. A timestamp the platform did not report
    /// is not held against the submitter.
    pub fn check(&self, profile: &SubmitterProfile, now: DateTime<Utc>) -> Result<(), Ineligibility> {
        if let Some(created) = profile.account_created_at {
            if now - created < Duration::try_days(self.min_account_age_days).unwrap_or(Duration::MAX) {
                return Err(Ineligibility::AccountTooNew {
                    min_days: self.min_account_age_days,
                });
            }
        }

        if let Some(joined) = profile.joined_at {
            if now - joined < Duration::try_hours(self.min_server_join_hours).unwrap_or(Duration::MAX) {
                return Err(Ineligibility::MembershipTooShort {
                    min_hours: self.min_server_join_hours,
                });
            }
        }

        Ok(())
    }
}
