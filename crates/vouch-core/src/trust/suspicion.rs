//! Suspicious-vouch heuristics
//!
//! Two time-windowed rules, both scoped to one guild:
//! - repeat vouch: the voucher already vouched for the same user inside the repeat window
//! - mutual loop: the vouched user vouched for the voucher inside the mutual window
//!
//! Only direct repeats and one-hop reversals are detected; longer cycles and
//! cross-guild pairs are out of reach of this filter.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Trailing windows, measured backward from "now"; bounds are inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuspicionWindows {
    pub repeat: Duration,
    pub mutual: Duration,
}

impl Default for SuspicionWindows {
    fn default() -> Self {
        Self {
            repeat: Duration::days(7),
            mutual: Duration::days(14),
        }
    }
}

impl SuspicionWindows {
    /// Day counts too large for a `Duration` saturate to the longest one
    pub fn from_days(repeat_days: i64, mutual_days: i64) -> Self {
        Self {
            repeat: Duration::try_days(repeat_days).unwrap_or(Duration::MAX),
            mutual: Duration::try_days(mutual_days).unwrap_or(Duration::MAX),
        }
    }

    /// Oldest timestamp that still counts as a repeat
    pub fn repeat_since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        window_start(now, self.repeat)
    }

    /// Oldest timestamp that still counts as a reversed vouch
    pub fn mutual_since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        window_start(now, self.mutual)
    }
}

/// A window reaching past the representable range covers all history
fn window_start(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Counts gathered from the ledger before the candidate is inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuspicionEvidence {
    /// voucher -> vouched inside the repeat window
    pub recent_repeats: i64,
    /// vouched -> voucher inside the mutual window
    pub recent_reversals: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspicionReason {
    RepeatVouch,
    MutualLoop,
}

impl SuspicionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RepeatVouch => "repeat_vouch",
            Self::MutualLoop => "mutual_loop",
        }
    }
}

/// Outcome of the heuristics; a flag, never a rejection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuspicionVerdict {
    pub reasons: Vec<SuspicionReason>,
}

impl SuspicionVerdict {
    #[inline]
    pub fn is_suspicious(&self) -> bool {
        !self.reasons.is_empty()
    }
}

impl SuspicionEvidence {
    pub fn verdict(&self) -> SuspicionVerdict {
        let mut reasons = Vec::with_capacity(2);
        if self.recent_repeats >= 1 {
            reasons.push(SuspicionReason::RepeatVouch);
        }
        if self.recent_reversals >= 1 {
            reasons.push(SuspicionReason::MutualLoop);
        }
        SuspicionVerdict { reasons }
    }
}
