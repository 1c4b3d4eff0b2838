//! Service context - dependency container for services
//!
//! Holds the ledger repository, the clock, the optional receipt notifier and
//! the tunables every service reads.

use std::sync::Arc;

use tracing::info;

use vouch_common::AppConfig;
use vouch_core::traits::{Clock, SystemClock, VouchNotifier, VouchRepository};
use vouch_core::{Snowflake, SuspicionWindows, TrustThresholds};
use vouch_db::repositories::map_db_error;
use vouch_db::{LedgerPool, SqliteVouchRepository};

use super::eligibility::EligibilityPolicy;
use super::error::{ServiceError, ServiceResult};

/// Tunables read by the services
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSettings {
    pub page_size: u32,
    pub leaderboard_limit: u32,
    pub top_middlemen_limit: u32,
    pub thresholds: TrustThresholds,
    /// `None` disables the role
    pub trusted_role: Option<Snowflake>,
    /// `None` disables the role
    pub restricted_role: Option<Snowflake>,
    pub windows: SuspicionWindows,
    pub eligibility: EligibilityPolicy,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            page_size: 5,
            leaderboard_limit: 10,
            top_middlemen_limit: 5,
            thresholds: TrustThresholds::default(),
            trusted_role: None,
            restricted_role: None,
            windows: SuspicionWindows::default(),
            eligibility: EligibilityPolicy::default(),
        }
    }
}

impl From<&AppConfig> for LedgerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            page_size: config.ledger.page_size,
            leaderboard_limit: config.ledger.leaderboard_limit,
            top_middlemen_limit: config.ledger.top_middlemen_limit,
            thresholds: config.trust_gate.thresholds(),
            trusted_role: config.trust_gate.trusted_role(),
            restricted_role: config.trust_gate.restricted_role(),
            windows: config.suspicion.windows(),
            eligibility: EligibilityPolicy::from(&config.eligibility),
        }
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    vouch_repo: Arc<dyn VouchRepository>,
    clock: Arc<dyn Clock>,
    notifier: Option<Arc<dyn VouchNotifier>>,
    settings: LedgerSettings,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        vouch_repo: Arc<dyn VouchRepository>,
        clock: Arc<dyn Clock>,
        notifier: Option<Arc<dyn VouchNotifier>>,
        settings: LedgerSettings,
    ) -> Self {
        Self {
            vouch_repo,
            clock,
            notifier,
            settings,
        }
    }

    /// Open the configured SQLite ledger, make sure its schema exists and wire
    /// a context around it
    pub async fn connect(config: &AppConfig) -> ServiceResult<Self> {
        let pool = LedgerPool::connect(&config.database)
            .await
            .map_err(map_db_error)?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let repo = SqliteVouchRepository::with_clock(pool, clock.clone());
        repo.initialize().await?;

        info!(app = %config.app.name, env = ?config.app.env, "ledger ready");

        ServiceContextBuilder::new()
            .vouch_repo(Arc::new(repo))
            .clock(clock)
            .settings(LedgerSettings::from(config))
            .build()
    }

    // === Repositories ===

    /// Get the vouch repository
    pub fn vouch_repo(&self) -> &dyn VouchRepository {
        self.vouch_repo.as_ref()
    }

    // === Collaborators ===

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Receipt notifier, if one was configured
    pub fn notifier(&self) -> Option<&dyn VouchNotifier> {
        self.notifier.as_deref()
    }

    // === Settings ===

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("vouch_repo", &"dyn VouchRepository")
            .field("notifier", &self.notifier.is_some())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    vouch_repo: Option<Arc<dyn VouchRepository>>,
    clock: Option<Arc<dyn Clock>>,
    notifier: Option<Arc<dyn VouchNotifier>>,
    settings: LedgerSettings,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            vouch_repo: None,
            clock: None,
            notifier: None,
            settings: LedgerSettings::default(),
        }
    }

    pub fn vouch_repo(mut self, repo: Arc<dyn VouchRepository>) -> Self {
        self.vouch_repo = Some(repo);
        self
    }

    /// Defaults to the system clock
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn VouchNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn settings(mut self, settings: LedgerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if the repository is missing or the
    /// settings are unusable
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let vouch_repo = self
            .vouch_repo
            .ok_or_else(|| ServiceError::validation("vouch_repo is required"))?;

        if self.settings.page_size == 0 {
            return Err(ServiceError::validation("page_size must be at least 1"));
        }

        Ok(ServiceContext::new(
            vouch_repo,
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            self.notifier,
            self.settings,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
