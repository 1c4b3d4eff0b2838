//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).
//! Absent variables fall back to defaults; malformed ones are an error.

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use vouch_core::{Snowflake, SuspicionWindows, TrustThresholds};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub ledger: LedgerConfig,
    pub trust_gate: TrustGateConfig,
    pub eligibility: EligibilityConfig,
    pub suspicion: SuspicionConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// Ledger database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    /// How long SQLite waits for a locked medium before failing the operation
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// Read-model sizing
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_leaderboard_limit")]
    pub leaderboard_limit: u32,
    #[serde(default = "default_top_middlemen_limit")]
    pub top_middlemen_limit: u32,
}

/// Trust gate roles and thresholds. A role id of 0 disables that role.
#[derive(Debug, Clone, Deserialize)]
pub struct TrustGateConfig {
    #[serde(default)]
    pub trusted_role_id: i64,
    #[serde(default)]
    pub restricted_role_id: i64,
    #[serde(default = "default_trusted_min_vouches")]
    pub trusted_min_vouches: i64,
    #[serde(default = "default_trusted_min_avg")]
    pub trusted_min_avg: f64,
    #[serde(default = "default_restricted_min_vouches")]
    pub restricted_min_vouches: i64,
    #[serde(default = "default_restricted_max_avg")]
    pub restricted_max_avg: f64,
}

impl TrustGateConfig {
    #[must_use]
    pub fn thresholds(&self) -> TrustThresholds {
        TrustThresholds {
            trusted_min_vouches: self.trusted_min_vouches,
            trusted_min_avg: self.trusted_min_avg,
            restricted_min_vouches: self.restricted_min_vouches,
            restricted_max_avg: self.restricted_max_avg,
        }
    }

    /// Configured trusted role, if enabled
    #[must_use]
    pub fn trusted_role(&self) -> Option<Snowflake> {
        Some(Snowflake::new(self.trusted_role_id)).filter(|id| !id.is_zero())
    }

    /// Configured restricted role, if enabled
    #[must_use]
    pub fn restricted_role(&self) -> Option<Snowflake> {
        Some(Snowflake::new(self.restricted_role_id)).filter(|id| !id.is_zero())
    }
}

/// Submitter eligibility (enforced by the caller before submitting)
#[derive(Debug, Clone, Deserialize)]
pub struct EligibilityConfig {
    #[serde(default = "default_min_account_age_days")]
    pub min_account_age_days: i64,
    #[serde(default = "default_min_server_join_hours")]
    pub min_server_join_hours: i64,
}

/// Suspicion heuristic windows
#[derive(Debug, Clone, Deserialize)]
pub struct SuspicionConfig {
    #[serde(default = "default_repeat_window_days")]
    pub repeat_window_days: i64,
    #[serde(default = "default_mutual_window_days")]
    pub mutual_window_days: i64,
}

impl SuspicionConfig {
    #[must_use]
    pub fn windows(&self) -> SuspicionWindows {
        SuspicionWindows::from_days(self.repeat_window_days, self.mutual_window_days)
    }
}

// Default value functions
fn default_app_name() -> String {
    "vouch-ledger".to_string()
}

fn default_database_url() -> String {
    "sqlite://vouches.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_page_size() -> u32 {
    5
}

fn default_leaderboard_limit() -> u32 {
    10
}

fn default_top_middlemen_limit() -> u32 {
    5
}

fn default_trusted_min_vouches() -> i64 {
    25
}

fn default_trusted_min_avg() -> f64 {
    4.7
}

fn default_restricted_min_vouches() -> i64 {
    5
}

fn default_restricted_max_avg() -> f64 {
    2.5
}

/// Upper bound for day-valued settings, roughly a century
const MAX_DAYS: i64 = 36_500;

fn default_min_account_age_days() -> i64 {
    7
}

fn default_min_server_join_hours() -> i64 {
    6
}

fn default_repeat_window_days() -> i64 {
    7
}

fn default_mutual_window_days() -> i64 {
    14
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::default(),
            },
            database: DatabaseConfig {
                url: default_database_url(),
                busy_timeout_ms: default_busy_timeout_ms(),
            },
            ledger: LedgerConfig {
                page_size: default_page_size(),
                leaderboard_limit: default_leaderboard_limit(),
                top_middlemen_limit: default_top_middlemen_limit(),
            },
            trust_gate: TrustGateConfig {
                trusted_role_id: 0,
                restricted_role_id: 0,
                trusted_min_vouches: default_trusted_min_vouches(),
                trusted_min_avg: default_trusted_min_avg(),
                restricted_min_vouches: default_restricted_min_vouches(),
                restricted_max_avg: default_restricted_max_avg(),
            },
            eligibility: EligibilityConfig {
                min_account_age_days: default_min_account_age_days(),
                min_server_join_hours: default_min_server_join_hours(),
            },
            suspicion: SuspicionConfig {
                repeat_window_days: default_repeat_window_days(),
                mutual_window_days: default_mutual_window_days(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but malformed, or the result is inconsistent
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let config = Self {
            app: AppSettings {
                name: vars.string("APP_NAME", default_app_name),
                env: vars.parse("APP_ENV", Environment::default())?,
            },
            database: DatabaseConfig {
                url: vars.string("DATABASE_URL", default_database_url),
                busy_timeout_ms: vars.parse("DATABASE_BUSY_TIMEOUT_MS", default_busy_timeout_ms())?,
            },
            ledger: LedgerConfig {
                page_size: vars.parse("VOUCH_PAGE_SIZE", default_page_size())?,
                leaderboard_limit: vars.parse("LEADERBOARD_LIMIT", default_leaderboard_limit())?,
                top_middlemen_limit: vars.parse("TOP_MIDDLEMEN_LIMIT", default_top_middlemen_limit())?,
            },
            trust_gate: TrustGateConfig {
                trusted_role_id: vars.parse("TRUSTED_ROLE_ID", 0)?,
                restricted_role_id: vars.parse("RESTRICTED_ROLE_ID", 0)?,
                trusted_min_vouches: vars.parse("TRUSTED_MIN_VOUCHES", default_trusted_min_vouches())?,
                trusted_min_avg: vars.parse("TRUSTED_MIN_AVG", default_trusted_min_avg())?,
                restricted_min_vouches: vars
                    .parse("RESTRICTED_MIN_VOUCHES", default_restricted_min_vouches())?,
                restricted_max_avg: vars.parse("RESTRICTED_MAX_AVG", default_restricted_max_avg())?,
            },
            eligibility: EligibilityConfig {
                min_account_age_days: vars
                    .parse("MIN_ACCOUNT_AGE_DAYS", default_min_account_age_days())?,
                min_server_join_hours: vars
                    .parse("MIN_SERVER_JOIN_HOURS", default_min_server_join_hours())?,
            },
            suspicion: SuspicionConfig {
                repeat_window_days: vars
                    .parse("SUSPICION_REPEAT_WINDOW_DAYS", default_repeat_window_days())?,
                mutual_window_days: vars
                    .parse("SUSPICION_MUTUAL_WINDOW_DAYS", default_mutual_window_days())?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger.page_size == 0 {
            return Err(ConfigError::InvalidValue("VOUCH_PAGE_SIZE", "must be at least 1".into()));
        }
        if self.ledger.leaderboard_limit == 0 {
            return Err(ConfigError::InvalidValue("LEADERBOARD_LIMIT", "must be at least 1".into()));
        }
        if self.ledger.top_middlemen_limit == 0 {
            return Err(ConfigError::InvalidValue("TOP_MIDDLEMEN_LIMIT", "must be at least 1".into()));
        }
        for (name, avg) in [
            ("TRUSTED_MIN_AVG", self.trust_gate.trusted_min_avg),
            ("RESTRICTED_MAX_AVG", self.trust_gate.restricted_max_avg),
        ] {
            if !(avg > 0.0 && avg <= 5.0) {
                return Err(ConfigError::InvalidValue(name, format!("{avg} is outside (0, 5]")));
            }
        }
        for (name, value, max) in [
            ("SUSPICION_REPEAT_WINDOW_DAYS", self.suspicion.repeat_window_days, MAX_DAYS),
            ("SUSPICION_MUTUAL_WINDOW_DAYS", self.suspicion.mutual_window_days, MAX_DAYS),
            ("MIN_ACCOUNT_AGE_DAYS", self.eligibility.min_account_age_days, MAX_DAYS),
            ("MIN_SERVER_JOIN_HOURS", self.eligibility.min_server_join_hours, MAX_DAYS * 24),
        ] {
            if !(0..=max).contains(&value) {
                return Err(ConfigError::InvalidValue(name, format!("{value} is outside [0, {max}]")));
            }
        }
        Ok(())
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &'static str, default: fn() -> String) -> String {
        (self.0)(key).unwrap_or_else(default)
    }

    fn parse<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match (self.0)(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue(key, format!("'{raw}': {e}"))),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
