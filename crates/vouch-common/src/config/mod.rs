//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, EligibilityConfig, Environment,
    LedgerConfig, SuspicionConfig, TrustGateConfig,
};
