//! Domain entities - core business objects

mod role;
mod stats;
mod vouch;

pub use role::Role;
pub use stats::{GuildStats, RankedUser, TrustStats};
pub use vouch::{NewVouch, VouchRecord, TIMESTAMP_FORMAT};
