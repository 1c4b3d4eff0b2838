//! Value objects - immutable types that represent domain concepts

mod rating;
mod snowflake;
mod vouch_id;

pub use rating::Rating;
pub use snowflake::{Snowflake, SnowflakeParseError};
pub use vouch_id::VouchId;
