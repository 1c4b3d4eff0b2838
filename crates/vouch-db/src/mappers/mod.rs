//! Model to entity mappers
//!
//! - `TryFrom<VouchModel> for VouchRecord`: rows are re-validated on the way out
//! - `From<AggregateModel>` / `From<RankedModel>`: plain field moves

mod vouch;

pub use vouch::{to_epoch_seconds, VouchInsert};
