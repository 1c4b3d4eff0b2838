//! Database models - SQLx-compatible structs for the ledger tables

mod vouch;

pub use vouch::{AggregateModel, RankedModel, VouchModel};
