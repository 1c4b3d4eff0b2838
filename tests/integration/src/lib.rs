//! Integration test utilities for the vouch ledger
//!
//! This crate provides an in-memory ledger wired the same way production
//! wires a file-backed one, plus platform doubles for the trust gate and the
//! receipt notifier.

pub mod fixtures;

pub use helpers::*;
pub use fixtures::*;
