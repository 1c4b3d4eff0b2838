//! Data transfer objects for the platform collaborator
//!
//! This module provides:
//! - Request DTOs with validation for submitted input
//! - Response DTOs the collaborator renders (listings, gate reports)

pub mod requests;
pub mod responses;

pub use requests::SubmitVouchRequest;
pub use responses::{GateOutcome, GateReport, GateStatus, SkipReason, SubmissionOutcome, VouchListing};
