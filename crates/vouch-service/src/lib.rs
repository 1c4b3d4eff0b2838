//! # vouch-service
//!
//! Application layer: submission, listing, trust statistics, suspicion checks
//! and the trust gate, wired over the ports defined in `vouch-core`.

pub mod dto;
pub mod services;

pub use services::{
    EligibilityPolicy, Ineligibility, LedgerSettings, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SubmitterProfile, SuspiciousDetector, TrustGateService,
    TrustService, VouchService,
};
