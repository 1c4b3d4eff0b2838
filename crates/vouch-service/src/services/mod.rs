//! Business logic services
//!
//! Each service borrows the shared `ServiceContext` and orchestrates domain
//! rules over the repository and platform ports.

pub mod context;
pub mod eligibility;
pub mod error;
pub mod gate;
pub mod suspicion;
pub mod trust;
pub mod vouch;

// Re-export all services for convenience
pub use context::{LedgerSettings, ServiceContext, ServiceContextBuilder};
pub use eligibility::{EligibilityPolicy, Ineligibility, SubmitterProfile};
pub use error::{ServiceError, ServiceResult};
pub use gate::TrustGateService;
pub use suspicion::SuspiciousDetector;
pub use trust::TrustService;
pub use vouch::VouchService;
