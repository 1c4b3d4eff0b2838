//! Trust rules - pure functions of ledger data, no I/O and no state across calls

mod gate;
mod pagination;
mod suspicion;

pub use gate::{GateDecision, GateRole, RoleState, RoleTransition, TrustThresholds};
pub use pagination::PageCursor;
pub use suspicion::{SuspicionEvidence, SuspicionReason, SuspicionVerdict, SuspicionWindows};
