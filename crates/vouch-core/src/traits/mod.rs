//! Ports - interfaces the domain needs and the outer layers provide

mod clock;
mod notifier;
mod repositories;
mod roles;

pub use clock::{Clock, SystemClock};
pub use notifier::{NotifyError, NotifyResult, VouchNotifier};
pub use repositories::{RankingField, RepoResult, VouchAggregate, VouchPage, VouchRepository};
pub use roles::{RoleManager, RoleManagerError, RoleResult};
