//! Vouch ID - store-assigned, monotonically increasing record identifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a persisted vouch; assigned by the store on insert, never by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VouchId(i64);

impl VouchId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for VouchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for VouchId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
