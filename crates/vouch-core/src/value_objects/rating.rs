//! Rating - a 1 to 5 star score attached to a vouch

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Star rating in `[Rating::MIN, Rating::MAX]`; out-of-range values cannot be constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validate and wrap a raw rating
    pub fn new(value: i64) -> Result<Self, DomainError> {
        match u8::try_from(value) {
            Ok(v) if (Self::MIN..=Self::MAX).contains(&v) => Ok(Self(v)),
            _ => Err(DomainError::InvalidRating(value)),
        }
    }

    /// Parse user-typed input such as `"5"` or `" 3 "`
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        trimmed
            .parse::<i64>()
            .map_err(|_| DomainError::ValidationError(format!("rating is not a number: {trimmed}")))
            .and_then(Self::new)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        i64::from(rating.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}
