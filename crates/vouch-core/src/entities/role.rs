//! Role entity - a guild role as reported by the platform's role manager

use crate::value_objects::Snowflake;

/// Role snapshot. The ledger never owns roles; it only asks the platform to grant or revoke them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
    pub position: i32,
    pub is_everyone: bool,
}

impl Role {
    /// Create a new Role
    pub fn new(id: Snowflake, guild_id: Snowflake, name: impl Into<String>, position: i32) -> Self {
        Self {
            id,
            guild_id,
            name: name.into(),
            position,
            is_everyone: false,
        }
    }

    /// Compare role positions for hierarchy (higher position = more authority)
    #[inline]
    pub fn is_higher_than(&self, other: &Role) -> bool {
        self.position > other.position
    }

    /// Check if a holder of this role can grant or revoke `other`
    pub fn can_manage(&self, other: &Role) -> bool {
        // Can't manage roles at same or higher position
        // @everyone can never be managed
        !other.is_everyone && self.is_higher_than(other)
    }
}
