//! Role-manager capability - the narrow slice of the chat platform the trust gate needs

use async_trait::async_trait;
use thiserror::Error;

use crate::entities::Role;
use crate::value_objects::Snowflake;

/// Failures reported by the platform. The trust gate treats every one of them as
/// "skip this transition, do not retry".
#[derive(Debug, Error)]
pub enum RoleManagerError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Role not found: {0}")]
    RoleNotFound(Snowflake),

    #[error("Member not found: {0}")]
    MemberNotFound(Snowflake),

    #[error("Platform error: {0}")]
    Platform(String),
}

pub type RoleResult<T> = Result<T, RoleManagerError>;

/// Role management as seen from the acting identity (the bot)
#[async_trait]
pub trait RoleManager: Send + Sync {
    /// Whether the acting identity holds the manage-roles privilege in the guild
    async fn can_manage_roles(&self, guild_id: Snowflake) -> RoleResult<bool>;

    /// Look up a role by id
    async fn find_role(&self, guild_id: Snowflake, role_id: Snowflake) -> RoleResult<Option<Role>>;

    /// Current role membership of a member
    async fn member_role_ids(&self, guild_id: Snowflake, user_id: Snowflake) -> RoleResult<Vec<Snowflake>>;

    /// Hierarchy check: can the acting identity grant or revoke `role`
    async fn can_manage(&self, guild_id: Snowflake, role: &Role) -> RoleResult<bool>;

    async fn grant(&self, guild_id: Snowflake, user_id: Snowflake, role: &Role, reason: &str) -> RoleResult<()>;

    async fn revoke(&self, guild_id: Snowflake, user_id: Snowflake, role: &Role, reason: &str) -> RoleResult<()>;
}
