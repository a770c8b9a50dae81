//! Transport-agnostic seams to the chat platform.
//!
//! [`PlatformApi`] covers the REST calls used by command and permission sync;
//! [`Responder`] answers one interaction. `burger-discord` implements both with serenity.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::permissions::Permissions;
use crate::types::LiveCommand;

/// REST surface needed to deploy commands and reconcile their permissions.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Replaces every command of `guild_id` with `commands`. Returns how many were set.
    async fn set_guild_commands(&self, guild_id: u64, commands: &[Value]) -> Result<usize>;
    /// Replaces every global command of the application with `commands`.
    async fn set_global_commands(&self, commands: &[Value]) -> Result<usize>;
    async fn fetch_guild_commands(&self, guild_id: u64) -> Result<Vec<LiveCommand>>;
    async fn fetch_global_commands(&self) -> Result<Vec<LiveCommand>>;
    /// Sets the default member permissions of one command. `guild_id` is `None` for global commands.
    async fn set_default_member_permissions(
        &self,
        guild_id: Option<u64>,
        command_id: u64,
        permissions: Option<Permissions>,
    ) -> Result<()>;
    async fn set_dm_permission(
        &self,
        guild_id: Option<u64>,
        command_id: u64,
        allowed: bool,
    ) -> Result<()>;
}

/// Reply channel for a single interaction. Implementations track whether a reply was sent or deferred.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Sends the initial reply.
    async fn reply(&self, content: &str) -> Result<()>;
    /// Acknowledges the interaction without content; answer later with [`Responder::edit_reply`].
    async fn defer(&self) -> Result<()>;
    /// Edits the initial (or deferred) reply.
    async fn edit_reply(&self, content: &str) -> Result<()>;
    fn replied(&self) -> bool;
    fn deferred(&self) -> bool;
}
