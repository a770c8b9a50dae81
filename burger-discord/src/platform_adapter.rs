//! Implements [`burger_core::PlatformApi`] over serenity's REST client.

use std::sync::Arc;

use async_trait::async_trait;
use burger_core::{BurgerError, LiveCommand, Permissions, PlatformApi, Result};
use serde_json::{json, Value};
use serenity::all::{ApplicationId, Command, CommandId, GuildId, Http};

/// Thin wrapper around serenity's Http that implements burger-core's PlatformApi.
pub struct DiscordPlatform {
    http: Arc<Http>,
}

fn platform_err(e: serenity::Error) -> BurgerError {
    BurgerError::Platform(e.to_string())
}

fn to_live(command: Command) -> LiveCommand {
    LiveCommand {
        id: command.id.get(),
        name: command.name,
        default_member_permissions: command
            .default_member_permissions
            .map(|p| Permissions::from_bits(p.bits())),
        dm_permission: command.dm_permission,
    }
}

impl DiscordPlatform {
    /// REST client for `token`. Commands are scoped to `application_id`, which can also be set later.
    pub fn new(token: &str, application_id: Option<u64>) -> Self {
        let http = Http::new(token);
        if let Some(id) = application_id {
            http.set_application_id(ApplicationId::new(id));
        }
        Self {
            http: Arc::new(http),
        }
    }

    /// Application id is only known after the gateway handshake when not configured.
    pub fn set_application_id(&self, application_id: u64) {
        self.http
            .set_application_id(ApplicationId::new(application_id));
    }
}

#[async_trait]
impl PlatformApi for DiscordPlatform {
    async fn set_guild_commands(&self, guild_id: u64, commands: &[Value]) -> Result<usize> {
        let set = self
            .http
            .create_guild_commands(GuildId::new(guild_id), &commands)
            .await
            .map_err(platform_err)?;
        Ok(set.len())
    }

    async fn set_global_commands(&self, commands: &[Value]) -> Result<usize> {
        let set = self
            .http
            .create_global_commands(&commands)
            .await
            .map_err(platform_err)?;
        Ok(set.len())
    }

    async fn fetch_guild_commands(&self, guild_id: u64) -> Result<Vec<LiveCommand>> {
        let commands = self
            .http
            .get_guild_commands(GuildId::new(guild_id))
            .await
            .map_err(platform_err)?;
        Ok(commands.into_iter().map(to_live).collect())
    }

    async fn fetch_global_commands(&self) -> Result<Vec<LiveCommand>> {
        let commands = self
            .http
            .get_global_commands()
            .await
            .map_err(platform_err)?;
        Ok(commands.into_iter().map(to_live).collect())
    }

    async fn set_default_member_permissions(
        &self,
        guild_id: Option<u64>,
        command_id: u64,
        permissions: Option<Permissions>,
    ) -> Result<()> {
        let body = json!({
            "default_member_permissions": permissions.map(|p| p.bits().to_string()),
        });
        self.edit_command(guild_id, command_id, &body).await
    }

    async fn set_dm_permission(
        &self,
        guild_id: Option<u64>,
        command_id: u64,
        allowed: bool,
    ) -> Result<()> {
        self.edit_command(guild_id, command_id, &json!({ "dm_permission": allowed }))
            .await
    }
}

impl DiscordPlatform {
    async fn edit_command(&self, guild_id: Option<u64>, command_id: u64, body: &Value) -> Result<()> {
        let command_id = CommandId::new(command_id);
        match guild_id {
            Some(guild_id) => self
                .http
                .edit_guild_command(GuildId::new(guild_id), command_id, body)
                .await
                .map(|_| ())
                .map_err(platform_err),
            None => self
                .http
                .edit_global_command(command_id, body)
                .await
                .map(|_| ())
                .map_err(platform_err),
        }
    }
}
