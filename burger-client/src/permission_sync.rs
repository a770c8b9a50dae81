//! Permission sync: reconciles the platform's per-command permission settings with local declarations.
//!
//! Two independent passes, guild commands against the home guild and global commands against the
//! application. Missing commands are reported, never created here; that is [`crate::sync`]'s job.

use std::sync::Arc;

use burger_core::{CommandDefinition, LiveCommand, Logger, PlatformApi, Scope};
use tracing::instrument;

use crate::registry::CommandRegistry;

/// Update calls applied by one [`PermissionSync::sync_permissions`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionSyncReport {
    pub guild_updates: usize,
    pub global_updates: usize,
}

impl PermissionSyncReport {
    pub fn total(&self) -> usize {
        self.guild_updates + self.global_updates
    }
}

/// Change needed to bring one live command in line with its definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionChange {
    DefaultPermissions(Option<burger_core::Permissions>),
    DmPermission(bool),
}

/// Diffs one live command against its local definition.
///
/// Default permissions compare by value with `None` meaning everyone. The DM flag is only compared
/// when the platform reports one.
pub fn diff(live: &LiveCommand, local: &CommandDefinition) -> Vec<PermissionChange> {
    let mut changes = Vec::new();
    if live.default_member_permissions != local.required_permission {
        changes.push(PermissionChange::DefaultPermissions(local.required_permission));
    }
    if let Some(live_dm) = live.dm_permission {
        if live_dm != local.allowed_in_dms {
            changes.push(PermissionChange::DmPermission(local.allowed_in_dms));
        }
    }
    changes
}

pub struct PermissionSync {
    registry: Arc<CommandRegistry>,
    api: Arc<dyn PlatformApi>,
    home_guild_id: u64,
    logger: Logger,
}

impl PermissionSync {
    pub fn new(
        registry: Arc<CommandRegistry>,
        api: Arc<dyn PlatformApi>,
        home_guild_id: u64,
        logger: Logger,
    ) -> Self {
        Self {
            registry,
            api,
            home_guild_id,
            logger,
        }
    }

    /// Runs the guild pass, then the global pass. Failures are logged per pass.
    #[instrument(skip(self), fields(home_guild_id = self.home_guild_id))]
    pub async fn sync_permissions(&self) -> PermissionSyncReport {
        self.logger.info("Updating guild command permissions...");
        let guild_updates = match self.api.fetch_guild_commands(self.home_guild_id).await {
            Ok(live) => self.update_permissions_for(Scope::Guild, &live).await,
            Err(e) => {
                self.logger.error(&format!(
                    "Error accessing guild {}: {}",
                    self.home_guild_id, e
                ));
                0
            }
        };
        self.logger.info("Done!");

        self.logger.info("Updating global command permissions...");
        let global_updates = match self.api.fetch_global_commands().await {
            Ok(live) => self.update_permissions_for(Scope::Global, &live).await,
            Err(e) => {
                self.logger
                    .error(&format!("Error fetching global commands: {}", e));
                0
            }
        };
        self.logger.info("Done!");

        PermissionSyncReport {
            guild_updates,
            global_updates,
        }
    }

    async fn update_permissions_for(&self, scope: Scope, live: &[LiveCommand]) -> usize {
        let local = self.registry.by_scope(scope);
        let guild_id = match scope {
            Scope::Guild => Some(self.home_guild_id),
            Scope::Global => None,
        };

        for found in live {
            if !local.iter().any(|c| c.name() == found.name) {
                self.logger.warn(&format!(
                    "The command {} is not registered.",
                    found.name
                ));
            }
        }

        let mut applied = 0;
        for command in &local {
            let Some(found) = live.iter().find(|l| l.name == command.name()) else {
                self.logger.warn(&format!(
                    "The command {} was not found.",
                    command.name()
                ));
                continue;
            };

            for change in diff(found, command) {
                let result = match change {
                    PermissionChange::DefaultPermissions(perms) => {
                        self.api
                            .set_default_member_permissions(guild_id, found.id, perms)
                            .await
                    }
                    PermissionChange::DmPermission(allowed) => {
                        self.api.set_dm_permission(guild_id, found.id, allowed).await
                    }
                };
                match result {
                    Ok(()) => {
                        applied += 1;
                        self.logger.info(&format!(
                            "Updated permissions for command {}: {:?}",
                            command.name(),
                            change
                        ));
                    }
                    Err(e) => self.logger.error(&format!(
                        "Failed to update permissions for command {}: {}",
                        command.name(),
                        e
                    )),
                }
            }
        }
        applied
    }
}
