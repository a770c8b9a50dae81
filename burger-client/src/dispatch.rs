//! Dispatch router: one pass per inbound invocation.
//!
//! lookup -> channel check -> DM check -> member permission check -> handler -> error fallback.
//! Denials trigger a permission re-sync since they usually mean the platform's copy has drifted.

use std::sync::Arc;

use burger_core::{CommandContext, ErrorContext, Invocation, Logger, PlatformApi, Responder};
use tracing::{info, instrument};

use crate::permission_sync::PermissionSync;
use crate::registry::CommandRegistry;

pub const NOT_REGISTERED_REPLY: &str = "This command is not registered, please report this!";
pub const NOT_ENABLED_HERE_REPLY: &str = "This command is not enabled here";
pub const DM_NOT_ALLOWED_REPLY: &str = "This command is not allowed in DMs";
pub const NO_PERMISSION_REPLY: &str = "You do not have permission to use this command";
pub const EXECUTION_ERROR_REPLY: &str = "There was an error executing this command";

/// Branch a dispatch ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    NotRegistered,
    NoChannel,
    DmNotAllowed,
    MissingPermission,
    Executed,
    Failed,
}

pub struct Router {
    registry: Arc<CommandRegistry>,
    permissions: Arc<PermissionSync>,
    api: Arc<dyn PlatformApi>,
    logger: Logger,
}

impl Router {
    pub fn new(
        registry: Arc<CommandRegistry>,
        permissions: Arc<PermissionSync>,
        api: Arc<dyn PlatformApi>,
        logger: Logger,
    ) -> Self {
        Self {
            registry,
            permissions,
            api,
            logger,
        }
    }

    /// Routes one invocation to its command. Reply failures are logged, never returned.
    #[instrument(skip(self, invocation, responder), fields(command = %invocation.command_name, user_id = invocation.user.id))]
    pub async fn resolve_command(
        &self,
        invocation: Invocation,
        responder: Arc<dyn Responder>,
    ) -> DispatchOutcome {
        let Some(command) = self.registry.get(&invocation.command_name) else {
            self.logger.warn(&format!(
                "The command {} was not registered.",
                invocation.command_name
            ));
            self.send(&responder, NOT_REGISTERED_REPLY).await;
            return DispatchOutcome::NotRegistered;
        };

        let Some(channel) = invocation.channel.clone() else {
            self.send(&responder, NOT_ENABLED_HERE_REPLY).await;
            return DispatchOutcome::NoChannel;
        };

        if channel.is_dm_based() && !command.allowed_in_dms {
            self.logger.info(&format!(
                "User {} tried to use a command in DMs that isn't allowed there! Updating all permissions...",
                invocation.user.tag()
            ));
            self.send(&responder, DM_NOT_ALLOWED_REPLY).await;
            self.permissions.sync_permissions().await;
            return DispatchOutcome::DmNotAllowed;
        }

        if let Some(member) = &invocation.member {
            let allowed = command
                .required_permission
                .map_or(true, |required| member.permissions.satisfies(required));
            if !allowed {
                self.logger.warn(&format!(
                    "User {} in guild {} tried to use a command they weren't supposed to! Updating all permissions...",
                    invocation.user.tag(),
                    member.guild_id
                ));
                self.send(&responder, NO_PERMISSION_REPLY).await;
                self.permissions.sync_permissions().await;
                return DispatchOutcome::MissingPermission;
            }
        }

        let invocation = Arc::new(invocation);
        let ctx = CommandContext {
            invocation: invocation.clone(),
            channel,
            args: invocation.args.clone(),
            subcommand: invocation.subcommand.clone(),
            client: self.api.clone(),
            guild: invocation.guild.clone(),
            user: invocation.user.clone(),
            member: invocation.member.clone(),
            responder: responder.clone(),
        };

        info!(command = %command.name(), "step: executing command");
        let error = match command.handler.execute(ctx).await {
            Ok(()) => return DispatchOutcome::Executed,
            Err(e) => e,
        };

        self.logger.error(&format!(
            "An error occurred when executing command {}: {}",
            command.name(),
            error
        ));

        let handled = match &command.error_handler {
            Some(handler) => {
                handler
                    .on_error(ErrorContext {
                        invocation: invocation.as_ref(),
                        error: &error,
                        responder: &responder,
                    })
                    .await
            }
            None => false,
        };

        if !handled {
            let result = if responder.replied() || responder.deferred() {
                responder.edit_reply(EXECUTION_ERROR_REPLY).await
            } else {
                responder.reply(EXECUTION_ERROR_REPLY).await
            };
            if let Err(e) = result {
                self.logger
                    .error(&format!("Failed to send error reply: {}", e));
            }
        }
        DispatchOutcome::Failed
    }

    async fn send(&self, responder: &Arc<dyn Responder>, content: &str) {
        if let Err(e) = responder.reply(content).await {
            self.logger.error(&format!("Failed to reply: {}", e));
        }
    }
}
