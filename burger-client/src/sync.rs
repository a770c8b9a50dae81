//! Command sync: pushes registered commands to the platform, one bulk call per scope.
//!
//! The platform replaces whatever it had with the pushed list, so callers always pass every command.

use std::sync::Arc;

use burger_core::{CommandDefinition, Logger, PlatformApi, Scope};
use indexmap::IndexMap;
use serde_json::Value;

use crate::config::{env_flag, parse_id, required_env};

/// Outcome of one push. `None` for a scope means its call failed (and was logged).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub guild: Option<usize>,
    pub global: Option<usize>,
}

/// Partitions `commands` by scope and bulk-sets each scope. A failure in one scope does not stop the other.
pub async fn push_commands(
    api: &dyn PlatformApi,
    guild_id: u64,
    commands: &[Arc<CommandDefinition>],
    logger: &Logger,
) -> SyncReport {
    let (guild, global): (Vec<_>, Vec<_>) =
        commands.iter().partition(|c| c.scope == Scope::Guild);
    let guild: Vec<Value> = guild.iter().map(|c| c.to_json()).collect();
    let global: Vec<Value> = global.iter().map(|c| c.to_json()).collect();

    let guild_count = match api.set_guild_commands(guild_id, &guild).await {
        Ok(count) => {
            logger.info(&format!("Successfully registered {} guild commands.", count));
            Some(count)
        }
        Err(e) => {
            logger.error(&format!(
                "An error occurred when deploying guild commands: {}",
                e
            ));
            None
        }
    };

    let global_count = match api.set_global_commands(&global).await {
        Ok(count) => {
            logger.info(&format!("Successfully registered {} global commands.", count));
            Some(count)
        }
        Err(e) => {
            logger.error(&format!(
                "An error occurred when deploying global commands: {}",
                e
            ));
            None
        }
    };

    SyncReport {
        guild: guild_count,
        global: global_count,
    }
}

/// Options for the standalone deploy entry point.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub token: String,
    pub guild_id: u64,
    pub application_id: u64,
    pub log_info: bool,
}

impl DeployOptions {
    /// Loads from BOT_TOKEN, HOME_GUILD_ID, APPLICATION_ID and LOG_INFO.
    /// A `Some` argument takes precedence over its env var, which is then not required.
    pub fn from_env(
        token: Option<String>,
        guild_id: Option<u64>,
        application_id: Option<u64>,
    ) -> burger_core::Result<Self> {
        let token = match token {
            Some(t) => t,
            None => required_env("BOT_TOKEN")?,
        };
        let guild_id = match guild_id {
            Some(id) => id,
            None => parse_id("HOME_GUILD_ID", &required_env("HOME_GUILD_ID")?)?,
        };
        let application_id = match application_id {
            Some(id) => id,
            None => parse_id("APPLICATION_ID", &required_env("APPLICATION_ID")?)?,
        };
        Ok(Self {
            token,
            guild_id,
            application_id,
            log_info: env_flag("LOG_INFO", true),
        })
    }
}

/// Deploys `commands` without a running client: logs each command, then bulk-sets both scopes.
/// A later definition with an already seen name replaces the earlier one in its slot.
pub async fn deploy_commands(
    options: &DeployOptions,
    commands: &[Arc<CommandDefinition>],
    api: &dyn PlatformApi,
) -> SyncReport {
    let logger = Logger::new("Burger Client", options.log_info);
    let mut unique: IndexMap<&str, Arc<CommandDefinition>> = IndexMap::new();
    for command in commands {
        unique.insert(command.name(), command.clone());
    }
    let commands: Vec<Arc<CommandDefinition>> = unique.into_values().collect();
    for command in &commands {
        logger.info(&format!("Loaded command {}.", command.name()));
    }
    push_commands(api, options.guild_id, &commands, &logger).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_deploy_options_from_env() {
        env::set_var("BOT_TOKEN", "env-token");
        env::set_var("HOME_GUILD_ID", "111");
        env::set_var("APPLICATION_ID", "222");
        env::set_var("LOG_INFO", "off");

        let options = DeployOptions::from_env(None, None, None).unwrap();
        assert_eq!(options.token, "env-token");
        assert_eq!(options.guild_id, 111);
        assert_eq!(options.application_id, 222);
        assert!(!options.log_info);

        env::remove_var("LOG_INFO");
        env::remove_var("BOT_TOKEN");
        env::remove_var("HOME_GUILD_ID");
        env::remove_var("APPLICATION_ID");
    }

    #[test]
    #[serial]
    fn test_deploy_options_arguments_override_env() {
        env::set_var("HOME_GUILD_ID", "111");
        env::remove_var("BOT_TOKEN");
        env::remove_var("APPLICATION_ID");
        env::remove_var("LOG_INFO");

        let options =
            DeployOptions::from_env(Some("cli-token".to_string()), None, Some(333)).unwrap();
        assert_eq!(options.token, "cli-token");
        assert_eq!(options.guild_id, 111);
        assert_eq!(options.application_id, 333);
        assert!(options.log_info);

        env::remove_var("HOME_GUILD_ID");
        assert!(DeployOptions::from_env(Some("cli-token".to_string()), None, Some(333)).is_err());
    }
}
