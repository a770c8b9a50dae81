//! burger CLI: run the Discord bot, or deploy its commands once. Config from env and optional CLI args.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use burger_cli::{builtin_commands, builtin_handlers, Cli, Commands};
use burger_client::{
    deploy_commands, BurgerClient, ClientOptions, DeployOptions, ManifestFormat, ManifestLoader,
};
use burger_core::{init_tracing, CommandDefinition, Logger};
use burger_discord::{run, DiscordConfig, DiscordPlatform};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => handle_run(token).await,
        Commands::Deploy {
            token,
            guild_id,
            application_id,
            commands_dir,
        } => handle_deploy(token, guild_id, application_id, commands_dir).await,
    }
}

/// Builds the client, registers built-in and manifest commands, and runs the gateway.
/// Once ready, commands are pushed and live permissions reconciled.
async fn handle_run(token: Option<String>) -> Result<()> {
    let config = DiscordConfig::from_env(token)?;
    init_tracing(config.log_file.as_deref())?;

    let options = ClientOptions::from_env()?;
    options.validate()?;
    info!(
        home_guild_id = options.home_guild_id,
        storage = options.database_url.is_some(),
        "Initializing bot"
    );

    let platform = Arc::new(DiscordPlatform::new(&config.bot_token, config.application_id));
    let commands_dir = options.commands_dir.clone();
    let burger = Arc::new(
        BurgerClient::new(options, platform.clone()).with_handlers(builtin_handlers()),
    );

    for (name, module) in builtin_commands() {
        burger.register_command(module, name);
    }
    if let Some(dir) = commands_dir {
        burger.register_all_commands(&dir);
    }

    let startup = burger.clone();
    burger
        .on_ready(move || async move {
            startup.sync().await;
            startup.sync_permissions().await;
        })
        .await;

    run(config, platform, burger).await
}

/// Manifest commands from `dir`, or none when it cannot be read (already logged).
fn manifest_commands(dir: &Path, format: ManifestFormat, log_info: bool) -> Vec<Arc<CommandDefinition>> {
    let loader = ManifestLoader::new(format, builtin_handlers(), Logger::new("Burger Client", log_info));
    loader.all_commands_in_dir(dir).unwrap_or_default()
}

async fn handle_deploy(
    token: Option<String>,
    guild_id: Option<u64>,
    application_id: Option<u64>,
    commands_dir: Option<PathBuf>,
) -> Result<()> {
    init_tracing(None)?;
    let options = DeployOptions::from_env(token, guild_id, application_id)?;

    let mut commands: Vec<Arc<CommandDefinition>> = builtin_commands()
        .into_iter()
        .filter_map(|(_, module)| module.into_definition())
        .map(Arc::new)
        .collect();

    let commands_dir = commands_dir.or_else(|| std::env::var("COMMANDS_DIR").ok().map(PathBuf::from));
    if let Some(dir) = commands_dir {
        let format = match std::env::var("COMMAND_FORMAT") {
            Ok(s) => s.parse().context("Invalid COMMAND_FORMAT")?,
            Err(_) => ManifestFormat::default(),
        };
        commands.extend(manifest_commands(&dir, format, options.log_info));
    }

    let platform = DiscordPlatform::new(&options.token, Some(options.application_id));
    let report = deploy_commands(&options, &commands, &platform).await;

    if report.guild.is_none() || report.global.is_none() {
        anyhow::bail!("Deploy failed for at least one scope");
    }
    Ok(())
}
