//! Gateway runner: serenity event handler that feeds readiness and chat-input commands into
//! [`BurgerClient`], plus [`run`] which connects and blocks until shutdown or a fatal startup error.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use burger_client::BurgerClient;
use burger_core::BurgerError;
use serenity::all::{CommandType, Context, EventHandler, Interaction, Ready};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::adapters::InteractionWrapper;
use crate::config::DiscordConfig;
use crate::platform_adapter::DiscordPlatform;
use crate::responder::DiscordResponder;

/// Forwards gateway events to the client. Fatal startup errors go to `fatal`.
pub struct BurgerEventHandler {
    burger: Arc<BurgerClient>,
    platform: Arc<DiscordPlatform>,
    fatal: mpsc::UnboundedSender<BurgerError>,
}

impl BurgerEventHandler {
    pub fn new(
        burger: Arc<BurgerClient>,
        platform: Arc<DiscordPlatform>,
        fatal: mpsc::UnboundedSender<BurgerError>,
    ) -> Self {
        Self {
            burger,
            platform,
            fatal,
        }
    }
}

#[async_trait]
impl EventHandler for BurgerEventHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "Connected to gateway");
        self.platform.set_application_id(ready.application.id.get());

        let guild_ids: Vec<u64> = ready.guilds.iter().map(|g| g.id.get()).collect();
        if let Err(e) = self.burger.connection_ready(&guild_ids).await {
            let _ = self.fatal.send(e);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        if command.data.kind != CommandType::ChatInput {
            debug!(command = %command.data.name, "Ignoring non chat-input command");
            return;
        }

        let invocation = InteractionWrapper(&command).to_invocation();
        let responder = Arc::new(DiscordResponder::new(ctx.http.clone(), command));
        let outcome = self.burger.resolve_command(invocation, responder).await;
        debug!(?outcome, "Command resolved");
    }
}

/// Connects storage (if configured) and the gateway, then runs until the gateway stops.
/// Returns an error when startup fails fatally, e.g. the bot is not in the home guild.
#[instrument(skip_all)]
pub async fn run(
    config: DiscordConfig,
    platform: Arc<DiscordPlatform>,
    burger: Arc<BurgerClient>,
) -> Result<()> {
    config.validate()?;
    let (fatal_tx, mut fatal_rx) = mpsc::unbounded_channel();

    let storage_client = burger.clone();
    let storage_fatal = fatal_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = storage_client.connect_storage().await {
            let _ = storage_fatal.send(e);
        }
    });

    let handler = BurgerEventHandler::new(burger, platform, fatal_tx);
    let mut client = serenity::Client::builder(&config.bot_token, config.gateway_intents())
        .event_handler(handler)
        .await?;
    let shard_manager = client.shard_manager.clone();

    info!("Starting gateway connection");
    tokio::select! {
        res = client.start() => {
            res?;
            Ok(())
        }
        Some(e) = fatal_rx.recv() => {
            error!(error = %e, "Fatal startup error");
            shard_manager.shutdown_all().await;
            Err(e.into())
        }
    }
}
