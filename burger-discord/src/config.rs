//! Minimal Discord connection config: token, gateway intents, application id, log path.
//! Loaded from BOT_TOKEN, DISCORD_INTENTS, APPLICATION_ID and LOG_FILE.

use anyhow::Result;
use serenity::all::GatewayIntents;
use std::env;

/// Discord connection config (gateway + logging only).
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub bot_token: String,
    /// Gateway intents bit-set; defaults to GUILDS, which slash commands need.
    pub intents: u64,
    pub application_id: Option<u64>,
    pub log_file: Option<String>,
}

impl DiscordConfig {
    /// BOT_TOKEN is required (unless `token` is given); the rest are optional.
    pub fn from_env(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let intents = match env::var("DISCORD_INTENTS") {
            Ok(s) => s
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("DISCORD_INTENTS is not a number: {}", s))?,
            Err(_) => GatewayIntents::GUILDS.bits(),
        };
        let application_id = match env::var("APPLICATION_ID") {
            Ok(s) => Some(
                s.trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("APPLICATION_ID is not a valid id: {}", s))?,
            ),
            Err(_) => None,
        };
        let log_file = env::var("LOG_FILE").ok();
        Ok(Self {
            bot_token,
            intents,
            application_id,
            log_file,
        })
    }

    /// Uses the given token; GUILDS intent, nothing else set.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            intents: GatewayIntents::GUILDS.bits(),
            application_id: None,
            log_file: None,
        }
    }

    pub fn gateway_intents(&self) -> GatewayIntents {
        GatewayIntents::from_bits_truncate(self.intents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        Ok(())
    }
}
