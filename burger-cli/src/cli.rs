//! CLI parser and config loading.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "burger")]
#[command(about = "Discord slash-command bot: run, deploy", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Push every command once and exit (no gateway connection).
    Deploy {
        #[arg(short, long)]
        token: Option<String>,
        /// Overrides HOME_GUILD_ID.
        #[arg(long)]
        guild_id: Option<u64>,
        /// Overrides APPLICATION_ID.
        #[arg(long)]
        application_id: Option<u64>,
        /// Overrides COMMANDS_DIR.
        #[arg(long)]
        commands_dir: Option<PathBuf>,
    },
}
