//! Built-in commands shipped with the binary. Manifests in COMMANDS_DIR can refer to these
//! handlers by name through [`builtin_handlers`].

use std::sync::Arc;

use async_trait::async_trait;
use burger_core::{
    CommandContext, CommandData, CommandHandler, CommandModule, CommandOptionData, OptionKind,
    Scope,
};

pub struct Ping;

#[async_trait]
impl CommandHandler for Ping {
    async fn execute(&self, ctx: CommandContext) -> anyhow::Result<()> {
        ctx.reply("Pong").await?;
        Ok(())
    }
}

/// Replies with the `text` option.
pub struct Echo;

#[async_trait]
impl CommandHandler for Echo {
    async fn execute(&self, ctx: CommandContext) -> anyhow::Result<()> {
        let text = ctx
            .args
            .get_string("text")
            .ok_or_else(|| anyhow::anyhow!("missing option text"))?;
        ctx.reply(text).await?;
        Ok(())
    }
}

pub fn builtin_handlers() -> burger_client::HandlerTable {
    burger_client::HandlerTable::new()
        .with_handler("ping", Arc::new(Ping))
        .with_handler("echo", Arc::new(Echo))
}

/// `(display name, module)` for every built-in command.
pub fn builtin_commands() -> Vec<(&'static str, CommandModule)> {
    vec![
        (
            "ping",
            CommandModule::new(CommandData::new("ping", "Pong!"), Scope::Guild, Arc::new(Ping)),
        ),
        (
            "echo",
            CommandModule::new(
                CommandData::new("echo", "Repeats what you say").option(
                    CommandOptionData::new(OptionKind::String, "text", "What to repeat")
                        .required(true),
                ),
                Scope::Global,
                Arc::new(Echo),
            ),
        ),
    ]
}
