//! # burger-core
//!
//! Core types and traits for slash-command bots: [`Permissions`], [`CommandModule`] and
//! [`CommandDefinition`], the [`PlatformApi`] and [`Responder`] seams, and logging setup.
//! Transport-agnostic; used by burger-client and burger-discord.

pub mod command;
pub mod error;
pub mod logger;
pub mod permissions;
pub mod platform;
pub mod types;

pub use command::{
    CommandContext, CommandData, CommandDefinition, CommandHandler, CommandModule,
    CommandOptionData, CommandPermissions, ErrorContext, ErrorHandler, Listeners, OptionKind,
};
pub use error::{BurgerError, Result};
pub use logger::{init_tracing, Logger};
pub use permissions::Permissions;
pub use platform::{PlatformApi, Responder};
pub use types::{
    Channel, ChannelKind, CommandArgs, CommandOption, Guild, Invocation, LiveCommand, Member,
    OptionValue, Scope, User,
};
