//! # burger-discord
//!
//! Discord layer on serenity: model adapters, REST [`burger_core::PlatformApi`], interaction
//! responder, minimal config and the gateway runner. Routing and sync live in burger-client.

mod adapters;
mod config;
mod platform_adapter;
mod responder;
mod runner;

pub use adapters::{channel_kind, flatten_options, DiscordUserWrapper, InteractionWrapper};
pub use config::DiscordConfig;
pub use platform_adapter::DiscordPlatform;
pub use responder::DiscordResponder;
pub use runner::{run, BurgerEventHandler};
