//! # burger-cli
//!
//! Binary support: argument parsing and the built-in commands.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{builtin_commands, builtin_handlers};
