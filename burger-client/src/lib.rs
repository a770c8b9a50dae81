//! # burger-client
//!
//! Registers slash commands, syncs them and their permissions to the platform, and routes
//! invocations to handlers. Depends only on burger-core's [`PlatformApi`](burger_core::PlatformApi)
//! and [`Responder`](burger_core::Responder) seams; burger-discord provides the serenity side.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod loader;
pub mod permission_sync;
pub mod readiness;
pub mod registry;
pub mod storage;
pub mod sync;

pub use client::BurgerClient;
pub use config::{ClientOptions, ManifestFormat};
pub use dispatch::{
    DispatchOutcome, Router, DM_NOT_ALLOWED_REPLY, EXECUTION_ERROR_REPLY, NOT_ENABLED_HERE_REPLY,
    NOT_REGISTERED_REPLY, NO_PERMISSION_REPLY,
};
pub use loader::{HandlerTable, ManifestLoader};
pub use permission_sync::{PermissionChange, PermissionSync, PermissionSyncReport};
pub use readiness::ReadinessGate;
pub use registry::CommandRegistry;
pub use storage::Storage;
pub use sync::{deploy_commands, push_commands, DeployOptions, SyncReport};

// Integration tests live in tests/
