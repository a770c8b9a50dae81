//! [`BurgerClient`]: wires registry, readiness gate, command sync, permission sync and dispatch
//! around one [`PlatformApi`]. Transport adapters feed it readiness signals and invocations.

use std::future::Future;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use burger_core::{
    BurgerError, CommandDefinition, CommandModule, Invocation, Logger, PlatformApi, Responder,
    Result,
};
use tracing::instrument;

use crate::config::ClientOptions;
use crate::dispatch::{DispatchOutcome, Router};
use crate::loader::{HandlerTable, ManifestLoader};
use crate::permission_sync::{PermissionSync, PermissionSyncReport};
use crate::readiness::{ReadinessGate, CONNECTION, STORAGE};
use crate::registry::CommandRegistry;
use crate::storage::Storage;
use crate::sync::{push_commands, SyncReport};

pub struct BurgerClient {
    options: ClientOptions,
    logger: Logger,
    api: Arc<dyn PlatformApi>,
    registry: Arc<CommandRegistry>,
    permissions: Arc<PermissionSync>,
    router: Router,
    gate: ReadinessGate,
    handlers: HandlerTable,
    storage: OnceLock<Storage>,
}

impl BurgerClient {
    /// Creates a client. Readiness waits on the connection handshake, and on storage when
    /// `database_url` is configured.
    pub fn new(options: ClientOptions, api: Arc<dyn PlatformApi>) -> Self {
        let logger = Logger::new("Burger Client", options.log_info);
        let registry = Arc::new(CommandRegistry::new(logger.clone()));
        let permissions = Arc::new(PermissionSync::new(
            registry.clone(),
            api.clone(),
            options.home_guild_id,
            logger.clone(),
        ));
        let router = Router::new(
            registry.clone(),
            permissions.clone(),
            api.clone(),
            logger.clone(),
        );

        let mut sources = vec![CONNECTION];
        if options.database_url.is_some() {
            sources.push(STORAGE);
        }
        let gate = ReadinessGate::new(sources, logger.clone());

        Self {
            options,
            logger,
            api,
            registry,
            permissions,
            router,
            gate,
            handlers: HandlerTable::new(),
            storage: OnceLock::new(),
        }
    }

    /// Handlers that command manifests may refer to by name.
    pub fn with_handlers(mut self, handlers: HandlerTable) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Platform client handle, as handed to command handlers.
    pub fn api(&self) -> Arc<dyn PlatformApi> {
        self.api.clone()
    }

    pub fn storage(&self) -> Option<&Storage> {
        self.storage.get()
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Registers one command; invalid or skipped modules are logged and dropped.
    pub fn register_command(
        &self,
        module: CommandModule,
        display_name: &str,
    ) -> Option<Arc<CommandDefinition>> {
        self.registry.register(module, display_name)
    }

    /// Registers every manifest in `dir`. `None` when the directory cannot be read.
    pub fn register_all_commands(&self, dir: &Path) -> Option<Vec<Arc<CommandDefinition>>> {
        let loader = ManifestLoader::new(
            self.options.manifest_format,
            self.handlers.clone(),
            self.logger.clone(),
        );
        let modules = loader.load_dir(dir)?;
        Some(
            modules
                .into_iter()
                .filter_map(|(file_name, module)| self.registry.register(module, &file_name))
                .collect(),
        )
    }

    /// Snapshot of every registered command.
    pub fn get_commands(&self) -> Vec<Arc<CommandDefinition>> {
        self.registry.get_all()
    }

    /// Sets the callback released once the connection (and storage, if configured) is ready.
    pub async fn on_ready<F, Fut>(&self, callback: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.gate.on_ready(callback).await;
    }

    pub fn is_ready(&self) -> bool {
        self.gate.has_fired()
    }

    /// Called by the transport after the handshake with the guilds the bot is in.
    /// Not being a member of the home guild is a fatal configuration error.
    #[instrument(skip(self, guild_ids), fields(guilds = guild_ids.len()))]
    pub async fn connection_ready(&self, guild_ids: &[u64]) -> Result<()> {
        if !guild_ids.contains(&self.options.home_guild_id) {
            return Err(BurgerError::Config(format!(
                "The bot is not a part of guild {}.",
                self.options.home_guild_id
            )));
        }
        self.gate.satisfy(CONNECTION).await;
        Ok(())
    }

    /// Connects the optional storage and satisfies its readiness source. No-op without `database_url`.
    pub async fn connect_storage(&self) -> Result<()> {
        let Some(url) = self.options.database_url.as_deref() else {
            return Ok(());
        };
        let storage = Storage::connect(url).await.map_err(|e| {
            BurgerError::Storage(format!(
                "An error occurred when connecting to storage: {}",
                e
            ))
        })?;
        let _ = self.storage.set(storage);
        self.logger.info("Connected to storage.");
        self.gate.satisfy(STORAGE).await;
        Ok(())
    }

    /// Pushes the whole registry to the platform, guild commands to the home guild.
    pub async fn sync(&self) -> SyncReport {
        let commands = self.registry.get_all();
        push_commands(
            self.api.as_ref(),
            self.options.home_guild_id,
            &commands,
            &self.logger,
        )
        .await
    }

    /// Reconciles live permission settings with the registry.
    pub async fn sync_permissions(&self) -> PermissionSyncReport {
        self.permissions.sync_permissions().await
    }

    /// Routes one chat-input invocation.
    pub async fn resolve_command(
        &self,
        invocation: Invocation,
        responder: Arc<dyn Responder>,
    ) -> DispatchOutcome {
        self.router.resolve_command(invocation, responder).await
    }
}
