//! Manifest loader: reads command manifests (JSON or TOML) from a directory and turns them into
//! [`CommandModule`]s, resolving listener names against a host-supplied [`HandlerTable`].
//!
//! Manifest shape:
//!
//! ```json
//! {
//!   "data": { "name": "ping", "description": "Pong!" },
//!   "type": "GUILD",
//!   "skip": false,
//!   "permissions": { "default": "ManageGuild", "DMs": false },
//!   "listeners": { "onExecute": "ping", "onError": "report" }
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use burger_core::{
    BurgerError, CommandData, CommandDefinition, CommandHandler, CommandModule,
    CommandPermissions, ErrorHandler, Listeners, Logger, Result, Scope,
};
use serde::Deserialize;

use crate::config::ManifestFormat;

#[derive(Debug, Deserialize)]
struct Manifest {
    data: Option<CommandData>,
    #[serde(rename = "type")]
    scope: Option<Scope>,
    #[serde(default)]
    skip: bool,
    permissions: Option<CommandPermissions>,
    #[serde(default)]
    listeners: ManifestListeners,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestListeners {
    #[serde(rename = "onExecute")]
    on_execute: Option<String>,
    #[serde(rename = "onError")]
    on_error: Option<String>,
}

/// Named handlers manifests can refer to.
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
    error_handlers: HashMap<String, Arc<dyn ErrorHandler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, name: &str, handler: Arc<dyn CommandHandler>) -> Self {
        self.handlers.insert(name.to_string(), handler);
        self
    }

    pub fn with_error_handler(mut self, name: &str, handler: Arc<dyn ErrorHandler>) -> Self {
        self.error_handlers.insert(name.to_string(), handler);
        self
    }

    pub fn handler(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn error_handler(&self, name: &str) -> Option<Arc<dyn ErrorHandler>> {
        self.error_handlers.get(name).cloned()
    }
}

pub struct ManifestLoader {
    format: ManifestFormat,
    handlers: HandlerTable,
    logger: Logger,
}

impl ManifestLoader {
    pub fn new(format: ManifestFormat, handlers: HandlerTable, logger: Logger) -> Self {
        Self {
            format,
            handlers,
            logger,
        }
    }

    /// Parses every manifest in `dir` with the configured extension, in file-name order.
    ///
    /// Returns `(file name, module)` pairs; unreadable or malformed files are logged and skipped.
    /// `None` (after an error log) when `dir` cannot be read.
    pub fn load_dir(&self, dir: &Path) -> Option<Vec<(String, CommandModule)>> {
        let mut files: Vec<_> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file())
                .filter(|p| {
                    p.extension()
                        .is_some_and(|ext| ext == self.format.extension())
                })
                .collect(),
            Err(e) => {
                self.logger.error("Invalid Directory");
                tracing::debug!(dir = %dir.display(), error = %e, "read_dir failed");
                return None;
            }
        };
        files.sort();

        let mut modules = Vec::with_capacity(files.len());
        for path in files {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match self.load_file(&path, &file_name) {
                Ok(module) => modules.push((file_name, module)),
                Err(e) => self.logger.error(&format!(
                    "An error occurred when registering the command in file {}: {}",
                    file_name, e
                )),
            }
        }
        Some(modules)
    }

    fn load_file(&self, path: &Path, file_name: &str) -> Result<CommandModule> {
        let text = fs::read_to_string(path)?;
        let manifest = self.parse(&text, file_name)?;
        Ok(self.resolve(manifest, file_name))
    }

    fn parse(&self, text: &str, file_name: &str) -> Result<Manifest> {
        match self.format {
            ManifestFormat::Json => serde_json::from_str(text).map_err(|e| BurgerError::Manifest {
                file: file_name.to_string(),
                reason: e.to_string(),
            }),
            ManifestFormat::Toml => toml::from_str(text).map_err(|e| BurgerError::Manifest {
                file: file_name.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn resolve(&self, manifest: Manifest, file_name: &str) -> CommandModule {
        let on_execute = manifest.listeners.on_execute.as_deref().and_then(|name| {
            let handler = self.handlers.handler(name);
            if handler.is_none() {
                self.logger.warn(&format!(
                    "No handler named {} for the command in file {}.",
                    name, file_name
                ));
            }
            handler
        });
        let on_error = manifest
            .listeners
            .on_error
            .as_deref()
            .and_then(|name| self.handlers.error_handler(name));

        CommandModule {
            data: manifest.data,
            scope: manifest.scope,
            skip: manifest.skip,
            permissions: manifest.permissions,
            listeners: Listeners {
                on_execute,
                on_error,
            },
        }
    }

    /// Loads and validates manifests without registering them; used by the deploy entry point.
    /// Invalid modules are warned about, skipped ones are logged, both are left out.
    pub fn all_commands_in_dir(&self, dir: &Path) -> Option<Vec<Arc<CommandDefinition>>> {
        let modules = self.load_dir(dir)?;
        let mut commands = Vec::new();
        for (file_name, module) in modules {
            if !module.is_valid() {
                self.logger.warn(&format!(
                    "The command {} is not registered correctly.",
                    file_name
                ));
                continue;
            }
            if module.skip {
                let name = module.data.as_ref().map(|d| d.name.as_str()).unwrap_or_default();
                self.logger.info(&format!("Skipped command {}.", name));
                continue;
            }
            if let Some(definition) = module.into_definition() {
                commands.push(Arc::new(definition));
            }
        }
        Some(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use burger_core::{CommandContext, Permissions};
    use std::io::Write;
    use tempfile::TempDir;

    struct Noop;

    #[async_trait]
    impl CommandHandler for Noop {
        async fn execute(&self, _ctx: CommandContext) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn write(dir: &TempDir, name: &str, content: &str) {
        let mut f = fs::File::create(dir.path().join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    fn loader(format: ManifestFormat) -> ManifestLoader {
        ManifestLoader::new(
            format,
            HandlerTable::new().with_handler("ping", Arc::new(Noop)),
            Logger::new("test", false),
        )
    }

    #[test]
    fn test_load_dir_filters_extension_and_skips_bad_files() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "a_ping.json",
            r#"{"data":{"name":"ping","description":"Pong!"},"type":"GUILD","listeners":{"onExecute":"ping"}}"#,
        );
        write(&dir, "b_broken.json", "{ not json");
        write(&dir, "c_notes.txt", "ignored");

        let modules = loader(ManifestFormat::Json).load_dir(dir.path()).unwrap();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].0, "a_ping.json");
        assert!(modules[0].1.is_valid());
    }

    #[test]
    fn test_missing_directory_returns_none() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(loader(ManifestFormat::Json).load_dir(&missing).is_none());
        assert!(loader(ManifestFormat::Json).all_commands_in_dir(&missing).is_none());
    }

    #[test]
    fn test_toml_manifest_with_permissions() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "ping.toml",
            r#"
type = "GLOBAL"

[data]
name = "ping"
description = "Pong!"

[permissions]
default = "ManageGuild"
DMs = false

[listeners]
onExecute = "ping"
"#,
        );

        let commands = loader(ManifestFormat::Toml)
            .all_commands_in_dir(dir.path())
            .unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].scope, Scope::Global);
        assert_eq!(commands[0].required_permission, Some(Permissions::MANAGE_GUILD));
        assert!(!commands[0].allowed_in_dms);
    }

    #[test]
    fn test_all_commands_in_dir_drops_invalid_and_skipped() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "skipped.json",
            r#"{"data":{"name":"old","description":"x"},"type":"GUILD","skip":true,"listeners":{"onExecute":"ping"}}"#,
        );
        write(
            &dir,
            "unknown_handler.json",
            r#"{"data":{"name":"x","description":"x"},"type":"GUILD","listeners":{"onExecute":"missing"}}"#,
        );
        write(
            &dir,
            "no_type.json",
            r#"{"data":{"name":"y","description":"y"},"listeners":{"onExecute":"ping"}}"#,
        );

        let commands = loader(ManifestFormat::Json)
            .all_commands_in_dir(dir.path())
            .unwrap();
        assert!(commands.is_empty());
    }
}
