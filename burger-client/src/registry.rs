//! Command registry: insertion-ordered name -> definition map, filled by validated registration.

use std::sync::{Arc, RwLock};

use burger_core::{CommandDefinition, CommandModule, Logger, Scope};
use indexmap::IndexMap;

/// Registered commands keyed by name. Last registration of a name wins and keeps the original slot.
pub struct CommandRegistry {
    commands: RwLock<IndexMap<String, Arc<CommandDefinition>>>,
    logger: Logger,
}

impl CommandRegistry {
    pub fn new(logger: Logger) -> Self {
        Self {
            commands: RwLock::new(IndexMap::new()),
            logger,
        }
    }

    /// Validates and inserts one module. Invalid or skipped modules are logged and dropped.
    pub fn register(
        &self,
        module: CommandModule,
        display_name: &str,
    ) -> Option<Arc<CommandDefinition>> {
        if !module.is_valid() {
            self.logger.warn(&format!(
                "The command {} is not registered correctly.",
                display_name
            ));
            return None;
        }

        if module.skip {
            self.logger
                .info(&format!("Skipped command {}.", display_name));
            return None;
        }

        let definition = Arc::new(module.into_definition()?);
        let name = definition.name().to_string();
        self.write().insert(name, definition.clone());
        self.logger
            .info(&format!("Registered command {}.", display_name));
        Some(definition)
    }

    pub fn get(&self, name: &str) -> Option<Arc<CommandDefinition>> {
        self.read().get(name).cloned()
    }

    /// Snapshot in registration order; later registrations do not show up in it.
    pub fn get_all(&self) -> Vec<Arc<CommandDefinition>> {
        self.read().values().cloned().collect()
    }

    pub fn by_scope(&self, scope: Scope) -> Vec<Arc<CommandDefinition>> {
        self.read()
            .values()
            .filter(|c| c.scope == scope)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, IndexMap<String, Arc<CommandDefinition>>> {
        self.commands.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, IndexMap<String, Arc<CommandDefinition>>> {
        self.commands.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use burger_core::{CommandContext, CommandData, CommandHandler};

    struct Noop;

    #[async_trait]
    impl CommandHandler for Noop {
        async fn execute(&self, _ctx: CommandContext) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn module(name: &str, scope: Scope) -> CommandModule {
        CommandModule::new(CommandData::new(name, "test"), scope, Arc::new(Noop))
    }

    #[test]
    fn test_get_all_is_snapshot_in_insertion_order() {
        let registry = CommandRegistry::new(Logger::new("test", false));
        registry.register(module("b", Scope::Guild), "b");
        registry.register(module("a", Scope::Global), "a");

        let snapshot = registry.get_all();
        registry.register(module("c", Scope::Guild), "c");

        let names: Vec<_> = snapshot.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_overwrite_keeps_slot() {
        let registry = CommandRegistry::new(Logger::new("test", false));
        registry.register(module("a", Scope::Guild), "a");
        registry.register(module("b", Scope::Guild), "b");
        registry.register(module("a", Scope::Global), "a again");

        let all = registry.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name(), "a");
        assert_eq!(all[0].scope, Scope::Global);
    }

    #[test]
    fn test_by_scope() {
        let registry = CommandRegistry::new(Logger::new("test", false));
        registry.register(module("a", Scope::Guild), "a");
        registry.register(module("b", Scope::Global), "b");
        registry.register(module("c", Scope::Guild), "c");

        let guild: Vec<_> = registry
            .by_scope(Scope::Guild)
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(guild, vec!["a", "c"]);
        assert_eq!(registry.by_scope(Scope::Global).len(), 1);
    }
}
