//! Command definitions: the serializable command schema, raw [`CommandModule`]s as hosts write them,
//! validated [`CommandDefinition`]s, and the handler traits dispatch calls into.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::permissions::Permissions;
use crate::platform::{PlatformApi, Responder};
use crate::types::{Channel, CommandArgs, Guild, Invocation, Member, Scope, User};

/// Application command option type, as numbered by Discord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OptionKind {
    SubCommand,
    SubCommandGroup,
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
    Number,
    Attachment,
}

impl From<OptionKind> for u8 {
    fn from(kind: OptionKind) -> u8 {
        match kind {
            OptionKind::SubCommand => 1,
            OptionKind::SubCommandGroup => 2,
            OptionKind::String => 3,
            OptionKind::Integer => 4,
            OptionKind::Boolean => 5,
            OptionKind::User => 6,
            OptionKind::Channel => 7,
            OptionKind::Role => 8,
            OptionKind::Mentionable => 9,
            OptionKind::Number => 10,
            OptionKind::Attachment => 11,
        }
    }
}

impl TryFrom<u8> for OptionKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => OptionKind::SubCommand,
            2 => OptionKind::SubCommandGroup,
            3 => OptionKind::String,
            4 => OptionKind::Integer,
            5 => OptionKind::Boolean,
            6 => OptionKind::User,
            7 => OptionKind::Channel,
            8 => OptionKind::Role,
            9 => OptionKind::Mentionable,
            10 => OptionKind::Number,
            11 => OptionKind::Attachment,
            other => return Err(format!("unknown option type {}", other)),
        })
    }
}

/// One option (or subcommand) of a slash command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOptionData {
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOptionData>,
}

impl CommandOptionData {
    pub fn new(kind: OptionKind, name: &str, description: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            description: description.to_string(),
            required: false,
            choices: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn choice(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.choices
            .push(serde_json::json!({ "name": name, "value": value.into() }));
        self
    }

    pub fn option(mut self, option: CommandOptionData) -> Self {
        self.options.push(option);
        self
    }
}

/// Slash command schema as sent to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandData {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOptionData>,
}

impl CommandData {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, option: CommandOptionData) -> Self {
        self.options.push(option);
        self
    }
}

/// Permission declarations of a command module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPermissions {
    /// Permissions a member needs; `None` lets everyone use the command.
    #[serde(default)]
    pub default: Option<Permissions>,
    /// Whether the command may be used in DMs; `None` means allowed.
    #[serde(default, rename = "DMs")]
    pub dms: Option<bool>,
}

/// Everything a handler gets for one invocation.
pub struct CommandContext {
    pub invocation: Arc<Invocation>,
    pub channel: Channel,
    pub args: CommandArgs,
    pub subcommand: Option<String>,
    pub client: Arc<dyn PlatformApi>,
    pub guild: Option<Guild>,
    pub user: User,
    pub member: Option<Member>,
    pub responder: Arc<dyn Responder>,
}

impl CommandContext {
    /// Shorthand for `self.responder.reply(content)`.
    pub async fn reply(&self, content: &str) -> crate::error::Result<()> {
        self.responder.reply(content).await
    }
}

/// Passed to an [`ErrorHandler`] when the command handler failed.
pub struct ErrorContext<'a> {
    pub invocation: &'a Invocation,
    pub error: &'a anyhow::Error,
    pub responder: &'a Arc<dyn Responder>,
}

/// Runs a command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, ctx: CommandContext) -> anyhow::Result<()>;
}

/// Custom error handling for one command.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    /// Returns true when it answered the user itself, which suppresses the generic error reply.
    async fn on_error(&self, ctx: ErrorContext<'_>) -> bool;
}

/// Handler callbacks of a command module.
#[derive(Clone, Default)]
pub struct Listeners {
    pub on_execute: Option<Arc<dyn CommandHandler>>,
    pub on_error: Option<Arc<dyn ErrorHandler>>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("on_execute", &self.on_execute.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// A command as the host (or the manifest loader) describes it. Not yet validated.
#[derive(Debug, Clone, Default)]
pub struct CommandModule {
    pub data: Option<CommandData>,
    pub scope: Option<Scope>,
    pub skip: bool,
    pub permissions: Option<CommandPermissions>,
    pub listeners: Listeners,
}

impl CommandModule {
    /// Module with schema, scope and execute handler set; the common case for statically registered commands.
    pub fn new(data: CommandData, scope: Scope, handler: Arc<dyn CommandHandler>) -> Self {
        Self {
            data: Some(data),
            scope: Some(scope),
            skip: false,
            permissions: None,
            listeners: Listeners {
                on_execute: Some(handler),
                on_error: None,
            },
        }
    }

    pub fn with_permissions(mut self, permissions: CommandPermissions) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn with_error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.listeners.on_error = Some(handler);
        self
    }

    pub fn skipped(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    /// True when the module has a named schema, a scope and an execute handler.
    pub fn is_valid(&self) -> bool {
        self.data.as_ref().is_some_and(|d| !d.name.is_empty())
            && self.scope.is_some()
            && self.listeners.on_execute.is_some()
    }

    /// Converts into a [`CommandDefinition`]; `None` when [`CommandModule::is_valid`] fails.
    pub fn into_definition(self) -> Option<CommandDefinition> {
        let data = self.data.filter(|d| !d.name.is_empty())?;
        let scope = self.scope?;
        let handler = self.listeners.on_execute?;
        let permissions = self.permissions.unwrap_or_default();
        Some(CommandDefinition {
            data,
            scope,
            required_permission: permissions.default,
            allowed_in_dms: permissions.dms.unwrap_or(true),
            handler,
            error_handler: self.listeners.on_error,
        })
    }
}

/// A validated, immutable command. The registry holds these behind `Arc`.
#[derive(Clone)]
pub struct CommandDefinition {
    pub data: CommandData,
    pub scope: Scope,
    pub required_permission: Option<Permissions>,
    pub allowed_in_dms: bool,
    pub handler: Arc<dyn CommandHandler>,
    pub error_handler: Option<Arc<dyn ErrorHandler>>,
}

impl CommandDefinition {
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Platform JSON for the bulk "set commands" call, carrying the declared permissions.
    /// `dm_permission` is only meaningful for global commands and is omitted for guild ones.
    pub fn to_json(&self) -> Value {
        let mut value = serde_json::to_value(&self.data).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.insert(
                "default_member_permissions".to_string(),
                match self.required_permission {
                    Some(p) => Value::String(p.bits().to_string()),
                    None => Value::Null,
                },
            );
            if self.scope == Scope::Global {
                map.insert(
                    "dm_permission".to_string(),
                    Value::Bool(self.allowed_in_dms),
                );
            }
        }
        value
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.data.name)
            .field("scope", &self.scope)
            .field("required_permission", &self.required_permission)
            .field("allowed_in_dms", &self.allowed_in_dms)
            .field("error_handler", &self.error_handler.is_some())
            .finish()
    }
}
