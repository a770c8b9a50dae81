//! Core types: user, guild, member, channel, command invocation and live platform commands.

use serde::{Deserialize, Serialize};

use crate::permissions::Permissions;

/// User identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub global_name: Option<String>,
    pub bot: bool,
}

impl User {
    /// Display tag used in log lines.
    pub fn tag(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.name)
    }
}

/// Guild (server) the invocation came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: u64,
    pub name: Option<String>,
}

/// Guild member with the permissions Discord computed for the invocation channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub guild_id: u64,
    pub user: User,
    pub nick: Option<String>,
    pub permissions: Permissions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    GuildText,
    GuildVoice,
    Thread,
    DirectMessage,
    GroupDirectMessage,
    Other,
}

/// Channel the invocation was issued in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: u64,
    pub kind: ChannelKind,
}

impl Channel {
    pub fn is_dm_based(&self) -> bool {
        matches!(
            self.kind,
            ChannelKind::DirectMessage | ChannelKind::GroupDirectMessage
        )
    }
}

/// Deployment scope of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Available in the configured home guild only.
    #[serde(rename = "GUILD")]
    Guild,
    /// Available in every guild the bot is installed in, and in DMs.
    #[serde(rename = "GLOBAL")]
    Global,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Guild => f.write_str("guild"),
            Scope::Global => f.write_str("global"),
        }
    }
}

/// Resolved value of one command option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    User(u64),
    Channel(u64),
    Role(u64),
    Mentionable(u64),
    Attachment(u64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub value: OptionValue,
}

/// Argument accessor handed to command handlers. Options of the invoked subcommand are flattened in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandArgs {
    options: Vec<CommandOption>,
}

impl CommandArgs {
    pub fn new(options: Vec<CommandOption>) -> Self {
        Self { options }
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .map(|o| &o.value)
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(OptionValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(OptionValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(OptionValue::Number(n)) => Some(*n),
            Some(OptionValue::Integer(i)) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(OptionValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_user(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(OptionValue::User(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn get_channel(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(OptionValue::Channel(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn get_role(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(OptionValue::Role(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// One chat-input command invocation, already converted from the transport's event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub id: u64,
    pub command_name: String,
    /// `None` when the platform sent no channel context.
    pub channel: Option<Channel>,
    pub user: User,
    pub guild: Option<Guild>,
    pub member: Option<Member>,
    pub subcommand: Option<String>,
    pub args: CommandArgs,
}

/// A command as it currently exists on the platform. Fetched per sync pass, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveCommand {
    pub id: u64,
    pub name: String,
    /// `None` means everyone may use the command.
    pub default_member_permissions: Option<Permissions>,
    /// `None` when the platform does not track the flag for this command (guild commands).
    pub dm_permission: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_dm_based() {
        let dm = Channel {
            id: 1,
            kind: ChannelKind::DirectMessage,
        };
        let text = Channel {
            id: 2,
            kind: ChannelKind::GuildText,
        };
        assert!(dm.is_dm_based());
        assert!(!text.is_dm_based());
    }

    #[test]
    fn test_args_typed_getters() {
        let args = CommandArgs::new(vec![
            CommandOption {
                name: "count".to_string(),
                value: OptionValue::Integer(3),
            },
            CommandOption {
                name: "text".to_string(),
                value: OptionValue::String("hi".to_string()),
            },
        ]);
        assert_eq!(args.get_integer("count"), Some(3));
        assert_eq!(args.get_number("count"), Some(3.0));
        assert_eq!(args.get_string("text"), Some("hi"));
        assert_eq!(args.get_string("count"), None);
        assert_eq!(args.get_bool("missing"), None);
    }

    #[test]
    fn test_scope_wire_names() {
        let scope: Scope = serde_json::from_str("\"GUILD\"").unwrap();
        assert_eq!(scope, Scope::Guild);
        assert_eq!(serde_json::to_string(&Scope::Global).unwrap(), "\"GLOBAL\"");
    }
}
