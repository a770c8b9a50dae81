//! Adapters from serenity model types to burger_core types.
//! Depends only on serenity and burger_core type definitions.

use burger_core::{
    Channel, ChannelKind, CommandArgs, CommandOption, Guild, Invocation, Member, OptionValue,
    Permissions, User,
};
use serenity::all::{ChannelType, CommandDataOption, CommandDataOptionValue, CommandInteraction};

/// Wraps a serenity User for conversion to core [`User`].
pub struct DiscordUserWrapper<'a>(pub &'a serenity::all::User);

impl<'a> DiscordUserWrapper<'a> {
    pub fn to_core(&self) -> User {
        User {
            id: self.0.id.get(),
            name: self.0.name.clone(),
            global_name: self.0.global_name.clone(),
            bot: self.0.bot,
        }
    }
}

/// Wraps a serenity CommandInteraction for conversion to core [`Invocation`].
pub struct InteractionWrapper<'a>(pub &'a CommandInteraction);

impl<'a> InteractionWrapper<'a> {
    pub fn to_invocation(&self) -> Invocation {
        let interaction = self.0;
        let (subcommand, options) = flatten_options(&interaction.data.options);

        Invocation {
            id: interaction.id.get(),
            command_name: interaction.data.name.clone(),
            channel: interaction.channel.as_ref().map(|c| Channel {
                id: c.id.get(),
                kind: channel_kind(c.kind),
            }),
            user: DiscordUserWrapper(&interaction.user).to_core(),
            guild: interaction.guild_id.map(|id| Guild {
                id: id.get(),
                name: None,
            }),
            member: interaction.member.as_ref().map(|m| Member {
                guild_id: m.guild_id.get(),
                user: DiscordUserWrapper(&m.user).to_core(),
                nick: m.nick.clone(),
                permissions: m
                    .permissions
                    .map(|p| Permissions::from_bits(p.bits()))
                    .unwrap_or_default(),
            }),
            subcommand,
            args: CommandArgs::new(options),
        }
    }
}

pub fn channel_kind(kind: ChannelType) -> ChannelKind {
    match kind {
        ChannelType::Text | ChannelType::News | ChannelType::Forum => ChannelKind::GuildText,
        ChannelType::Voice | ChannelType::Stage => ChannelKind::GuildVoice,
        ChannelType::PublicThread | ChannelType::PrivateThread | ChannelType::NewsThread => {
            ChannelKind::Thread
        }
        ChannelType::Private => ChannelKind::DirectMessage,
        ChannelType::GroupDm => ChannelKind::GroupDirectMessage,
        _ => ChannelKind::Other,
    }
}

/// Returns the invoked subcommand (if any) and the options of the leaf command, flattened.
pub fn flatten_options(options: &[CommandDataOption]) -> (Option<String>, Vec<CommandOption>) {
    let mut subcommand = None;
    let mut flat = Vec::new();

    for option in options {
        let value = match &option.value {
            CommandDataOptionValue::SubCommand(inner) => {
                subcommand = Some(option.name.clone());
                let (_, inner) = flatten_options(inner);
                flat.extend(inner);
                continue;
            }
            CommandDataOptionValue::SubCommandGroup(inner) => {
                let (sub, inner) = flatten_options(inner);
                subcommand = sub;
                flat.extend(inner);
                continue;
            }
            CommandDataOptionValue::String(s) => OptionValue::String(s.clone()),
            CommandDataOptionValue::Integer(i) => OptionValue::Integer(*i),
            CommandDataOptionValue::Number(n) => OptionValue::Number(*n),
            CommandDataOptionValue::Boolean(b) => OptionValue::Boolean(*b),
            CommandDataOptionValue::User(id) => OptionValue::User(id.get()),
            CommandDataOptionValue::Channel(id) => OptionValue::Channel(id.get()),
            CommandDataOptionValue::Role(id) => OptionValue::Role(id.get()),
            CommandDataOptionValue::Mentionable(id) => OptionValue::Mentionable(id.get()),
            CommandDataOptionValue::Attachment(id) => OptionValue::Attachment(id.get()),
            _ => continue,
        };
        flat.push(CommandOption {
            name: option.name.clone(),
            value,
        });
    }

    (subcommand, flat)
}
