//! [`Permissions`]: a Discord permission bit-set as a plain value type.
//!
//! On the wire Discord encodes permission sets as decimal strings; deserialization also accepts
//! bare integers so hand-written manifests can use either form.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Permissions(u64);

impl Permissions {
    pub const CREATE_INSTANT_INVITE: Self = Self(1 << 0);
    pub const KICK_MEMBERS: Self = Self(1 << 1);
    pub const BAN_MEMBERS: Self = Self(1 << 2);
    pub const ADMINISTRATOR: Self = Self(1 << 3);
    pub const MANAGE_CHANNELS: Self = Self(1 << 4);
    pub const MANAGE_GUILD: Self = Self(1 << 5);
    pub const ADD_REACTIONS: Self = Self(1 << 6);
    pub const VIEW_AUDIT_LOG: Self = Self(1 << 7);
    pub const VIEW_CHANNEL: Self = Self(1 << 10);
    pub const SEND_MESSAGES: Self = Self(1 << 11);
    pub const MANAGE_MESSAGES: Self = Self(1 << 13);
    pub const MENTION_EVERYONE: Self = Self(1 << 17);
    pub const MANAGE_NICKNAMES: Self = Self(1 << 27);
    pub const MANAGE_ROLES: Self = Self(1 << 28);
    pub const MANAGE_WEBHOOKS: Self = Self(1 << 29);
    pub const USE_APPLICATION_COMMANDS: Self = Self(1 << 31);
    pub const MODERATE_MEMBERS: Self = Self(1 << 40);

    const NAMED: &'static [(&'static str, Permissions)] = &[
        ("CreateInstantInvite", Self::CREATE_INSTANT_INVITE),
        ("KickMembers", Self::KICK_MEMBERS),
        ("BanMembers", Self::BAN_MEMBERS),
        ("Administrator", Self::ADMINISTRATOR),
        ("ManageChannels", Self::MANAGE_CHANNELS),
        ("ManageGuild", Self::MANAGE_GUILD),
        ("AddReactions", Self::ADD_REACTIONS),
        ("ViewAuditLog", Self::VIEW_AUDIT_LOG),
        ("ViewChannel", Self::VIEW_CHANNEL),
        ("SendMessages", Self::SEND_MESSAGES),
        ("ManageMessages", Self::MANAGE_MESSAGES),
        ("MentionEveryone", Self::MENTION_EVERYONE),
        ("ManageNicknames", Self::MANAGE_NICKNAMES),
        ("ManageRoles", Self::MANAGE_ROLES),
        ("ManageWebhooks", Self::MANAGE_WEBHOOKS),
        ("UseApplicationCommands", Self::USE_APPLICATION_COMMANDS),
        ("ModerateMembers", Self::MODERATE_MEMBERS),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Permission check as Discord evaluates it: administrators pass every requirement.
    pub const fn satisfies(self, required: Self) -> bool {
        self.contains(Self::ADMINISTRATOR) || self.contains(required)
    }

    /// Looks up a flag by its PascalCase name (e.g. `"ManageGuild"`).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, p)| *p)
    }
}

impl BitOr for Permissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bits(u64),
            Text(String),
            Names(Vec<String>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bits(bits) => Ok(Self(bits)),
            Raw::Text(text) => match text.parse::<u64>() {
                Ok(bits) => Ok(Self(bits)),
                Err(_) => Self::from_name(&text)
                    .ok_or_else(|| de::Error::custom(format!("unknown permission: {}", text))),
            },
            Raw::Names(names) => names.iter().try_fold(Self::empty(), |acc, name| {
                Self::from_name(name)
                    .map(|p| acc | p)
                    .ok_or_else(|| de::Error::custom(format!("unknown permission: {}", name)))
            }),
        }
    }
}
