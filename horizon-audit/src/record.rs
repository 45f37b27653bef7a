use twilight_model::id::{
    Id,
    marker::{ChannelMarker, GuildMarker, RoleMarker, UserMarker},
};

use horizon_core::MessageRecord;

/// A raw server event as delivered by the gateway layer.
///
/// Before-states (edited messages, previous role sets) are resolved by the
/// caller; the translator itself never reaches back to the platform.
#[derive(Clone, Debug)]
pub enum ServerEvent {
    MessageDeleted {
        guild_id: Id<GuildMarker>,
        message: MessageRecord,
    },
    MessageEdited {
        guild_id: Id<GuildMarker>,
        before: MessageRecord,
        after: MessageRecord,
    },
    MemberJoined {
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    },
    MemberLeft {
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    },
    RolesUpdated {
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        before: Vec<Id<RoleMarker>>,
        after: Vec<Id<RoleMarker>>,
    },
    ChannelCreated {
        guild_id: Id<GuildMarker>,
        channel_id: Id<ChannelMarker>,
        name: String,
    },
    ChannelDeleted {
        guild_id: Id<GuildMarker>,
        name: String,
    },
}

impl ServerEvent {
    /// The guild the event originated from.
    pub fn guild_id(&self) -> Id<GuildMarker> {
        match self {
            Self::MessageDeleted { guild_id, .. }
            | Self::MessageEdited { guild_id, .. }
            | Self::MemberJoined { guild_id, .. }
            | Self::MemberLeft { guild_id, .. }
            | Self::RolesUpdated { guild_id, .. }
            | Self::ChannelCreated { guild_id, .. }
            | Self::ChannelDeleted { guild_id, .. } => *guild_id,
        }
    }
}

/// One structured audit entry destined for the log channel.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AuditRecord {
    MessageDeleted {
        channel_id: Id<ChannelMarker>,
        author_id: Id<UserMarker>,
        content: String,
        attachment_urls: Vec<String>,
    },
    MessageEdited {
        channel_id: Id<ChannelMarker>,
        author_id: Id<UserMarker>,
        before_content: String,
        after_content: String,
        before_attachments: Vec<String>,
        after_attachments: Vec<String>,
    },
    MemberJoined {
        user_id: Id<UserMarker>,
    },
    MemberLeft {
        user_id: Id<UserMarker>,
    },
    RoleAssigned {
        user_id: Id<UserMarker>,
        role_id: Id<RoleMarker>,
    },
    RoleRemoved {
        user_id: Id<UserMarker>,
        role_id: Id<RoleMarker>,
    },
    ChannelCreated {
        channel_id: Id<ChannelMarker>,
        name: String,
    },
    ChannelDeleted {
        name: String,
    },
}
