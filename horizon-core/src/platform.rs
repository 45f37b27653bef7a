use async_trait::async_trait;
use twilight_model::channel::message::embed::Embed;
use twilight_model::id::{
    Id,
    marker::{ChannelMarker, GuildMarker, MessageMarker, RoleMarker, UserMarker},
};

use crate::error::ModerationError;

/// The platform's hard ceiling on messages deletable in one bulk call.
pub const BULK_DELETE_CEILING: u16 = 100;

/// A message as seen by the purge engine and the audit translator.
#[derive(Clone, Debug)]
pub struct MessageRecord {
    pub id: Id<MessageMarker>,
    pub channel_id: Id<ChannelMarker>,
    pub author_id: Id<UserMarker>,
    pub author_is_bot: bool,
    pub content: String,
    pub attachment_urls: Vec<String>,
    pub embeds: Vec<Embed>,
}

/// Outcome of a best-effort direct message.
///
/// Failure is an expected state (closed DMs, no mutual guild), so it is a
/// value rather than an error; callers decide whether to care.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DmDelivery {
    Delivered,
    Failed,
}

/// Predicate over candidate messages used by bulk deletion.
pub type MessagePredicate<'a> = &'a (dyn Fn(&MessageRecord) -> bool + Send + Sync);

/// Everything the core needs from the external chat platform.
///
/// The real implementation wraps `twilight_http::Client`; tests script a
/// fake. Enforcement refusals surface as `ModerationError::Enforcement`.
#[async_trait]
pub trait Platform: Send + Sync {
    // Enforcement calls.

    /// Apply a communication timeout until the given unix second.
    async fn timeout_member(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        until_unix_secs: i64,
        reason: Option<&str>,
    ) -> Result<(), ModerationError>;

    /// Remove an active communication timeout.
    async fn clear_timeout(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        reason: Option<&str>,
    ) -> Result<(), ModerationError>;

    async fn ban_member(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        reason: Option<&str>,
    ) -> Result<(), ModerationError>;

    async fn kick_member(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        reason: Option<&str>,
    ) -> Result<(), ModerationError>;

    async fn add_role(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        role_id: Id<RoleMarker>,
        reason: Option<&str>,
    ) -> Result<(), ModerationError>;

    async fn remove_role(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        role_id: Id<RoleMarker>,
        reason: Option<&str>,
    ) -> Result<(), ModerationError>;

    // Messaging calls.

    /// Send plain text to a channel. Failures propagate.
    async fn send_channel_text(
        &self,
        channel_id: Id<ChannelMarker>,
        content: &str,
    ) -> anyhow::Result<()>;

    /// Send an embed to a channel. Failures propagate.
    async fn send_channel_embed(
        &self,
        channel_id: Id<ChannelMarker>,
        embed: Embed,
    ) -> anyhow::Result<()>;

    /// Send an embed directly to a user, reporting delivery without erroring.
    async fn send_direct_embed(&self, user_id: Id<UserMarker>, embed: Embed) -> DmDelivery;

    // Message listing and deletion.

    /// Fetch one message by reference; `None` when it does not exist.
    async fn fetch_message(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Result<Option<MessageRecord>, ModerationError>;

    /// Delete up to `limit` (capped at [`BULK_DELETE_CEILING`]) messages in
    /// the channel matching the predicate, newest first, returning how many
    /// were removed. Zero means no matching candidates remain.
    async fn delete_matching(
        &self,
        channel_id: Id<ChannelMarker>,
        limit: u16,
        predicate: MessagePredicate<'_>,
    ) -> Result<u64, ModerationError>;

    // Membership and channel introspection.

    /// Current role set of a guild member.
    async fn member_role_ids(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> anyhow::Result<Vec<Id<RoleMarker>>>;

    /// Resolve a channel by its well-known name within a guild.
    async fn resolve_channel_by_name(
        &self,
        guild_id: Id<GuildMarker>,
        name: &str,
    ) -> Option<Id<ChannelMarker>>;
}
