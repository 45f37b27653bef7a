//! Scripted stand-in for the chat platform, used by crate tests.

use std::collections::HashMap;
use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use async_trait::async_trait;
use twilight_model::channel::message::embed::Embed;
use twilight_model::id::{
    Id,
    marker::{ChannelMarker, GuildMarker, MessageMarker, RoleMarker, UserMarker},
};

use crate::error::ModerationError;
use crate::platform::{DmDelivery, MessagePredicate, MessageRecord, Platform};

/// A [`Platform`] whose behavior is scripted up front and whose calls are
/// recorded for assertions.
#[derive(Default)]
pub struct FakePlatform {
    member_roles: Mutex<HashMap<(u64, u64), Vec<Id<RoleMarker>>>>,
    channels_by_name: Mutex<HashMap<(u64, String), Id<ChannelMarker>>>,
    messages: Mutex<Vec<MessageRecord>>,

    deny_enforcement: AtomicBool,
    fail_dms: AtomicBool,

    enforcement_log: Mutex<Vec<String>>,
    channel_embeds: Mutex<Vec<(Id<ChannelMarker>, Embed)>>,
    channel_texts: Mutex<Vec<(Id<ChannelMarker>, String)>>,
    dm_embeds: Mutex<Vec<(Id<UserMarker>, Embed)>>,
    delete_batches: AtomicU64,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the role set returned for a guild member.
    pub fn grant_roles(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        roles: &[Id<RoleMarker>],
    ) {
        self.member_roles
            .lock()
            .unwrap()
            .insert((guild_id.get(), user_id.get()), roles.to_vec());
    }

    /// Script a named channel within a guild.
    pub fn add_channel(&self, guild_id: Id<GuildMarker>, name: &str, channel_id: Id<ChannelMarker>) {
        self.channels_by_name
            .lock()
            .unwrap()
            .insert((guild_id.get(), name.to_owned()), channel_id);
    }

    /// Seed the synthetic message store.
    pub fn seed_messages(&self, records: impl IntoIterator<Item = MessageRecord>) {
        self.messages.lock().unwrap().extend(records);
    }

    /// Make every subsequent enforcement call fail with a permission refusal.
    pub fn deny_enforcement(&self) {
        self.deny_enforcement.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent direct message report failed delivery.
    pub fn fail_dms(&self) {
        self.fail_dms.store(true, Ordering::SeqCst);
    }

    /// Labels of enforcement calls that reached the platform, in order.
    pub fn enforcement_calls(&self) -> Vec<String> {
        self.enforcement_log.lock().unwrap().clone()
    }

    /// Embeds sent to channels, in order.
    pub fn sent_channel_embeds(&self) -> Vec<(Id<ChannelMarker>, Embed)> {
        self.channel_embeds.lock().unwrap().clone()
    }

    /// Plain-text messages sent to channels, in order.
    pub fn sent_channel_texts(&self) -> Vec<(Id<ChannelMarker>, String)> {
        self.channel_texts.lock().unwrap().clone()
    }

    /// Direct-message attempts, in order, regardless of delivery outcome.
    pub fn sent_dm_embeds(&self) -> Vec<(Id<UserMarker>, Embed)> {
        self.dm_embeds.lock().unwrap().clone()
    }

    /// Number of bulk-delete batch calls issued so far.
    pub fn delete_batch_calls(&self) -> u64 {
        self.delete_batches.load(Ordering::SeqCst)
    }

    /// Messages still present in the synthetic store.
    pub fn remaining_messages(&self) -> Vec<MessageRecord> {
        self.messages.lock().unwrap().clone()
    }

    fn enforce(&self, label: String) -> Result<(), ModerationError> {
        if self.deny_enforcement.load(Ordering::SeqCst) {
            return Err(ModerationError::Enforcement("missing permissions".into()));
        }
        self.enforcement_log.lock().unwrap().push(label);
        Ok(())
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn timeout_member(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        until_unix_secs: i64,
        _reason: Option<&str>,
    ) -> Result<(), ModerationError> {
        self.enforce(format!(
            "timeout:{}:{}:{until_unix_secs}",
            guild_id.get(),
            user_id.get()
        ))
    }

    async fn clear_timeout(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        _reason: Option<&str>,
    ) -> Result<(), ModerationError> {
        self.enforce(format!("untimeout:{}:{}", guild_id.get(), user_id.get()))
    }

    async fn ban_member(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        _reason: Option<&str>,
    ) -> Result<(), ModerationError> {
        self.enforce(format!("ban:{}:{}", guild_id.get(), user_id.get()))
    }

    async fn kick_member(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        _reason: Option<&str>,
    ) -> Result<(), ModerationError> {
        self.enforce(format!("kick:{}:{}", guild_id.get(), user_id.get()))
    }

    async fn add_role(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        role_id: Id<RoleMarker>,
        _reason: Option<&str>,
    ) -> Result<(), ModerationError> {
        self.enforce(format!(
            "add_role:{}:{}:{}",
            guild_id.get(),
            user_id.get(),
            role_id.get()
        ))
    }

    async fn remove_role(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        role_id: Id<RoleMarker>,
        _reason: Option<&str>,
    ) -> Result<(), ModerationError> {
        self.enforce(format!(
            "remove_role:{}:{}:{}",
            guild_id.get(),
            user_id.get(),
            role_id.get()
        ))
    }

    async fn send_channel_text(
        &self,
        channel_id: Id<ChannelMarker>,
        content: &str,
    ) -> anyhow::Result<()> {
        self.channel_texts
            .lock()
            .unwrap()
            .push((channel_id, content.to_owned()));
        Ok(())
    }

    async fn send_channel_embed(
        &self,
        channel_id: Id<ChannelMarker>,
        embed: Embed,
    ) -> anyhow::Result<()> {
        self.channel_embeds.lock().unwrap().push((channel_id, embed));
        Ok(())
    }

    async fn send_direct_embed(&self, user_id: Id<UserMarker>, embed: Embed) -> DmDelivery {
        self.dm_embeds.lock().unwrap().push((user_id, embed));
        if self.fail_dms.load(Ordering::SeqCst) {
            DmDelivery::Failed
        } else {
            DmDelivery::Delivered
        }
    }

    async fn fetch_message(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Result<Option<MessageRecord>, ModerationError> {
        let store = self.messages.lock().unwrap();
        Ok(store
            .iter()
            .find(|record| record.channel_id == channel_id && record.id == message_id)
            .cloned())
    }

    async fn delete_matching(
        &self,
        channel_id: Id<ChannelMarker>,
        limit: u16,
        predicate: MessagePredicate<'_>,
    ) -> Result<u64, ModerationError> {
        self.delete_batches.fetch_add(1, Ordering::SeqCst);

        let mut store = self.messages.lock().unwrap();
        let mut candidates: Vec<(usize, Id<MessageMarker>)> = store
            .iter()
            .enumerate()
            .filter(|(_, record)| record.channel_id == channel_id && predicate(record))
            .map(|(index, record)| (index, record.id))
            .collect();

        // Newest first, mirroring the platform's history order.
        candidates.sort_by(|a, b| b.1.cmp(&a.1));
        candidates.truncate(usize::from(limit));

        let doomed: Vec<Id<MessageMarker>> = candidates.into_iter().map(|(_, id)| id).collect();
        store.retain(|record| !doomed.contains(&record.id));

        Ok(doomed.len() as u64)
    }

    async fn member_role_ids(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> anyhow::Result<Vec<Id<RoleMarker>>> {
        Ok(self
            .member_roles
            .lock()
            .unwrap()
            .get(&(guild_id.get(), user_id.get()))
            .cloned()
            .unwrap_or_default())
    }

    async fn resolve_channel_by_name(
        &self,
        guild_id: Id<GuildMarker>,
        name: &str,
    ) -> Option<Id<ChannelMarker>> {
        self.channels_by_name
            .lock()
            .unwrap()
            .get(&(guild_id.get(), name.to_owned()))
            .copied()
    }
}

/// Convenience constructor for synthetic messages.
pub fn message(
    id: u64,
    channel_id: Id<ChannelMarker>,
    author_id: u64,
    content: &str,
) -> MessageRecord {
    MessageRecord {
        id: Id::new(id),
        channel_id,
        author_id: Id::new(author_id),
        author_is_bot: false,
        content: content.to_owned(),
        attachment_urls: Vec::new(),
        embeds: Vec::new(),
    }
}
