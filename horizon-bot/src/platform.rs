//! The [`Platform`] implementation backed by the Discord HTTP API.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{Duration, sleep};
use tracing::{error, warn};
use twilight_http::Client;
use twilight_http::error::ErrorType;
use twilight_http::request::AuditLogReason as _;
use twilight_model::channel::{ChannelType, Message};
use twilight_model::channel::message::embed::Embed;
use twilight_model::id::{
    Id,
    marker::{ChannelMarker, GuildMarker, MessageMarker, RoleMarker, UserMarker},
};
use twilight_model::util::Timestamp;

use horizon_core::ModerationError;
use horizon_core::platform::{
    BULK_DELETE_CEILING, DmDelivery, MessagePredicate, MessageRecord, Platform,
};
use horizon_utils::time::now_unix_secs;

const BULK_DELETE_MAX_AGE_SECS: u64 = 14 * 24 * 60 * 60;
const BULK_DELETE_SAFETY_BUFFER_SECS: u64 = 60 * 60;
const HISTORY_PAGE_DELAY_MS: u64 = 1100;

/// Wraps the shared HTTP client behind the platform seam.
pub struct TwilightPlatform {
    http: Arc<Client>,
}

impl TwilightPlatform {
    pub fn new(http: Arc<Client>) -> Self {
        Self { http }
    }
}

fn enforcement_err(source: twilight_http::Error) -> ModerationError {
    ModerationError::Enforcement(source.to_string())
}

fn record_from_message(message: Message) -> MessageRecord {
    MessageRecord {
        id: message.id,
        channel_id: message.channel_id,
        author_id: message.author.id,
        author_is_bot: message.author.bot,
        content: message.content,
        attachment_urls: message
            .attachments
            .iter()
            .map(|attachment| attachment.url.clone())
            .collect(),
        embeds: message.embeds,
    }
}

#[async_trait]
impl Platform for TwilightPlatform {
    async fn timeout_member(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        until_unix_secs: i64,
        reason: Option<&str>,
    ) -> Result<(), ModerationError> {
        let expires_at = Timestamp::from_secs(until_unix_secs)
            .map_err(|_| ModerationError::Enforcement("invalid timeout expiration".to_owned()))?;

        let mut request = self
            .http
            .update_guild_member(guild_id, user_id)
            .communication_disabled_until(Some(expires_at));
        if let Some(reason) = reason {
            request = request.reason(reason);
        }

        request.await.map_err(enforcement_err)?;
        Ok(())
    }

    async fn clear_timeout(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        reason: Option<&str>,
    ) -> Result<(), ModerationError> {
        let mut request = self
            .http
            .update_guild_member(guild_id, user_id)
            .communication_disabled_until(None);
        if let Some(reason) = reason {
            request = request.reason(reason);
        }

        request.await.map_err(enforcement_err)?;
        Ok(())
    }

    async fn ban_member(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        reason: Option<&str>,
    ) -> Result<(), ModerationError> {
        let mut request = self.http.create_ban(guild_id, user_id);
        if let Some(reason) = reason {
            request = request.reason(reason);
        }

        request.await.map_err(enforcement_err)?;
        Ok(())
    }

    async fn kick_member(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        reason: Option<&str>,
    ) -> Result<(), ModerationError> {
        let mut request = self.http.remove_guild_member(guild_id, user_id);
        if let Some(reason) = reason {
            request = request.reason(reason);
        }

        request.await.map_err(enforcement_err)?;
        Ok(())
    }

    async fn add_role(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        role_id: Id<RoleMarker>,
        reason: Option<&str>,
    ) -> Result<(), ModerationError> {
        let mut request = self.http.add_guild_member_role(guild_id, user_id, role_id);
        if let Some(reason) = reason {
            request = request.reason(reason);
        }

        request.await.map_err(enforcement_err)?;
        Ok(())
    }

    async fn remove_role(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        role_id: Id<RoleMarker>,
        reason: Option<&str>,
    ) -> Result<(), ModerationError> {
        let mut request = self
            .http
            .remove_guild_member_role(guild_id, user_id, role_id);
        if let Some(reason) = reason {
            request = request.reason(reason);
        }

        request.await.map_err(enforcement_err)?;
        Ok(())
    }

    async fn send_channel_text(
        &self,
        channel_id: Id<ChannelMarker>,
        content: &str,
    ) -> anyhow::Result<()> {
        self.http
            .create_message(channel_id)
            .content(content)
            .await?;
        Ok(())
    }

    async fn send_channel_embed(
        &self,
        channel_id: Id<ChannelMarker>,
        embed: Embed,
    ) -> anyhow::Result<()> {
        self.http
            .create_message(channel_id)
            .embeds(&[embed])
            .await?;
        Ok(())
    }

    async fn send_direct_embed(&self, user_id: Id<UserMarker>, embed: Embed) -> DmDelivery {
        let channel = match self.http.create_private_channel(user_id).await {
            Ok(response) => match response.model().await {
                Ok(channel) => channel,
                Err(source) => {
                    warn!(?source, user_id = user_id.get(), "DM channel decode failed");
                    return DmDelivery::Failed;
                }
            },
            Err(source) => {
                warn!(?source, user_id = user_id.get(), "DM channel open failed");
                return DmDelivery::Failed;
            }
        };

        match self.http.create_message(channel.id).embeds(&[embed]).await {
            Ok(_) => DmDelivery::Delivered,
            Err(source) => {
                warn!(?source, user_id = user_id.get(), "DM send failed");
                DmDelivery::Failed
            }
        }
    }

    async fn fetch_message(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Result<Option<MessageRecord>, ModerationError> {
        let response = match self.http.message(channel_id, message_id).await {
            Ok(response) => response,
            Err(source) => {
                if let ErrorType::Response { status, .. } = source.kind() {
                    if status.get() == 404 {
                        return Ok(None);
                    }
                }
                return Err(ModerationError::Other(anyhow::Error::new(source)));
            }
        };

        let message = response
            .model()
            .await
            .map_err(|source| ModerationError::Other(anyhow::Error::new(source)))?;
        Ok(Some(record_from_message(message)))
    }

    async fn delete_matching(
        &self,
        channel_id: Id<ChannelMarker>,
        limit: u16,
        predicate: MessagePredicate<'_>,
    ) -> Result<u64, ModerationError> {
        let limit = usize::from(limit.min(BULK_DELETE_CEILING));
        let bulk_delete_cutoff = now_unix_secs()
            .saturating_sub(BULK_DELETE_MAX_AGE_SECS.saturating_sub(BULK_DELETE_SAFETY_BUFFER_SECS))
            as i64;

        // Walk the history newest-first until enough matches are found or
        // the channel runs out.
        let mut matches: Vec<(Id<MessageMarker>, i64)> = Vec::new();
        let mut before: Option<Id<MessageMarker>> = None;

        loop {
            let response = match before {
                Some(before_id) => {
                    self.http
                        .channel_messages(channel_id)
                        .before(before_id)
                        .limit(100)
                        .await
                }
                None => self.http.channel_messages(channel_id).limit(100).await,
            };

            let page = response
                .map_err(|source| ModerationError::Other(anyhow::Error::new(source)))?
                .model()
                .await
                .map_err(|source| ModerationError::Other(anyhow::Error::new(source)))?;

            if page.is_empty() {
                break;
            }

            before = page.last().map(|message| message.id);

            for message in page {
                if matches.len() == limit {
                    break;
                }

                let created_secs = message.timestamp.as_secs();
                let record = record_from_message(message);
                if predicate(&record) {
                    matches.push((record.id, created_secs));
                }
            }

            if matches.len() == limit {
                break;
            }

            sleep(Duration::from_millis(HISTORY_PAGE_DELAY_MS)).await;
        }

        // Messages past the bulk-delete age limit need single deletes.
        let mut bulk_candidate_ids: Vec<Id<MessageMarker>> = Vec::new();
        let mut single_delete_ids: Vec<Id<MessageMarker>> = Vec::new();
        for (message_id, created_secs) in matches {
            if created_secs >= bulk_delete_cutoff {
                bulk_candidate_ids.push(message_id);
            } else {
                single_delete_ids.push(message_id);
            }
        }

        let mut deleted_count = 0_u64;

        for chunk in bulk_candidate_ids.chunks(100) {
            if chunk.len() < 2 {
                single_delete_ids.extend_from_slice(chunk);
                continue;
            }

            match self.http.delete_messages(channel_id, chunk).await {
                Ok(_) => {
                    deleted_count = deleted_count.saturating_add(chunk.len() as u64);
                }
                Err(source) => {
                    error!(
                        ?source,
                        channel_id = channel_id.get(),
                        count = chunk.len(),
                        "bulk delete failed, falling back to single delete"
                    );
                    single_delete_ids.extend_from_slice(chunk);
                }
            }
        }

        for message_id in single_delete_ids {
            if self.http.delete_message(channel_id, message_id).await.is_ok() {
                deleted_count = deleted_count.saturating_add(1);
            }
        }

        Ok(deleted_count)
    }

    async fn member_role_ids(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> anyhow::Result<Vec<Id<RoleMarker>>> {
        let member = self
            .http
            .guild_member(guild_id, user_id)
            .await?
            .model()
            .await?;
        Ok(member.roles)
    }

    async fn resolve_channel_by_name(
        &self,
        guild_id: Id<GuildMarker>,
        name: &str,
    ) -> Option<Id<ChannelMarker>> {
        let channels = match self.http.guild_channels(guild_id).await {
            Ok(response) => match response.model().await {
                Ok(channels) => channels,
                Err(source) => {
                    warn!(?source, guild_id = guild_id.get(), "channel list decode failed");
                    return None;
                }
            },
            Err(source) => {
                warn!(?source, guild_id = guild_id.get(), "channel list fetch failed");
                return None;
            }
        };

        channels
            .into_iter()
            .filter(|channel| {
                matches!(
                    channel.kind,
                    ChannelType::GuildText | ChannelType::GuildAnnouncement
                )
            })
            .find(|channel| channel.name.as_deref() == Some(name))
            .map(|channel| channel.id)
    }
}
