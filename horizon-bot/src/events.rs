//! Maps raw gateway events onto the audit pipeline's event type.
//!
//! Before-states come from the in-memory cache, so callers must translate
//! an event before applying it to the cache.

use twilight_cache_inmemory::DefaultInMemoryCache;
use twilight_model::gateway::event::Event;

use horizon_audit::ServerEvent;
use horizon_core::MessageRecord;

/// Translate one gateway event, or `None` when it carries nothing auditable.
pub fn translate_gateway_event(cache: &DefaultInMemoryCache, event: &Event) -> Option<ServerEvent> {
    match event {
        Event::MessageDelete(payload) => {
            let guild_id = payload.guild_id?;
            let cached = cache.message(payload.id)?;
            let author_id = cached.author();
            let author_is_bot = cache.user(author_id).map(|user| user.bot).unwrap_or(false);

            Some(ServerEvent::MessageDeleted {
                guild_id,
                message: MessageRecord {
                    id: payload.id,
                    channel_id: payload.channel_id,
                    author_id,
                    author_is_bot,
                    content: cached.content().to_owned(),
                    attachment_urls: cached
                        .attachments()
                        .iter()
                        .map(|attachment| attachment.url.clone())
                        .collect(),
                    embeds: cached.embeds().to_vec(),
                },
            })
        }

        Event::MessageUpdate(payload) => {
            let guild_id = payload.guild_id?;
            let cached = cache.message(payload.id)?;

            let before = MessageRecord {
                id: payload.id,
                channel_id: payload.channel_id,
                author_id: cached.author(),
                author_is_bot: payload.author.bot,
                content: cached.content().to_owned(),
                attachment_urls: cached
                    .attachments()
                    .iter()
                    .map(|attachment| attachment.url.clone())
                    .collect(),
                embeds: cached.embeds().to_vec(),
            };
            let after = MessageRecord {
                id: payload.id,
                channel_id: payload.channel_id,
                author_id: payload.author.id,
                author_is_bot: payload.author.bot,
                content: payload.content.clone(),
                attachment_urls: payload
                    .attachments
                    .iter()
                    .map(|attachment| attachment.url.clone())
                    .collect(),
                embeds: payload.embeds.clone(),
            };

            Some(ServerEvent::MessageEdited {
                guild_id,
                before,
                after,
            })
        }

        Event::MemberAdd(payload) => Some(ServerEvent::MemberJoined {
            guild_id: payload.guild_id,
            user_id: payload.user.id,
        }),

        Event::MemberRemove(payload) => Some(ServerEvent::MemberLeft {
            guild_id: payload.guild_id,
            user_id: payload.user.id,
        }),

        Event::MemberUpdate(payload) => {
            let before = cache
                .member(payload.guild_id, payload.user.id)?
                .roles()
                .to_vec();

            Some(ServerEvent::RolesUpdated {
                guild_id: payload.guild_id,
                user_id: payload.user.id,
                before,
                after: payload.roles.clone(),
            })
        }

        Event::ChannelCreate(payload) => {
            let guild_id = payload.guild_id?;
            let name = payload.name.clone()?;

            Some(ServerEvent::ChannelCreated {
                guild_id,
                channel_id: payload.id,
                name,
            })
        }

        Event::ChannelDelete(payload) => {
            let guild_id = payload.guild_id?;
            let name = payload.name.clone()?;

            Some(ServerEvent::ChannelDeleted { guild_id, name })
        }

        _ => None,
    }
}
