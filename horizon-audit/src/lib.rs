//! Mirrors server events into the audit-log feed.

use tracing::{error, warn};

use horizon_core::{Context, DmDelivery, MessageRecord};
use horizon_utils::embed::{COLOR_DARK_RED, build_fielded_embed, sanitize_text};

/// Event and record types.
pub mod record;
/// Embed rendering for audit records.
pub mod render;
/// The log-channel sink.
pub mod sink;
/// Pure event-to-record translation.
pub mod translate;

pub use record::{AuditRecord, ServerEvent};
pub use translate::translate;

/// Process one inbound server event end to end.
///
/// Never fails the caller over delivery problems: the log channel may be
/// missing and sends may be refused without affecting event handling.
pub async fn handle_event(ctx: &Context, event: ServerEvent) -> anyhow::Result<()> {
    // Deleting one of our own log messages is itself security-relevant:
    // forward it to the owner instead of suppressing it.
    if let ServerEvent::MessageDeleted { guild_id, message } = &event {
        if message.author_id == ctx.config.bot_user_id {
            let log_channel = ctx
                .platform
                .resolve_channel_by_name(*guild_id, &ctx.config.log_channel_name)
                .await;

            if log_channel == Some(message.channel_id) {
                forward_deleted_log(ctx, message).await;
            }
            return Ok(());
        }
    }

    for record in translate(&event, ctx.config.bot_user_id) {
        let embed = render::record_embed(&record)?;
        if let Err(source) = sink::emit_to_log(ctx, event.guild_id(), embed).await {
            error!(?source, "audit log send failed");
        }
    }

    Ok(())
}

/// Forward a deleted log message, embeds and content alike, to the owner.
///
/// Failures are logged and swallowed; the owner may simply be unreachable.
async fn forward_deleted_log(ctx: &Context, message: &MessageRecord) {
    let owner_id = ctx.config.owner_id;

    for embed in &message.embeds {
        let mut forwarded = embed.clone();
        forwarded.title = Some("A Log Message Was Deleted".to_owned());

        if ctx.platform.send_direct_embed(owner_id, forwarded).await == DmDelivery::Failed {
            warn!(owner_id = owner_id.get(), "could not forward deleted log embed");
        }
    }

    if !message.content.is_empty() {
        let notice = build_fielded_embed(
            "A Log Message Was Deleted",
            COLOR_DARK_RED,
            Some(&sanitize_text(&message.content)),
            &[],
        );

        match notice {
            Ok(embed) => {
                if ctx.platform.send_direct_embed(owner_id, embed).await == DmDelivery::Failed {
                    warn!(owner_id = owner_id.get(), "could not forward deleted log text");
                }
            }
            Err(source) => warn!(?source, "could not build deleted-log notice"),
        }
    }

    // Nothing to forward at all: note it and move on.
    if message.embeds.is_empty() && message.content.is_empty() {
        let fallback = build_fielded_embed(
            "A Log Message Was Deleted",
            COLOR_DARK_RED,
            Some("The deleted log message had no recoverable content."),
            &[],
        );
        if let Ok(embed) = fallback {
            let _ = ctx.platform.send_direct_embed(owner_id, embed).await;
        }
    }
}
