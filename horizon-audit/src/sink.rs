use twilight_model::channel::message::embed::Embed;
use twilight_model::id::{Id, marker::GuildMarker};

use horizon_core::Context;

/// Send an embed to the guild's log channel, resolved by its configured name.
///
/// An absent log channel drops the embed without error; logging is
/// best-effort by contract. Send failures propagate so callers can decide
/// whether to surface or swallow them.
pub async fn emit_to_log(
    ctx: &Context,
    guild_id: Id<GuildMarker>,
    embed: Embed,
) -> anyhow::Result<()> {
    let Some(channel_id) = ctx
        .platform
        .resolve_channel_by_name(guild_id, &ctx.config.log_channel_name)
        .await
    else {
        return Ok(());
    };

    ctx.platform.send_channel_embed(channel_id, embed).await
}
