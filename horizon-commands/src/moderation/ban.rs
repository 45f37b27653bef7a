use tracing::error;
use twilight_model::id::{Id, marker::UserMarker};

use horizon_core::{Context, Invocation, ModerationError};
use horizon_database::cases::ActionKind;
use horizon_utils::parse::parse_target_user_id;

use crate::CommandMeta;
use crate::moderation::actions::{ActionAck, authorize_staff, record_notify_audit};
use crate::moderation::embeds::{failure_reply, moderation_self_action_message, usage_message};

pub const META: CommandMeta = CommandMeta {
    name: "ban",
    desc: "Ban a user from the server.",
    category: "moderation",
    usage: "!ban <user> [reason]",
};

/// Ban a target user: authorize, enforce, then record/notify/audit.
pub async fn execute(
    ctx: &Context,
    inv: &Invocation,
    target_id: Id<UserMarker>,
    reason: Option<&str>,
) -> Result<ActionAck, ModerationError> {
    authorize_staff(ctx, inv)?;

    ctx.platform
        .ban_member(inv.guild_id, target_id, reason)
        .await?;

    record_notify_audit(ctx, inv, ActionKind::Ban, target_id, reason, None, None).await
}

pub async fn run(
    ctx: Context,
    inv: Invocation,
    arg1: Option<&str>,
    arg_tail: Option<&str>,
) -> anyhow::Result<()> {
    let platform = &ctx.platform;
    let Some(target_id) = arg1.and_then(parse_target_user_id) else {
        platform
            .send_channel_text(inv.channel_id, &usage_message(META.usage))
            .await?;
        return Ok(());
    };

    if target_id == inv.actor_id {
        platform
            .send_channel_text(inv.channel_id, &moderation_self_action_message("ban"))
            .await?;
        return Ok(());
    }

    match execute(&ctx, &inv, target_id, arg_tail).await {
        Ok(ack) => {
            let confirmation = format!("<@{target_id}> has been banned. Case `#{}`.", ack.case_id);
            platform
                .send_channel_text(inv.channel_id, &confirmation)
                .await?;
        }
        Err(err) => {
            if matches!(err, ModerationError::Storage(_) | ModerationError::Other(_)) {
                error!(?err, "ban failed");
            }
            platform
                .send_channel_text(inv.channel_id, &failure_reply(&err))
                .await?;
        }
    }

    Ok(())
}
