use tracing::error;
use twilight_model::id::{Id, marker::UserMarker};

use horizon_core::{Context, Invocation, ModerationError};
use horizon_database::cases::ActionKind;
use horizon_utils::parse::{parse_duration_secs, parse_target_user_id};
use horizon_utils::time::now_unix_secs;

use crate::CommandMeta;
use crate::moderation::actions::{ActionAck, authorize_staff, record_notify_audit};
use crate::moderation::embeds::{failure_reply, moderation_self_action_message, usage_message};

pub const META: CommandMeta = CommandMeta {
    name: "timeout",
    desc: "Timeout a user for a duration.",
    category: "moderation",
    usage: "!timeout <user> <duration> [reason]",
};

pub(crate) const INVALID_DURATION_MESSAGE: &str =
    "Invalid duration. Use one unit: `Xs`, `Xm`, `Xh`, `Xd`, `Xw`.";

/// Apply a communication timeout: authorize, validate the duration token,
/// enforce, then record/notify/audit.
pub async fn execute(
    ctx: &Context,
    inv: &Invocation,
    target_id: Id<UserMarker>,
    duration_token: &str,
    reason: Option<&str>,
) -> Result<ActionAck, ModerationError> {
    authorize_staff(ctx, inv)?;

    let duration_secs = parse_duration_secs(duration_token)
        .ok_or_else(|| ModerationError::Validation(INVALID_DURATION_MESSAGE.to_owned()))?;

    let expires_at = now_unix_secs().saturating_add(duration_secs) as i64;
    ctx.platform
        .timeout_member(inv.guild_id, target_id, expires_at, reason)
        .await?;

    let stored_reason = match reason {
        Some(reason) => format!("{reason} (duration: {duration_token})"),
        None => format!("(duration: {duration_token})"),
    };

    record_notify_audit(
        ctx,
        inv,
        ActionKind::Timeout,
        target_id,
        reason,
        Some(&stored_reason),
        Some(duration_token),
    )
    .await
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
            .send_channel_text(inv.channel_id, &moderation_self_action_message("timeout"))
            .await?;
        return Ok(());
    }

    let Some(tail) = arg_tail else {
        platform
            .send_channel_text(inv.channel_id, &usage_message(META.usage))
            .await?;
        return Ok(());
    };

    let mut parts = tail.splitn(2, char::is_whitespace);
    let duration_token = parts.next().unwrap_or("");
    let reason = parts.next().map(str::trim).filter(|value| !value.is_empty());

    match execute(&ctx, &inv, target_id, duration_token, reason).await {
        Ok(ack) => {
            let confirmation = format!(
                "<@{target_id}> has been timed out for `{duration_token}`. Case `#{}`.",
                ack.case_id
            );
            platform
                .send_channel_text(inv.channel_id, &confirmation)
                .await?;
        }
        Err(err) => {
            if matches!(err, ModerationError::Storage(_) | ModerationError::Other(_)) {
                error!(?err, "timeout failed");
            }
            platform
                .send_channel_text(inv.channel_id, &failure_reply(&err))
                .await?;
        }
    }

    Ok(())
}
