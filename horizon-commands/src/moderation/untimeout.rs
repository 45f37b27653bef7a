use tracing::error;
use twilight_model::id::{Id, marker::UserMarker};

use horizon_core::{Context, Invocation, ModerationError};
use horizon_database::cases::ActionKind;
use horizon_utils::parse::parse_target_user_id;

use crate::CommandMeta;
use crate::moderation::actions::{ActionAck, authorize_staff, record_notify_audit};
use crate::moderation::embeds::{failure_reply, usage_message};

pub const META: CommandMeta = CommandMeta {
    name: "untimeout",
    desc: "Remove timeout from a user.",
    category: "moderation",
    usage: "!untimeout <user> [reason]",
};

/// Lift an active timeout, then record/notify/audit.
pub async fn execute(
    ctx: &Context,
    inv: &Invocation,
    target_id: Id<UserMarker>,
    reason: Option<&str>,
) -> Result<ActionAck, ModerationError> {
    authorize_staff(ctx, inv)?;

    ctx.platform
        .clear_timeout(inv.guild_id, target_id, reason)
        .await?;

    record_notify_audit(ctx, inv, ActionKind::Untimeout, target_id, reason, None, None).await
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

    match execute(&ctx, &inv, target_id, arg_tail).await {
        Ok(ack) => {
            let confirmation =
                format!("Timeout removed from <@{target_id}>. Case `#{}`.", ack.case_id);
            platform
                .send_channel_text(inv.channel_id, &confirmation)
                .await?;
        }
        Err(err) => {
            if matches!(err, ModerationError::Storage(_) | ModerationError::Other(_)) {
                error!(?err, "untimeout failed");
            }
            platform
                .send_channel_text(inv.channel_id, &failure_reply(&err))
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{self, staff_invocation, target_user, test_context};
    use horizon_database::cases::recent_cases;

    #[tokio::test]
    async fn untimeout_enforces_then_records() {
        let (ctx, platform) = test_context().await;
        let inv = staff_invocation();

        let ack = execute(&ctx, &inv, target_user(), Some("appealed"))
            .await
            .unwrap();

        assert_eq!(platform.enforcement_calls(), vec!["untimeout:1:6".to_owned()]);
        let rows = recent_cases(&ctx.db, testkit::TARGET, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, ack.case_id);
        assert_eq!(rows[0].action, ActionKind::Untimeout);
        assert_eq!(rows[0].reason.as_deref(), Some("appealed"));
    }
}
