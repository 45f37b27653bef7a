use tracing::error;
use twilight_model::id::{Id, marker::UserMarker};

use horizon_core::{Context, Invocation, ModerationError};
use horizon_database::cases::ActionKind;
use horizon_utils::parse::parse_target_user_id;

use crate::CommandMeta;
use crate::moderation::actions::{ActionAck, authorize_staff, record_notify_audit};
use crate::moderation::embeds::{failure_reply, usage_message};

pub const META: CommandMeta = CommandMeta {
    name: "warn",
    desc: "Issue a warning to a user.",
    category: "moderation",
    usage: "!warn <user> [reason]",
};

/// Warn a target user.
///
/// Warn has no enforcement call; it writes a Warning row and a Case row in
/// the same logical operation (not transactionally linked) and then
/// notifies and audits like any other verb.
pub async fn execute(
    ctx: &Context,
    inv: &Invocation,
    target_id: Id<UserMarker>,
    reason: Option<&str>,
) -> Result<ActionAck, ModerationError> {
    authorize_staff(ctx, inv)?;

    record_notify_audit(ctx, inv, ActionKind::Warn, target_id, reason, None, None).await
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
            let warning_id = ack.warning_id.unwrap_or_default();
            let confirmation = format!(
                "<@{target_id}> has been warned. Case `#{}`, Warning `#{warning_id}`.",
                ack.case_id
            );
            platform
                .send_channel_text(inv.channel_id, &confirmation)
                .await?;
        }
        Err(err) => {
            if matches!(err, ModerationError::Storage(_) | ModerationError::Other(_)) {
                error!(?err, "warn failed");
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
    use crate::testkit::{self, invocation, staff_invocation, target_user, test_context};
    use horizon_database::cases::recent_cases;
    use horizon_database::warnings::recent_warnings;

    #[tokio::test]
    async fn warn_writes_both_ledgers_and_audits() {
        let (ctx, platform) = test_context().await;
        let inv = staff_invocation();

        let ack = execute(&ctx, &inv, target_user(), Some("spam")).await.unwrap();
        let warning_id = ack.warning_id.expect("warn must create a warning row");

        let cases = recent_cases(&ctx.db, testkit::TARGET, 10).await.unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].action, ActionKind::Warn);

        let warnings = recent_warnings(&ctx.db, testkit::TARGET, 10).await.unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].id, warning_id);
        assert_eq!(warnings[0].reason.as_deref(), Some("spam"));

        // No enforcement call exists for warn.
        assert!(platform.enforcement_calls().is_empty());
        assert_eq!(platform.sent_dm_embeds().len(), 1);
        assert_eq!(platform.sent_channel_embeds().len(), 1);
    }

    #[tokio::test]
    async fn non_staff_warn_leaves_both_ledgers_empty() {
        let (ctx, platform) = test_context().await;
        let inv = invocation(testkit::MODERATOR, &[]);

        let err = execute(&ctx, &inv, target_user(), Some("spam"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModerationError::Forbidden));

        assert!(
            recent_cases(&ctx.db, testkit::TARGET, 10)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            recent_warnings(&ctx.db, testkit::TARGET, 10)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(platform.sent_channel_embeds().is_empty());
        assert!(platform.sent_dm_embeds().is_empty());
    }
}
