use tracing::error;
use twilight_model::id::{Id, marker::UserMarker};

use horizon_core::{Context, Invocation, ModerationError};
use horizon_database::cases::{CaseRow, recent_cases};
use horizon_utils::parse::parse_target_user_id;

use crate::CommandMeta;
use crate::moderation::actions::authorize_staff;
use crate::moderation::embeds::{failure_reply, history_embed, usage_message};

pub const META: CommandMeta = CommandMeta {
    name: "history",
    desc: "View a user's moderation history.",
    category: "moderation",
    usage: "!history <user>",
};

const HISTORY_LIMIT: u32 = 10;

/// Fetch the bounded, newest-first history projection for a user.
pub async fn execute(
    ctx: &Context,
    inv: &Invocation,
    target_id: Id<UserMarker>,
) -> Result<Vec<CaseRow>, ModerationError> {
    authorize_staff(ctx, inv)?;

    Ok(recent_cases(&ctx.db, target_id.get(), HISTORY_LIMIT).await?)
}

pub async fn run(ctx: Context, inv: Invocation, arg1: Option<&str>) -> anyhow::Result<()> {
    let platform = &ctx.platform;
    let Some(target_id) = arg1.and_then(parse_target_user_id) else {
        platform
            .send_channel_text(inv.channel_id, &usage_message(META.usage))
            .await?;
        return Ok(());
    };

    match execute(&ctx, &inv, target_id).await {
        Ok(rows) if rows.is_empty() => {
            let notice = format!("No moderation history found for <@{target_id}>.");
            platform.send_channel_text(inv.channel_id, &notice).await?;
        }
        Ok(rows) => {
            let embed = history_embed(target_id, &rows)?;
            platform.send_channel_embed(inv.channel_id, embed).await?;
        }
        Err(err) => {
            if matches!(err, ModerationError::Storage(_) | ModerationError::Other(_)) {
                error!(?err, "history lookup failed");
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
    use horizon_database::cases::{ActionKind, create_case};

    #[tokio::test]
    async fn history_is_bounded_and_newest_first() {
        let (ctx, _platform) = test_context().await;
        let inv = staff_invocation();

        for _ in 0..12 {
            create_case(&ctx.db, testkit::TARGET, testkit::MODERATOR, ActionKind::Warn, None)
                .await
                .unwrap();
        }

        let rows = execute(&ctx, &inv, target_user()).await.unwrap();
        assert_eq!(rows.len(), 10);
        for pair in rows.windows(2) {
            assert!(pair[0].id > pair[1].id);
        }
    }
}
