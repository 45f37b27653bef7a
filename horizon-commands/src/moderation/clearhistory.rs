use tracing::error;
use twilight_model::id::{Id, marker::UserMarker};

use horizon_core::{Context, Invocation, ModerationError};
use horizon_database::cases::delete_all_cases;
use horizon_database::warnings::delete_all_warnings;
use horizon_utils::parse::parse_target_user_id;

use crate::CommandMeta;
use crate::moderation::actions::authorize_staff;
use crate::moderation::embeds::{failure_reply, usage_message};

pub const META: CommandMeta = CommandMeta {
    name: "clearhistory",
    desc: "Clear all moderation history for a user.",
    category: "moderation",
    usage: "!clearhistory <user>",
};

/// Delete every case row for a user, returning how many were removed.
///
/// Warning rows are left alone unless the deployment opted in via
/// configuration; by default they outlive the case ledger.
pub async fn execute(
    ctx: &Context,
    inv: &Invocation,
    target_id: Id<UserMarker>,
) -> Result<u64, ModerationError> {
    authorize_staff(ctx, inv)?;

    let removed = delete_all_cases(&ctx.db, target_id.get()).await?;

    if ctx.config.clear_history_includes_warnings {
        delete_all_warnings(&ctx.db, target_id.get()).await?;
    }

    Ok(removed)
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
        Ok(_removed) => {
            let confirmation =
                format!("All moderation history for <@{target_id}> has been cleared.");
            platform
                .send_channel_text(inv.channel_id, &confirmation)
                .await?;
        }
        Err(err) => {
            if matches!(err, ModerationError::Storage(_) | ModerationError::Other(_)) {
                error!(?err, "clearhistory failed");
            }
            platform
                .send_channel_text(inv.channel_id, &failure_reply(&err))
                .await?;
        }
    }

    Ok(())
}
