use tracing::error;

use horizon_core::{Context, Invocation, ModerationError};
use horizon_database::cases::{CaseRow, delete_case};

use crate::CommandMeta;
use crate::moderation::actions::authorize_staff;
use crate::moderation::embeds::{failure_reply, usage_message};

pub const META: CommandMeta = CommandMeta {
    name: "revoke",
    desc: "Revoke a specific moderation case.",
    category: "moderation",
    usage: "!revoke <case id>",
};

/// Remove one case from the ledger.
///
/// Revoke skips enforcement, notification, and audit: it authorizes,
/// deletes the row, and acknowledges. A missing id is a normal outcome.
pub async fn execute(
    ctx: &Context,
    inv: &Invocation,
    case_id: i64,
) -> Result<CaseRow, ModerationError> {
    authorize_staff(ctx, inv)?;

    delete_case(&ctx.db, case_id)
        .await?
        .ok_or(ModerationError::NotFound)
}

pub async fn run(ctx: Context, inv: Invocation, arg1: Option<&str>) -> anyhow::Result<()> {
    let platform = &ctx.platform;
    let Some(case_id) = arg1.and_then(|raw| raw.parse::<i64>().ok()) else {
        platform
            .send_channel_text(inv.channel_id, &usage_message(META.usage))
            .await?;
        return Ok(());
    };

    match execute(&ctx, &inv, case_id).await {
        Ok(removed) => {
            let confirmation = format!("Case #{} has been revoked.", removed.id);
            platform
                .send_channel_text(inv.channel_id, &confirmation)
                .await?;
        }
        Err(err) => {
            if matches!(err, ModerationError::Storage(_) | ModerationError::Other(_)) {
                error!(?err, case_id, "revoke failed");
            }
            platform
                .send_channel_text(inv.channel_id, &failure_reply(&err))
                .await?;
        }
    }

    Ok(())
}
