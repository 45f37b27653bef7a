use tracing::error;
use twilight_model::id::{Id, marker::UserMarker};

use horizon_audit::sink::emit_to_log;
use horizon_core::{Context, Invocation, ModerationError};
use horizon_database::cases::{ActionKind, create_case};
use horizon_database::warnings::create_warning;
use horizon_utils::permissions::has_staff_role;

use crate::moderation::embeds::{action_audit_embed, dm_action_embed};

/// Confirmation handed back to the invoking actor.
#[derive(Clone, Copy, Debug)]
pub struct ActionAck {
    pub case_id: i64,
    pub warning_id: Option<i64>,
}

/// Gate a privileged verb on the staff role.
pub(crate) fn authorize_staff(ctx: &Context, inv: &Invocation) -> Result<(), ModerationError> {
    if has_staff_role(&inv.actor_roles, ctx.config.staff_role_id) {
        Ok(())
    } else {
        Err(ModerationError::Forbidden)
    }
}

/// Steps 4 to 6 of a moderation verb: record, notify, audit.
///
/// Runs after enforcement has already landed, so a storage failure here
/// leaves a real but unrecorded action; that ordering is inherited behavior
/// and deliberately not compensated for.
pub(crate) async fn record_notify_audit(
    ctx: &Context,
    inv: &Invocation,
    kind: ActionKind,
    target_id: Id<UserMarker>,
    reason: Option<&str>,
    stored_reason: Option<&str>,
    duration_label: Option<&str>,
) -> Result<ActionAck, ModerationError> {
    let warning_id = if kind == ActionKind::Warn {
        Some(create_warning(&ctx.db, target_id.get(), inv.actor_id.get(), reason).await?)
    } else {
        None
    };

    let case_id = create_case(
        &ctx.db,
        target_id.get(),
        inv.actor_id.get(),
        kind,
        stored_reason.or(reason),
    )
    .await?;

    // Best-effort notification; the delivery result is discarded on purpose
    // (closed DMs are a normal state, not a fault).
    if let Ok(embed) = dm_action_embed(kind, reason, duration_label, case_id, warning_id) {
        let _ = ctx.platform.send_direct_embed(target_id, embed).await;
    }

    // Audit mirror; channel-absent or refused sends never fail the verb.
    match action_audit_embed(
        kind,
        case_id,
        target_id,
        inv.actor_id,
        reason,
        duration_label,
        warning_id,
    ) {
        Ok(embed) => {
            if let Err(source) = emit_to_log(ctx, inv.guild_id, embed).await {
                error!(?source, case_id, "audit log send failed");
            }
        }
        Err(source) => error!(?source, case_id, "audit embed build failed"),
    }

    Ok(ActionAck {
        case_id,
        warning_id,
    })
}
