use tracing::error;
use twilight_model::id::{Id, marker::UserMarker};

use horizon_audit::sink::emit_to_log;
use horizon_core::{Context, Invocation, ModerationError};
use horizon_utils::embed::{COLOR_GREEN, EmbedField, build_fielded_embed};
use horizon_utils::parse::parse_target_user_id;
use horizon_utils::permissions::is_owner;

use crate::CommandMeta;
use crate::moderation::embeds::{failure_reply, usage_message};

pub const META: CommandMeta = CommandMeta {
    name: "beta",
    desc: "Grant a user access to beta features.",
    category: "moderation",
    usage: "!beta <user>",
};

/// Grant the beta role to a user. Owner only.
pub async fn execute(
    ctx: &Context,
    inv: &Invocation,
    target_id: Id<UserMarker>,
) -> Result<(), ModerationError> {
    if !is_owner(inv.actor_id, ctx.config.owner_id) {
        return Err(ModerationError::Forbidden);
    }

    ctx.platform
        .add_role(
            inv.guild_id,
            target_id,
            ctx.config.beta_role_id,
            Some("Beta access granted"),
        )
        .await?;

    let embed = build_fielded_embed(
        "Beta Access Granted",
        COLOR_GREEN,
        None,
        &[
            EmbedField::new("User", format!("<@{target_id}>")),
            EmbedField::new("Granted By", format!("<@{}>", inv.actor_id)),
            EmbedField::new("Role", format!("<@&{}>", ctx.config.beta_role_id)),
        ],
    )?;
    if let Err(source) = emit_to_log(ctx, inv.guild_id, embed).await {
        error!(?source, "beta audit send failed");
    }

    Ok(())
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
        Ok(()) => {
            let confirmation = format!("<@{target_id}> now has beta access.");
            platform
                .send_channel_text(inv.channel_id, &confirmation)
                .await?;
        }
        Err(err) => {
            if matches!(err, ModerationError::Storage(_) | ModerationError::Other(_)) {
                error!(?err, "beta grant failed");
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
    use crate::testkit::{self, invocation, target_user, test_context};

    #[tokio::test]
    async fn owner_grants_the_beta_role() {
        let (ctx, platform) = test_context().await;
        let inv = invocation(testkit::OWNER, &[]);

        execute(&ctx, &inv, target_user()).await.unwrap();

        assert_eq!(
            platform.enforcement_calls(),
            vec![format!("add_role:1:6:{}", testkit::BETA_ROLE)]
        );
        let embeds = platform.sent_channel_embeds();
        assert_eq!(embeds.len(), 1);
        assert_eq!(embeds[0].0, Id::new(testkit::LOG_CHANNEL));
        assert_eq!(embeds[0].1.title.as_deref(), Some("Beta Access Granted"));
    }

    #[tokio::test]
    async fn non_owners_are_refused_even_with_the_staff_role() {
        let (ctx, platform) = test_context().await;
        let inv = invocation(testkit::MODERATOR, &[testkit::staff_role()]);

        let err = execute(&ctx, &inv, target_user()).await.unwrap_err();
        assert!(matches!(err, ModerationError::Forbidden));
        assert!(platform.enforcement_calls().is_empty());
        assert!(platform.sent_channel_embeds().is_empty());
    }
}
