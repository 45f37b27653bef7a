use tracing::error;
use twilight_model::id::{
    Id,
    marker::{RoleMarker, UserMarker},
};

use horizon_audit::sink::emit_to_log;
use horizon_core::{Context, Invocation, ModerationError};
use horizon_utils::embed::{COLOR_BLURPLE, EmbedField, build_fielded_embed};
use horizon_utils::parse::{parse_target_role_id, parse_target_user_id};

use crate::CommandMeta;
use crate::moderation::actions::authorize_staff;
use crate::moderation::embeds::{failure_reply, usage_message};

pub const META: CommandMeta = CommandMeta {
    name: "roleassign",
    desc: "Assign or remove a role from a user.",
    category: "moderation",
    usage: "!roleassign <user> <role>",
};

/// Which direction the toggle went.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RoleToggle {
    Assigned,
    Removed,
}

impl RoleToggle {
    fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Removed => "removed",
        }
    }
}

/// Toggle a role on a member and mirror the change to the log channel.
pub async fn execute(
    ctx: &Context,
    inv: &Invocation,
    target_id: Id<UserMarker>,
    role_id: Id<RoleMarker>,
) -> Result<RoleToggle, ModerationError> {
    authorize_staff(ctx, inv)?;

    let current_roles = ctx
        .platform
        .member_role_ids(inv.guild_id, target_id)
        .await?;

    let toggle = if current_roles.contains(&role_id) {
        ctx.platform
            .remove_role(inv.guild_id, target_id, role_id, Some("Removed by moderator"))
            .await?;
        RoleToggle::Removed
    } else {
        ctx.platform
            .add_role(inv.guild_id, target_id, role_id, Some("Assigned by moderator"))
            .await?;
        RoleToggle::Assigned
    };

    let embed = build_fielded_embed(
        "Role Updated",
        COLOR_BLURPLE,
        None,
        &[
            EmbedField::new("User", format!("<@{target_id}>")),
            EmbedField::new("Role", format!("<@&{role_id}>")),
            EmbedField::new("Action", toggle.as_str()),
            EmbedField::new("Moderator", format!("<@{}>", inv.actor_id)),
        ],
    )?;
    if let Err(source) = emit_to_log(ctx, inv.guild_id, embed).await {
        error!(?source, "roleassign audit send failed");
    }

    Ok(toggle)
}

pub async fn run(
    ctx: Context,
    inv: Invocation,
    arg1: Option<&str>,
    arg_tail: Option<&str>,
) -> anyhow::Result<()> {
    let platform = &ctx.platform;
    let target_id = arg1.and_then(parse_target_user_id);
    let role_id = arg_tail
        .and_then(|tail| tail.split_whitespace().next())
        .and_then(parse_target_role_id);

    let (Some(target_id), Some(role_id)) = (target_id, role_id) else {
        platform
            .send_channel_text(inv.channel_id, &usage_message(META.usage))
            .await?;
        return Ok(());
    };

    match execute(&ctx, &inv, target_id, role_id).await {
        Ok(toggle) => {
            let confirmation = format!(
                "Role <@&{role_id}> has been {} for <@{target_id}>.",
                toggle.as_str()
            );
            platform
                .send_channel_text(inv.channel_id, &confirmation)
                .await?;
        }
        Err(err) => {
            if matches!(err, ModerationError::Storage(_) | ModerationError::Other(_)) {
                error!(?err, "roleassign failed");
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

    #[tokio::test]
    async fn toggle_assigns_when_the_member_lacks_the_role() {
        let (ctx, platform) = test_context().await;
        let inv = staff_invocation();

        let toggle = execute(&ctx, &inv, target_user(), Id::new(30)).await.unwrap();
        assert_eq!(toggle, RoleToggle::Assigned);
        assert_eq!(
            platform.enforcement_calls(),
            vec!["add_role:1:6:30".to_owned()]
        );
    }

    #[tokio::test]
    async fn toggle_removes_when_the_member_holds_the_role() {
        let (ctx, platform) = test_context().await;
        platform.grant_roles(Id::new(testkit::GUILD), target_user(), &[Id::new(30)]);
        let inv = staff_invocation();

        let toggle = execute(&ctx, &inv, target_user(), Id::new(30)).await.unwrap();
        assert_eq!(toggle, RoleToggle::Removed);
        assert_eq!(
            platform.enforcement_calls(),
            vec!["remove_role:1:6:30".to_owned()]
        );
    }
}
