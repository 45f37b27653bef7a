pub mod moderation;
pub mod utility;

use twilight_model::gateway::payload::incoming::MessageCreate;

use horizon_core::{Context, Invocation};
use horizon_utils::COMMAND_PREFIX;

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    moderation::timeout::META,
    moderation::untimeout::META,
    moderation::ban::META,
    moderation::kick::META,
    moderation::warn::META,
    moderation::history::META,
    moderation::revoke::META,
    moderation::clearhistory::META,
    moderation::purge::META,
    moderation::roleassign::META,
    moderation::beta::META,
    // Add new commands here
];

fn is_known_command(name: &str) -> bool {
    COMMANDS.iter().any(|meta| meta.name == name)
}

/// Parse and dispatch one inbound channel message.
pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let content_owned = msg.content.clone();
    let content = content_owned.trim();

    if !content.starts_with(COMMAND_PREFIX) {
        return Ok(());
    }

    let content = content.trim_start_matches(COMMAND_PREFIX).trim();
    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let cmd = command_and_rest.next().unwrap_or("").to_ascii_lowercase();
    let rest = command_and_rest
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if !is_known_command(&cmd) {
        return Ok(());
    }

    let Some(guild_id) = msg.guild_id else {
        ctx.platform
            .send_channel_text(msg.channel_id, "This command only works in servers.")
            .await?;
        return Ok(());
    };

    let (arg1, arg_tail): (Option<String>, Option<String>) = match rest {
        Some(value) => {
            let mut args = value.splitn(2, char::is_whitespace);
            let first = args
                .next()
                .filter(|arg| !arg.is_empty())
                .map(ToOwned::to_owned);
            let tail = args
                .next()
                .map(str::trim)
                .filter(|remaining| !remaining.is_empty())
                .map(ToOwned::to_owned);

            (first, tail)
        }
        None => (None, None),
    };

    let arg1 = arg1.as_deref();
    let arg_tail = arg_tail.as_deref();

    // Resolve the actor's role set up front so every gate below stays a
    // pure predicate over the invocation.
    let actor_roles = ctx
        .platform
        .member_role_ids(guild_id, msg.author.id)
        .await?;

    let inv = Invocation {
        guild_id,
        channel_id: msg.channel_id,
        actor_id: msg.author.id,
        actor_roles,
    };

    match cmd.as_str() {
        "ping" => utility::ping::run(ctx.clone(), inv).await?,

        "timeout" => moderation::timeout::run(ctx.clone(), inv, arg1, arg_tail).await?,
        "untimeout" => moderation::untimeout::run(ctx.clone(), inv, arg1, arg_tail).await?,
        "ban" => moderation::ban::run(ctx.clone(), inv, arg1, arg_tail).await?,
        "kick" => moderation::kick::run(ctx.clone(), inv, arg1, arg_tail).await?,
        "warn" => moderation::warn::run(ctx.clone(), inv, arg1, arg_tail).await?,
        "history" => moderation::history::run(ctx.clone(), inv, arg1).await?,
        "revoke" => moderation::revoke::run(ctx.clone(), inv, arg1).await?,
        "clearhistory" => moderation::clearhistory::run(ctx.clone(), inv, arg1).await?,
        "purge" => moderation::purge::run(ctx.clone(), inv, arg1, arg_tail).await?,
        "roleassign" => moderation::roleassign::run(ctx.clone(), inv, arg1, arg_tail).await?,
        "beta" => moderation::beta::run(ctx.clone(), inv, arg1).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}
