use horizon_core::{Context, Invocation};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Check if the bot is alive.",
    category: "utility",
    usage: "!ping",
};

pub async fn run(ctx: Context, inv: Invocation) -> anyhow::Result<()> {
    ctx.platform.send_channel_text(inv.channel_id, "Pong.").await
}
