use std::env;
use std::sync::Arc;

use tracing::{error, info};
use twilight_cache_inmemory::{DefaultInMemoryCache, ResourceType};
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rustls::crypto::ring::default_provider;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use horizon_commands::handle_message;
use horizon_core::config::DEFAULT_DATABASE_PATH;
use horizon_core::{Config, Context};
use horizon_database::{Database, MIGRATOR};

use crate::platform::TwilightPlatform;

mod events;
mod platform;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN")?;
    let database_path =
        env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_owned());

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(token.clone()));

    let connect_options = SqliteConnectOptions::new()
        .filename(&database_path)
        .create_if_missing(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;
    MIGRATOR.run(&db_pool).await?;
    info!(database_path, "SQLite ledger ready.");

    // The authenticated identity feeds the audit pipeline's self-suppression.
    let current_user = http.current_user().await?.model().await?;
    let config = Config::from_env(current_user.id)?;

    let db = Database::new(db_pool);
    let platform = Arc::new(TwilightPlatform::new(Arc::clone(&http)));
    let ctx = Context::new(platform, db, config);

    // Message and member caches supply before-states for audit embeds.
    let cache = DefaultInMemoryCache::builder()
        .resource_types(
            ResourceType::MESSAGE
                | ResourceType::MEMBER
                | ResourceType::USER
                | ResourceType::CHANNEL,
        )
        .message_cache_size(512)
        .build();

    // Declare which intents the bot has
    let intents = Intents::GUILDS
        | Intents::GUILD_MESSAGES
        | Intents::GUILD_MEMBERS
        | Intents::MESSAGE_CONTENT;

    // A shard is one Gateway WebSocket connection to Discord
    let mut shard = Shard::new(ShardId::new(0, 1), token, intents);

    info!("Horizon is connecting...");

    // Our ears, listens for stuff to do
    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        // Translate before the cache applies the event, which would
        // overwrite the before-state.
        let server_event = events::translate_gateway_event(&cache, &event);
        cache.update(&event);

        if let Some(server_event) = server_event {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                if let Err(source) = horizon_audit::handle_event(&ctx, server_event).await {
                    error!(?source, "audit event handling failed");
                }
            });
        }

        match event {
            Event::Ready(_) => {
                info!("Horizon has successfully awoken!");
            }

            Event::MessageCreate(msg) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(source) = handle_message(ctx, msg).await {
                        error!(?source, "command handling failed");
                    }
                });
            }
            _ => {} // Ignore unused events
        }
    }
    Ok(()) // Return Success, shutdown cleanly
}
