use std::sync::Arc;

use twilight_model::id::{
    Id,
    marker::{ChannelMarker, GuildMarker, RoleMarker, UserMarker},
};

use horizon_database::Database;

/// Immutable startup configuration.
pub mod config;
/// Error taxonomy shared by every verb.
pub mod error;
/// The chat-platform collaborator seam.
pub mod platform;
/// Scripted platform double for downstream tests.
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use config::Config;
pub use error::ModerationError;
pub use platform::{DmDelivery, MessageRecord, Platform};

/// Shared application context passed into command and event handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub platform: Arc<dyn Platform>,
    pub db: Database,
    pub config: Arc<Config>,
}

impl Context {
    /// Create a new application context.
    pub fn new(platform: Arc<dyn Platform>, db: Database, config: Config) -> Self {
        Self {
            platform,
            db,
            config: Arc::new(config),
        }
    }
}

/// One resolved command invocation: who asked, from where, with what roles.
///
/// The gateway layer resolves the actor's role set before dispatch so the
/// authorization gate stays a pure predicate.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub guild_id: Id<GuildMarker>,
    pub channel_id: Id<ChannelMarker>,
    pub actor_id: Id<UserMarker>,
    pub actor_roles: Vec<Id<RoleMarker>>,
}
