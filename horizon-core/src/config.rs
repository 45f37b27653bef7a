use std::env;

use twilight_model::id::{
    Id,
    marker::{RoleMarker, UserMarker},
};

/// Immutable configuration constructed once at startup.
///
/// Nothing here changes after the gateway loop starts; components receive
/// it explicitly instead of reading ambient state.
#[derive(Clone, Debug)]
pub struct Config {
    /// Role whose holders may invoke privileged verbs.
    pub staff_role_id: Id<RoleMarker>,
    /// Distinguished identity for the beta grant and deleted-log forwarding.
    pub owner_id: Id<UserMarker>,
    /// Role granted by the owner-only beta verb.
    pub beta_role_id: Id<RoleMarker>,
    /// Name of the per-guild audit log channel.
    pub log_channel_name: String,
    /// The authenticated bot user, filled in after login.
    pub bot_user_id: Id<UserMarker>,
    /// Whether clear-history also removes warning rows. Off by default:
    /// the observed behavior leaves warnings untouched.
    pub clear_history_includes_warnings: bool,
}

pub const DEFAULT_LOG_CHANNEL_NAME: &str = "horizon-logs";
pub const DEFAULT_DATABASE_PATH: &str = "horizon.db";

fn required_id_var(name: &str) -> anyhow::Result<u64> {
    let raw = env::var(name).map_err(|_| anyhow::anyhow!("{name} must be set"))?;
    raw.parse::<u64>()
        .map_err(|_| anyhow::anyhow!("{name} must be a numeric id, got {raw:?}"))
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `bot_user_id` comes from the authenticated session rather than the
    /// environment, so the caller supplies it.
    pub fn from_env(bot_user_id: Id<UserMarker>) -> anyhow::Result<Self> {
        let staff_role_id = Id::new(required_id_var("STAFF_ROLE_ID")?);
        let owner_id = Id::new(required_id_var("OWNER_ID")?);
        let beta_role_id = Id::new(required_id_var("BETA_ROLE_ID")?);

        let log_channel_name =
            env::var("LOG_CHANNEL_NAME").unwrap_or_else(|_| DEFAULT_LOG_CHANNEL_NAME.to_owned());

        let clear_history_includes_warnings = env::var("CLEAR_HISTORY_INCLUDES_WARNINGS")
            .map(|raw| matches!(raw.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            staff_role_id,
            owner_id,
            beta_role_id,
            log_channel_name,
            bot_user_id,
            clear_history_includes_warnings,
        })
    }
}
