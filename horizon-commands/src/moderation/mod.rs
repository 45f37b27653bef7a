/// Shared authorize/record/notify/audit pipeline.
pub(crate) mod actions;
/// DM, audit, and reply text builders for moderation verbs.
pub(crate) mod embeds;
/// Composable purge filter clauses.
pub(crate) mod filter;

pub mod ban;
pub mod beta;
pub mod clearhistory;
pub mod history;
pub mod kick;
pub mod purge;
pub mod revoke;
pub mod roleassign;
pub mod timeout;
pub mod untimeout;
pub mod warn;
