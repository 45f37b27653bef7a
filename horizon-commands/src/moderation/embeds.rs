use twilight_model::channel::message::embed::Embed;
use twilight_model::id::{Id, marker::UserMarker};

use horizon_core::ModerationError;
use horizon_database::cases::{ActionKind, CaseRow};
use horizon_utils::embed::{
    COLOR_BLUE, COLOR_BLURPLE, COLOR_GOLD, COLOR_GREY, COLOR_ORANGE, COLOR_RED, EmbedField,
    build_fielded_embed, sanitize_text,
};

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{usage}`")
}

pub fn permission_denied_message() -> &'static str {
    "You are not permitted to use this command."
}

pub fn moderation_self_action_message(action: &str) -> String {
    format!("You can't {action} yourself.")
}

/// Map a verb failure to the short reply shown to the invoking actor.
pub fn failure_reply(err: &ModerationError) -> String {
    match err {
        ModerationError::Validation(message) => message.clone(),
        ModerationError::Forbidden => permission_denied_message().to_owned(),
        ModerationError::Enforcement(_) => {
            "I couldn't apply that action. Check role hierarchy and permissions.".to_owned()
        }
        ModerationError::NotFound => "Case not found.".to_owned(),
        ModerationError::Storage(_) | ModerationError::Other(_) => {
            "Something went wrong while completing the action.".to_owned()
        }
    }
}

fn action_color(kind: ActionKind) -> u32 {
    match kind {
        ActionKind::Timeout => COLOR_GREY,
        ActionKind::Untimeout => COLOR_BLUE,
        ActionKind::Ban => COLOR_RED,
        ActionKind::Kick => COLOR_ORANGE,
        ActionKind::Warn => COLOR_GOLD,
        ActionKind::Revoke => COLOR_BLURPLE,
    }
}

fn dm_title(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::Timeout => "You have been timed out",
        ActionKind::Untimeout => "Your timeout has been removed",
        ActionKind::Ban => "You have been banned",
        ActionKind::Kick => "You have been kicked",
        ActionKind::Warn => "You have received a warning",
        ActionKind::Revoke => "A case against you has been revoked",
    }
}

fn audit_title(kind: ActionKind, case_id: i64) -> String {
    let label = match kind {
        ActionKind::Timeout => "User Timed Out",
        ActionKind::Untimeout => "Timeout Removed",
        ActionKind::Ban => "User Banned",
        ActionKind::Kick => "User Kicked",
        ActionKind::Warn => "User Warned",
        ActionKind::Revoke => "Case Revoked",
    };
    format!("{label} | Case #{case_id}")
}

fn reason_or_default(reason: Option<&str>) -> String {
    sanitize_text(reason.unwrap_or("No reason provided"))
}

/// Embed delivered (best effort) to the target describing the action.
pub fn dm_action_embed(
    kind: ActionKind,
    reason: Option<&str>,
    duration_label: Option<&str>,
    case_id: i64,
    warning_id: Option<i64>,
) -> anyhow::Result<Embed> {
    let mut fields = Vec::new();
    if let Some(duration) = duration_label {
        fields.push(EmbedField::new("Duration", duration));
    }
    fields.push(EmbedField::new("Reason", reason_or_default(reason)));
    fields.push(EmbedField::new("Case ID", case_id.to_string()));
    if let Some(warning_id) = warning_id {
        fields.push(EmbedField::new("Warning ID", warning_id.to_string()));
    }

    build_fielded_embed(dm_title(kind), action_color(kind), None, &fields)
}

/// Embed mirrored to the log channel for a completed action.
pub fn action_audit_embed(
    kind: ActionKind,
    case_id: i64,
    target_id: Id<UserMarker>,
    moderator_id: Id<UserMarker>,
    reason: Option<&str>,
    duration_label: Option<&str>,
    warning_id: Option<i64>,
) -> anyhow::Result<Embed> {
    let mut fields = vec![
        EmbedField::new("User", format!("<@{target_id}>")),
        EmbedField::new("Moderator", format!("<@{moderator_id}>")),
    ];
    if let Some(duration) = duration_label {
        fields.push(EmbedField::new("Duration", duration));
    }
    fields.push(EmbedField::new("Reason", reason_or_default(reason)));
    if let Some(warning_id) = warning_id {
        fields.push(EmbedField::new("Warning ID", warning_id.to_string()));
    }

    build_fielded_embed(&audit_title(kind, case_id), action_color(kind), None, &fields)
}

/// Embed listing a user's recent cases, newest first.
pub fn history_embed(target_id: Id<UserMarker>, rows: &[CaseRow]) -> anyhow::Result<Embed> {
    let fields: Vec<EmbedField> = rows
        .iter()
        .map(|row| {
            EmbedField::new(
                format!("Case #{} | {}", row.id, row.action.as_str().to_uppercase()),
                format!(
                    "Moderator: <@{}>\nReason: {}\nTime: <t:{}:F>",
                    row.moderator_id,
                    reason_or_default(row.reason.as_deref()),
                    row.created_at
                ),
            )
        })
        .collect();

    build_fielded_embed(
        &format!("Moderation History for <@{target_id}>"),
        COLOR_BLURPLE,
        None,
        &fields,
    )
}
