use twilight_model::id::{
    Id,
    marker::{MessageMarker, RoleMarker, UserMarker},
};

/// Parse a target user from a raw argument (`<@id>`, `<@!id>`, or raw ID).
pub fn parse_target_user_id(raw: &str) -> Option<Id<UserMarker>> {
    let trimmed = raw.trim();

    let numeric = if trimmed.starts_with("<@") && trimmed.ends_with('>') {
        let without_wrappers = trimmed.strip_prefix("<@")?.strip_suffix('>')?;
        without_wrappers
            .strip_prefix('!')
            .unwrap_or(without_wrappers)
    } else {
        trimmed
    };

    let id = numeric.parse::<u64>().ok().filter(|id| *id != 0)?;

    Some(Id::new(id))
}

/// Parse a target role from a raw argument (`<@&id>` or raw ID).
pub fn parse_target_role_id(raw: &str) -> Option<Id<RoleMarker>> {
    let trimmed = raw.trim();

    let numeric = if trimmed.starts_with("<@&") && trimmed.ends_with('>') {
        trimmed.strip_prefix("<@&")?.strip_suffix('>')?
    } else {
        trimmed
    };

    let id = numeric.parse::<u64>().ok().filter(|id| *id != 0)?;

    Some(Id::new(id))
}

/// Parse a message reference from a raw argument (message link or raw ID).
///
/// Message links end in `/<channel_id>/<message_id>`; only the trailing
/// segment is significant here.
pub fn parse_message_reference(raw: &str) -> Option<Id<MessageMarker>> {
    let trimmed = raw.trim();
    let last_segment = trimmed.rsplit('/').next()?;
    let id = last_segment.parse::<u64>().ok().filter(|id| *id != 0)?;

    Some(Id::new(id))
}

/// Parse a compact duration token like `30s`, `10m`, `2h`, `1d`, or `1w`.
///
/// The token must be exactly one positive integer followed by one unit
/// character. Anything else, including composite tokens (`1d2h`), bare
/// numbers, and tokens with whitespace, is rejected rather than defaulted.
pub fn parse_duration_secs(raw: &str) -> Option<u64> {
    if raw.is_empty() {
        return None;
    }

    let mut chars = raw.chars();
    let unit = chars.next_back()?;
    let digits = chars.as_str();

    let multiplier = match unit.to_ascii_lowercase() {
        's' => 1_u64,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 60 * 60 * 24,
        'w' => 60 * 60 * 24 * 7,
        _ => return None,
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let magnitude = digits.parse::<u64>().ok()?;
    if magnitude == 0 {
        return None;
    }

    magnitude.checked_mul(multiplier)
}
