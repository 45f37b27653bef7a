use twilight_model::channel::message::embed::Embed;
use twilight_model::util::Timestamp;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder};

use crate::time::now_unix_secs;

/// Embed palette used across the bot UI.
pub const COLOR_RED: u32 = 0xED_42_45;
pub const COLOR_DARK_RED: u32 = 0x99_23_1D;
pub const COLOR_ORANGE: u32 = 0xE6_7E_22;
pub const COLOR_GREEN: u32 = 0x57_F2_87;
pub const COLOR_GOLD: u32 = 0xF1_C4_0F;
pub const COLOR_BLUE: u32 = 0x34_98_DB;
pub const COLOR_BLURPLE: u32 = 0x58_65_F2;
pub const COLOR_GREY: u32 = 0x60_66_6B;

/// One name/value pair destined for an embed field.
///
/// Collected as owned strings so callers can build field lists
/// conditionally before rendering.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Build a titled embed from a color, optional description, and field list.
pub fn build_fielded_embed(
    title: &str,
    color: u32,
    description: Option<&str>,
    fields: &[EmbedField],
) -> anyhow::Result<Embed> {
    build_fielded_embed_with_footer(title, color, description, fields, None)
}

/// Build a titled embed with an optional footer line.
pub fn build_fielded_embed_with_footer(
    title: &str,
    color: u32,
    description: Option<&str>,
    fields: &[EmbedField],
    footer: Option<&str>,
) -> anyhow::Result<Embed> {
    let mut builder = EmbedBuilder::new().title(title).color(color);

    // Every embed carries its build time.
    if let Ok(stamp) = Timestamp::from_secs(now_unix_secs() as i64) {
        builder = builder.timestamp(stamp);
    }

    if let Some(description) = description {
        builder = builder.description(description);
    }

    for field in fields {
        builder = builder
            .field(EmbedFieldBuilder::new(field.name.as_str(), field.value.as_str()).build());
    }

    if let Some(footer) = footer.filter(|value| !value.is_empty()) {
        builder = builder.footer(EmbedFooterBuilder::new(footer).build());
    }

    Ok(builder.validate()?.build())
}

/// Neutralize mentions inside user-supplied text before echoing it back.
pub fn sanitize_text(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_render_in_order() {
        let fields = [
            EmbedField::new("User", "<@1>"),
            EmbedField::new("Reason", "spam"),
        ];
        let embed = build_fielded_embed("User Warned", COLOR_GOLD, None, &fields).unwrap();

        assert_eq!(embed.title.as_deref(), Some("User Warned"));
        assert_eq!(embed.fields.len(), 2);
        assert_eq!(embed.fields[0].name, "User");
        assert_eq!(embed.fields[1].value, "spam");
    }

    #[test]
    fn embeds_are_stamped_with_the_build_time() {
        let embed = build_fielded_embed("Ping", COLOR_BLUE, None, &[]).unwrap();
        assert!(embed.timestamp.is_some());
    }

    #[test]
    fn sanitize_breaks_mentions() {
        assert_eq!(sanitize_text("hi @everyone"), "hi @\u{200B}everyone");
    }
}
