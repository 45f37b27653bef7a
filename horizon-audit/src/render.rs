use twilight_model::channel::message::embed::Embed;

use horizon_utils::embed::{
    COLOR_DARK_RED, COLOR_GREEN, COLOR_ORANGE, COLOR_RED, EmbedField, build_fielded_embed,
    sanitize_text,
};

use crate::record::AuditRecord;

fn text_or_placeholder(text: &str) -> String {
    if text.is_empty() {
        "No text".to_owned()
    } else {
        sanitize_text(text)
    }
}

fn attachment_list(urls: &[String]) -> String {
    urls.join("\n")
}

/// Render an audit record as a log-channel embed.
pub fn record_embed(record: &AuditRecord) -> anyhow::Result<Embed> {
    match record {
        AuditRecord::MessageDeleted {
            channel_id,
            author_id,
            content,
            attachment_urls,
        } => {
            let mut fields = vec![
                EmbedField::new("Channel", format!("<#{channel_id}>")),
                EmbedField::new("Content", text_or_placeholder(content)),
            ];
            if !attachment_urls.is_empty() {
                fields.push(EmbedField::new("Attachments", attachment_list(attachment_urls)));
            }

            build_fielded_embed(
                "Message Deleted",
                COLOR_RED,
                Some(&format!("Message by <@{author_id}> was deleted")),
                &fields,
            )
        }

        AuditRecord::MessageEdited {
            channel_id,
            author_id,
            before_content,
            after_content,
            before_attachments,
            after_attachments,
        } => {
            let mut fields = vec![
                EmbedField::new("Channel", format!("<#{channel_id}>")),
                EmbedField::new("Before", text_or_placeholder(before_content)),
                EmbedField::new("After", text_or_placeholder(after_content)),
            ];
            if !before_attachments.is_empty() {
                fields.push(EmbedField::new(
                    "Old Attachments",
                    attachment_list(before_attachments),
                ));
            }
            if !after_attachments.is_empty() {
                fields.push(EmbedField::new(
                    "New Attachments",
                    attachment_list(after_attachments),
                ));
            }

            build_fielded_embed(
                "Message Edited",
                COLOR_ORANGE,
                Some(&format!("<@{author_id}> edited a message")),
                &fields,
            )
        }

        AuditRecord::MemberJoined { user_id } => build_fielded_embed(
            "Member Joined",
            COLOR_GREEN,
            Some(&format!("<@{user_id}> joined the server")),
            &[],
        ),

        AuditRecord::MemberLeft { user_id } => build_fielded_embed(
            "Member Left",
            COLOR_DARK_RED,
            Some(&format!("<@{user_id}> left the server")),
            &[],
        ),

        AuditRecord::RoleAssigned { user_id, role_id } => build_fielded_embed(
            "Role Assigned",
            COLOR_GREEN,
            None,
            &[
                EmbedField::new("User", format!("<@{user_id}>")),
                EmbedField::new("Role", format!("<@&{role_id}>")),
            ],
        ),

        AuditRecord::RoleRemoved { user_id, role_id } => build_fielded_embed(
            "Role Removed",
            COLOR_RED,
            None,
            &[
                EmbedField::new("User", format!("<@{user_id}>")),
                EmbedField::new("Role", format!("<@&{role_id}>")),
            ],
        ),

        AuditRecord::ChannelCreated { channel_id, .. } => build_fielded_embed(
            "Channel Created",
            COLOR_GREEN,
            Some(&format!("<#{channel_id}> was created")),
            &[],
        ),

        AuditRecord::ChannelDeleted { name } => build_fielded_embed(
            "Channel Deleted",
            COLOR_DARK_RED,
            Some(&format!("{} was deleted", sanitize_text(name))),
            &[],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twilight_model::id::Id;

    #[test]
    fn deleted_message_embed_carries_channel_and_content() {
        let record = AuditRecord::MessageDeleted {
            channel_id: Id::new(60),
            author_id: Id::new(5),
            content: String::new(),
            attachment_urls: vec!["https://cdn.example/x.png".to_owned()],
        };

        let embed = record_embed(&record).unwrap();
        assert_eq!(embed.title.as_deref(), Some("Message Deleted"));
        assert_eq!(embed.fields[1].value, "No text");
        assert_eq!(embed.fields[2].name, "Attachments");
        assert!(embed.timestamp.is_some());
    }

    #[test]
    fn edit_embed_shows_before_and_after() {
        let record = AuditRecord::MessageEdited {
            channel_id: Id::new(60),
            author_id: Id::new(5),
            before_content: "old".to_owned(),
            after_content: "new".to_owned(),
            before_attachments: Vec::new(),
            after_attachments: Vec::new(),
        };

        let embed = record_embed(&record).unwrap();
        assert_eq!(embed.fields[1].name, "Before");
        assert_eq!(embed.fields[1].value, "old");
        assert_eq!(embed.fields[2].value, "new");
    }
}
