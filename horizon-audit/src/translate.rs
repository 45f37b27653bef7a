use twilight_model::id::{Id, marker::UserMarker};

use crate::record::{AuditRecord, ServerEvent};

/// Convert a raw server event into zero or more audit records.
///
/// Pure: suppression rules and role-change decomposition happen here, while
/// channel resolution and sending stay in the sink layer.
pub fn translate(event: &ServerEvent, bot_user_id: Id<UserMarker>) -> Vec<AuditRecord> {
    match event {
        ServerEvent::MessageDeleted { message, .. } => {
            // Bot-authored deletions are not mirrored; the one exception
            // (deleted log messages) is forwarded by the sink before
            // translation runs.
            if message.author_is_bot || message.author_id == bot_user_id {
                return Vec::new();
            }

            vec![AuditRecord::MessageDeleted {
                channel_id: message.channel_id,
                author_id: message.author_id,
                content: message.content.clone(),
                attachment_urls: message.attachment_urls.clone(),
            }]
        }

        ServerEvent::MessageEdited { before, after, .. } => {
            if before.author_is_bot || before.author_id == bot_user_id {
                return Vec::new();
            }

            // Embed-only updates (link previews resolving, etc.) surface as
            // edits with identical visible content; skip them.
            if before.content == after.content && before.attachment_urls == after.attachment_urls {
                return Vec::new();
            }

            vec![AuditRecord::MessageEdited {
                channel_id: after.channel_id,
                author_id: before.author_id,
                before_content: before.content.clone(),
                after_content: after.content.clone(),
                before_attachments: before.attachment_urls.clone(),
                after_attachments: after.attachment_urls.clone(),
            }]
        }

        ServerEvent::MemberJoined { user_id, .. } => {
            vec![AuditRecord::MemberJoined { user_id: *user_id }]
        }

        ServerEvent::MemberLeft { user_id, .. } => {
            vec![AuditRecord::MemberLeft { user_id: *user_id }]
        }

        ServerEvent::RolesUpdated {
            guild_id,
            user_id,
            before,
            after,
        } => {
            // The implicit everyone role shares the guild's id and is
            // never worth a record.
            let everyone = guild_id.cast();
            let mut records = Vec::new();

            for role_id in after {
                if *role_id != everyone && !before.contains(role_id) {
                    records.push(AuditRecord::RoleAssigned {
                        user_id: *user_id,
                        role_id: *role_id,
                    });
                }
            }

            for role_id in before {
                if *role_id != everyone && !after.contains(role_id) {
                    records.push(AuditRecord::RoleRemoved {
                        user_id: *user_id,
                        role_id: *role_id,
                    });
                }
            }

            records
        }

        ServerEvent::ChannelCreated {
            channel_id, name, ..
        } => vec![AuditRecord::ChannelCreated {
            channel_id: *channel_id,
            name: name.clone(),
        }],

        ServerEvent::ChannelDeleted { name, .. } => {
            vec![AuditRecord::ChannelDeleted { name: name.clone() }]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_core::MessageRecord;
    use twilight_model::id::Id;

    const BOT: u64 = 900;

    fn record(author_id: u64, content: &str, attachments: &[&str]) -> MessageRecord {
        MessageRecord {
            id: Id::new(50),
            channel_id: Id::new(60),
            author_id: Id::new(author_id),
            author_is_bot: false,
            content: content.to_owned(),
            attachment_urls: attachments.iter().map(|s| (*s).to_owned()).collect(),
            embeds: Vec::new(),
        }
    }

    #[test]
    fn noop_edit_produces_no_record() {
        let event = ServerEvent::MessageEdited {
            guild_id: Id::new(1),
            before: record(5, "same", &["a.png"]),
            after: record(5, "same", &["a.png"]),
        };

        assert!(translate(&event, Id::new(BOT)).is_empty());
    }

    #[test]
    fn content_edit_produces_one_record_with_both_versions() {
        let event = ServerEvent::MessageEdited {
            guild_id: Id::new(1),
            before: record(5, "old", &[]),
            after: record(5, "new", &[]),
        };

        let records = translate(&event, Id::new(BOT));
        assert_eq!(records.len(), 1);
        match &records[0] {
            AuditRecord::MessageEdited {
                before_content,
                after_content,
                ..
            } => {
                assert_eq!(before_content, "old");
                assert_eq!(after_content, "new");
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn attachment_only_edit_still_produces_a_record() {
        let event = ServerEvent::MessageEdited {
            guild_id: Id::new(1),
            before: record(5, "same", &["a.png"]),
            after: record(5, "same", &[]),
        };

        assert_eq!(translate(&event, Id::new(BOT)).len(), 1);
    }

    #[test]
    fn bot_authored_events_are_suppressed() {
        let mut deleted = record(BOT, "internal", &[]);
        deleted.author_is_bot = true;

        let event = ServerEvent::MessageDeleted {
            guild_id: Id::new(1),
            message: deleted,
        };
        assert!(translate(&event, Id::new(BOT)).is_empty());

        let event = ServerEvent::MessageEdited {
            guild_id: Id::new(1),
            before: record(BOT, "a", &[]),
            after: record(BOT, "b", &[]),
        };
        assert!(translate(&event, Id::new(BOT)).is_empty());
    }

    #[test]
    fn deletion_carries_content_and_attachments() {
        let event = ServerEvent::MessageDeleted {
            guild_id: Id::new(1),
            message: record(5, "gone", &["x.png", "y.png"]),
        };

        let records = translate(&event, Id::new(BOT));
        assert_eq!(
            records,
            vec![AuditRecord::MessageDeleted {
                channel_id: Id::new(60),
                author_id: Id::new(5),
                content: "gone".to_owned(),
                attachment_urls: vec!["x.png".to_owned(), "y.png".to_owned()],
            }]
        );
    }

    #[test]
    fn role_updates_decompose_per_role() {
        let event = ServerEvent::RolesUpdated {
            guild_id: Id::new(1),
            user_id: Id::new(5),
            before: vec![Id::new(10), Id::new(11)],
            after: vec![Id::new(11), Id::new(12)],
        };

        let records = translate(&event, Id::new(BOT));
        assert_eq!(
            records,
            vec![
                AuditRecord::RoleAssigned {
                    user_id: Id::new(5),
                    role_id: Id::new(12),
                },
                AuditRecord::RoleRemoved {
                    user_id: Id::new(5),
                    role_id: Id::new(10),
                },
            ]
        );
    }

    #[test]
    fn everyone_role_is_excluded_from_decomposition() {
        // The everyone role id equals the guild id.
        let event = ServerEvent::RolesUpdated {
            guild_id: Id::new(1),
            user_id: Id::new(5),
            before: vec![Id::new(1)],
            after: vec![Id::new(1), Id::new(12)],
        };

        let records = translate(&event, Id::new(BOT));
        assert_eq!(records.len(), 1);
        assert!(matches!(records[0], AuditRecord::RoleAssigned { role_id, .. } if role_id == Id::new(12)));
    }

    #[test]
    fn membership_and_channel_events_pass_through() {
        let join = ServerEvent::MemberJoined {
            guild_id: Id::new(1),
            user_id: Id::new(5),
        };
        assert_eq!(translate(&join, Id::new(BOT)).len(), 1);

        let gone = ServerEvent::ChannelDeleted {
            guild_id: Id::new(1),
            name: "general".to_owned(),
        };
        assert_eq!(
            translate(&gone, Id::new(BOT)),
            vec![AuditRecord::ChannelDeleted {
                name: "general".to_owned()
            }]
        );
    }
}
