use tracing::error;
use twilight_model::id::{Id, marker::UserMarker};

use horizon_audit::sink::emit_to_log;
use horizon_core::platform::BULK_DELETE_CEILING;
use horizon_core::{Context, Invocation, ModerationError};
use horizon_utils::embed::{COLOR_DARK_RED, EmbedField, build_fielded_embed, sanitize_text};
use horizon_utils::parse::{parse_message_reference, parse_target_user_id};

use crate::CommandMeta;
use crate::moderation::actions::authorize_staff;
use crate::moderation::embeds::{failure_reply, usage_message};
use crate::moderation::filter::PurgeFilter;

pub const META: CommandMeta = CommandMeta {
    name: "purge",
    desc: "Delete messages in this channel matching optional filters.",
    category: "moderation",
    usage: "!purge <amount> [user:<user>] [contains:<text>] [bots] [images] [after:<message link>]",
};

pub const MIN_AMOUNT: u32 = 1;
pub const MAX_AMOUNT: u32 = 5_000;

/// One bulk-purge request. All present filters must hold for a message to
/// be eligible.
#[derive(Clone, Debug, Default)]
pub struct PurgeRequest {
    pub amount: u32,
    pub author: Option<Id<UserMarker>>,
    pub contains: Option<String>,
    pub bots_only: bool,
    pub attachments_only: bool,
    /// Raw message link or id; only messages strictly after it are eligible.
    pub after: Option<String>,
}

/// Run the batched purge loop and emit one audit summary.
///
/// Stops when the requested count is reached or a batch deletes nothing,
/// whichever comes first. Deleting zero messages is a success.
pub async fn execute(
    ctx: &Context,
    inv: &Invocation,
    request: &PurgeRequest,
) -> Result<u64, ModerationError> {
    authorize_staff(ctx, inv)?;

    if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&request.amount) {
        return Err(ModerationError::Validation(format!(
            "Amount must be between {MIN_AMOUNT} and {MAX_AMOUNT}."
        )));
    }

    // Resolve the anchor before touching anything; a dangling reference
    // aborts with zero deletions.
    let anchor_id = match request.after.as_deref() {
        Some(raw) => {
            let reference = parse_message_reference(raw)
                .ok_or_else(|| ModerationError::Validation("Invalid message link.".to_owned()))?;
            let anchor = ctx
                .platform
                .fetch_message(inv.channel_id, reference)
                .await?
                .ok_or_else(|| ModerationError::Validation("Invalid message link.".to_owned()))?;
            Some(anchor.id)
        }
        None => None,
    };

    let mut filter = PurgeFilter::new();
    if let Some(author_id) = request.author {
        filter = filter.author(author_id);
    }
    if let Some(needle) = request.contains.as_deref() {
        filter = filter.contains(needle);
    }
    if request.bots_only {
        filter = filter.bots_only();
    }
    if request.attachments_only {
        filter = filter.attachments_only();
    }
    if let Some(anchor_id) = anchor_id {
        filter = filter.after(anchor_id);
    }

    let predicate = |record: &horizon_core::MessageRecord| filter.matches(record);

    let mut deleted_total = 0_u64;
    let mut remaining = u64::from(request.amount);

    while remaining > 0 {
        let batch = remaining.min(u64::from(BULK_DELETE_CEILING)) as u16;
        let deleted = ctx
            .platform
            .delete_matching(inv.channel_id, batch, &predicate)
            .await?;

        if deleted == 0 {
            break;
        }

        deleted_total = deleted_total.saturating_add(deleted);
        remaining = remaining.saturating_sub(deleted);
    }

    match summary_embed(inv, request, deleted_total) {
        Ok(embed) => {
            if let Err(source) = emit_to_log(ctx, inv.guild_id, embed).await {
                error!(?source, "purge audit send failed");
            }
        }
        Err(source) => error!(?source, "purge summary embed build failed"),
    }

    Ok(deleted_total)
}

/// Audit summary naming only the filters that were active.
fn summary_embed(
    inv: &Invocation,
    request: &PurgeRequest,
    deleted_total: u64,
) -> anyhow::Result<twilight_model::channel::message::embed::Embed> {
    let mut fields = vec![
        EmbedField::new("Moderator", format!("<@{}>", inv.actor_id)),
        EmbedField::new("Channel", format!("<#{}>", inv.channel_id)),
        EmbedField::new("Amount", deleted_total.to_string()),
    ];

    if let Some(author_id) = request.author {
        fields.push(EmbedField::new("Filtered User", format!("<@{author_id}>")));
    }
    if let Some(needle) = request.contains.as_deref() {
        fields.push(EmbedField::new("Contains", sanitize_text(needle)));
    }
    if request.bots_only {
        fields.push(EmbedField::new("Bots Only", "True"));
    }
    if request.attachments_only {
        fields.push(EmbedField::new("Images Only", "True"));
    }
    if let Some(after) = request.after.as_deref() {
        fields.push(EmbedField::new("After Message", sanitize_text(after)));
    }

    build_fielded_embed("Messages Purged", COLOR_DARK_RED, None, &fields)
}

fn parse_request(arg1: Option<&str>, arg_tail: Option<&str>) -> Option<PurgeRequest> {
    let amount = arg1?.parse::<u32>().ok()?;

    let mut request = PurgeRequest {
        amount,
        ..PurgeRequest::default()
    };

    if let Some(tail) = arg_tail {
        for token in tail.split_whitespace() {
            if let Some(raw_user) = token.strip_prefix("user:") {
                request.author = Some(parse_target_user_id(raw_user)?);
            } else if let Some(needle) = token.strip_prefix("contains:") {
                request.contains = Some(needle.to_owned());
            } else if let Some(raw_after) = token.strip_prefix("after:") {
                request.after = Some(raw_after.to_owned());
            } else if token.eq_ignore_ascii_case("bots") {
                request.bots_only = true;
            } else if token.eq_ignore_ascii_case("images") {
                request.attachments_only = true;
            } else {
                return None;
            }
        }
    }

    Some(request)
}

pub async fn run(
    ctx: Context,
    inv: Invocation,
    arg1: Option<&str>,
    arg_tail: Option<&str>,
) -> anyhow::Result<()> {
    let platform = &ctx.platform;
    let Some(request) = parse_request(arg1, arg_tail) else {
        platform
            .send_channel_text(inv.channel_id, &usage_message(META.usage))
            .await?;
        return Ok(());
    };

    match execute(&ctx, &inv, &request).await {
        Ok(deleted_total) => {
            let confirmation = format!("Purged {deleted_total} messages.");
            platform
                .send_channel_text(inv.channel_id, &confirmation)
                .await?;
        }
        Err(err) => {
            if matches!(err, ModerationError::Storage(_) | ModerationError::Other(_)) {
                error!(?err, "purge failed");
            }
            platform
                .send_channel_text(inv.channel_id, &failure_reply(&err))
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{self, invocation, staff_invocation, test_context};
    use horizon_core::testing::message;

    const DESIGNATED_AUTHOR: u64 = 500;

    /// 250 messages, ids 1..=250, every 3rd from the designated author.
    fn seed_synthetic_channel(platform: &horizon_core::testing::FakePlatform) {
        let channel = Id::new(testkit::CHANNEL);
        let records = (1..=250_u64).map(|n| {
            let author = if n % 3 == 0 { DESIGNATED_AUTHOR } else { 7 };
            message(n, channel, author, &format!("message {n}"))
        });
        platform.seed_messages(records);
    }

    #[tokio::test]
    async fn author_filtered_purge_stops_on_exhaustion_not_the_cap() {
        let (ctx, platform) = test_context().await;
        seed_synthetic_channel(&platform);
        let inv = staff_invocation();

        let request = PurgeRequest {
            amount: 300,
            author: Some(Id::new(DESIGNATED_AUTHOR)),
            ..PurgeRequest::default()
        };

        let deleted = execute(&ctx, &inv, &request).await.unwrap();
        assert_eq!(deleted, 83, "every 3rd of 250 messages");

        // All remaining messages belong to other authors.
        assert!(
            platform
                .remaining_messages()
                .iter()
                .all(|record| record.author_id != Id::new(DESIGNATED_AUTHOR))
        );
        assert_eq!(platform.remaining_messages().len(), 167);
    }

    #[tokio::test]
    async fn small_unfiltered_purge_uses_exactly_one_batch() {
        let (ctx, platform) = test_context().await;
        seed_synthetic_channel(&platform);
        let inv = staff_invocation();

        let request = PurgeRequest {
            amount: 10,
            ..PurgeRequest::default()
        };

        let deleted = execute(&ctx, &inv, &request).await.unwrap();
        assert_eq!(deleted, 10);
        assert_eq!(platform.delete_batch_calls(), 1);
        assert_eq!(platform.remaining_messages().len(), 240);
    }

    #[tokio::test]
    async fn empty_channel_purge_succeeds_with_zero_deletions() {
        let (ctx, platform) = test_context().await;
        let inv = staff_invocation();

        let request = PurgeRequest {
            amount: 50,
            ..PurgeRequest::default()
        };

        let deleted = execute(&ctx, &inv, &request).await.unwrap();
        assert_eq!(deleted, 0);
        assert_eq!(platform.delete_batch_calls(), 1);

        // The summary still goes out, reporting zero.
        let audits = platform.sent_channel_embeds();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].1.title.as_deref(), Some("Messages Purged"));
    }

    #[tokio::test]
    async fn out_of_range_amount_fails_before_any_deletion() {
        let (ctx, platform) = test_context().await;
        seed_synthetic_channel(&platform);
        let inv = staff_invocation();

        for amount in [0, 5_001] {
            let request = PurgeRequest {
                amount,
                ..PurgeRequest::default()
            };
            let err = execute(&ctx, &inv, &request).await.unwrap_err();
            assert!(matches!(err, ModerationError::Validation(_)));
        }

        assert_eq!(platform.delete_batch_calls(), 0);
        assert_eq!(platform.remaining_messages().len(), 250);
    }

    #[tokio::test]
    async fn bad_anchor_fails_before_any_deletion() {
        let (ctx, platform) = test_context().await;
        seed_synthetic_channel(&platform);
        let inv = staff_invocation();

        let request = PurgeRequest {
            amount: 10,
            after: Some("https://discord.com/channels/1/2/9999".to_owned()),
            ..PurgeRequest::default()
        };

        let err = execute(&ctx, &inv, &request).await.unwrap_err();
        assert!(matches!(err, ModerationError::Validation(_)));
        assert_eq!(platform.delete_batch_calls(), 0);
    }

    #[tokio::test]
    async fn anchor_bounds_deletion_to_newer_messages() {
        let (ctx, platform) = test_context().await;
        seed_synthetic_channel(&platform);
        let inv = staff_invocation();

        let request = PurgeRequest {
            amount: 5_000,
            after: Some("200".to_owned()),
            ..PurgeRequest::default()
        };

        let deleted = execute(&ctx, &inv, &request).await.unwrap();
        assert_eq!(deleted, 50, "ids 201..=250 are strictly after the anchor");
        // The anchor itself survives.
        assert!(
            platform
                .remaining_messages()
                .iter()
                .any(|record| record.id == Id::new(200))
        );
    }

    #[tokio::test]
    async fn summary_omits_inactive_filters() {
        let (ctx, platform) = test_context().await;
        seed_synthetic_channel(&platform);
        let inv = staff_invocation();

        let request = PurgeRequest {
            amount: 10,
            bots_only: true,
            ..PurgeRequest::default()
        };
        execute(&ctx, &inv, &request).await.unwrap();

        let audits = platform.sent_channel_embeds();
        assert_eq!(audits.len(), 1);
        let names: Vec<&str> = audits[0].1.fields.iter().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"Bots Only"));
        assert!(!names.contains(&"Filtered User"));
        assert!(!names.contains(&"Contains"));
        assert!(!names.contains(&"Images Only"));
    }

    #[tokio::test]
    async fn non_staff_purge_is_forbidden() {
        let (ctx, platform) = test_context().await;
        seed_synthetic_channel(&platform);
        let inv = invocation(testkit::MODERATOR, &[]);

        let request = PurgeRequest {
            amount: 10,
            ..PurgeRequest::default()
        };
        let err = execute(&ctx, &inv, &request).await.unwrap_err();
        assert!(matches!(err, ModerationError::Forbidden));
        assert_eq!(platform.remaining_messages().len(), 250);
    }

    #[test]
    fn request_parser_understands_flags_and_keyed_filters() {
        let request =
            parse_request(Some("40"), Some("user:<@500> contains:spam bots images after:123"))
                .unwrap();

        assert_eq!(request.amount, 40);
        assert_eq!(request.author, Some(Id::new(500)));
        assert_eq!(request.contains.as_deref(), Some("spam"));
        assert!(request.bots_only);
        assert!(request.attachments_only);
        assert_eq!(request.after.as_deref(), Some("123"));

        assert!(parse_request(Some("ten"), None).is_none());
        assert!(parse_request(Some("10"), Some("garbage")).is_none());
    }
}
