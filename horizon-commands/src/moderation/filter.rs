use twilight_model::id::{
    Id,
    marker::{MessageMarker, UserMarker},
};

use horizon_core::MessageRecord;

type FilterClause = Box<dyn Fn(&MessageRecord) -> bool + Send + Sync>;

/// A conjunction of independently built filter clauses.
///
/// An empty filter matches everything; each added clause narrows the match.
#[derive(Default)]
pub struct PurgeFilter {
    clauses: Vec<FilterClause>,
}

impl PurgeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only messages authored by this user.
    pub fn author(mut self, author_id: Id<UserMarker>) -> Self {
        self.clauses
            .push(Box::new(move |record| record.author_id == author_id));
        self
    }

    /// Only messages whose body contains the needle, case-insensitively.
    pub fn contains(mut self, needle: &str) -> Self {
        let needle = needle.to_lowercase();
        self.clauses
            .push(Box::new(move |record| {
                record.content.to_lowercase().contains(&needle)
            }));
        self
    }

    /// Only messages from automated authors.
    pub fn bots_only(mut self) -> Self {
        self.clauses.push(Box::new(|record| record.author_is_bot));
        self
    }

    /// Only messages carrying at least one attachment.
    pub fn attachments_only(mut self) -> Self {
        self.clauses
            .push(Box::new(|record| !record.attachment_urls.is_empty()));
        self
    }

    /// Only messages strictly newer than the anchor.
    pub fn after(mut self, anchor_id: Id<MessageMarker>) -> Self {
        self.clauses
            .push(Box::new(move |record| record.id > anchor_id));
        self
    }

    /// True when every clause holds.
    pub fn matches(&self, record: &MessageRecord) -> bool {
        self.clauses.iter().all(|clause| clause(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, author_id: u64) -> MessageRecord {
        MessageRecord {
            id: Id::new(id),
            channel_id: Id::new(2),
            author_id: Id::new(author_id),
            author_is_bot: false,
            content: String::new(),
            attachment_urls: Vec::new(),
            embeds: Vec::new(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(PurgeFilter::new().matches(&record(1, 5)));
    }

    #[test]
    fn author_clause_requires_identity_equality() {
        let filter = PurgeFilter::new().author(Id::new(5));
        assert!(filter.matches(&record(1, 5)));
        assert!(!filter.matches(&record(1, 6)));
    }

    #[test]
    fn contains_clause_is_case_insensitive() {
        let filter = PurgeFilter::new().contains("SPAM");
        let mut msg = record(1, 5);
        msg.content = "this is Spam indeed".to_owned();
        assert!(filter.matches(&msg));

        msg.content = "clean".to_owned();
        assert!(!filter.matches(&msg));
    }

    #[test]
    fn bots_clause_checks_the_automation_flag() {
        let filter = PurgeFilter::new().bots_only();
        let mut msg = record(1, 5);
        assert!(!filter.matches(&msg));
        msg.author_is_bot = true;
        assert!(filter.matches(&msg));
    }

    #[test]
    fn attachments_clause_requires_a_nonempty_set() {
        let filter = PurgeFilter::new().attachments_only();
        let mut msg = record(1, 5);
        assert!(!filter.matches(&msg));
        msg.attachment_urls.push("https://cdn.example/a.png".to_owned());
        assert!(filter.matches(&msg));
    }

    #[test]
    fn after_clause_is_strictly_greater() {
        let filter = PurgeFilter::new().after(Id::new(10));
        assert!(!filter.matches(&record(9, 5)));
        assert!(!filter.matches(&record(10, 5)));
        assert!(filter.matches(&record(11, 5)));
    }

    #[test]
    fn clauses_combine_with_logical_and() {
        let filter = PurgeFilter::new().author(Id::new(5)).after(Id::new(10));
        assert!(filter.matches(&record(11, 5)));
        assert!(!filter.matches(&record(11, 6)));
        assert!(!filter.matches(&record(9, 5)));
    }
}
