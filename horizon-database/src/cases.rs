use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::Database;

/// The moderation verb a case records.
#[derive(Clone, Copy, Debug, Eq, PartialEq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum ActionKind {
    Timeout,
    Untimeout,
    Ban,
    Kick,
    Warn,
    Revoke,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Untimeout => "untimeout",
            Self::Ban => "ban",
            Self::Kick => "kick",
            Self::Warn => "warn",
            Self::Revoke => "revoke",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted moderation case.
///
/// Rows are immutable after insertion; revocation removes the row
/// entirely rather than marking it.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct CaseRow {
    pub id: i64,
    pub user_id: i64,
    pub moderator_id: i64,
    pub action: ActionKind,
    pub reason: Option<String>,
    pub created_at: i64,
}

fn now_unix_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs() as i64)
}

/// Insert a new case and return its ledger-assigned identifier.
///
/// The creation timestamp is set here, never caller-supplied.
pub async fn create_case(
    db: &Database,
    user_id: u64,
    moderator_id: u64,
    action: ActionKind,
    reason: Option<&str>,
) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        "INSERT INTO cases (user_id, moderator_id, action, reason, created_at) \
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(user_id as i64)
    .bind(moderator_id as i64)
    .bind(action)
    .bind(reason)
    .bind(now_unix_secs())
    .fetch_one(db.pool())
    .await
}

/// Fetch a user's most recent cases, newest first.
pub async fn recent_cases(db: &Database, user_id: u64, limit: u32) -> sqlx::Result<Vec<CaseRow>> {
    sqlx::query_as(
        "SELECT id, user_id, moderator_id, action, reason, created_at \
         FROM cases WHERE user_id = ? ORDER BY id DESC LIMIT ?",
    )
    .bind(user_id as i64)
    .bind(i64::from(limit))
    .fetch_all(db.pool())
    .await
}

/// Delete one case by identifier, returning the removed row if it existed.
pub async fn delete_case(db: &Database, case_id: i64) -> sqlx::Result<Option<CaseRow>> {
    sqlx::query_as(
        "DELETE FROM cases WHERE id = ? \
         RETURNING id, user_id, moderator_id, action, reason, created_at",
    )
    .bind(case_id)
    .fetch_optional(db.pool())
    .await
}

/// Delete every case for a user, returning the number of rows removed.
pub async fn delete_all_cases(db: &Database, user_id: u64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM cases WHERE user_id = ?")
        .bind(user_id as i64)
        .execute(db.pool())
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_database;

    #[tokio::test]
    async fn case_ids_are_assigned_monotonically() {
        let db = test_database().await;

        let first = create_case(&db, 1, 2, ActionKind::Warn, Some("first"))
            .await
            .unwrap();
        let second = create_case(&db, 1, 2, ActionKind::Ban, None).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn concurrent_creates_yield_distinct_increasing_ids() {
        let db = test_database().await;

        let mut tasks = tokio::task::JoinSet::new();
        for n in 0..25_u64 {
            let db = db.clone();
            tasks.spawn(async move {
                create_case(&db, n, 99, ActionKind::Kick, None).await.unwrap()
            });
        }

        let mut ids = Vec::new();
        while let Some(id) = tasks.join_next().await {
            ids.push(id.unwrap());
        }

        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 25, "identifiers must be unique");
    }

    #[tokio::test]
    async fn recent_cases_are_bounded_and_newest_first() {
        let db = test_database().await;

        for n in 0..15 {
            create_case(&db, 7, 2, ActionKind::Warn, Some(&format!("r{n}")))
                .await
                .unwrap();
        }

        let rows = recent_cases(&db, 7, 10).await.unwrap();
        assert_eq!(rows.len(), 10);
        for pair in rows.windows(2) {
            assert!(pair[0].id > pair[1].id, "must be strictly newest first");
        }
    }

    #[tokio::test]
    async fn recent_cases_sees_only_the_requested_user() {
        let db = test_database().await;

        create_case(&db, 7, 2, ActionKind::Warn, None).await.unwrap();
        create_case(&db, 8, 2, ActionKind::Ban, None).await.unwrap();

        let rows = recent_cases(&db, 7, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].action, ActionKind::Warn);
        assert_eq!(rows[0].user_id, 7);
    }

    #[tokio::test]
    async fn delete_case_removes_exactly_one_row() {
        let db = test_database().await;

        let keep = create_case(&db, 7, 2, ActionKind::Warn, None).await.unwrap();
        let drop = create_case(&db, 7, 2, ActionKind::Ban, Some("raid"))
            .await
            .unwrap();

        let removed = delete_case(&db, drop).await.unwrap().unwrap();
        assert_eq!(removed.id, drop);
        assert_eq!(removed.action, ActionKind::Ban);
        assert_eq!(removed.reason.as_deref(), Some("raid"));

        let rows = recent_cases(&db, 7, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, keep);
    }

    #[tokio::test]
    async fn delete_case_reports_missing_ids() {
        let db = test_database().await;

        let existing = create_case(&db, 7, 2, ActionKind::Warn, None).await.unwrap();
        assert!(delete_case(&db, existing + 100).await.unwrap().is_none());

        // Nothing else was touched.
        assert_eq!(recent_cases(&db, 7, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_all_cases_scopes_to_one_user() {
        let db = test_database().await;

        for _ in 0..3 {
            create_case(&db, 7, 2, ActionKind::Warn, None).await.unwrap();
        }
        create_case(&db, 8, 2, ActionKind::Warn, None).await.unwrap();

        let removed = delete_all_cases(&db, 7).await.unwrap();
        assert_eq!(removed, 3);
        assert!(recent_cases(&db, 7, 10).await.unwrap().is_empty());
        assert_eq!(recent_cases(&db, 8, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn revoked_ids_are_never_reused() {
        let db = test_database().await;

        let first = create_case(&db, 7, 2, ActionKind::Warn, None).await.unwrap();
        delete_case(&db, first).await.unwrap();

        let next = create_case(&db, 7, 2, ActionKind::Warn, None).await.unwrap();
        assert!(next > first);
    }
}
