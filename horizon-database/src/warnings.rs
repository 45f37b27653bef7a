use std::time::{SystemTime, UNIX_EPOCH};

use crate::Database;

/// One persisted warning, independent of the case ledger.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct WarningRow {
    pub id: i64,
    pub user_id: i64,
    pub moderator_id: i64,
    pub reason: Option<String>,
    pub created_at: i64,
}

fn now_unix_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs() as i64)
}

/// Insert a new warning and return its ledger-assigned identifier.
pub async fn create_warning(
    db: &Database,
    user_id: u64,
    moderator_id: u64,
    reason: Option<&str>,
) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        "INSERT INTO warnings (user_id, moderator_id, reason, created_at) \
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(user_id as i64)
    .bind(moderator_id as i64)
    .bind(reason)
    .bind(now_unix_secs())
    .fetch_one(db.pool())
    .await
}

/// Fetch a user's warnings, newest first.
pub async fn recent_warnings(
    db: &Database,
    user_id: u64,
    limit: u32,
) -> sqlx::Result<Vec<WarningRow>> {
    sqlx::query_as(
        "SELECT id, user_id, moderator_id, reason, created_at \
         FROM warnings WHERE user_id = ? ORDER BY id DESC LIMIT ?",
    )
    .bind(user_id as i64)
    .bind(i64::from(limit))
    .fetch_all(db.pool())
    .await
}

/// Delete every warning for a user, returning the number of rows removed.
///
/// Clear-history only reaches this when explicitly configured to; by
/// default warnings outlive the case ledger.
pub async fn delete_all_warnings(db: &Database, user_id: u64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM warnings WHERE user_id = ?")
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
    async fn warnings_are_recorded_and_listed_newest_first() {
        let db = test_database().await;

        let first = create_warning(&db, 7, 2, Some("spam")).await.unwrap();
        let second = create_warning(&db, 7, 2, None).await.unwrap();
        assert!(second > first);

        let rows = recent_warnings(&db, 7, 10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, second);
        assert_eq!(rows[1].reason.as_deref(), Some("spam"));
    }

    #[tokio::test]
    async fn delete_all_warnings_scopes_to_one_user() {
        let db = test_database().await;

        create_warning(&db, 7, 2, None).await.unwrap();
        create_warning(&db, 7, 2, None).await.unwrap();
        create_warning(&db, 8, 2, None).await.unwrap();

        assert_eq!(delete_all_warnings(&db, 7).await.unwrap(), 2);
        assert!(recent_warnings(&db, 7, 10).await.unwrap().is_empty());
        assert_eq!(recent_warnings(&db, 8, 10).await.unwrap().len(), 1);
    }
}
