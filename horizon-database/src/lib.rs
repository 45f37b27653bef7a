use sqlx::{SqlitePool, migrate::Migrator};

/// Compile-time discovered SQLx migrations for the `horizon-database` crate.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Shared database handle passed across crates.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a database handle from an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Expose the underlying pool for query modules.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Moderation case ledger.
pub mod cases;
/// Warning ledger, parallel to but independent of the case ledger.
pub mod warnings;

#[cfg(test)]
pub(crate) async fn test_database() -> Database {
    use sqlx::sqlite::SqlitePoolOptions;

    // A single connection keeps every handle on the same in-memory store.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();

    Database::new(pool)
}
