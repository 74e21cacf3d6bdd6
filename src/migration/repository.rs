use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{
    models::{Account, MigrationRecord},
    LedgerError,
};

/// Postgres SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Append-only store of completed migrations, keyed by account.
///
/// Entries are permanent. Uniqueness of `account` is the only thing that
/// stops a second submission for the same account from committing.
#[async_trait]
pub trait MigrationLedger: Send + Sync {
    async fn find_migration(&self, account: &Account)
        -> Result<Option<MigrationRecord>, LedgerError>;

    /// Fails with `LedgerError::DuplicateKey` if the account is already present.
    async fn insert_migration(&self, record: &MigrationRecord) -> Result<(), LedgerError>;
}

/// In-memory implementation of MigrationLedger for development and testing
///
/// Data is lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryMigrationLedger {
    records: RwLock<HashMap<String, MigrationRecord>>,
}

impl InMemoryMigrationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger with pre-populated records
    pub fn with_records(records: Vec<MigrationRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.account.clone(), record))
            .collect();

        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl MigrationLedger for InMemoryMigrationLedger {
    #[instrument(skip(self), fields(account = %account))]
    async fn find_migration(
        &self,
        account: &Account,
    ) -> Result<Option<MigrationRecord>, LedgerError> {
        let records = self.records.read().await;
        let record = records.get(account.as_str()).cloned();

        debug!(found = record.is_some(), "Looked up migration in memory");
        Ok(record)
    }

    #[instrument(skip(self, record), fields(account = %record.account))]
    async fn insert_migration(&self, record: &MigrationRecord) -> Result<(), LedgerError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.account) {
            warn!("Migration already recorded in memory");
            return Err(LedgerError::DuplicateKey(record.account.clone()));
        }
        records.insert(record.account.clone(), record.clone());

        debug!(experience = record.experience, "Migration recorded in memory");
        Ok(())
    }
}

/// PostgreSQL implementation of the migration ledger
pub struct PostgresMigrationLedger {
    pool: PgPool,
}

impl PostgresMigrationLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it does not exist yet.
    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> Result<(), LedgerError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS migrations (
                account TEXT PRIMARY KEY,
                experience DOUBLE PRECISION NOT NULL,
                migrated_at TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create migrations table");
            LedgerError::Storage(e.to_string())
        })?;

        debug!("Migrations table ready");
        Ok(())
    }
}

#[async_trait]
impl MigrationLedger for PostgresMigrationLedger {
    #[instrument(skip(self), fields(account = %account))]
    async fn find_migration(
        &self,
        account: &Account,
    ) -> Result<Option<MigrationRecord>, LedgerError> {
        let record = sqlx::query_as::<_, MigrationRecord>(
            "SELECT account, experience, migrated_at FROM migrations WHERE account = $1",
        )
        .bind(account.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch migration from database");
            LedgerError::Storage(e.to_string())
        })?;

        debug!(found = record.is_some(), "Looked up migration in database");
        Ok(record)
    }

    #[instrument(skip(self, record), fields(account = %record.account))]
    async fn insert_migration(&self, record: &MigrationRecord) -> Result<(), LedgerError> {
        sqlx::query("INSERT INTO migrations (account, experience, migrated_at) VALUES ($1, $2, $3)")
            .bind(&record.account)
            .bind(record.experience)
            .bind(record.migrated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_error)
                    if db_error.code().as_deref() == Some(UNIQUE_VIOLATION) =>
                {
                    warn!("Migration already recorded in database");
                    LedgerError::DuplicateKey(record.account.clone())
                }
                _ => {
                    warn!(error = %e, "Failed to insert migration into database");
                    LedgerError::Storage(e.to_string())
                }
            })?;

        debug!(experience = record.experience, "Migration recorded in database");
        Ok(())
    }
}
