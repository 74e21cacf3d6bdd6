use thiserror::Error;

use crate::chain::FetchError;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Account already migrated: {0}")]
    DuplicateKey(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("missing address or signature")]
    MissingCredentials,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("migration already done")]
    AlreadyMigrated,

    #[error("Upstream fetch failed: {0}")]
    Upstream(#[from] FetchError),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl MigrationError {
    /// Client-facing reason for domain rejections. Opaque failures have none.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            MigrationError::MissingCredentials => Some("missing address or signature"),
            MigrationError::InvalidSignature => Some("invalid signature"),
            MigrationError::AlreadyMigrated => Some("migration already done"),
            MigrationError::Upstream(_) | MigrationError::Persistence(_) => None,
        }
    }
}

impl From<LedgerError> for MigrationError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::DuplicateKey(_) => MigrationError::AlreadyMigrated,
            LedgerError::Storage(msg) => MigrationError::Persistence(msg),
        }
    }
}
