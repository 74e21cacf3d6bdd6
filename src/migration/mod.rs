// Public API - what other modules can use
pub use aggregator::Aggregator;
pub use errors::{LedgerError, MigrationError};
pub use handlers::{check_migration, submit_migration};
pub use repository::{InMemoryMigrationLedger, MigrationLedger, PostgresMigrationLedger};
pub use service::{MigrationService, SubmissionStage};

// Internal modules
pub mod aggregator;
mod errors;
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
