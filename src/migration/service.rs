use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    aggregator::Aggregator,
    models::{Account, MigrationRecord},
    repository::MigrationLedger,
    MigrationError,
};
use crate::auth::SignatureVerifier;
use crate::scoring;

/// Progress of a single submission. Every gate can exit to `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Received,
    Authorized,
    Unmigrated,
    Aggregated,
    Scored,
    Committed,
    Rejected(&'static str),
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStage::Received => f.write_str("received"),
            SubmissionStage::Authorized => f.write_str("authorized"),
            SubmissionStage::Unmigrated => f.write_str("unmigrated"),
            SubmissionStage::Aggregated => f.write_str("aggregated"),
            SubmissionStage::Scored => f.write_str("scored"),
            SubmissionStage::Committed => f.write_str("committed"),
            SubmissionStage::Rejected(reason) => write!(f, "rejected({reason})"),
        }
    }
}

/// Service for the migration check and submit flows
pub struct MigrationService {
    verifier: SignatureVerifier,
    ledger: Arc<dyn MigrationLedger>,
    aggregator: Aggregator,
}

impl MigrationService {
    pub fn new(
        verifier: SignatureVerifier,
        ledger: Arc<dyn MigrationLedger>,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            verifier,
            ledger,
            aggregator,
        }
    }

    /// Returns the committed migration for `account`, if any.
    #[instrument(skip(self), fields(account = %account))]
    pub async fn check(&self, account: &Account) -> Result<Option<MigrationRecord>, MigrationError> {
        let record = self.ledger.find_migration(account).await?;
        info!(migrated = record.is_some(), "Checked migration status");
        Ok(record)
    }

    /// Runs one submission end to end and returns the committed experience.
    ///
    /// Nothing is written unless every step succeeds. The ledger insert is the
    /// commit point; losing an insert race reports `AlreadyMigrated`.
    #[instrument(skip(self, address, signature))]
    pub async fn submit(
        &self,
        address: Option<&str>,
        signature: Option<&str>,
    ) -> Result<f64, MigrationError> {
        let signature = signature.map(str::trim).filter(|s| !s.is_empty());
        let (account, signature) = match (Account::from_optional(address), signature) {
            (Some(account), Some(signature)) => (account, signature),
            _ => return Err(self.reject(None, MigrationError::MissingCredentials)),
        };
        self.advance(&account, SubmissionStage::Received);

        if !self.verifier.verify(account.as_str(), signature) {
            return Err(self.reject(Some(&account), MigrationError::InvalidSignature));
        }
        self.advance(&account, SubmissionStage::Authorized);

        if self.ledger.find_migration(&account).await?.is_some() {
            return Err(self.reject(Some(&account), MigrationError::AlreadyMigrated));
        }
        self.advance(&account, SubmissionStage::Unmigrated);

        let totals = self.aggregator.aggregate(&account).await.map_err(|e| {
            warn!(account = %account, error = %e, "Aggregation failed, nothing committed");
            MigrationError::from(e)
        })?;
        self.advance(&account, SubmissionStage::Aggregated);

        let experience = scoring::score_totals(&totals);
        self.advance(&account, SubmissionStage::Scored);

        let record = MigrationRecord::new(&account, experience);
        if let Err(e) = self.ledger.insert_migration(&record).await {
            let error = MigrationError::from(e);
            return Err(if error.reason().is_some() {
                self.reject(Some(&account), error)
            } else {
                error
            });
        }
        self.advance(&account, SubmissionStage::Committed);

        info!(account = %account, experience, "Migration committed");
        Ok(experience)
    }

    fn advance(&self, account: &Account, stage: SubmissionStage) {
        info!(account = %account, stage = %stage, "Submission advanced");
    }

    fn reject(&self, account: Option<&Account>, error: MigrationError) -> MigrationError {
        let stage = SubmissionStage::Rejected(error.reason().unwrap_or("failure"));
        match account {
            Some(account) => warn!(account = %account, stage = %stage, "Submission rejected"),
            None => warn!(stage = %stage, "Submission rejected"),
        }
        error
    }
}
