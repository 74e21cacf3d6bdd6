use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Account address, trimmed and lower-cased. Ledger identity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Account(String);

impl Account {
    pub fn new(address: &str) -> Self {
        Self(address.trim().to_lowercase())
    }

    /// Normalises an optional request field, treating blank input as absent.
    pub fn from_optional(address: Option<&str>) -> Option<Self> {
        address
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reduction of every summoner and item an account holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTotals {
    pub summoner_count: u64,
    pub total_experience: u64,
    pub total_gold: u64,
    pub total_material: u64,
    pub item_count: u64,
}

/// Database model for the migrations table. Written once per account.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub account: String,
    pub experience: f64,
    pub migrated_at: DateTime<Utc>,
}

impl MigrationRecord {
    pub fn new(account: &Account, experience: f64) -> Self {
        Self {
            account: account.as_str().to_string(),
            experience,
            migrated_at: Utc::now(),
        }
    }
}
