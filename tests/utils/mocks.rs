use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rarity_migrator::{
    chain::{ItemRecord, SummonerId, SummonerSnapshot},
    migration::LedgerError,
    scoring::LevelCurve,
    Account, FetchError, InMemoryMigrationLedger, MigrationLedger, MigrationRecord,
    SummonerDiscovery, SummonerReader,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// In-memory chain: discovery and reads are served from fixed tables.
pub struct MockChain {
    summoners: Vec<SummonerSnapshot>,
    items: usize,
    failing_ids: HashSet<SummonerId>,
    chunk_delay: Duration,
    pub chunk_calls: AtomicUsize,
    pub item_calls: AtomicUsize,
    pub discovery_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

impl MockChain {
    pub fn new(
        summoners: Vec<SummonerSnapshot>,
        items: usize,
        failing_ids: HashSet<SummonerId>,
        chunk_delay: Duration,
    ) -> Self {
        Self {
            summoners,
            items,
            failing_ids,
            chunk_delay,
            chunk_calls: AtomicUsize::new(0),
            item_calls: AtomicUsize::new(0),
            discovery_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn chunk_calls(&self) -> usize {
        self.chunk_calls.load(Ordering::SeqCst)
    }

    pub fn item_calls(&self) -> usize {
        self.item_calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SummonerDiscovery for MockChain {
    async fn discover(&self, _owner: &Account) -> Result<Vec<SummonerId>, FetchError> {
        self.discovery_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.summoners.iter().map(|summoner| summoner.id).collect())
    }
}

#[async_trait]
impl SummonerReader for MockChain {
    async fn fetch_summoners(
        &self,
        ids: &[SummonerId],
    ) -> Result<Vec<SummonerSnapshot>, FetchError> {
        self.chunk_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.chunk_delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if ids.iter().any(|id| self.failing_ids.contains(id)) {
            return Err(FetchError::Rpc("execution reverted".to_string()));
        }

        let by_id: HashMap<SummonerId, &SummonerSnapshot> =
            self.summoners.iter().map(|s| (s.id, s)).collect();
        Ok(ids.iter().filter_map(|id| by_id.get(id).map(|s| (*s).clone())).collect())
    }

    async fn fetch_items(&self, _owner: &Account) -> Result<Vec<ItemRecord>, FetchError> {
        self.item_calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..self.items as u64)
            .map(|token_id| ItemRecord {
                token_id,
                base_type: 2,
                item_type: 1,
                crafter: 0,
            })
            .collect())
    }
}

/// Level curve backed by an explicit table; levels past the end reuse the last entry.
pub struct TableLevelCurve(pub Vec<u64>);

impl LevelCurve for TableLevelCurve {
    fn experience_for_level(&self, level: u64) -> u64 {
        let index = (level as usize).min(self.0.len().saturating_sub(1));
        self.0.get(index).copied().unwrap_or_default()
    }
}

/// Wraps the in-memory ledger and counts inserts.
#[derive(Default)]
pub struct CountingLedger {
    inner: InMemoryMigrationLedger,
    pub inserts: AtomicUsize,
}

impl CountingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_attempts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub async fn record_count(&self) -> usize {
        self.inner.record_count().await
    }
}

#[async_trait]
impl MigrationLedger for CountingLedger {
    async fn find_migration(
        &self,
        account: &Account,
    ) -> Result<Option<MigrationRecord>, LedgerError> {
        self.inner.find_migration(account).await
    }

    async fn insert_migration(&self, record: &MigrationRecord) -> Result<(), LedgerError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_migration(record).await
    }
}
