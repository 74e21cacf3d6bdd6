use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rarity_migrator::{
    chain::{SummonerId, SummonerSnapshot},
    Aggregator, AppState, BatchConfig, MigrationService, SignatureVerifier,
};

use super::mocks::{CountingLedger, MockChain, TableLevelCurve};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const MESSAGE: &str = "migrate me";

pub struct TestSetup {
    pub service: Arc<MigrationService>,
    pub state: AppState,
    pub chain: Arc<MockChain>,
    pub ledger: Arc<CountingLedger>,
}

pub struct TestSetupBuilder {
    summoners: Vec<SummonerSnapshot>,
    items: usize,
    failing_ids: HashSet<SummonerId>,
    chunk_delay: Duration,
    batch: BatchConfig,
    level_table: Vec<u64>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            summoners: vec![],
            items: 0,
            failing_ids: HashSet::new(),
            chunk_delay: Duration::from_millis(0),
            batch: BatchConfig::default(),
            level_table: vec![0],
        }
    }

    /// Adds a summoner as (level, xp, gold, material); ids are assigned in order from 1.
    pub fn with_summoner(mut self, level: u64, xp: u64, gold: u64, material: u64) -> Self {
        let id = self.summoners.len() as SummonerId + 1;
        self.summoners.push(SummonerSnapshot {
            id,
            level,
            xp,
            gold,
            material,
        });
        self
    }

    pub fn with_plain_summoners(mut self, count: usize) -> Self {
        for _ in 0..count {
            self = self.with_summoner(1, 0, 0, 0);
        }
        self
    }

    pub fn with_items(mut self, items: usize) -> Self {
        self.items = items;
        self
    }

    pub fn with_failing_summoner(mut self, id: SummonerId) -> Self {
        self.failing_ids.insert(id);
        self
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    pub fn with_batch(mut self, per_chunk: usize, max_concurrent_chunks: usize) -> Self {
        self.batch = BatchConfig::new(per_chunk, max_concurrent_chunks).unwrap();
        self
    }

    pub fn with_level_table(mut self, table: Vec<u64>) -> Self {
        self.level_table = table;
        self
    }

    pub fn build(self) -> TestSetup {
        let chain = Arc::new(MockChain::new(
            self.summoners,
            self.items,
            self.failing_ids,
            self.chunk_delay,
        ));
        let ledger = Arc::new(CountingLedger::new());

        let aggregator = Aggregator::new(
            chain.clone(),
            chain.clone(),
            Arc::new(TableLevelCurve(self.level_table)),
            self.batch,
        );
        let service = Arc::new(MigrationService::new(
            SignatureVerifier::new(MESSAGE),
            ledger.clone(),
            aggregator,
        ));

        TestSetup {
            state: AppState::new(service.clone()),
            service,
            chain,
            ledger,
        }
    }
}

impl TestSetup {
    /// Submits with a correctly signed migration message.
    pub async fn submit_signed(
        &self,
        signer: &super::TestSigner,
    ) -> Result<f64, rarity_migrator::MigrationError> {
        let signature = signer.sign(MESSAGE);
        self.service
            .submit(Some(&signer.address()), Some(&signature))
            .await
    }
}
