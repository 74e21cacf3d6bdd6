use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::models::{Account, AggregateTotals};
use crate::chain::{
    fetch_all, BatchConfig, FetchError, ItemRecord, SummonerDiscovery, SummonerReader,
    SummonerSnapshot,
};
use crate::scoring::LevelCurve;

/// Collects everything an account owns and reduces it into scoring inputs.
pub struct Aggregator {
    discovery: Arc<dyn SummonerDiscovery>,
    reader: Arc<dyn SummonerReader>,
    level_curve: Arc<dyn LevelCurve>,
    batch: BatchConfig,
}

impl Aggregator {
    pub fn new(
        discovery: Arc<dyn SummonerDiscovery>,
        reader: Arc<dyn SummonerReader>,
        level_curve: Arc<dyn LevelCurve>,
        batch: BatchConfig,
    ) -> Self {
        Self {
            discovery,
            reader,
            level_curve,
            batch,
        }
    }

    /// Any upstream failure aborts the whole aggregation.
    #[instrument(skip(self), fields(account = %account))]
    pub async fn aggregate(&self, account: &Account) -> Result<AggregateTotals, FetchError> {
        let ids = self.discovery.discover(account).await?;
        if ids.is_empty() {
            info!("No summoners found for account");
            return Ok(AggregateTotals::default());
        }

        let items = self.reader.fetch_items(account).await?;

        let reader = Arc::clone(&self.reader);
        let summoners = fetch_all(&ids, self.batch, move |chunk| {
            let reader = Arc::clone(&reader);
            async move { reader.fetch_summoners(&chunk).await }
        })
        .await?;

        let totals = self.reduce(&summoners, &items);
        debug!(
            summoners = totals.summoner_count,
            total_experience = totals.total_experience,
            total_gold = totals.total_gold,
            total_material = totals.total_material,
            items = totals.item_count,
            "Aggregated account totals"
        );

        Ok(totals)
    }

    /// Folds snapshots and items into totals. Experience per summoner is the
    /// xp spent reaching its current level plus its unspent xp.
    pub fn reduce(&self, summoners: &[SummonerSnapshot], items: &[ItemRecord]) -> AggregateTotals {
        let mut totals = summoners
            .iter()
            .fold(AggregateTotals::default(), |mut totals, summoner| {
                let spent = self
                    .level_curve
                    .experience_for_level(summoner.level.saturating_sub(1));
                totals.summoner_count += 1;
                totals.total_experience = totals
                    .total_experience
                    .saturating_add(spent.saturating_add(summoner.xp));
                totals.total_gold = totals.total_gold.saturating_add(summoner.gold);
                totals.total_material = totals.total_material.saturating_add(summoner.material);
                totals
            });

        totals.item_count = items.len() as u64;
        totals
    }
}
