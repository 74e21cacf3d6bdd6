// Public API - what other modules can use
pub use batch::{fetch_all, BatchConfig};
pub use errors::FetchError;
pub use models::{ItemRecord, SummonerId, SummonerSnapshot};
pub use rpc::RpcSummonerReader;
pub use subgraph::SubgraphDiscovery;

// Internal modules
mod batch;
mod errors;
pub mod models;
pub mod rpc;
pub mod subgraph;
#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;

use crate::migration::models::Account;

/// Reads summoner state and owned items from the chain.
#[async_trait]
pub trait SummonerReader: Send + Sync {
    /// Returns one snapshot per id, in the order the ids were given.
    async fn fetch_summoners(&self, ids: &[SummonerId]) -> Result<Vec<SummonerSnapshot>, FetchError>;

    /// Returns every item owned by `owner` in a single read.
    async fn fetch_items(&self, owner: &Account) -> Result<Vec<ItemRecord>, FetchError>;
}

/// Finds the summoner ids owned by an account.
#[async_trait]
pub trait SummonerDiscovery: Send + Sync {
    async fn discover(&self, owner: &Account) -> Result<Vec<SummonerId>, FetchError>;
}
