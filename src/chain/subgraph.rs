use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use super::{FetchError, SummonerDiscovery, SummonerId};
use crate::migration::models::Account;

pub const DEFAULT_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/rarity-adventure/rarity";

/// Pages are keyed on the last id seen rather than `skip`, which the hosted
/// service caps at 5000.
const SUMMONERS_QUERY: &str = r#"
query getSummoners($first: Int!, $where: Summoner_filter!) {
  summoners(
    first: $first
    where: $where
    orderBy: id
    orderDirection: desc
  ) {
    id
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphResponse {
    data: Option<SummonersPage>,
    errors: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SummonersPage {
    summoners: Vec<SummonerRow>,
}

#[derive(Debug, Deserialize)]
struct SummonerRow {
    id: String,
}

/// Discovers owned summoners through the Rarity subgraph, paging with
/// `first` plus an `id_lt` cursor until a short page comes back.
pub struct SubgraphDiscovery {
    client: reqwest::Client,
    url: String,
    page_size: usize,
}

impl SubgraphDiscovery {
    pub fn new(client: reqwest::Client, url: impl Into<String>, page_size: usize) -> Self {
        Self {
            client,
            url: url.into(),
            page_size: page_size.max(1),
        }
    }

    /// Fetches the page of ids below `before` (or the first page) and returns
    /// the raw id of its last row as the next cursor.
    async fn fetch_page(
        &self,
        owner: &str,
        before: Option<&str>,
    ) -> Result<(Vec<SummonerId>, Option<String>), FetchError> {
        let mut filter = json!({ "owner": owner });
        if let Some(cursor) = before {
            filter["id_lt"] = json!(cursor);
        }
        let request_body = json!({
            "query": SUMMONERS_QUERY,
            "variables": {
                "first": self.page_size,
                "where": filter,
            },
        });

        let response: GraphResponse = self
            .client
            .post(&self.url)
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            warn!(owner = %owner, errors = errors.len(), "Subgraph query returned errors");
            return Err(FetchError::Rpc(Value::Array(errors).to_string()));
        }

        let page = response
            .data
            .ok_or_else(|| FetchError::Decode("subgraph response has no data".to_string()))?;

        let cursor = page.summoners.last().map(|row| row.id.clone());
        let ids = page
            .summoners
            .into_iter()
            .map(|row| {
                row.id
                    .parse::<SummonerId>()
                    .map_err(|_| FetchError::Decode(format!("invalid summoner id {:?}", row.id)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok((ids, cursor))
    }
}

#[async_trait]
impl SummonerDiscovery for SubgraphDiscovery {
    #[instrument(skip(self), fields(owner = %owner))]
    async fn discover(&self, owner: &Account) -> Result<Vec<SummonerId>, FetchError> {
        let mut ids = Vec::new();
        let mut before: Option<String> = None;

        loop {
            let (page, cursor) = self.fetch_page(owner.as_str(), before.as_deref()).await?;
            let page_len = page.len();
            ids.extend(page);

            if page_len < self.page_size {
                break;
            }
            before = cursor;
        }

        debug!(summoners = ids.len(), "Discovered summoners");
        Ok(ids)
    }
}
