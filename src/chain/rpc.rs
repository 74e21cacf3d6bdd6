use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::{debug, instrument, warn};

use super::{FetchError, ItemRecord, SummonerId, SummonerReader, SummonerSnapshot};
use crate::migration::models::Account;

/// ABI of the Rarity library read surface.
pub mod abi {
    alloy_sol_types::sol! {
        struct SummonerBase {
            uint256 xp;
            uint256 log;
            uint256 class;
            uint256 level;
        }

        struct SummonerAbilityScores {
            uint32 strength;
            uint32 dexterity;
            uint32 constitution;
            uint32 intelligence;
            uint32 wisdom;
            uint32 charisma;
        }

        struct SummonerGold {
            uint256 balance;
            uint256 claimed;
            uint256 claimable;
        }

        struct SummonerMaterial {
            uint256 balance;
            uint256 scout;
            uint256 log;
        }

        struct SummonerFull {
            uint256 id;
            SummonerBase base;
            SummonerAbilityScores ability_scores;
            SummonerGold gold;
            SummonerMaterial materials;
        }

        struct Item {
            uint8 base_type;
            uint8 item_type;
            uint32 crafted;
            uint256 crafter;
            uint256 token_id;
        }

        function summoners_full(uint256[] ids) external view returns (SummonerFull[] memory);
        function items1(address owner) external view returns (Item[] memory);
    }
}

/// 10^18: xp, gold and crafting material are 18-decimal fixed point on chain.
const WEI_PER_UNIT: u64 = 1_000_000_000_000_000_000;

/// ABI words per `SummonerFull`: id, base (4), ability scores (6), gold (3), materials (3).
const SUMMONER_FULL_WORDS: usize = 17;

/// ABI words per `Item`.
const ITEM_WORDS: usize = 5;

/// `SummonerReader` backed by `eth_call` against the Rarity library contract.
pub struct RpcSummonerReader {
    client: reqwest::Client,
    rpc_url: String,
    library: Address,
}

impl RpcSummonerReader {
    pub fn new(client: reqwest::Client, rpc_url: impl Into<String>, library: Address) -> Self {
        Self {
            client,
            rpc_url: rpc_url.into(),
            library,
        }
    }

    async fn eth_call(&self, calldata: Vec<u8>) -> Result<Vec<u8>, FetchError> {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [
                {
                    "to": self.library.to_string(),
                    "data": format!("0x{}", hex::encode(calldata)),
                },
                "latest",
            ],
        });

        let response: Value = self
            .client
            .post(&self.rpc_url)
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error_value) = response.get("error") {
            warn!(error = %error_value, "eth_call returned an error");
            return Err(FetchError::Rpc(error_value.to_string()));
        }

        let result = response
            .get("result")
            .and_then(Value::as_str)
            .ok_or_else(|| FetchError::Decode("eth_call response has no result".to_string()))?;

        hex::decode(result.strip_prefix("0x").unwrap_or(result))
            .map_err(|e| FetchError::Decode(format!("eth_call result is not hex: {e}")))
    }
}

#[async_trait]
impl SummonerReader for RpcSummonerReader {
    #[instrument(skip(self, ids), fields(ids = ids.len()))]
    async fn fetch_summoners(
        &self,
        ids: &[SummonerId],
    ) -> Result<Vec<SummonerSnapshot>, FetchError> {
        let call = abi::summoners_fullCall {
            ids: ids.iter().map(|id| U256::from(*id)).collect(),
        };
        let output = self.eth_call(call.abi_encode()).await?;
        let summoners = decode_summoners(&output)?;

        debug!(summoners = summoners.len(), "Decoded summoner chunk");
        Ok(summoners)
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn fetch_items(&self, owner: &Account) -> Result<Vec<ItemRecord>, FetchError> {
        let owner_address = Address::from_str(owner.as_str())
            .map_err(|_| FetchError::InvalidAccount(owner.to_string()))?;
        let call = abi::items1Call {
            owner: owner_address,
        };
        let output = self.eth_call(call.abi_encode()).await?;
        let items = decode_items(&output)?;

        debug!(items = items.len(), "Decoded owned items");
        Ok(items)
    }
}

/// Decodes a `summoners_full` return payload into normalised snapshots.
pub fn decode_summoners(output: &[u8]) -> Result<Vec<SummonerSnapshot>, FetchError> {
    let decoded = abi::summoners_fullCall::abi_decode_returns_validate(output)
        .map_err(|e| FetchError::Decode(format!("summoners_full: {e}")))?;
    ensure_static_array_len(output, decoded.len(), SUMMONER_FULL_WORDS, "summoners_full")?;

    decoded
        .into_iter()
        .map(|summoner| {
            Ok(SummonerSnapshot {
                id: to_u64(summoner.id, "id")?,
                level: to_u64(summoner.base.level, "level")?,
                xp: to_whole_units(summoner.base.xp, "xp")?,
                gold: to_whole_units(summoner.gold.balance, "gold")?,
                material: to_whole_units(summoner.materials.balance, "material")?,
            })
        })
        .collect()
}

/// Decodes an `items1` return payload.
pub fn decode_items(output: &[u8]) -> Result<Vec<ItemRecord>, FetchError> {
    let decoded = abi::items1Call::abi_decode_returns_validate(output)
        .map_err(|e| FetchError::Decode(format!("items1: {e}")))?;
    ensure_static_array_len(output, decoded.len(), ITEM_WORDS, "items1")?;

    decoded
        .into_iter()
        .map(|item| {
            Ok(ItemRecord {
                token_id: to_u64(item.token_id, "token_id")?,
                base_type: item.base_type,
                item_type: item.item_type,
                crafter: to_u64(item.crafter, "crafter")?,
            })
        })
        .collect()
}

/// A returned array of static structs is an offset word, a length word and
/// `words` per element. Any other payload size means the contract returned a
/// different struct than the one declared in `abi`.
fn ensure_static_array_len(
    output: &[u8],
    elements: usize,
    words: usize,
    call: &str,
) -> Result<(), FetchError> {
    let expected = (2 + elements * words) * 32;
    if output.len() != expected {
        warn!(call, expected, actual = output.len(), "Return payload has unexpected shape");
        return Err(FetchError::Decode(format!(
            "{call}: expected {expected} bytes for {elements} elements, got {}",
            output.len()
        )));
    }
    Ok(())
}

fn to_u64(value: U256, field: &str) -> Result<u64, FetchError> {
    u64::try_from(value).map_err(|_| FetchError::Decode(format!("{field} does not fit in u64")))
}

fn to_whole_units(value: U256, field: &str) -> Result<u64, FetchError> {
    to_u64(value / U256::from(WEI_PER_UNIT), field)
}
