use serde::{Deserialize, Serialize};

/// On-chain token id of a summoner.
pub type SummonerId = u64;

/// Per-summoner state read from the Rarity library, already normalised to
/// whole units (on-chain amounts carry 18 decimals).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummonerSnapshot {
    pub id: SummonerId,
    pub level: u64,
    pub xp: u64,
    pub gold: u64,
    pub material: u64,
}

/// A crafted item owned by the account. Only the count feeds scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub token_id: u64,
    pub base_type: u8,
    pub item_type: u8,
    pub crafter: SummonerId,
}
