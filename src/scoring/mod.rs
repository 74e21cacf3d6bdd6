// Public API - what other modules can use
pub use level_curve::{LevelCurve, RarityLevelCurve};

mod level_curve;

use crate::migration::models::AggregateTotals;

/// Converts aggregated legacy assets into migration experience.
///
/// `summoners + gold / 1000 + material / 50 + items * 10 + total_exp / 1000`
pub fn calculate_experience(
    summoners: u64,
    gold: u64,
    material: u64,
    items: u64,
    total_exp: u64,
) -> f64 {
    let mut experience = 0.0;
    experience += summoners as f64;
    experience += gold as f64 / 1000.0;
    experience += material as f64 / 50.0;
    experience += items as f64 * 10.0;
    experience += total_exp as f64 / 1000.0;
    experience
}

/// Scores a reduced account and rounds to the persisted precision.
pub fn score_totals(totals: &AggregateTotals) -> f64 {
    round_experience(calculate_experience(
        totals.summoner_count,
        totals.total_gold,
        totals.total_material,
        totals.item_count,
        totals.total_experience,
    ))
}

/// Rounds to two decimal places.
pub fn round_experience(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
