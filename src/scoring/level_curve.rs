/// Maps a level index to the cumulative experience spent reaching it.
///
/// Implementations must be monotonically non-decreasing in `level`.
pub trait LevelCurve: Send + Sync {
    fn experience_for_level(&self, level: u64) -> u64;
}

/// Rarity game rules: leaving level `k` costs `1000 * k * (k + 1) / 2` xp,
/// so reaching level `n + 1` has consumed the sum of those costs for `1..=n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RarityLevelCurve;

impl RarityLevelCurve {
    pub fn new() -> Self {
        Self
    }

    /// Xp needed to advance from `level` to `level + 1`.
    pub fn xp_required(level: u64) -> u64 {
        level
            .saturating_mul(level.saturating_add(1))
            .saturating_mul(500)
    }
}

impl LevelCurve for RarityLevelCurve {
    fn experience_for_level(&self, level: u64) -> u64 {
        (1..=level).fold(0u64, |total, k| {
            total.saturating_add(Self::xp_required(k))
        })
    }
}
