use serde::{Deserialize, Serialize};

/// Points for collecting one coin.
pub const COIN_POINTS: u32 = 100;
/// Points for stomping one enemy.
pub const STOMP_POINTS: u32 = 200;
/// Bonus for clearing every coin and enemy.
pub const LEVEL_CLEAR_POINTS: u32 = 1000;

/// Point values, loadable from the `[scoring]` table of the platformer config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub coin: u32,
    pub stomp: u32,
    pub level_clear: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            coin: COIN_POINTS,
            stomp: STOMP_POINTS,
            level_clear: LEVEL_CLEAR_POINTS,
        }
    }
}

/// Add points to a running score. Scores never decrease and saturate
/// instead of wrapping.
pub fn award(score: u32, points: u32) -> u32 {
    score.saturating_add(points)
}
