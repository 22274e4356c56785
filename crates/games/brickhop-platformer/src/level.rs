use serde::{Deserialize, Serialize};

use crate::entities::{Coin, Enemy, Platform};
use crate::geometry::Rect;

/// Coin edge length.
pub const COIN_SIZE: f32 = 20.0;
/// Enemy edge length.
pub const ENEMY_SIZE: f32 = 30.0;

/// A fixed single-screen level: static platforms plus the initial coin and
/// enemy layout that every respawn and reset returns to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub platforms: Vec<Platform>,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
}

impl Level {
    /// The built-in level: a ground slab, five floating ledges, seven coins
    /// and two patrolling enemies.
    pub fn classic() -> Self {
        Self {
            platforms: vec![
                // Ground
                Rect::new(0.0, 550.0, 800.0, 50.0),
                Rect::new(200.0, 450.0, 150.0, 20.0),
                Rect::new(400.0, 350.0, 150.0, 20.0),
                Rect::new(600.0, 250.0, 150.0, 20.0),
                Rect::new(100.0, 200.0, 100.0, 20.0),
                Rect::new(500.0, 150.0, 100.0, 20.0),
            ],
            coins: vec![
                Coin::new(250.0, 400.0, COIN_SIZE),
                Coin::new(450.0, 300.0, COIN_SIZE),
                Coin::new(650.0, 200.0, COIN_SIZE),
                Coin::new(150.0, 150.0, COIN_SIZE),
                Coin::new(550.0, 100.0, COIN_SIZE),
                Coin::new(300.0, 500.0, COIN_SIZE),
                Coin::new(700.0, 500.0, COIN_SIZE),
            ],
            enemies: vec![
                Enemy::new(400.0, 518.0, ENEMY_SIZE, 2.0, 300.0, 500.0),
                Enemy::new(600.0, 220.0, ENEMY_SIZE, 1.5, 600.0, 750.0),
            ],
        }
    }

    /// Fresh copy of the coin set, all uncollected.
    pub fn initial_coins(&self) -> Vec<Coin> {
        self.coins
            .iter()
            .map(|c| Coin {
                collected: false,
                ..c.clone()
            })
            .collect()
    }

    /// Fresh copy of the initial patrol set.
    pub fn initial_enemies(&self) -> Vec<Enemy> {
        self.enemies.clone()
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_layout_counts() {
        let level = Level::classic();
        assert_eq!(level.platforms.len(), 6);
        assert_eq!(level.coins.len(), 7);
        assert_eq!(level.enemies.len(), 2);
    }

    #[test]
    fn initial_coins_are_uncollected() {
        let mut level = Level::classic();
        level.coins[0].collected = true;
        assert!(level.initial_coins().iter().all(|c| !c.collected));
    }

    #[test]
    fn enemies_start_inside_patrol_range() {
        for enemy in &Level::classic().enemies {
            assert!(
                enemy.rect.x >= enemy.min_x && enemy.rect.x <= enemy.max_x,
                "Enemy at x={} outside [{}, {}]",
                enemy.rect.x,
                enemy.min_x,
                enemy.max_x
            );
        }
    }

    #[test]
    fn ground_enemy_hovers_just_above_ground() {
        let level = Level::classic();
        let ground = level.platforms[0];
        let gap = ground.y - level.enemies[0].rect.bottom();
        assert!((0.0..=2.0).contains(&gap), "gap={gap}");
    }
}
