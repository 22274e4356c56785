use crate::entities::{Coin, Enemy, Platform, PlayerState};
use crate::geometry::overlaps;

/// How a player touching an enemy is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyContact {
    /// Player came down on top of the enemy.
    Stomp,
    /// Any other contact; costs a life.
    Hit,
}

/// Land the player on platforms crossed from above this tick.
///
/// Resets and recomputes `grounded`. A platform only catches the player if
/// they are falling and their feet were at or above its top before this
/// tick's vertical move. Platforms are checked in slice order; a landing
/// zeroes `vy`, so when several platforms qualify in the same tick the first
/// one in `platforms` is the one that catches the player.
pub fn resolve_platforms(player: &mut PlayerState, platforms: &[Platform]) -> bool {
    player.grounded = false;

    for platform in platforms {
        if !overlaps(&player.rect(), platform) {
            continue;
        }
        let prev_bottom = player.bottom() - player.vy;
        if player.vy > 0.0 && prev_bottom <= platform.y {
            player.y = platform.y - player.height;
            player.vy = 0.0;
            player.grounded = true;
            player.jumping = false;
        }
    }

    player.grounded
}

/// Collect every uncollected coin the player touches. Returns the indices of
/// coins collected this tick; already-collected coins are skipped.
pub fn collect_coins(player: &PlayerState, coins: &mut [Coin]) -> Vec<usize> {
    let player_rect = player.rect();
    let mut collected = Vec::new();
    for (index, coin) in coins.iter_mut().enumerate() {
        if !coin.collected && overlaps(&player_rect, &coin.rect) {
            coin.collected = true;
            collected.push(index);
        }
    }
    collected
}

/// Advance every enemy one patrol step.
pub fn patrol_enemies(enemies: &mut [Enemy]) {
    for enemy in enemies {
        enemy.patrol();
    }
}

/// Classify contact between the player and one enemy, or `None` if they do
/// not overlap. Stomp and hit are mutually exclusive.
pub fn classify_contact(
    player: &PlayerState,
    enemy: &Enemy,
    stomp_tolerance: f32,
) -> Option<EnemyContact> {
    if !overlaps(&player.rect(), &enemy.rect) {
        return None;
    }
    if player.vy > 0.0 && player.bottom() - stomp_tolerance < enemy.rect.y {
        Some(EnemyContact::Stomp)
    } else {
        Some(EnemyContact::Hit)
    }
}

/// True once the player's top edge has dropped below the world.
pub fn fell_off(player: &PlayerState, world_height: f32) -> bool {
    player.y > world_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::physics::{PLAYER_HEIGHT, PLAYER_WIDTH, STOMP_TOLERANCE};

    fn player_at(x: f32, y: f32, vy: f32) -> PlayerState {
        let mut p = PlayerState::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT);
        p.vy = vy;
        p
    }

    #[test]
    fn landing_from_above_snaps_and_grounds() {
        let platform = Rect::new(200.0, 450.0, 150.0, 20.0);
        // Feet were at 449 before a 2.5 step, now at 451.5.
        let mut player = player_at(250.0, 419.5, 2.5);
        player.jumping = true;

        assert!(resolve_platforms(&mut player, &[platform]));
        assert_eq!(player.y, 418.0);
        assert_eq!(player.vy, 0.0);
        assert!(player.grounded);
        assert!(!player.jumping);
    }

    #[test]
    fn landing_exactly_from_top_edge() {
        let platform = Rect::new(0.0, 550.0, 800.0, 50.0);
        // Resting on the ground: feet at 550, gravity pushed them to 550.5.
        let mut player = player_at(100.0, 518.5, 0.5);
        assert!(resolve_platforms(&mut player, &[platform]));
        assert_eq!(player.y, 518.0);
    }

    #[test]
    fn side_approach_never_grounds() {
        let platform = Rect::new(200.0, 450.0, 150.0, 20.0);
        // Overlapping the platform's side with feet well below its top.
        let mut player = player_at(175.0, 440.5, 0.5);
        assert!(!resolve_platforms(&mut player, &[platform]));
        assert_eq!(player.y, 440.5, "Side contact must not move the player");
        assert_eq!(player.vy, 0.5);
    }

    #[test]
    fn rising_through_platform_passes() {
        let platform = Rect::new(200.0, 450.0, 150.0, 20.0);
        let mut player = player_at(250.0, 445.0, -8.0);
        assert!(!resolve_platforms(&mut player, &[platform]));
        assert_eq!(player.vy, -8.0);
    }

    #[test]
    fn grounded_resets_when_airborne() {
        let mut player = player_at(100.0, 100.0, 1.0);
        player.grounded = true;
        assert!(!resolve_platforms(&mut player, &[]));
        assert!(!player.grounded);
    }

    #[test]
    fn enumeration_order_decides_simultaneous_landings() {
        // Two thin ledges, both crossed from above by a fast fall.
        let upper = Rect::new(0.0, 500.0, 100.0, 10.0);
        let lower = Rect::new(0.0, 505.0, 100.0, 10.0);

        // Feet at 512, were at 497: both tops were crossed.
        let mut player = player_at(10.0, 480.0, 15.0);
        resolve_platforms(&mut player, &[upper, lower]);
        assert_eq!(player.y, 500.0 - PLAYER_HEIGHT);

        let mut player = player_at(10.0, 480.0, 15.0);
        resolve_platforms(&mut player, &[lower, upper]);
        assert_eq!(player.y, 505.0 - PLAYER_HEIGHT);
        assert!(player.grounded);
    }

    #[test]
    fn coin_collected_once() {
        let player = player_at(295.0, 518.0, 0.0);
        let mut coins = vec![Coin::new(300.0, 500.0, 20.0), Coin::new(700.0, 500.0, 20.0)];
        assert_eq!(collect_coins(&player, &mut coins), vec![0]);
        assert!(coins[0].collected);
        assert!(!coins[1].collected);
        assert!(collect_coins(&player, &mut coins).is_empty());
    }

    #[test]
    fn stomp_requires_falling_and_feet_above_top() {
        let enemy = Enemy::new(402.0, 518.0, 30.0, 2.0, 300.0, 500.0);
        // Feet at 522.5, minus tolerance 512.5 < 518.
        let falling = player_at(400.0, 490.5, 2.5);
        assert_eq!(
            classify_contact(&falling, &enemy, STOMP_TOLERANCE),
            Some(EnemyContact::Stomp)
        );

        // Same place but rising: hit.
        let rising = player_at(400.0, 490.5, -2.0);
        assert_eq!(
            classify_contact(&rising, &enemy, STOMP_TOLERANCE),
            Some(EnemyContact::Hit)
        );

        // Falling but feet too deep into the enemy: hit.
        let deep = player_at(400.0, 500.0, 2.5);
        assert_eq!(
            classify_contact(&deep, &enemy, STOMP_TOLERANCE),
            Some(EnemyContact::Hit)
        );
    }

    #[test]
    fn no_contact_when_apart() {
        let enemy = Enemy::new(600.0, 220.0, 30.0, 1.5, 600.0, 750.0);
        let player = player_at(100.0, 400.0, 1.0);
        assert_eq!(classify_contact(&player, &enemy, STOMP_TOLERANCE), None);
    }

    #[test]
    fn patrol_moves_all_enemies() {
        let mut enemies = vec![
            Enemy::new(400.0, 518.0, 30.0, 2.0, 300.0, 500.0),
            Enemy::new(600.0, 220.0, 30.0, 1.5, 600.0, 750.0),
        ];
        patrol_enemies(&mut enemies);
        assert_eq!(enemies[0].rect.x, 402.0);
        assert_eq!(enemies[1].rect.x, 601.5);
    }

    #[test]
    fn fall_off_is_strictly_below_world() {
        assert!(!fell_off(&player_at(100.0, 600.0, 0.0), 600.0));
        assert!(fell_off(&player_at(100.0, 600.5, 0.0), 600.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn enemy_overshoot_bounded(
                x in 300.0f32..=500.0,
                speed in 0.5f32..4.0,
                steps in 1usize..2000
            ) {
                let mut enemies = vec![Enemy::new(x, 0.0, 30.0, speed, 300.0, 500.0)];
                for _ in 0..steps {
                    patrol_enemies(&mut enemies);
                    let e = &enemies[0];
                    prop_assert!(
                        e.rect.x >= e.min_x - speed - 1e-3 && e.rect.x <= e.max_x + speed + 1e-3,
                        "x={} overshot [{}, {}] by more than {}",
                        e.rect.x,
                        e.min_x,
                        e.max_x,
                        speed
                    );
                }
            }

            #[test]
            fn collect_is_idempotent(px in 0.0f32..768.0, py in 0.0f32..568.0) {
                let player = player_at(px, py, 0.0);
                let mut coins = crate::level::Level::classic().initial_coins();
                let first = collect_coins(&player, &mut coins);
                let second = collect_coins(&player, &mut coins);
                prop_assert!(second.is_empty());
                prop_assert_eq!(
                    coins.iter().filter(|c| c.collected).count(),
                    first.len()
                );
            }
        }
    }
}
