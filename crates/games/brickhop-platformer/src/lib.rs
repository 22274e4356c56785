pub mod collision;
pub mod entities;
pub mod geometry;
pub mod level;
pub mod physics;
pub mod scoring;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use brickhop_core::game_state_boilerplate;
use brickhop_core::game_trait::{Game, GameEvent, GameMetadata, SessionStatus};
use brickhop_core::input::FrameInput;

use collision::EnemyContact;
use entities::{Coin, Enemy, PlayerState};
use geometry::Rect;
use level::Level;
use physics::PlatformerConfig;

/// Upper bound accepted by [`Platformer::reset_with_lives`].
pub const MAX_LIVES: i64 = 99;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Playing,
    /// Terminal until an external reset.
    GameOver,
}

/// Serializable simulation state: every mutable entity plus the session
/// counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlatformerState {
    pub player: PlayerState,
    pub coins: Vec<Coin>,
    pub enemies: Vec<Enemy>,
    pub score: u32,
    pub lives: u32,
    pub phase: SessionPhase,
    pub tick: u64,
}

impl PlatformerState {
    /// The state a session starts (and restarts) in.
    pub fn initial(config: &PlatformerConfig, level: &Level) -> Self {
        Self {
            player: PlayerState::new(
                config.world.spawn_x,
                config.world.spawn_y,
                config.physics.player_width,
                config.physics.player_height,
            ),
            coins: level.initial_coins(),
            enemies: level.initial_enemies(),
            score: 0,
            lives: config.starting_lives,
            phase: SessionPhase::Playing,
            tick: 0,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// Reject states no update sequence can produce: the session is over
    /// exactly when no lives remain.
    pub fn check_consistent(&self) -> Result<(), &'static str> {
        match (self.phase, self.lives) {
            (SessionPhase::Playing, 0) => Err("playing with zero lives"),
            (SessionPhase::GameOver, n) if n > 0 => Err("game over with lives left"),
            _ => Ok(()),
        }
    }

    pub fn session(&self) -> SessionStatus {
        SessionStatus {
            score: self.score,
            lives: self.lives,
            game_over: self.is_game_over(),
        }
    }
}

/// Borrowed view of everything a renderer draws for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderSnapshot<'a> {
    pub player: &'a PlayerState,
    pub platforms: &'a [Rect],
    pub coins: &'a [Coin],
    pub enemies: &'a [Enemy],
    pub session: SessionStatus,
}

/// Rejected reset requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetError {
    /// Lives must be in `1..=MAX_LIVES`.
    InvalidLives(i64),
}

impl std::fmt::Display for ResetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLives(n) => write!(f, "lives must be between 1 and {MAX_LIVES}, got {n}"),
        }
    }
}

impl std::error::Error for ResetError {}

/// The platformer: one player, a fixed level, score and lives.
pub struct Platformer {
    config: PlatformerConfig,
    level: Level,
    state: PlatformerState,
}

impl Platformer {
    pub fn new() -> Self {
        Self::with_config(PlatformerConfig::default())
    }

    /// Build a game from a config. The config is sanitized first.
    pub fn with_config(config: PlatformerConfig) -> Self {
        let config = config.sanitized();
        let level = Level::classic();
        let state = PlatformerState::initial(&config, &level);
        Self {
            config,
            level,
            state,
        }
    }

    pub fn state(&self) -> &PlatformerState {
        &self.state
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn config(&self) -> &PlatformerConfig {
        &self.config
    }

    /// Read-only view for a renderer.
    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            player: &self.state.player,
            platforms: &self.level.platforms,
            coins: &self.state.coins,
            enemies: &self.state.enemies,
            session: self.state.session(),
        }
    }

    /// Reset with a custom number of lives. Out-of-range values are
    /// rejected and leave the current session untouched.
    pub fn reset_with_lives(&mut self, lives: i64) -> Result<(), ResetError> {
        if !(1..=MAX_LIVES).contains(&lives) {
            return Err(ResetError::InvalidLives(lives));
        }
        let lives = u32::try_from(lives).map_err(|_| ResetError::InvalidLives(lives))?;
        self.reset();
        self.state.lives = lives;
        Ok(())
    }

    /// Take one life, respawn the player, and enter game over at zero.
    /// Returns true if the session just ended.
    fn lose_life(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let world = &self.config.world;
        self.state.lives = self.state.lives.saturating_sub(1);
        self.state.player.respawn(world.spawn_x, world.spawn_y);
        events.push(GameEvent::LifeLost {
            lives: self.state.lives,
        });
        tracing::debug!(lives = self.state.lives, tick = self.state.tick, "Life lost");

        if self.state.lives == 0 {
            self.state.phase = SessionPhase::GameOver;
            events.push(GameEvent::GameOver {
                final_score: self.state.score,
            });
            tracing::info!(score = self.state.score, tick = self.state.tick, "Game over");
            return true;
        }
        false
    }

    /// Resolve every enemy the player touches. Stomped enemies are removed
    /// in place; each enemy is looked at once. Returns true on game over.
    fn resolve_enemy_contacts(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let tolerance = self.config.physics.stomp_tolerance;
        let mut i = 0;
        while i < self.state.enemies.len() {
            match collision::classify_contact(&self.state.player, &self.state.enemies[i], tolerance)
            {
                Some(EnemyContact::Stomp) => {
                    self.state.enemies.remove(i);
                    self.state.score = scoring::award(self.state.score, self.config.scoring.stomp);
                    self.state.player.vy = -self.config.physics.stomp_bounce;
                    events.push(GameEvent::EnemyStomped {
                        score: self.state.score,
                    });
                    tracing::debug!(score = self.state.score, "Enemy stomped");
                    continue;
                },
                Some(EnemyContact::Hit) => {
                    if self.lose_life(events) {
                        return true;
                    }
                },
                None => {},
            }
            i += 1;
        }
        false
    }

    /// All coins collected and no enemies left: bonus and full respawn.
    fn check_level_clear(&mut self, events: &mut Vec<GameEvent>) {
        let all_collected = self.state.coins.iter().all(|c| c.collected);
        if !all_collected || !self.state.enemies.is_empty() {
            return;
        }
        self.state.score = scoring::award(self.state.score, self.config.scoring.level_clear);
        self.state.coins = self.level.initial_coins();
        self.state.enemies = self.level.initial_enemies();
        events.push(GameEvent::LevelCleared {
            score: self.state.score,
        });
        tracing::info!(score = self.state.score, "Level cleared, respawning coins and enemies");
    }
}

impl Default for Platformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Platformer {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Brickhop".to_string(),
            description: "Collect every coin and stomp every enemy!".to_string(),
            instructions: "Arrow Keys or A/D to move | Space to jump | \
                           Jump on enemies to defeat them | Collect all coins!"
                .to_string(),
            estimated_round_duration: Duration::from_secs(120),
        }
    }

    fn tick_rate(&self) -> f32 {
        self.config.tick_rate_hz
    }

    fn update(&mut self, input: &FrameInput) -> Vec<GameEvent> {
        if self.state.is_game_over() {
            return Vec::new();
        }

        self.state.tick += 1;
        let mut events = Vec::new();

        physics::tick_player(
            &mut self.state.player,
            input,
            &self.config.physics,
            &self.config.world,
        );

        collision::resolve_platforms(&mut self.state.player, &self.level.platforms);

        for index in collision::collect_coins(&self.state.player, &mut self.state.coins) {
            self.state.score = scoring::award(self.state.score, self.config.scoring.coin);
            events.push(GameEvent::CoinCollected {
                index,
                score: self.state.score,
            });
            tracing::debug!(index, score = self.state.score, "Coin collected");
        }

        collision::patrol_enemies(&mut self.state.enemies);

        if self.resolve_enemy_contacts(&mut events) {
            return events;
        }

        if collision::fell_off(&self.state.player, self.config.world.height)
            && self.lose_life(&mut events)
        {
            return events;
        }

        self.check_level_clear(&mut events);

        events
    }

    game_state_boilerplate!(
        state_type: PlatformerState,
        validate: PlatformerState::check_consistent
    );

    fn reset(&mut self) {
        self.state = PlatformerState::initial(&self.config, &self.level);
        tracing::info!("Session reset");
    }

    fn session(&self) -> SessionStatus {
        self.state.session()
    }
}
