use serde::{Deserialize, Serialize};

use brickhop_core::input::FrameInput;

use crate::entities::PlayerState;
use crate::scoring::ScoringConfig;

/// Gravity added to vertical velocity every tick (units/tick^2, downward).
pub const GRAVITY: f32 = 0.5;
/// Horizontal move speed (units/tick).
pub const MOVE_SPEED: f32 = 5.0;
/// Upward velocity applied on jump.
pub const JUMP_POWER: f32 = 12.0;
/// Player width for AABB collision.
pub const PLAYER_WIDTH: f32 = 32.0;
/// Player height for AABB collision.
pub const PLAYER_HEIGHT: f32 = 32.0;
/// Upward velocity after stomping an enemy.
pub const STOMP_BOUNCE: f32 = 8.0;
/// How far the player's feet may sink past an enemy's top and still stomp.
pub const STOMP_TOLERANCE: f32 = 10.0;
/// World width (screen space).
pub const WORLD_WIDTH: f32 = 800.0;
/// World height; falling below it costs a life.
pub const WORLD_HEIGHT: f32 = 600.0;
/// Spawn and respawn position.
pub const SPAWN_X: f32 = 100.0;
pub const SPAWN_Y: f32 = 400.0;
/// Lives at session start.
pub const STARTING_LIVES: u32 = 3;
/// Refresh rate the per-tick velocities were tuned for.
pub const TICK_RATE_HZ: f32 = 60.0;
/// Accepted tick rate range; outside it the tick period is not representable
/// or rounds to zero.
pub const MIN_TICK_RATE_HZ: f32 = 1.0;
pub const MAX_TICK_RATE_HZ: f32 = 1000.0;

/// Configurable platformer physics parameters, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlatformerPhysicsConfig {
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_power: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub stomp_bounce: f32,
    pub stomp_tolerance: f32,
}

impl Default for PlatformerPhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_power: JUMP_POWER,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            stomp_bounce: STOMP_BOUNCE,
            stomp_tolerance: STOMP_TOLERANCE,
        }
    }
}

/// World bounds and spawn point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            spawn_x: SPAWN_X,
            spawn_y: SPAWN_Y,
        }
    }
}

/// Top-level platformer game configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlatformerConfig {
    pub physics: PlatformerPhysicsConfig,
    pub world: WorldConfig,
    pub scoring: ScoringConfig,
    pub starting_lives: u32,
    pub tick_rate_hz: f32,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            physics: PlatformerPhysicsConfig::default(),
            world: WorldConfig::default(),
            scoring: ScoringConfig::default(),
            starting_lives: STARTING_LIVES,
            tick_rate_hz: TICK_RATE_HZ,
        }
    }
}

/// Replace a tunable that must be finite and strictly positive.
fn positive_or(name: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!(name, value, fallback, "Invalid platformer tunable, using default");
        fallback
    }
}

impl PlatformerConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing or unparseable. The result is always sanitized.
    pub fn load() -> Self {
        let path = std::env::var("BRICKHOP_PLATFORMER_CONFIG")
            .unwrap_or_else(|_| "config/platformer.toml".to_string());
        let config = match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {path}: {e}, using defaults");
                PlatformerConfig::default()
            }),
            Err(_) => PlatformerConfig::default(),
        };
        config.sanitized()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<PlatformerConfig>(content)
    }

    /// Clamp out-of-range values back to safe defaults so bad data never
    /// reaches the simulation.
    pub fn sanitized(mut self) -> Self {
        let d = PlatformerConfig::default();
        let p = &mut self.physics;
        p.gravity = positive_or("gravity", p.gravity, d.physics.gravity);
        p.move_speed = positive_or("move_speed", p.move_speed, d.physics.move_speed);
        p.jump_power = positive_or("jump_power", p.jump_power, d.physics.jump_power);
        p.player_width = positive_or("player_width", p.player_width, d.physics.player_width);
        p.player_height = positive_or("player_height", p.player_height, d.physics.player_height);
        p.stomp_bounce = positive_or("stomp_bounce", p.stomp_bounce, d.physics.stomp_bounce);
        if !p.stomp_tolerance.is_finite() || p.stomp_tolerance < 0.0 {
            tracing::warn!(value = p.stomp_tolerance, "Invalid stomp_tolerance, using default");
            p.stomp_tolerance = d.physics.stomp_tolerance;
        }

        let w = &mut self.world;
        w.width = positive_or("world.width", w.width, d.world.width);
        w.height = positive_or("world.height", w.height, d.world.height);
        if w.width < self.physics.player_width {
            tracing::warn!(width = w.width, "World narrower than the player, using defaults");
            w.width = d.world.width;
            self.physics.player_width = d.physics.player_width;
        }
        let max_x = w.width - self.physics.player_width;
        if !w.spawn_x.is_finite() {
            w.spawn_x = d.world.spawn_x;
        }
        w.spawn_x = w.spawn_x.clamp(0.0, max_x);
        if !w.spawn_y.is_finite() {
            w.spawn_y = d.world.spawn_y;
        }
        let max_y = (w.height - self.physics.player_height).max(0.0);
        if !(0.0..=max_y).contains(&w.spawn_y) {
            tracing::warn!(spawn_y = w.spawn_y, max_y, "spawn_y outside the world, clamping");
            w.spawn_y = w.spawn_y.clamp(0.0, max_y);
        }

        if self.starting_lives == 0 {
            tracing::warn!("starting_lives must be > 0, using {STARTING_LIVES}");
            self.starting_lives = STARTING_LIVES;
        }
        self.tick_rate_hz = positive_or("tick_rate_hz", self.tick_rate_hz, d.tick_rate_hz);
        if !(MIN_TICK_RATE_HZ..=MAX_TICK_RATE_HZ).contains(&self.tick_rate_hz) {
            tracing::warn!(value = self.tick_rate_hz, "tick_rate_hz out of range, clamping");
            self.tick_rate_hz = self.tick_rate_hz.clamp(MIN_TICK_RATE_HZ, MAX_TICK_RATE_HZ);
        }
        self
    }
}

/// Advance the player one tick: jump, horizontal move + clamp, gravity,
/// vertical move. Returns true if a jump started this tick.
///
/// The jump is evaluated first, against the `grounded` flag left by the
/// previous tick's platform pass.
pub fn tick_player(
    player: &mut PlayerState,
    input: &FrameInput,
    physics: &PlatformerPhysicsConfig,
    world: &WorldConfig,
) -> bool {
    let jumped = input.jump_pressed && player.grounded;
    if jumped {
        player.vy = -physics.jump_power;
        player.jumping = true;
        player.grounded = false;
    }

    player.vx = input.move_dir() * physics.move_speed;
    player.x += player.vx;
    clamp_to_world(player, world);

    player.vy += physics.gravity;
    player.y += player.vy;

    jumped
}

/// Keep the player inside `[0, world.width - player.width]`.
pub fn clamp_to_world(player: &mut PlayerState, world: &WorldConfig) {
    let max_x = (world.width - player.width).max(0.0);
    player.x = player.x.clamp(0.0, max_x);
}
