use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Platforms are plain static rectangles.
pub type Platform = Rect;

/// The single player-controlled sprite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
    pub jumping: bool,
    pub grounded: bool,
}

impl PlayerState {
    pub fn new(spawn_x: f32, spawn_y: f32, width: f32, height: f32) -> Self {
        Self {
            x: spawn_x,
            y: spawn_y,
            width,
            height,
            vx: 0.0,
            vy: 0.0,
            jumping: false,
            grounded: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Put the player back at the spawn point, keeping horizontal velocity
    /// (it is recomputed from input every tick anyway).
    pub fn respawn(&mut self, spawn_x: f32, spawn_y: f32) {
        self.x = spawn_x;
        self.y = spawn_y;
        self.vy = 0.0;
        self.jumping = false;
        self.grounded = false;
    }
}

/// A collectible coin. Coins are never destroyed, only toggled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coin {
    pub rect: Rect,
    pub collected: bool,
}

impl Coin {
    pub const fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            rect: Rect::new(x, y, size, size),
            collected: false,
        }
    }
}

/// A patrolling enemy walking back and forth between `min_x` and `max_x`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    pub vx: f32,
    pub min_x: f32,
    pub max_x: f32,
}

impl Enemy {
    pub const fn new(x: f32, y: f32, size: f32, vx: f32, min_x: f32, max_x: f32) -> Self {
        Self {
            rect: Rect::new(x, y, size, size),
            vx,
            min_x,
            max_x,
        }
    }

    /// Advance one patrol step. The direction flips on the step that reaches
    /// or passes a bound, so x can overshoot by at most `|vx|`.
    pub fn patrol(&mut self) {
        self.rect.x += self.vx;
        if self.rect.x <= self.min_x || self.rect.x >= self.max_x {
            self.vx = -self.vx;
        }
    }
}
