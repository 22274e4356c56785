use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::input::FrameInput;

/// Core trait the frame driver runs.
///
/// The driver owns scheduling, input collection and rendering hand-off;
/// the game only advances its own simulation one fixed tick at a time.
pub trait Game: Send {
    /// Game metadata (name, description, control instructions).
    fn metadata(&self) -> GameMetadata;

    /// Advance the simulation by exactly one tick. Returns the gameplay
    /// events produced during the tick.
    ///
    /// Must be a no-op returning no events once the session is over.
    fn update(&mut self, input: &FrameInput) -> Vec<GameEvent>;

    /// Serialize the simulation state for a renderer in another task.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the simulation state with previously serialized bytes.
    /// Undecodable input is ignored.
    fn apply_state(&mut self, state: &[u8]);

    /// Restore the session and every entity to the initial configuration.
    fn reset(&mut self);

    /// Session counters observable after each update.
    fn session(&self) -> SessionStatus;

    /// Logical ticks per second. Velocities are expressed per tick, so this
    /// is also the rate the display is expected to refresh at.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Whether the session has reached its terminal state.
    fn is_game_over(&self) -> bool {
        self.session().game_over
    }
}

/// Game metadata shown by a host before play starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub estimated_round_duration: Duration,
}

/// Score, lives and the terminal flag, as read by UI chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub score: u32,
    pub lives: u32,
    pub game_over: bool,
}

/// Events emitted by a game during update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CoinCollected { index: usize, score: u32 },
    EnemyStomped { score: u32 },
    LifeLost { lives: u32 },
    LevelCleared { score: u32 },
    GameOver { final_score: u32 },
}

/// Generates the `Game` methods that are identical for any game whose
/// simulation state is a single serde value: `serialize_state` and
/// `apply_state`.
///
/// Requires the implementing struct to have a `state: $StateType` field.
/// With `validate: path`, decoded state is passed to
/// `fn(&$StateType) -> Result<(), &'static str>` and rejected states are
/// ignored like undecodable bytes.
#[macro_export]
macro_rules! game_state_boilerplate {
    (state_type: $StateType:ty) => {
        $crate::game_state_boilerplate!(state_type: $StateType, validate: $crate::game_trait::accept_any);
    };
    (state_type: $StateType:ty, validate: $validate:path) => {
        fn serialize_state(&self) -> Vec<u8> {
            $crate::rmp_serde::to_vec(&self.state).expect("game state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match $crate::rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => match $validate(&s) {
                    Ok(()) => self.state = s,
                    Err(reason) => {
                        $crate::tracing::debug!(reason, "Ignoring inconsistent game state")
                    },
                },
                Err(e) => $crate::tracing::debug!(error = %e, "Ignoring undecodable game state"),
            }
        }
    };
}

/// Default `validate` for [`game_state_boilerplate!`]: every decoded state
/// is accepted.
pub fn accept_any<T>(_state: &T) -> Result<(), &'static str> {
    Ok(())
}
