use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Semantic keys the simulation understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    MoveLeft,
    MoveRight,
    Jump,
}

impl Key {
    /// Map a host key name to a semantic key.
    ///
    /// Accepts both DOM `KeyboardEvent.key` values (`"a"`, `" "`) and
    /// `KeyboardEvent.code` values (`"KeyA"`, `"Space"`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "a" | "A" | "KeyA" => Some(Key::MoveLeft),
            "ArrowRight" | "d" | "D" | "KeyD" => Some(Key::MoveRight),
            " " | "Space" => Some(Key::Jump),
            _ => None,
        }
    }
}

/// Input as seen by one simulation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    /// A jump press edge was observed since the previous tick.
    pub jump_pressed: bool,
}

impl FrameInput {
    /// Horizontal direction: -1, 0 or +1. Right wins when both are held.
    pub fn move_dir(&self) -> f32 {
        if self.right {
            1.0
        } else if self.left {
            -1.0
        } else {
            0.0
        }
    }
}

/// Held-key state, updated from host key events between ticks.
///
/// Key events are reduced to last-write-wins `held` flags rather than
/// queued. Jump additionally arms a one-shot latch on its press edge so a
/// tap shorter than one tick is not lost; the latch is consumed by
/// [`InputState::take_frame`].
#[derive(Debug, Default)]
pub struct InputState {
    held: HashMap<Key, bool>,
    jump_latch: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns false for keys with no binding.
    pub fn on_key_down(&mut self, code: &str) -> bool {
        match Key::from_code(code) {
            Some(key) => {
                self.press(key);
                true
            },
            None => {
                tracing::trace!(code, "Ignoring unbound key");
                false
            },
        }
    }

    /// Record a key release. Returns false for keys with no binding.
    pub fn on_key_up(&mut self, code: &str) -> bool {
        match Key::from_code(code) {
            Some(key) => {
                self.release(key);
                true
            },
            None => false,
        }
    }

    pub fn press(&mut self, key: Key) {
        let was_held = self.is_held(key);
        self.held.insert(key, true);
        // Auto-repeat key-down events do not re-arm the latch.
        if key == Key::Jump && !was_held {
            self.jump_latch = true;
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.insert(key, false);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.get(&key).copied().unwrap_or(false)
    }

    /// Snapshot the input for the next tick and consume the jump latch.
    pub fn take_frame(&mut self) -> FrameInput {
        FrameInput {
            left: self.is_held(Key::MoveLeft),
            right: self.is_held(Key::MoveRight),
            jump_pressed: std::mem::take(&mut self.jump_latch),
        }
    }

    /// Release every key and drop any pending jump.
    pub fn clear(&mut self) {
        self.held.clear();
        self.jump_latch = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_and_up() {
        let mut input = InputState::new();
        assert!(input.on_key_down("ArrowLeft"));
        assert!(input.is_held(Key::MoveLeft));
        assert!(input.on_key_up("ArrowLeft"));
        assert!(!input.is_held(Key::MoveLeft));
    }

    #[test]
    fn bindings_cover_letters_and_arrows() {
        assert_eq!(Key::from_code("a"), Some(Key::MoveLeft));
        assert_eq!(Key::from_code("KeyA"), Some(Key::MoveLeft));
        assert_eq!(Key::from_code("d"), Some(Key::MoveRight));
        assert_eq!(Key::from_code("ArrowRight"), Some(Key::MoveRight));
        assert_eq!(Key::from_code(" "), Some(Key::Jump));
        assert_eq!(Key::from_code("Space"), Some(Key::Jump));
        assert_eq!(Key::from_code("Escape"), None);
    }

    #[test]
    fn unbound_key_is_ignored() {
        let mut input = InputState::new();
        assert!(!input.on_key_down("KeyQ"));
        assert_eq!(input.take_frame(), FrameInput::default());
    }

    #[test]
    fn repeated_key_down_is_idempotent() {
        let mut input = InputState::new();
        input.on_key_down("d");
        input.on_key_down("d");
        input.on_key_down("ArrowRight");
        let frame = input.take_frame();
        assert!(frame.right);
        assert!(!frame.left);
    }

    #[test]
    fn jump_latch_consumed_once() {
        let mut input = InputState::new();
        input.on_key_down(" ");
        assert!(input.take_frame().jump_pressed);
        // Still held, but no new edge.
        assert!(!input.take_frame().jump_pressed);
    }

    #[test]
    fn jump_tap_between_ticks_not_lost() {
        let mut input = InputState::new();
        input.on_key_down("Space");
        input.on_key_up("Space");
        let frame = input.take_frame();
        assert!(frame.jump_pressed, "Tap released before the tick must still jump");
    }

    #[test]
    fn auto_repeat_does_not_rearm_jump() {
        let mut input = InputState::new();
        input.on_key_down(" ");
        let _ = input.take_frame();
        input.on_key_down(" ");
        assert!(!input.take_frame().jump_pressed);

        input.on_key_up(" ");
        input.on_key_down(" ");
        assert!(input.take_frame().jump_pressed);
    }

    #[test]
    fn right_overrides_left() {
        let frame = FrameInput {
            left: true,
            right: true,
            jump_pressed: false,
        };
        assert_eq!(frame.move_dir(), 1.0);
        let left_only = FrameInput {
            left: true,
            ..Default::default()
        };
        assert_eq!(left_only.move_dir(), -1.0);
        assert_eq!(FrameInput::default().move_dir(), 0.0);
    }

    #[test]
    fn clear_releases_everything() {
        let mut input = InputState::new();
        input.on_key_down("a");
        input.on_key_down(" ");
        input.clear();
        assert_eq!(input.take_frame(), FrameInput::default());
    }
}
