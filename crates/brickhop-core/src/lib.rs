pub mod game_trait;
pub mod input;

// Re-exported for `game_state_boilerplate!` expansions in game crates.
pub use rmp_serde;
pub use tracing;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{Game, GameEvent};
    use crate::input::FrameInput;

    /// Run N ticks with the same input, returning all accumulated events.
    pub fn run_ticks(game: &mut dyn Game, n: usize, input: &FrameInput) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(input));
        }
        all_events
    }

    /// Run N ticks with no keys held.
    pub fn run_idle_ticks(game: &mut dyn Game, n: usize) -> Vec<GameEvent> {
        run_ticks(game, n, &FrameInput::default())
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed(game: &dyn Game, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every `Game` implementation must pass. Game crates
    // call them from their own #[cfg(test)] modules with a fresh instance.

    /// A fresh game must serialize to non-empty bytes and not be over.
    pub fn contract_fresh_game_is_playing(game: &dyn Game) {
        assert!(
            !game.serialize_state().is_empty(),
            "serialize_state() must return non-empty bytes"
        );
        assert!(!game.is_game_over(), "A fresh game must not be over");
    }

    /// One idle update must change state (gravity, patrols).
    pub fn contract_update_advances_state(game: &mut dyn Game) {
        let before = game.serialize_state();
        game.update(&FrameInput::default());
        assert_game_state_changed(game, &before);
    }

    /// serialize -> apply -> serialize must be stable.
    pub fn contract_state_roundtrip_preserves(game: &mut dyn Game) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize->apply->serialize roundtrip"
        );
    }

    /// Garbage bytes passed to apply_state must leave the state untouched.
    pub fn contract_apply_garbage_state_ignored(game: &mut dyn Game) {
        let before = game.serialize_state();
        game.apply_state(&[0xFF, 0xFE, 0x00, 0x01, 0xAB, 0xCD]);
        assert_eq!(
            before,
            game.serialize_state(),
            "Garbage state must be ignored"
        );
    }

    /// reset() after arbitrary play must restore the freshly-built state.
    pub fn contract_reset_restores_initial(game: &mut dyn Game, ticks: usize) {
        let initial = game.serialize_state();
        let initial_session = game.session();
        let input = FrameInput {
            right: true,
            jump_pressed: true,
            ..Default::default()
        };
        run_ticks(game, ticks, &input);
        game.reset();
        assert_eq!(
            game.serialize_state(),
            initial,
            "reset() must restore the initial state"
        );
        assert_eq!(game.session(), initial_session);
    }

    /// Once over, update() must produce no events and no state change.
    /// The caller is responsible for driving `game` into the over state.
    pub fn contract_game_over_halts(game: &mut dyn Game) {
        assert!(game.is_game_over(), "Precondition: game must be over");
        let before = game.serialize_state();
        let events = run_ticks(
            game,
            10,
            &FrameInput {
                left: true,
                jump_pressed: true,
                ..Default::default()
            },
        );
        assert!(events.is_empty(), "No events after game over");
        assert_eq!(
            before,
            game.serialize_state(),
            "State must not change after game over"
        );
    }
}
