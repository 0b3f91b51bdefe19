//! Game-over monitor
//!
//! Runs after every physics step. A piece whose center sits above the top
//! line ends the game. Upward bounces can trip this briefly; the ruleset's
//! grace steps require the breach to persist before it counts.

use super::state::{GameEvent, GamePhase, GameState};
use crate::collab::{PhysicsWorld, Presentation};

/// True if any live piece is above the top line right now
pub fn any_piece_above_top<P: PhysicsWorld>(state: &GameState, physics: &P) -> bool {
    let top = state.field.top;
    state
        .pieces
        .iter()
        .filter_map(|piece| physics.position(piece.body))
        .any(|pos| pos.y < top)
}

/// Check the top line and end the game if it was crossed
///
/// Returns true only on the step that ends the game.
pub fn check_game_over<P: PhysicsWorld, V: Presentation>(
    state: &mut GameState,
    physics: &mut P,
    presentation: &mut V,
) -> bool {
    if state.is_over() {
        return false;
    }

    if !any_piece_above_top(state, physics) {
        state.breach_steps = 0;
        return false;
    }

    state.breach_steps += 1;
    if state.breach_steps <= state.rules.game_over_grace_steps {
        log::trace!(
            "Piece above top line ({}/{} grace steps)",
            state.breach_steps,
            state.rules.game_over_grace_steps
        );
        return false;
    }

    state.phase = GamePhase::Over;
    physics.stop_loop();
    presentation.show_game_over_banner();
    state.events.push(GameEvent::GameOver {
        score: state.score.total(),
    });
    log::info!(
        "Game over after {} steps: score {}, {} merges, {} pieces on the board",
        state.steps,
        state.score.total(),
        state.score.merges(),
        state.pieces.len()
    );
    true
}
