//! Drop controller
//!
//! Turns a drop request into a live piece of the currently selected rank,
//! then advances the spawner.

use glam::Vec2;
use rand::Rng;

use super::piece::PieceId;
use super::rank::Rank;
use super::state::{GameEvent, GameState};
use crate::collab::{BodyDesc, Material, PhysicsWorld, Presentation, Shape};

/// Body description for a piece of `rank`
pub fn piece_body(state: &GameState, rank: Rank) -> BodyDesc {
    BodyDesc {
        shape: Shape::Circle {
            radius: state.ranks.radius_of(rank),
        },
        material: Material {
            friction: state.material.friction,
            restitution: state.material.restitution,
            is_static: false,
        },
        color: Some(state.ranks.color_of(rank)),
    }
}

/// Create the body and the registry entry for a piece in one go
pub(crate) fn place_piece<P: PhysicsWorld>(
    state: &mut GameState,
    physics: &mut P,
    rank: Rank,
    pos: Vec2,
) -> PieceId {
    let body = physics.create_body(&piece_body(state, rank), pos);
    state.pieces.insert(rank, body)
}

/// Drop the selected piece at `x` (and `y`, default the top line)
///
/// Ignored once the game is over. `x` is clamped so the piece starts between
/// the walls.
pub fn drop_piece<P: PhysicsWorld, V: Presentation>(
    state: &mut GameState,
    physics: &mut P,
    presentation: &mut V,
    x: f32,
    y: Option<f32>,
) -> Option<PieceId> {
    if state.is_over() {
        log::debug!("Drop at x={} ignored: game over", x);
        return None;
    }

    let rank = state.spawn.current();
    let radius = state.ranks.radius_of(rank);
    let pos = Vec2::new(
        state.field.clamp_x(x, radius),
        y.filter(|y| y.is_finite()).unwrap_or(state.field.top),
    );

    let piece = place_piece(state, physics, rank, pos);
    log::debug!(
        "Dropped {} {} at ({:.1}, {:.1})",
        state.ranks.label_of(rank),
        piece,
        pos.x,
        pos.y
    );
    state.events.push(GameEvent::Dropped { piece, rank, pos });

    let GameState {
        spawn, rng, ranks, ..
    } = state;
    spawn.select_next(rng, ranks, presentation);

    Some(piece)
}

/// Drop the selected piece at a random position along the top line
pub fn drop_random<P: PhysicsWorld, V: Presentation>(
    state: &mut GameState,
    physics: &mut P,
    presentation: &mut V,
) -> Option<PieceId> {
    if state.is_over() {
        log::debug!("Random drop ignored: game over");
        return None;
    }
    let x = state.rng.random_range(0.0..state.field.width);
    drop_piece(state, physics, presentation, x, None)
}
