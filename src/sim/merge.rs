//! Merge resolver
//!
//! Consumes the collision pairs reported for one simulation step. Pairs are
//! handled strictly in report order and a piece consumed by an earlier pair
//! is never touched again in the same step, so a piece caught in several
//! simultaneous contacts merges at most once.

use std::collections::HashSet;

use super::drop::place_piece;
use super::state::{GameEvent, GameState};
use crate::collab::{BodyHandle, CollisionPair, PhysicsWorld, Presentation};
use crate::settings::TerminalMerge;

/// What one call to [`resolve_collisions`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Pairs that produced a successor piece
    pub merges: u32,
    /// Terminal pairs removed without a successor
    pub vanished: u32,
    pub points: u64,
}

/// Resolve one step's collision pairs
pub fn resolve_collisions<P: PhysicsWorld, V: Presentation>(
    state: &mut GameState,
    physics: &mut P,
    presentation: &mut V,
    pairs: &[CollisionPair],
) -> MergeSummary {
    let mut summary = MergeSummary::default();
    if state.is_over() {
        return summary;
    }

    let mut consumed: HashSet<BodyHandle> = HashSet::new();

    for pair in pairs {
        if pair.a == pair.b {
            continue;
        }
        // Walls, floor and stale handles are not pieces
        let (Some(a), Some(b)) = (state.pieces.get(pair.a), state.pieces.get(pair.b)) else {
            log::trace!("Skipping pair {} / {}: not both pieces", pair.a, pair.b);
            continue;
        };
        let (a, b) = (*a, *b);

        if consumed.contains(&a.body) || consumed.contains(&b.body) {
            log::trace!("Skipping pair {} / {}: already merged this step", a.id, b.id);
            continue;
        }
        if a.rank != b.rank {
            continue;
        }

        let rank = a.rank;
        let successor_rank = match state.ranks.successor(rank) {
            Some(next) => Some(next),
            None => match state.rules.terminal_merge {
                TerminalMerge::Vanish => None,
                TerminalMerge::Clamp => Some(rank),
            },
        };

        // The successor appears where the first body of the pair was
        let anchor = match successor_rank {
            Some(_) => match physics.position(a.body) {
                Some(pos) => Some(pos),
                None => {
                    log::debug!("Skipping merge of {} / {}: no position for {}", a.id, b.id, a.body);
                    continue;
                }
            },
            None => None,
        };

        let points = rank.points();
        let total = state.score.award(points);
        summary.points += points;

        state.pieces.remove(a.body);
        state.pieces.remove(b.body);
        physics.remove_body(a.body);
        physics.remove_body(b.body);
        consumed.insert(a.body);
        consumed.insert(b.body);

        match (successor_rank, anchor) {
            (Some(next), Some(pos)) => {
                let successor = place_piece(state, physics, next, pos);
                log::debug!(
                    "Merged {} + {} ({}) into {} {} (+{} = {})",
                    a.id,
                    b.id,
                    state.ranks.label_of(rank),
                    state.ranks.label_of(next),
                    successor,
                    points,
                    total
                );
                state.events.push(GameEvent::Merged {
                    consumed: [a.id, b.id],
                    rank,
                    successor,
                    points,
                });
                summary.merges += 1;
            }
            _ => {
                log::debug!(
                    "Terminal merge of {} + {} ({}) cleared (+{} = {})",
                    a.id,
                    b.id,
                    state.ranks.label_of(rank),
                    points,
                    total
                );
                state.events.push(GameEvent::Vanished {
                    consumed: [a.id, b.id],
                    rank,
                    points,
                });
                summary.vanished += 1;
            }
        }

        presentation.update_score_display(total);
    }

    summary
}
