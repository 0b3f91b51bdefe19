//! Piece registry
//!
//! The logical side of every live piece. The physics world owns the body;
//! the registry owns the rank. Both sides are always updated together so that
//! each piece maps to exactly one body and back.

use std::collections::BTreeMap;

use super::rank::Rank;
use crate::collab::BodyHandle;

/// Stable identifier for a piece, independent of its body handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(pub u32);

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// A live piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub rank: Rank,
    pub body: BodyHandle,
}

/// Live pieces keyed by body handle (ordered for deterministic iteration)
#[derive(Debug, Clone)]
pub struct PieceRegistry {
    pieces: BTreeMap<BodyHandle, Piece>,
    next_id: u32,
}

impl Default for PieceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceRegistry {
    pub fn new() -> Self {
        Self {
            pieces: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Track a new piece for `body`. A handle already in the registry is
    /// replaced, since the physics world never hands out the same handle twice
    /// for live bodies.
    pub fn insert(&mut self, rank: Rank, body: BodyHandle) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.pieces.insert(body, Piece { id, rank, body });
        id
    }

    pub fn get(&self, body: BodyHandle) -> Option<&Piece> {
        self.pieces.get(&body)
    }

    pub fn remove(&mut self, body: BodyHandle) -> Option<Piece> {
        self.pieces.remove(&body)
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.pieces.contains_key(&body)
    }

    /// Look a piece up by id (linear scan)
    pub fn find(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.values().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub fn count_of_rank(&self, rank: Rank) -> usize {
        self.pieces.values().filter(|p| p.rank == rank).count()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
    }
}
