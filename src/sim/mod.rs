//! Merge resolution and game state
//!
//! All gameplay decisions live here. This module never simulates motion or
//! draws anything:
//! - Bodies are reached only through `collab::PhysicsWorld`
//! - Seeded RNG only
//! - Stable iteration order (registry keyed by body handle)
//! - Pairs resolved strictly in report order

pub mod drop;
pub mod error;
pub mod merge;
pub mod monitor;
pub mod piece;
pub mod rank;
pub mod spawn;
pub mod state;
pub mod tick;

pub use drop::{drop_piece, drop_random, piece_body};
pub use error::ConfigError;
pub use merge::{MergeSummary, resolve_collisions};
pub use monitor::{any_piece_above_top, check_game_over};
pub use piece::{Piece, PieceId, PieceRegistry};
pub use rank::{Color, Rank, RankSpec, RankTable};
pub use spawn::SpawnSelector;
pub use state::{GameEvent, GamePhase, GameState, ScoreLedger};
pub use tick::{DropRequest, Game};
