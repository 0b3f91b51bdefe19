//! Game state and core simulation types
//!
//! Everything the engine decides about lives here: the rank ladder, the live
//! pieces, the score, the upcoming spawn and the phase. Bodies themselves
//! belong to the physics world.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::error::ConfigError;
use super::piece::{PieceId, PieceRegistry};
use super::rank::{Rank, RankTable};
use super::spawn::SpawnSelector;
use crate::settings::{FieldConfig, MaterialConfig, Ruleset, Settings};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Pieces can be dropped and merged
    Running,
    /// A piece crossed the top line; terminal until restart
    Over,
}

/// Observable record of an engine decision
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Dropped {
        piece: PieceId,
        rank: Rank,
        pos: Vec2,
    },
    /// Two pieces became one of the next rank
    Merged {
        consumed: [PieceId; 2],
        rank: Rank,
        successor: PieceId,
        points: u64,
    },
    /// Two terminal pieces were removed without a successor
    Vanished {
        consumed: [PieceId; 2],
        rank: Rank,
        points: u64,
    },
    GameOver {
        score: u64,
    },
}

/// Running score. Only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    total: u64,
    merges: u32,
}

impl ScoreLedger {
    /// Bank the points for one merge
    pub fn award(&mut self, points: u64) -> u64 {
        self.total = self.total.saturating_add(points);
        self.merges += 1;
        self.total
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Merges completed so far
    pub fn merges(&self) -> u32 {
        self.merges
    }
}

/// Complete game state, owned by the loop driver
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG for spawn ranks and random drop positions
    pub rng: Pcg32,
    pub ranks: RankTable,
    pub rules: Ruleset,
    pub field: FieldConfig,
    pub material: MaterialConfig,
    pub pieces: PieceRegistry,
    pub score: ScoreLedger,
    pub spawn: SpawnSelector,
    pub phase: GamePhase,
    /// Simulation steps completed
    pub steps: u64,
    /// Consecutive steps with a piece above the top line
    pub breach_steps: u32,
    /// Decisions since the driver last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh game from validated settings
    pub fn new(settings: &Settings, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;
        let ranks = settings.rank_table()?;
        let spawn = SpawnSelector::new(&ranks, settings.ruleset.reserved_top_ranks)?;

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ranks,
            rules: settings.ruleset.clone(),
            field: settings.field,
            material: settings.material,
            pieces: PieceRegistry::new(),
            score: ScoreLedger::default(),
            spawn,
            phase: GamePhase::Running,
            steps: 0,
            breach_steps: 0,
            events: Vec::new(),
        })
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    /// Rank the next drop will use
    pub fn next_rank(&self) -> Rank {
        self.spawn.current()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
