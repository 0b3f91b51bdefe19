//! Merge Drop - a drop-and-merge physics puzzle engine
//!
//! Core modules:
//! - `sim`: Merge resolution and game state (ranks, pieces, spawning, scoring)
//! - `collab`: Seams to the physics simulator and the presentation layer
//! - `settings`: Data-driven rulesets and play-field configuration

pub mod collab;
pub mod settings;
pub mod sim;

pub use settings::{FieldConfig, MaterialConfig, Ruleset, Settings, TerminalMerge};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the physics collaborator's native rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted by the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play-field dimensions (screen coordinates, y grows downward)
    pub const FIELD_WIDTH: f32 = 600.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Pieces whose center rises above this line end the game
    pub const FIELD_TOP: f32 = 0.0;
    /// Floor and side wall thickness
    pub const WALL_THICKNESS: f32 = 20.0;

    /// Piece material
    pub const PIECE_FRICTION: f32 = 0.005;
    pub const PIECE_RESTITUTION: f32 = 0.3;

    /// Downward gravity scale handed to the physics collaborator
    pub const GRAVITY_Y: f32 = 1.0;
}
