//! Game settings and rulesets
//!
//! Loaded from JSON; every field falls back to the classic ruleset.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::error::ConfigError;
use crate::sim::rank::{RankSpec, RankTable, fruit_ranks};
use crate::sim::spawn::SpawnSelector;

/// What a merge of two terminal-rank pieces produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalMerge {
    /// Both pieces disappear; the merge only banks points
    #[default]
    Vanish,
    /// A fresh terminal-rank piece replaces the pair
    Clamp,
}

/// Merge and spawn rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    /// Top ranks that can only be reached by merging
    pub reserved_top_ranks: usize,
    pub terminal_merge: TerminalMerge,
    /// Consecutive steps a piece may sit above the top line before the game
    /// ends (0 ends it on the first step)
    pub game_over_grace_steps: u32,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self {
            reserved_top_ranks: 0,
            terminal_merge: TerminalMerge::Vanish,
            game_over_grace_steps: 0,
        }
    }
}

impl Ruleset {
    /// Variant that keeps the three largest ranks out of the spawner
    pub fn merge_only_top() -> Self {
        Self {
            reserved_top_ranks: 3,
            ..Self::default()
        }
    }
}

/// Play-field geometry (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    /// Pieces above this line end the game; also the default drop height
    pub top: f32,
    pub wall_thickness: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            top: FIELD_TOP,
            wall_thickness: WALL_THICKNESS,
        }
    }
}

impl FieldConfig {
    /// Inner face of the left wall
    pub fn inner_left(&self) -> f32 {
        self.wall_thickness / 2.0
    }

    /// Inner face of the right wall
    pub fn inner_right(&self) -> f32 {
        self.width - self.wall_thickness / 2.0
    }

    /// Keep a circle of `radius` centered at `x` between the walls
    pub fn clamp_x(&self, x: f32, radius: f32) -> f32 {
        let lo = self.inner_left() + radius;
        let hi = self.inner_right() - radius;
        if lo > hi {
            // Piece wider than the field: center it
            return self.width / 2.0;
        }
        if x.is_nan() {
            return self.width / 2.0;
        }
        x.clamp(lo, hi)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(ConfigError::InvalidField("width must be positive"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ConfigError::InvalidField("height must be positive"));
        }
        if !(self.wall_thickness.is_finite() && self.wall_thickness >= 0.0) {
            return Err(ConfigError::InvalidField("wall thickness must not be negative"));
        }
        if self.wall_thickness >= self.width {
            return Err(ConfigError::InvalidField("walls leave no room"));
        }
        if !self.top.is_finite() || self.top >= self.height {
            return Err(ConfigError::InvalidField("top line must lie inside the field"));
        }
        Ok(())
    }
}

/// Physical properties of dropped pieces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            friction: PIECE_FRICTION,
            restitution: PIECE_RESTITUTION,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ruleset: Ruleset,
    pub field: FieldConfig,
    pub material: MaterialConfig,
    /// Downward gravity handed to the physics world
    pub gravity_y: f32,
    /// Merge ladder, smallest first
    pub ranks: Vec<RankSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ruleset: Ruleset::default(),
            field: FieldConfig::default(),
            material: MaterialConfig::default(),
            gravity_y: GRAVITY_Y,
            ranks: fruit_ranks(),
        }
    }
}

impl Settings {
    /// Classic ladder with the top three ranks kept merge-only
    pub fn alternate() -> Self {
        Self {
            ruleset: Ruleset::merge_only_top(),
            ..Self::default()
        }
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings from {} ({} ranks, {} reserved)",
            path.display(),
            settings.ranks.len(),
            settings.ruleset.reserved_top_ranks
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the rank table described by these settings
    pub fn rank_table(&self) -> Result<RankTable, ConfigError> {
        RankTable::new(self.ranks.clone())
    }

    /// Check everything that could make a game impossible to start
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.field.validate()?;
        let table = self.rank_table()?;
        SpawnSelector::new(&table, self.ruleset.reserved_top_ranks)?;
        Ok(())
    }
}
