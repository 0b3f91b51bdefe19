//! Collaborator seams
//!
//! The engine never simulates bodies or draws anything itself. It talks to a
//! rigid-body world through [`PhysicsWorld`] and to the UI through
//! [`Presentation`], referring to bodies only by opaque [`BodyHandle`]s.

pub mod headless;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::rank::Color;

pub use headless::{HeadlessWorld, LogPresentation, PresentationCall, RecordingPresentation};

/// Opaque reference to a body owned by the physics collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

impl std::fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Two bodies reported as touching during a simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub a: BodyHandle,
    pub b: BodyHandle,
}

impl CollisionPair {
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        Self { a, b }
    }
}

/// Collision geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

/// Surface properties passed through to the physics collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub friction: f32,
    pub restitution: f32,
    /// Static bodies never move (floor, walls)
    pub is_static: bool,
}

impl Material {
    /// Immovable scenery
    pub fn fixed() -> Self {
        Self {
            friction: 0.1,
            restitution: 0.0,
            is_static: true,
        }
    }
}

/// Everything needed to create a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub shape: Shape,
    pub material: Material,
    /// Fill color (scenery may leave this to the renderer)
    pub color: Option<Color>,
}

/// Rigid-body world driven by the game loop
pub trait PhysicsWorld {
    /// Add a body at `position` and return its handle
    fn create_body(&mut self, desc: &BodyDesc, position: Vec2) -> BodyHandle;

    /// Remove a body. Unknown handles are ignored.
    fn remove_body(&mut self, handle: BodyHandle);

    /// Current center of a body, `None` if it no longer exists
    fn position(&self, handle: BodyHandle) -> Option<Vec2>;

    /// Advance one fixed step and report the pairs that started touching
    fn step(&mut self, dt: f32) -> Vec<CollisionPair>;

    fn set_gravity(&mut self, gravity: Vec2);

    fn start_loop(&mut self);

    /// Halt stepping; further `step` calls should report nothing
    fn stop_loop(&mut self);

    /// Remove every body, scenery included
    fn clear_world(&mut self);
}

/// Next-piece preview, score readout and game-over banner
pub trait Presentation {
    fn show_next_preview(&mut self, label: &str, color: Color);

    fn update_score_display(&mut self, score: u64);

    fn show_game_over_banner(&mut self);
}
