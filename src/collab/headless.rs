//! Headless collaborators
//!
//! A kinematic stand-in for the physics world and two presentation sinks.
//! Nothing here integrates motion: bodies stay where they were created until
//! moved explicitly, and contacts are scripted. Used by tests and by the
//! console driver.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{BodyDesc, BodyHandle, CollisionPair, PhysicsWorld, Presentation};
use crate::sim::rank::Color;

/// A body tracked by [`HeadlessWorld`]
#[derive(Debug, Clone)]
pub struct HeadlessBody {
    pub desc: BodyDesc,
    pub pos: Vec2,
}

/// In-memory physics world with scripted contacts
#[derive(Debug)]
pub struct HeadlessWorld {
    bodies: BTreeMap<BodyHandle, HeadlessBody>,
    pending_contacts: Vec<CollisionPair>,
    gravity: Vec2,
    running: bool,
    steps: u64,
    next_handle: u64,
}

impl Default for HeadlessWorld {
    fn default() -> Self {
        Self {
            bodies: BTreeMap::new(),
            pending_contacts: Vec::new(),
            gravity: Vec2::ZERO,
            running: false,
            steps: 0,
            next_handle: 1,
        }
    }
}

impl HeadlessWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `a`/`b` as touching on the next step
    pub fn queue_contact(&mut self, a: BodyHandle, b: BodyHandle) {
        self.pending_contacts.push(CollisionPair::new(a, b));
    }

    /// Teleport a body. Returns false if the handle is unknown.
    pub fn set_position(&mut self, handle: BodyHandle, pos: Vec2) -> bool {
        match self.bodies.get_mut(&handle) {
            Some(body) => {
                body.pos = pos;
                true
            }
            None => false,
        }
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&HeadlessBody> {
        self.bodies.get(&handle)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(&handle)
    }

    /// Handles of all bodies, in creation order
    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies.keys().copied()
    }

    /// Handles of all movable bodies
    pub fn dynamic_handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies
            .iter()
            .filter(|(_, b)| !b.desc.material.is_static)
            .map(|(h, _)| *h)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Steps taken while running
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl PhysicsWorld for HeadlessWorld {
    fn create_body(&mut self, desc: &BodyDesc, position: Vec2) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle = handle.0 + 1;
        self.bodies.insert(
            handle,
            HeadlessBody {
                desc: *desc,
                pos: position,
            },
        );
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        self.bodies.remove(&handle);
    }

    fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&handle).map(|b| b.pos)
    }

    fn step(&mut self, _dt: f32) -> Vec<CollisionPair> {
        if !self.running {
            self.pending_contacts.clear();
            return Vec::new();
        }
        self.steps += 1;

        // Removed bodies can no longer touch anything
        let bodies = &self.bodies;
        self.pending_contacts
            .drain(..)
            .filter(|p| bodies.contains_key(&p.a) && bodies.contains_key(&p.b))
            .collect()
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn start_loop(&mut self) {
        self.running = true;
    }

    fn stop_loop(&mut self) {
        self.running = false;
    }

    fn clear_world(&mut self) {
        self.bodies.clear();
        self.pending_contacts.clear();
    }
}

/// One call received by [`RecordingPresentation`]
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCall {
    NextPreview { label: String, color: Color },
    Score(u64),
    GameOverBanner,
}

/// Presentation sink that remembers every call
#[derive(Debug, Default)]
pub struct RecordingPresentation {
    pub calls: Vec<PresentationCall>,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent score shown
    pub fn last_score(&self) -> Option<u64> {
        self.calls.iter().rev().find_map(|c| match c {
            PresentationCall::Score(s) => Some(*s),
            _ => None,
        })
    }

    /// Most recent preview label shown
    pub fn last_preview(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            PresentationCall::NextPreview { label, .. } => Some(label.as_str()),
            _ => None,
        })
    }

    pub fn banner_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PresentationCall::GameOverBanner))
            .count()
    }
}

impl Presentation for RecordingPresentation {
    fn show_next_preview(&mut self, label: &str, color: Color) {
        self.calls.push(PresentationCall::NextPreview {
            label: label.to_string(),
            color,
        });
    }

    fn update_score_display(&mut self, score: u64) {
        self.calls.push(PresentationCall::Score(score));
    }

    fn show_game_over_banner(&mut self) {
        self.calls.push(PresentationCall::GameOverBanner);
    }
}

/// Presentation sink that reports through the `log` facade
#[derive(Debug, Default)]
pub struct LogPresentation;

impl Presentation for LogPresentation {
    fn show_next_preview(&mut self, label: &str, color: Color) {
        log::info!("Next: {} ({})", label, color);
    }

    fn update_score_display(&mut self, score: u64) {
        log::info!("Score: {}", score);
    }

    fn show_game_over_banner(&mut self) {
        log::info!("GAME OVER");
    }
}
