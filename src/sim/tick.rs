//! Fixed timestep game loop
//!
//! [`Game`] owns the state and both collaborators. Drop requests from input
//! are queued and applied at the start of the next tick, so nothing mutates
//! the board while a step's collisions are being resolved.

use std::collections::VecDeque;

use glam::Vec2;

use super::drop::{drop_piece, drop_random};
use super::error::ConfigError;
use super::merge::{MergeSummary, resolve_collisions};
use super::monitor::check_game_over;
use super::piece::PieceId;
use super::state::{GameEvent, GameState};
use crate::collab::{BodyDesc, CollisionPair, Material, PhysicsWorld, Presentation, Shape};
use crate::consts::*;
use crate::settings::Settings;

/// A queued request to drop the selected piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropRequest {
    /// Drop at a pointer position (`y` defaults to the top line)
    At { x: f32, y: Option<f32> },
    /// Drop button: random position along the top line
    Random,
}

/// Game loop driver
pub struct Game<P: PhysicsWorld, V: Presentation> {
    settings: Settings,
    state: GameState,
    physics: P,
    presentation: V,
    pending: VecDeque<DropRequest>,
    accumulator: f32,
    started: bool,
}

impl<P: PhysicsWorld, V: Presentation> Game<P, V> {
    pub fn new(settings: Settings, seed: u64, physics: P, presentation: V) -> Result<Self, ConfigError> {
        let state = GameState::new(&settings, seed)?;
        Ok(Self {
            settings,
            state,
            physics,
            presentation,
            pending: VecDeque::new(),
            accumulator: 0.0,
            started: false,
        })
    }

    /// Build the arena, pick the first piece and start the physics loop
    ///
    /// Only the first call after `new` or `restart` does anything.
    pub fn start(&mut self) {
        if self.started {
            log::debug!("Game already started");
            return;
        }
        self.started = true;
        self.build_arena();
        self.physics
            .set_gravity(Vec2::new(0.0, self.settings.gravity_y));
        self.presentation.update_score_display(self.state.score.total());

        let GameState {
            spawn, rng, ranks, ..
        } = &mut self.state;
        spawn.select_next(rng, ranks, &mut self.presentation);

        self.physics.start_loop();
        log::info!(
            "Game started with seed {} ({} ranks, top {} merge-only)",
            self.state.seed,
            self.state.ranks.rank_count(),
            self.state.rules.reserved_top_ranks
        );
    }

    /// Floor and side walls
    fn build_arena(&mut self) {
        let field = self.state.field;
        let t = field.wall_thickness;
        if t <= 0.0 {
            return;
        }
        let wall = |width: f32, height: f32| BodyDesc {
            shape: Shape::Rect { width, height },
            material: Material::fixed(),
            color: None,
        };
        let mid_y = field.height / 2.0;
        self.physics.create_body(
            &wall(field.width, t),
            Vec2::new(field.width / 2.0, field.height - t / 2.0),
        );
        self.physics
            .create_body(&wall(t, field.height), Vec2::new(0.0, mid_y));
        self.physics
            .create_body(&wall(t, field.height), Vec2::new(field.width, mid_y));
    }

    /// Throw the board away and start over
    pub fn restart(&mut self, seed: u64) -> Result<(), ConfigError> {
        let state = GameState::new(&self.settings, seed)?;
        self.physics.stop_loop();
        self.physics.clear_world();
        self.state = state;
        self.pending.clear();
        self.accumulator = 0.0;
        self.started = false;
        log::info!("Game restarted with seed: {}", seed);
        self.start();
        Ok(())
    }

    /// Queue a drop at a pointer position
    pub fn request_drop(&mut self, x: f32, y: Option<f32>) {
        if self.state.is_over() {
            log::debug!("Drop request ignored: game over");
            return;
        }
        self.pending.push_back(DropRequest::At { x, y });
    }

    /// Queue a drop at a random position
    pub fn request_random_drop(&mut self) {
        if self.state.is_over() {
            log::debug!("Drop request ignored: game over");
            return;
        }
        self.pending.push_back(DropRequest::Random);
    }

    /// Apply every queued drop, in arrival order
    fn apply_pending_drops(&mut self) -> Vec<PieceId> {
        let mut dropped = Vec::with_capacity(self.pending.len());
        while let Some(request) = self.pending.pop_front() {
            let piece = match request {
                DropRequest::At { x, y } => {
                    drop_piece(&mut self.state, &mut self.physics, &mut self.presentation, x, y)
                }
                DropRequest::Random => {
                    drop_random(&mut self.state, &mut self.physics, &mut self.presentation)
                }
            };
            dropped.extend(piece);
        }
        dropped
    }

    /// Advance one fixed step
    pub fn tick(&mut self, dt: f32) {
        if self.state.is_over() {
            self.pending.clear();
            return;
        }
        self.apply_pending_drops();
        let pairs = self.physics.step(dt);
        self.on_collisions(&pairs);
        self.on_step_complete();
    }

    /// Collision pairs reported for the current step
    pub fn on_collisions(&mut self, pairs: &[CollisionPair]) -> MergeSummary {
        resolve_collisions(&mut self.state, &mut self.physics, &mut self.presentation, pairs)
    }

    /// End-of-step bookkeeping; returns true if this step ended the game
    pub fn on_step_complete(&mut self) -> bool {
        if self.state.is_over() {
            return false;
        }
        self.state.steps += 1;
        check_game_over(&mut self.state, &mut self.physics, &mut self.presentation)
    }

    /// Feed a frame delta through the fixed-step accumulator
    ///
    /// Returns the number of steps run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        // Non-finite deltas count as an empty frame
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop backlog rather than spiral
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn pending_drops(&self) -> usize {
        self.pending.len()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn presentation(&self) -> &V {
        &self.presentation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{BodyHandle, HeadlessWorld, PresentationCall, RecordingPresentation};
    use crate::sim::rank::{Color, RankSpec};
    use crate::sim::state::GamePhase;

    type TestGame = Game<HeadlessWorld, RecordingPresentation>;

    fn new_game(settings: Settings) -> TestGame {
        let mut game = Game::new(
            settings,
            12345,
            HeadlessWorld::new(),
            RecordingPresentation::new(),
        )
        .unwrap();
        game.start();
        game
    }

    /// Ranks {0, 1, 2}, nothing reserved, single-rank spawner pinned to 0
    fn tiny_settings() -> Settings {
        let c = Color::rgb(10, 20, 30);
        Settings {
            ranks: vec![
                RankSpec::new("seed", c, 10.0),
                RankSpec::new("sprout", c, 20.0),
                RankSpec::new("tree", c, 30.0),
            ],
            ..Settings::default()
        }
    }

    fn bodies_of_dropped(game: &TestGame, events: &[GameEvent]) -> Vec<BodyHandle> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::Dropped { piece, .. } => game.state().pieces.find(*piece).map(|p| p.body),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_builds_arena_and_previews() {
        let game = new_game(Settings::default());
        assert!(game.physics().is_running());
        assert_eq!(game.physics().body_count(), 3);
        assert_eq!(game.physics().dynamic_handles().count(), 0);
        assert_eq!(game.physics().gravity(), Vec2::new(0.0, 1.0));
        let calls = &game.presentation().calls;
        assert_eq!(calls[0], PresentationCall::Score(0));
        assert!(matches!(calls[1], PresentationCall::NextPreview { .. }));
    }

    #[test]
    fn test_drops_apply_at_next_tick() {
        let mut game = new_game(Settings::default());
        game.request_drop(200.0, None);
        game.request_random_drop();
        assert_eq!(game.pending_drops(), 2);
        assert!(game.state().pieces.is_empty());

        game.tick(SIM_DT);
        assert_eq!(game.pending_drops(), 0);
        assert_eq!(game.state().pieces.len(), 2);
        assert_eq!(game.physics().dynamic_handles().count(), 2);
        assert_eq!(game.state().steps, 1);
    }

    #[test]
    fn test_two_seeds_merge_into_sprout() {
        let mut settings = tiny_settings();
        settings.ruleset.reserved_top_ranks = 2;
        let mut game = new_game(settings);

        game.request_drop(100.0, Some(500.0));
        game.request_drop(120.0, Some(500.0));
        game.tick(SIM_DT);
        let events = game.drain_events();
        let bodies = bodies_of_dropped(&game, &events);
        assert_eq!(bodies.len(), 2);

        game.physics_mut().queue_contact(bodies[0], bodies[1]);
        game.tick(SIM_DT);

        let state = game.state();
        assert_eq!(state.score.total(), 1);
        assert_eq!(state.pieces.len(), 1);
        assert_eq!(state.pieces.iter().next().unwrap().rank.index(), 1);
        assert_eq!(game.presentation().last_score(), Some(1));
    }

    #[test]
    fn test_terminal_pair_clears_board() {
        let mut game = new_game(tiny_settings());
        let max = game.state().ranks.max_rank();
        // Place two terminal pieces directly, the spawner never yields them reliably
        let (a, b) = {
            let Game { state, physics, .. } = &mut game;
            let a = crate::sim::drop::place_piece(state, physics, max, Vec2::new(100.0, 500.0));
            let b = crate::sim::drop::place_piece(state, physics, max, Vec2::new(160.0, 500.0));
            (
                state.pieces.find(a).unwrap().body,
                state.pieces.find(b).unwrap().body,
            )
        };

        game.physics_mut().queue_contact(a, b);
        game.tick(SIM_DT);

        assert!(game.state().pieces.is_empty());
        assert_eq!(game.state().score.total(), max.points());
        assert_eq!(game.physics().dynamic_handles().count(), 0);
    }

    #[test]
    fn test_fake_driver_can_call_handlers_directly() {
        let mut game = new_game(tiny_settings());
        let summary = game.on_collisions(&[CollisionPair::new(BodyHandle(1), BodyHandle(2))]);
        // Floor against wall: nothing happens
        assert_eq!(summary, MergeSummary::default());
        assert!(!game.on_step_complete());
        assert_eq!(game.state().score.total(), 0);
    }

    #[test]
    fn test_game_over_stops_everything() {
        let mut game = new_game(Settings::default());
        game.request_drop(300.0, Some(-10.0));
        game.tick(SIM_DT);

        assert_eq!(game.state().phase, GamePhase::Over);
        assert!(!game.physics().is_running());
        assert_eq!(game.presentation().banner_count(), 1);

        let pieces = game.state().pieces.len();
        let steps = game.state().steps;
        game.request_drop(300.0, None);
        game.request_random_drop();
        assert_eq!(game.pending_drops(), 0);
        game.tick(SIM_DT);
        game.advance(0.05);
        assert_eq!(game.state().pieces.len(), pieces);
        assert_eq!(game.state().steps, steps);
        assert_eq!(game.state().phase, GamePhase::Over);
        assert_eq!(game.presentation().banner_count(), 1);
    }

    #[test]
    fn test_queued_drops_after_breach_are_discarded() {
        let mut game = new_game(Settings::default());
        game.request_drop(300.0, Some(-10.0));
        game.tick(SIM_DT);
        assert!(game.state().is_over());

        let before = game.physics().body_count();
        game.tick(SIM_DT);
        assert_eq!(game.physics().body_count(), before);
    }

    #[test]
    fn test_advance_runs_fixed_steps() {
        let mut game = new_game(Settings::default());
        assert_eq!(game.advance(SIM_DT * 3.5), 3);
        assert_eq!(game.state().steps, 3);
        // Long frames are capped
        let steps = game.advance(10.0);
        assert!(steps <= MAX_SUBSTEPS);
        assert!(steps >= 1);
    }

    #[test]
    fn test_bad_frame_delta_does_not_stall_loop() {
        let mut game = new_game(Settings::default());
        assert_eq!(game.advance(SIM_DT * 2.5), 2);
        assert_eq!(game.advance(f32::NAN), 0);
        assert_eq!(game.advance(f32::INFINITY), 0);
        assert_eq!(game.advance(-1.0), 0);
        assert_eq!(game.advance(SIM_DT * 2.0), 2);
        assert_eq!(game.state().steps, 4);
    }

    #[test]
    fn test_second_start_is_ignored() {
        let mut game = new_game(Settings::default());
        let calls = game.presentation().calls.len();
        game.start();
        assert_eq!(game.physics().body_count(), 3);
        assert_eq!(game.presentation().calls.len(), calls);
    }

    #[test]
    fn test_restart_resets_board_and_score() {
        let mut game = new_game(tiny_settings());
        game.request_drop(300.0, Some(-10.0));
        game.tick(SIM_DT);
        assert!(game.state().is_over());

        game.restart(777).unwrap();
        let state = game.state();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.seed, 777);
        assert!(state.pieces.is_empty());
        assert_eq!(state.score.total(), 0);
        assert!(game.physics().is_running());
        // Only the fresh arena remains
        assert_eq!(game.physics().body_count(), 3);
    }

    #[test]
    fn test_same_seed_same_spawn_sequence() {
        let mut a = new_game(Settings::alternate());
        let mut b = new_game(Settings::alternate());
        for _ in 0..20 {
            a.request_random_drop();
            b.request_random_drop();
            a.tick(SIM_DT);
            b.tick(SIM_DT);
        }
        assert_eq!(a.drain_events(), b.drain_events());
        assert_eq!(a.state().next_rank(), b.state().next_rank());
    }
}
