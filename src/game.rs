//! Session state machine and the host-facing API
//!
//! `Game` owns every piece of mutable state - field, entities, timers, RNG -
//! and is driven by a host event loop: input wrappers call the command
//! methods, the frame loop calls [`Game::advance`] with a monotonic clock
//! and then reads [`Game::frame`] and [`Game::drain_events`].
//!
//! Scheduling is cooperative and deterministic: `advance` replays fixed
//! physics ticks, the elapsed-seconds counter and one-shot hazard timers in
//! strict deadline order, one at a time. A timer that shares a deadline
//! with a tick fires first, matching the host model where an expiring
//! one-shot was queued before the interval callback.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::consts;
use crate::field::Field;
use crate::sim::state::{
    EndCause, GameEvent, Hazard, HazardId, ObstacleId, ObstacleKind, Player, SessionPhase, World,
};
use crate::sim::tick::{StepOutcome, step_world};
use crate::snapshot::{FrameSnapshot, HazardSnapshot, ObstacleSnapshot};
use crate::timer::{TimerEvent, TimerQueue};
use crate::tuning::Tuning;

/// Operations the core rejects outright. Everything else recovers locally
/// (skipped ticks, dropped stale timers) and never surfaces as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("unrecognized obstacle kind `{0}`")]
    InvalidObstacleKind(String),
    #[error("session is not active")]
    SessionNotActive,
    #[error("no live hazard with id {0}")]
    UnknownHazard(HazardId),
}

/// The whole game: entities, session lifecycle, timers and RNG behind one
/// exclusive owner.
#[derive(Debug, Clone)]
pub struct Game {
    field: Field,
    tuning: Tuning,
    world: World,
    phase: SessionPhase,
    elapsed_secs: u64,
    /// Bumped on every phase transition; timer steps from older generations
    /// are no-ops even if their entries were never removed
    generation: u64,
    timers: TimerQueue,
    rng: Pcg32,
    events: Vec<GameEvent>,
    /// Deadline of the next physics tick while a session is active
    next_tick_at: f64,
    last_now_ms: f64,
    last_score: Option<u64>,
}

impl Game {
    /// Create a game over the given field with a seeded RNG.
    pub fn new(field: Field, seed: u64) -> Self {
        Self::with_tuning(field, seed, Tuning::default())
    }

    pub fn with_tuning(field: Field, seed: u64, tuning: Tuning) -> Self {
        Self {
            field,
            tuning,
            world: World::new(),
            phase: SessionPhase::Idle,
            elapsed_secs: 0,
            generation: 0,
            timers: TimerQueue::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_tick_at: 0.0,
            last_now_ms: 0.0,
            last_score: None,
        }
    }

    // === Commands ===

    /// Place an obstacle at a random position. Obstacles placed while a
    /// session is active start moving immediately; otherwise they park
    /// until the next start.
    pub fn add_obstacle(&mut self, kind: ObstacleKind) -> ObstacleId {
        let moving = self.phase == SessionPhase::Active;
        self.world
            .spawn_obstacle(kind, moving, self.tuning.obstacle_step, &mut self.rng)
    }

    /// Place an obstacle by its host-facing name. Unknown names are
    /// rejected with no state change.
    pub fn add_obstacle_named(&mut self, name: &str) -> Result<ObstacleId, GameError> {
        let kind = ObstacleKind::from_name(name)
            .ok_or_else(|| GameError::InvalidObstacleKind(name.to_string()))?;
        Ok(self.add_obstacle(kind))
    }

    /// Remove every placed obstacle. Idempotent.
    pub fn remove_all_obstacles(&mut self) {
        self.world.remove_all_obstacles();
    }

    /// Start a session from `Idle`: unfreeze obstacles, start the elapsed
    /// counter and the hazard chain. Ignored in any other phase.
    pub fn start_session(&mut self, now_ms: f64) {
        if self.phase != SessionPhase::Idle {
            log::debug!("Ignoring start command in phase {:?}", self.phase);
            return;
        }
        self.phase = SessionPhase::Active;
        self.generation += 1;
        self.last_now_ms = now_ms;
        self.world.set_all_moving(true);
        self.next_tick_at = now_ms + consts::TICK_INTERVAL_MS;
        self.timers.schedule(
            now_ms + consts::ELAPSED_INTERVAL_MS,
            self.generation,
            TimerEvent::ElapsedSecond,
        );
        let delay = self.next_hazard_delay();
        self.timers
            .schedule(now_ms + delay, self.generation, TimerEvent::HazardSpawn);
        log::info!(
            "Session started with {} obstacles",
            self.world.obstacle_count()
        );
    }

    /// Return to `Idle` after a round ends: player back to center, elapsed
    /// counter to zero. Placed obstacles survive; only an explicit
    /// [`Game::remove_all_obstacles`] clears them.
    pub fn restart_session(&mut self) {
        if self.phase != SessionPhase::Ended {
            log::debug!("Ignoring restart command in phase {:?}", self.phase);
            return;
        }
        self.phase = SessionPhase::Idle;
        self.generation += 1;
        self.world.player = Player::default();
        self.elapsed_secs = 0;
    }

    /// Apply a movement delta to the player marker, then clamp it inside
    /// the field. Movement intents outside an active session are ignored.
    pub fn move_player(&mut self, dx: f32, dy: f32) {
        if self.phase != SessionPhase::Active {
            return;
        }
        self.world.player.apply_move(
            Vec2::new(dx, dy),
            &self.field,
            self.tuning.player_size_fraction,
        );
    }

    /// Per-input movement step for the input layer: a fixed fraction of the
    /// current min dimension, so movement feel survives resizes.
    pub fn movement_step(&self) -> f32 {
        self.field.min_dimension() * self.tuning.player_speed_fraction
    }

    /// Defuse a live hazard. Only accepted while the session is active.
    pub fn defuse_hazard(&mut self, id: HazardId) -> Result<(), GameError> {
        if self.phase != SessionPhase::Active {
            return Err(GameError::SessionNotActive);
        }
        if self.world.remove_hazard(id) {
            self.events.push(GameEvent::HazardDefused { id });
            Ok(())
        } else {
            Err(GameError::UnknownHazard(id))
        }
    }

    /// Swap in new field dimensions. Normalized positions are untouched;
    /// every absolute value is re-derived on the next use. The player's
    /// absolute offset is re-clamped so a shrink never strands the marker
    /// outside the field. A degenerate field suspends geometry work until
    /// a valid resize arrives.
    pub fn notify_field_resized(&mut self, field: Field) {
        if field.is_degenerate() {
            log::warn!(
                "Field resized to degenerate {}x{}; ticks suspended",
                field.width,
                field.height
            );
            self.field = field;
            return;
        }
        self.field = field;
        self.world
            .player
            .clamp_to(&self.field, self.tuning.player_size_fraction);
    }

    // === Clock ===

    /// Catch the simulation up to `now_ms`, replaying ticks and timers in
    /// strict deadline order. Ending the session mid-replay stops further
    /// processing for the dead generation.
    pub fn advance(&mut self, now_ms: f64) {
        self.last_now_ms = now_ms;
        loop {
            let next_timer = self.timers.peek_deadline(self.generation);
            let next_tick =
                (self.phase == SessionPhase::Active).then_some(self.next_tick_at);
            let deadline = match (next_timer, next_tick) {
                (Some(t), Some(k)) => t.min(k),
                (Some(t), None) => t,
                (None, Some(k)) => k,
                (None, None) => break,
            };
            if deadline > now_ms {
                break;
            }

            if next_timer.is_some_and(|t| t <= deadline) {
                if let Some((fired_at, event)) = self.timers.pop_due(deadline, self.generation) {
                    self.handle_timer(fired_at, event);
                }
            } else {
                self.next_tick_at += consts::TICK_INTERVAL_MS;
                self.run_tick();
            }
        }
    }

    fn run_tick(&mut self) {
        match step_world(&mut self.world, &self.field, &self.tuning) {
            StepOutcome::Continue => {}
            StepOutcome::PlayerHit(id) => {
                log::info!("Player hit obstacle {}", id);
                self.end_session(EndCause::ObstacleCollision);
            }
        }
    }

    /// Handle a due timer at its logical fire time. Rescheduling is
    /// relative to that fire time, not the wall clock, so replay is exact.
    fn handle_timer(&mut self, fired_at: f64, event: TimerEvent) {
        match event {
            TimerEvent::ElapsedSecond => {
                if self.phase != SessionPhase::Active {
                    return;
                }
                self.elapsed_secs += 1;
                self.timers.schedule(
                    fired_at + consts::ELAPSED_INTERVAL_MS,
                    self.generation,
                    TimerEvent::ElapsedSecond,
                );
            }
            TimerEvent::HazardSpawn => {
                // A spawn firing into a non-active session does not create a
                // hazard and does not continue the chain.
                if self.phase != SessionPhase::Active {
                    return;
                }
                if self.field.is_degenerate() {
                    log::warn!("Skipping hazard spawn: degenerate field");
                } else {
                    let id = self.world.arm_hazard(
                        &self.field,
                        fired_at,
                        self.tuning.hazard_fuse_ms,
                        self.tuning.hazard_diameter,
                        &mut self.rng,
                    );
                    self.timers.schedule(
                        fired_at + self.tuning.hazard_fuse_ms,
                        self.generation,
                        TimerEvent::HazardFuse(id),
                    );
                    self.events.push(GameEvent::HazardArmed { id });
                }
                let delay = self.next_hazard_delay();
                self.timers
                    .schedule(fired_at + delay, self.generation, TimerEvent::HazardSpawn);
            }
            TimerEvent::HazardFuse(id) => {
                if self.phase != SessionPhase::Active {
                    return;
                }
                // A defused hazard is already gone; its fuse is a no-op.
                if self.world.remove_hazard(id) {
                    self.events.push(GameEvent::HazardExploded { id });
                    self.end_session(EndCause::HazardExplosion);
                }
            }
        }
    }

    fn next_hazard_delay(&mut self) -> f64 {
        self.rng
            .random_range(self.tuning.hazard_delay_min_ms..self.tuning.hazard_delay_max_ms)
    }

    fn end_session(&mut self, cause: EndCause) {
        self.phase = SessionPhase::Ended;
        self.generation += 1;
        self.timers.clear();
        self.world.set_all_moving(false);
        self.world.hazards.clear();

        let obstacle_count = self.world.obstacle_count();
        let score = self.elapsed_secs * obstacle_count as u64;
        self.last_score = Some(score);
        log::info!(
            "Session ended ({:?}): score {} = {}s x {} obstacles",
            cause,
            score,
            self.elapsed_secs,
            obstacle_count
        );
        self.events.push(GameEvent::SessionEnded {
            score,
            elapsed_secs: self.elapsed_secs,
            obstacle_count,
            cause,
        });
    }

    // === Observation ===

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Build the frame data for the presentation layer, in absolute units
    /// for the current field.
    pub fn frame(&self) -> FrameSnapshot {
        let min_dim = self.field.min_dimension();
        FrameSnapshot {
            phase: self.phase,
            elapsed_secs: self.elapsed_secs,
            obstacle_count: self.world.obstacle_count(),
            obstacles: self
                .world
                .obstacles
                .iter()
                .map(|o| ObstacleSnapshot {
                    id: o.id,
                    kind: o.kind,
                    pos: self.field.to_absolute(o.pos),
                    size: min_dim * self.tuning.footprint_fraction,
                })
                .collect(),
            player: self.world.player.center(&self.field),
            player_size: min_dim * self.tuning.player_size_fraction,
            hazards: self
                .world
                .hazards
                .iter()
                .map(|h| HazardSnapshot {
                    id: h.id,
                    pos: h.pos,
                    diameter: self.tuning.hazard_diameter,
                    remaining_ms: (h.expires_at_ms - self.last_now_ms).max(0.0),
                })
                .collect(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn obstacle_count(&self) -> u32 {
        self.world.obstacle_count()
    }

    /// The score this session would finalize at right now.
    pub fn score_preview(&self) -> u64 {
        self.elapsed_secs * self.world.obstacle_count() as u64
    }

    /// Final score of the most recently ended round.
    pub fn last_score(&self) -> Option<u64> {
        self.last_score
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.world.hazards
    }

    /// Absolute center of the player marker.
    pub fn player_position(&self) -> Vec2 {
        self.world.player.center(&self.field)
    }

    pub fn field(&self) -> Field {
        self.field
    }
}
