//! Entity store and session state types
//!
//! The `World` is the exclusive owner of every mutable entity: obstacles,
//! the player marker and live hazards. All mutation goes through its
//! methods; the host only ever sees snapshots.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Entity id, unique for the lifetime of a `World`.
pub type ObstacleId = u32;
/// Hazard id, drawn from the same allocator as obstacles.
pub type HazardId = u32;

/// The fixed set of obstacle craft the player can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Saucer,
    Missile,
    Craft,
}

impl ObstacleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Saucer => "saucer",
            ObstacleKind::Missile => "missile",
            ObstacleKind::Craft => "craft",
        }
    }

    /// Parse a kind from its host-facing name. Unknown names are rejected
    /// by the caller with no state change.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "saucer" => Some(ObstacleKind::Saucer),
            "missile" => Some(ObstacleKind::Missile),
            "craft" => Some(ObstacleKind::Craft),
            _ => None,
        }
    }
}

/// A moving obstacle the player must avoid.
///
/// Position is normalized (roughly `[0, 1]` per axis; collision correction
/// may push it slightly outside between ticks). `dir` is a fixed-magnitude
/// signed step applied once per tick; only its signs ever change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    /// Normalized position
    pub pos: Vec2,
    /// Normalized per-tick step (constant speed, sign flips on collision)
    pub dir: Vec2,
    /// Obstacles placed before the session starts stay parked until it does
    pub moving: bool,
}

/// The player marker, stored as an absolute offset from the field center.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub offset: Vec2,
}

impl Player {
    /// Apply a movement delta, then clamp so the marker's own circle stays
    /// inside the field. Bounds are recomputed from the current field every
    /// call so resizes take effect immediately.
    pub fn apply_move(&mut self, delta: Vec2, field: &Field, size_fraction: f32) {
        self.offset += delta;
        self.clamp_to(field, size_fraction);
    }

    pub fn clamp_to(&mut self, field: &Field, size_fraction: f32) {
        let half = field.min_dimension() * size_fraction / 2.0;
        let max_x = field.width / 2.0 - half;
        let max_y = field.height / 2.0 - half;
        // min-then-max, not `clamp`: a degenerate field inverts the bounds
        self.offset.x = self.offset.x.min(max_x).max(-max_x);
        self.offset.y = self.offset.y.min(max_y).max(-max_y);
    }

    /// Absolute center of the marker.
    #[inline]
    pub fn center(&self, field: &Field) -> Vec2 {
        field.center() + self.offset
    }
}

/// A stationary, time-limited hazard. Defuse it before `expires_at_ms` or
/// the session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: HazardId,
    /// Absolute center, independent of the normalized system
    pub pos: Vec2,
    pub armed_at_ms: f64,
    pub expires_at_ms: f64,
}

/// Overall run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No tick loop running; obstacles static, placement allowed
    #[default]
    Idle,
    /// Tick loop and elapsed counter running; hazards schedulable
    Active,
    /// Terminal per round; everything frozen, score finalized
    Ended,
}

/// Why an active session terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    ObstacleCollision,
    HazardExplosion,
}

/// Events surfaced to the host, drained once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionEnded {
        score: u64,
        elapsed_secs: u64,
        obstacle_count: u32,
        cause: EndCause,
    },
    HazardArmed { id: HazardId },
    HazardDefused { id: HazardId },
    HazardExploded { id: HazardId },
}

/// Exclusive owner of all mutable entity state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub obstacles: Vec<Obstacle>,
    pub player: Player,
    pub hazards: Vec<Hazard>,
    next_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            player: Player::default(),
            hazards: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn an obstacle at a uniform-random normalized position with a
    /// uniform-random sign on each direction axis.
    pub fn spawn_obstacle<R: Rng>(
        &mut self,
        kind: ObstacleKind,
        moving: bool,
        step: f32,
        rng: &mut R,
    ) -> ObstacleId {
        let id = self.next_entity_id();
        let pos = Vec2::new(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0));
        let dir = Vec2::new(
            if rng.random_bool(0.5) { step } else { -step },
            if rng.random_bool(0.5) { step } else { -step },
        );
        self.obstacles.push(Obstacle {
            id,
            kind,
            pos,
            dir,
            moving,
        });
        id
    }

    /// Remove every obstacle. Idempotent.
    pub fn remove_all_obstacles(&mut self) {
        self.obstacles.clear();
    }

    /// Obstacle count; the score multiplier.
    #[inline]
    pub fn obstacle_count(&self) -> u32 {
        self.obstacles.len() as u32
    }

    /// Arm a hazard at a uniform-random absolute position that keeps its
    /// full diameter inside the field.
    pub fn arm_hazard<R: Rng>(
        &mut self,
        field: &Field,
        now_ms: f64,
        fuse_ms: f64,
        diameter: f32,
        rng: &mut R,
    ) -> HazardId {
        let id = self.next_entity_id();
        let span_x = (field.width - diameter).max(0.0);
        let span_y = (field.height - diameter).max(0.0);
        let x = if span_x > 0.0 { rng.random_range(0.0..span_x) } else { 0.0 };
        let y = if span_y > 0.0 { rng.random_range(0.0..span_y) } else { 0.0 };
        let pos = Vec2::new(x + diameter / 2.0, y + diameter / 2.0);
        self.hazards.push(Hazard {
            id,
            pos,
            armed_at_ms: now_ms,
            expires_at_ms: now_ms + fuse_ms,
        });
        id
    }

    /// Remove a live hazard, returning whether it existed.
    pub fn remove_hazard(&mut self, id: HazardId) -> bool {
        let before = self.hazards.len();
        self.hazards.retain(|h| h.id != id);
        self.hazards.len() != before
    }

    /// Freeze or unfreeze every obstacle (session start / end).
    pub fn set_all_moving(&mut self, moving: bool) {
        for obstacle in &mut self.obstacles {
            obstacle.moving = moving;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in [ObstacleKind::Saucer, ObstacleKind::Missile, ObstacleKind::Craft] {
            assert_eq!(ObstacleKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(ObstacleKind::from_name("tank"), None);
    }

    #[test]
    fn test_spawn_within_unit_square_with_fixed_step() {
        let mut world = World::new();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            world.spawn_obstacle(ObstacleKind::Saucer, false, 0.005, &mut rng);
        }
        for o in &world.obstacles {
            assert!((0.0..1.0).contains(&o.pos.x));
            assert!((0.0..1.0).contains(&o.pos.y));
            assert_eq!(o.dir.x.abs(), 0.005);
            assert_eq!(o.dir.y.abs(), 0.005);
            assert!(!o.moving);
        }
    }

    #[test]
    fn test_ids_are_unique_across_entity_types() {
        let mut world = World::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let field = Field::new(500.0, 500.0);
        let a = world.spawn_obstacle(ObstacleKind::Craft, true, 0.005, &mut rng);
        let b = world.arm_hazard(&field, 0.0, 2000.0, 30.0, &mut rng);
        let c = world.spawn_obstacle(ObstacleKind::Missile, true, 0.005, &mut rng);
        assert!(a != b && b != c && a != c);
    }

    #[test]
    fn test_remove_all_obstacles_idempotent() {
        let mut world = World::new();
        let mut rng = Pcg32::seed_from_u64(2);
        world.spawn_obstacle(ObstacleKind::Saucer, false, 0.005, &mut rng);
        world.remove_all_obstacles();
        assert_eq!(world.obstacle_count(), 0);
        world.remove_all_obstacles();
        assert_eq!(world.obstacle_count(), 0);
    }

    #[test]
    fn test_hazard_stays_inside_field() {
        let mut world = World::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let field = Field::new(400.0, 300.0);
        for _ in 0..20 {
            world.arm_hazard(&field, 0.0, 2000.0, 30.0, &mut rng);
        }
        for h in &world.hazards {
            assert!(h.pos.x >= 15.0 && h.pos.x <= 385.0);
            assert!(h.pos.y >= 15.0 && h.pos.y <= 285.0);
            assert_eq!(h.expires_at_ms, 2000.0);
        }
    }

    #[test]
    fn test_player_clamp_accounts_for_marker_size() {
        let field = Field::new(500.0, 500.0);
        let mut player = Player::default();
        // dot is 15 units wide, so the center may reach 250 - 7.5
        player.apply_move(Vec2::new(1000.0, -1000.0), &field, 0.03);
        assert_eq!(player.offset, Vec2::new(242.5, -242.5));
    }
}
