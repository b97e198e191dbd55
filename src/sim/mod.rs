//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, threaded in by the caller
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{player_contact, reflect_at_bounds, resolve_obstacle_pairs};
pub use state::{
    EndCause, GameEvent, Hazard, HazardId, Obstacle, ObstacleId, ObstacleKind, Player,
    SessionPhase, World,
};
pub use tick::{StepOutcome, integrate_motion, step_world};
