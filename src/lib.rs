//! Radar Dodge - simulation core for a radar-field dodging arcade game
//!
//! The player steers a marker around a bounded radar field, dodging moving
//! obstacle craft and defusing time-limited hazards. This crate is the
//! headless core only: per-frame physics, collision resolution and the
//! session lifecycle. Rendering, input capture and score persistence live
//! in the host and drive the core through [`game::Game`].
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, motion, collisions)
//! - `field`: Play-area geometry and normalized/absolute conversions
//! - `timer`: Generation-tagged one-shot timer queue
//! - `game`: Session state machine and the host-facing API
//! - `snapshot`: Per-tick frame data handed to the presentation layer
//! - `tuning`: Data-driven game balance
//! - `highscores`: Leaderboard bookkeeping (persistence stays host-side)

pub mod field;
pub mod game;
pub mod highscores;
pub mod sim;
pub mod snapshot;
pub mod timer;
pub mod tuning;

pub use field::Field;
pub use game::{Game, GameError};
pub use highscores::HighScores;
pub use sim::{EndCause, GameEvent, Hazard, Obstacle, ObstacleKind, Player, SessionPhase};
pub use snapshot::FrameSnapshot;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep in milliseconds (~60 Hz, matching the host frame rate)
    pub const TICK_INTERVAL_MS: f64 = 16.0;
    /// Elapsed-time counter cadence (1 displayed second per fire)
    pub const ELAPSED_INTERVAL_MS: f64 = 1000.0;

    /// Per-tick obstacle step magnitude in normalized units; only the sign
    /// ever changes after spawn
    pub const OBSTACLE_STEP: f32 = 0.005;
    /// Rendered obstacle footprint as a fraction of the field's min dimension
    pub const OBSTACLE_FOOTPRINT_FRACTION: f32 = 0.04;
    /// Obstacle collision radius (boundary and pairwise passes) as a fraction
    /// of the field's min dimension
    pub const OBSTACLE_COLLISION_FRACTION: f32 = 0.03;

    /// Player marker diameter as a fraction of the field's min dimension
    pub const PLAYER_SIZE_FRACTION: f32 = 0.03;
    /// Player movement step per input event, as a fraction of min dimension
    pub const PLAYER_SPEED_FRACTION: f32 = 0.05;
    /// Absolute units subtracted from the contact distance so the effective
    /// hitbox is slightly smaller than the visual footprint
    pub const CONTACT_FORGIVENESS: f32 = 3.0;

    /// Hazard fuse length: defuse within this window or the session ends
    pub const HAZARD_FUSE_MS: f64 = 2000.0;
    /// Minimum delay before the next hazard spawn
    pub const HAZARD_DELAY_MIN_MS: f64 = 3000.0;
    /// Exclusive maximum delay before the next hazard spawn
    pub const HAZARD_DELAY_MAX_MS: f64 = 5000.0;
    /// Hazard diameter in absolute units (independent of field size)
    pub const HAZARD_DIAMETER: f32 = 30.0;
}
