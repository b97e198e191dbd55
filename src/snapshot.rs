//! Presentation-facing frame data
//!
//! The host renders from these plain records; simulation entities never
//! leak out directly. Everything here is in absolute units for the current
//! field, so the presentation layer does no coordinate math of its own.
//! Ids are stable, letting the host map them to visual handles across
//! frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::state::{HazardId, ObstacleId, ObstacleKind, SessionPhase};

/// One obstacle as the renderer should draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    /// Absolute center
    pub pos: Vec2,
    /// Rendered footprint (width and height) in absolute units
    pub size: f32,
}

/// One live hazard, with how long the player has left to defuse it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardSnapshot {
    pub id: HazardId,
    /// Absolute center
    pub pos: Vec2,
    pub diameter: f32,
    pub remaining_ms: f64,
}

/// Everything the presentation layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: SessionPhase,
    pub elapsed_secs: u64,
    pub obstacle_count: u32,
    pub obstacles: Vec<ObstacleSnapshot>,
    /// Absolute center of the player marker
    pub player: Vec2,
    /// Player marker diameter in absolute units
    pub player_size: f32,
    pub hazards: Vec<HazardSnapshot>,
}
