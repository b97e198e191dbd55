//! Data-driven game balance
//!
//! All gameplay numbers flow through a `Tuning` value so hosts can rebalance
//! without a rebuild. Defaults reproduce the shipped game exactly.

use serde::{Deserialize, Serialize};

use crate::consts;

/// Gameplay balance values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Per-tick obstacle step magnitude in normalized units
    pub obstacle_step: f32,
    /// Obstacle collision radius as a fraction of the field's min dimension
    pub collision_radius_fraction: f32,
    /// Rendered obstacle footprint as a fraction of the min dimension
    pub footprint_fraction: f32,
    /// Player marker diameter as a fraction of the min dimension
    pub player_size_fraction: f32,
    /// Player movement step per input event, as a fraction of the min dimension
    pub player_speed_fraction: f32,
    /// Absolute units of hitbox forgiveness on player contact
    pub contact_forgiveness: f32,
    /// Hazard fuse length in milliseconds
    pub hazard_fuse_ms: f64,
    /// Minimum delay before the next hazard spawn (ms)
    pub hazard_delay_min_ms: f64,
    /// Exclusive maximum delay before the next hazard spawn (ms)
    pub hazard_delay_max_ms: f64,
    /// Hazard diameter in absolute units
    pub hazard_diameter: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            obstacle_step: consts::OBSTACLE_STEP,
            collision_radius_fraction: consts::OBSTACLE_COLLISION_FRACTION,
            footprint_fraction: consts::OBSTACLE_FOOTPRINT_FRACTION,
            player_size_fraction: consts::PLAYER_SIZE_FRACTION,
            player_speed_fraction: consts::PLAYER_SPEED_FRACTION,
            contact_forgiveness: consts::CONTACT_FORGIVENESS,
            hazard_fuse_ms: consts::HAZARD_FUSE_MS,
            hazard_delay_min_ms: consts::HAZARD_DELAY_MIN_MS,
            hazard_delay_max_ms: consts::HAZARD_DELAY_MAX_MS,
            hazard_diameter: consts::HAZARD_DIAMETER,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.obstacle_step, 0.005);
        assert_eq!(t.hazard_fuse_ms, 2000.0);
        assert_eq!(t.contact_forgiveness, 3.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "obstacle_step": 0.01 }"#).unwrap();
        assert_eq!(t.obstacle_step, 0.01);
        assert_eq!(t.hazard_fuse_ms, 2000.0);
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(Tuning::from_json("not json").is_err());
    }
}
