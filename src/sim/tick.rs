//! Fixed timestep world step
//!
//! One physics tick: integrate motion, then run the collision passes in
//! their fixed order. The session machinery around this lives in `game`.

use crate::field::Field;
use crate::sim::collision;
use crate::sim::state::{Obstacle, ObstacleId, World};
use crate::tuning::Tuning;

/// What a single tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing terminal happened
    Continue,
    /// The player touched an obstacle; the session must end and no further
    /// work runs this tick
    PlayerHit(ObstacleId),
}

/// Advance every moving obstacle by its per-tick step. Obstacles parked
/// before the session starts are skipped so setup placement never drifts.
pub fn integrate_motion(obstacles: &mut [Obstacle]) {
    for obstacle in obstacles.iter_mut() {
        if obstacle.moving {
            obstacle.pos += obstacle.dir;
        }
    }
}

/// Run one full physics tick: motion, boundary reflection, pairwise
/// resolution, player contact.
pub fn step_world(world: &mut World, field: &Field, tuning: &Tuning) -> StepOutcome {
    if field.is_degenerate() {
        log::warn!(
            "Skipping tick: degenerate field {}x{}",
            field.width,
            field.height
        );
        return StepOutcome::Continue;
    }

    integrate_motion(&mut world.obstacles);

    let radius = field.radius_for(tuning.collision_radius_fraction);
    collision::reflect_at_bounds(&mut world.obstacles, field, radius);
    collision::resolve_obstacle_pairs(&mut world.obstacles, field, radius);

    if let Some(id) = collision::player_contact(&world.obstacles, &world.player, field, tuning) {
        return StepOutcome::PlayerHit(id);
    }

    StepOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;
    use glam::Vec2;
    use proptest::prelude::*;

    fn world_with(pos: Vec2, dir: Vec2, moving: bool) -> World {
        let mut world = World::new();
        world.obstacles.push(Obstacle {
            id: 1,
            kind: ObstacleKind::Missile,
            pos,
            dir,
            moving,
        });
        world
    }

    #[test]
    fn test_parked_obstacles_do_not_drift() {
        let field = Field::new(500.0, 500.0);
        let mut world = world_with(Vec2::new(0.5, 0.5), Vec2::new(0.005, 0.005), false);
        for _ in 0..10 {
            step_world(&mut world, &field, &Tuning::default());
        }
        assert_eq!(world.obstacles[0].pos, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_motion_runs_before_the_player_check() {
        // An obstacle stepping onto the center both moves and ends the tick.
        let field = Field::new(500.0, 500.0);
        let mut world = world_with(Vec2::new(0.5, 0.5), Vec2::new(0.005, 0.005), true);
        let outcome = step_world(&mut world, &field, &Tuning::default());
        assert_eq!(world.obstacles[0].pos, Vec2::new(0.505, 0.505));
        assert_eq!(outcome, StepOutcome::PlayerHit(1));
    }

    #[test]
    fn test_step_away_from_player_continues() {
        let field = Field::new(500.0, 500.0);
        let mut world = world_with(Vec2::new(0.2, 0.2), Vec2::new(0.005, -0.005), true);
        let outcome = step_world(&mut world, &field, &Tuning::default());
        assert_eq!(outcome, StepOutcome::Continue);
        let pos = world.obstacles[0].pos;
        assert!((pos.x - 0.205).abs() < 1e-6);
        assert!((pos.y - 0.195).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_field_skips_all_work() {
        let field = Field::new(0.0, 500.0);
        let mut world = world_with(Vec2::new(0.5, 0.5), Vec2::new(0.005, 0.005), true);
        let outcome = step_world(&mut world, &field, &Tuning::default());
        assert_eq!(outcome, StepOutcome::Continue);
        assert_eq!(world.obstacles[0].pos, Vec2::new(0.5, 0.5));
    }

    proptest! {
        /// Boundary reflection keeps a bouncing obstacle near the unit
        /// square forever; it never diverges over many ticks.
        #[test]
        fn prop_positions_stay_bounded(
            x in 0.0f32..1.0, y in 0.0f32..1.0,
            sx in proptest::bool::ANY, sy in proptest::bool::ANY,
        ) {
            let field = Field::new(500.0, 500.0);
            let step = 0.005f32;
            let mut obstacles = vec![Obstacle {
                id: 1,
                kind: ObstacleKind::Craft,
                pos: Vec2::new(x, y),
                dir: Vec2::new(if sx { step } else { -step },
                               if sy { step } else { -step }),
                moving: true,
            }];
            let radius = field.radius_for(0.03);

            for _ in 0..300 {
                integrate_motion(&mut obstacles);
                collision::reflect_at_bounds(&mut obstacles, &field, radius);
                let pos = obstacles[0].pos;
                prop_assert!(pos.x >= -0.05 && pos.x <= 1.05, "x diverged: {}", pos.x);
                prop_assert!(pos.y >= -0.05 && pos.y <= 1.05, "y diverged: {}", pos.y);
            }
        }
    }
}
