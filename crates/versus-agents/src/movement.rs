//! Stepping and turning toward a target.

use versus_types::Vec3;

/// Squared distance under which a target counts as reached.
///
/// Steps land exactly on their target once in reach, so this only absorbs
/// float noise.
pub const ARRIVAL_EPSILON_SQ: f32 = 1.0e-6;

/// Speed multiplier while fleeing or chasing.
pub const RUN_MULTIPLIER: f32 = 2.0;

/// Speed multiplier while travelling to a new block.
pub const EXPAND_MULTIPLIER: f32 = 1.5;

/// Position and facing after one movement step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// New position.
    pub position: Vec3,
    /// New unit facing.
    pub facing: Vec3,
}

/// Turn toward `target` by at most `turn` radians, then move toward it by
/// at most `distance`.
///
/// Turning uses the direction from the pre-move position, and is
/// independent of how far the step goes.
pub fn step_towards(position: Vec3, facing: Vec3, target: Vec3, distance: f32, turn: f32) -> Step {
    Step {
        facing: Vec3::rotate_towards(facing, target - position, turn),
        position: Vec3::move_towards(position, target, distance),
    }
}

/// Whether `position` has arrived at `target`.
pub fn has_reached(position: Vec3, target: Vec3) -> bool {
    position.sqr_distance(target) <= ARRIVAL_EPSILON_SQ
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_turns_and_moves_independently() {
        let east = Vec3::new(1.0, 0.0, 0.0);
        let target = Vec3::new(0.0, 0.0, 10.0);
        let step = step_towards(Vec3::ZERO, east, target, 1.0, 0.1);

        assert!((step.position.z - 1.0).abs() < 1.0e-4);
        // Only a small turn toward +Z was allowed.
        assert!(step.facing.x > 0.99);
        assert!(step.facing.z > 0.0);
    }

    #[test]
    fn arrival_is_exact_after_final_step() {
        let target = Vec3::new(0.5, 0.0, 0.0);
        let step = step_towards(Vec3::ZERO, Vec3::FORWARD, target, 1.0, 0.1);
        assert!(has_reached(step.position, target));
        assert!(!has_reached(Vec3::ZERO, target));
    }
}
