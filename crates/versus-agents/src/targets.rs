//! The contract for reaching and hurting attack targets.
//!
//! Agents hold an [`IntruderId`] only as a handle. The intruder may be
//! destroyed elsewhere at any time, so every lookup can come back empty.

use versus_types::{IntruderId, Vec3};

/// Resolves and damages intruders by handle.
pub trait AttackTargets {
    /// Where `target` currently is, or `None` if it no longer exists.
    fn position_of(&self, target: IntruderId) -> Option<Vec3>;

    /// Hit `target` for `amount`. Returns whether it is still standing
    /// afterwards; an unknown target reports `false`.
    fn apply_damage(&mut self, target: IntruderId, amount: f32) -> bool;
}
