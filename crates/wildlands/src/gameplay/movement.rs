//! Straight-line movement on the XZ plane plus ground clamping.
//!
//! There is no pathfinding: actors walk straight at their target and snap to
//! the heightfield every tick.

use wildlands_core::Vec3;

use crate::world::GroundQuery;

/// Distance at which a move order counts as reached.
pub const ARRIVAL_EPSILON: f32 = 0.1;

/// Lift applied on top of the ground so models do not z-fight the terrain.
pub const TERRAIN_RENDER_OFFSET: f32 = 0.05;

/// Result of one movement step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    /// New position (Y unchanged; clamp separately).
    pub position: Vec3,
    /// Velocity used for this step (zero once arrived).
    pub velocity: Vec3,
    /// Horizontal distance covered.
    pub distance: f32,
    /// True if the target is within [`ARRIVAL_EPSILON`].
    pub arrived: bool,
}

/// Moves `position` toward `target` at `speed` for `dt` seconds without
/// overshooting.
#[must_use]
pub fn step_toward(position: Vec3, target: Vec3, speed: f32, dt: f32) -> Step {
    let remaining = position.horizontal_distance(target);
    if remaining < ARRIVAL_EPSILON {
        return Step {
            position,
            velocity: Vec3::ZERO,
            distance: 0.0,
            arrived: true,
        };
    }

    let direction = position.horizontal_direction_to(target);
    let distance = (speed * dt).min(remaining);
    Step {
        position: position + direction * distance,
        velocity: direction * speed,
        distance,
        arrived: remaining - distance < ARRIVAL_EPSILON,
    }
}

/// Applies a horizontal velocity for `dt` seconds.
#[inline]
#[must_use]
pub fn integrate(position: Vec3, velocity: Vec3, dt: f32) -> Vec3 {
    Vec3::new(position.x + velocity.x * dt, position.y, position.z + velocity.z * dt)
}

/// Y coordinate for an actor of half-height `size` standing at (x, z).
#[inline]
#[must_use]
pub fn ground_y(ground: &dyn GroundQuery, x: f32, z: f32, size: f32) -> f32 {
    ground.height_at(x, z) + size + TERRAIN_RENDER_OFFSET
}

/// Deterministic value in `[0, 1)` from a float seed (sine hash).
#[inline]
#[must_use]
pub fn sine_hash(seed: f32) -> f32 {
    let s = seed.sin() * 43_758.547;
    let fract = s - s.floor();
    // Tiny negative s rounds up to exactly 1.0
    if fract >= 1.0 {
        0.0
    } else {
        fract
    }
}
