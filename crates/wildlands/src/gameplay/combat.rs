//! # Combat Resolution
//!
//! Shared by NPCs and the player: attack rolls, cooldown bookkeeping and the
//! preferred-distance band both sides hold while fighting.
//!
//! ## Roll Rules
//!
//! Two independent uniform rolls in `[0, 100)`:
//! - hit roll: must land below `hit_chance`
//! - dodge roll: must land above the defender's `dodge_chance`
//!
//! The expected hit rate is therefore `hit_chance * (1 - dodge_chance)`.

use rand::Rng;
use wildlands_core::Vec3;

/// Angular frequency of the sideways strafe (radians per second).
const STRAFE_FREQUENCY: f32 = 1.3;

/// Strafe speed relative to move speed.
const STRAFE_FACTOR: f32 = 0.5;

/// Per-combatant attack stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatStats {
    /// Damage per successful hit.
    pub attack_damage: f32,
    /// Seconds between attack attempts.
    pub attack_cooldown: f32,
    /// Probability in `[0, 1]` that the hit roll succeeds.
    pub hit_chance: f32,
    /// Probability in `[0, 1]` of dodging an incoming attack.
    pub dodge_chance: f32,
}

/// Result of one attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Damage should be applied.
    Hit,
    /// Attack missed or was dodged.
    Miss,
}

impl AttackOutcome {
    /// True for [`AttackOutcome::Hit`].
    #[inline]
    #[must_use]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// Rolls one attack.
pub fn roll_attack<R: Rng + ?Sized>(rng: &mut R, hit_chance: f32, target_dodge: f32) -> AttackOutcome {
    let hit_roll: f32 = rng.gen_range(0.0..100.0);
    let dodge_roll: f32 = rng.gen_range(0.0..100.0);

    if hit_roll / 100.0 < hit_chance && dodge_roll / 100.0 > target_dodge {
        AttackOutcome::Hit
    } else {
        AttackOutcome::Miss
    }
}

/// Simulation-time attack cooldown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackTimer {
    last_attack: f32,
}

impl AttackTimer {
    /// A timer that is ready immediately.
    #[must_use]
    pub const fn ready() -> Self {
        Self {
            last_attack: f32::NEG_INFINITY,
        }
    }

    /// True if `cooldown` seconds have passed since the last attempt.
    #[inline]
    #[must_use]
    pub fn is_ready(&self, now: f32, cooldown: f32) -> bool {
        now - self.last_attack >= cooldown
    }

    /// Records an attempt (hit or miss).
    #[inline]
    pub fn reset(&mut self, now: f32) {
        self.last_attack = now;
    }
}

impl Default for AttackTimer {
    fn default() -> Self {
        Self::ready()
    }
}

/// Preferred standoff distance while fighting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatBand {
    /// Retreat when closer than this.
    pub min: f32,
    /// Advance when farther than this.
    pub max: f32,
}

impl CombatBand {
    /// Band centered on `range` with half-width 0.5.
    #[must_use]
    pub fn around(range: f32) -> Self {
        Self {
            min: (range - 0.5).max(0.0),
            max: range + 0.5,
        }
    }

    /// Horizontal velocity that keeps `position` inside the band around
    /// `target`: advance, retreat, or strafe sideways.
    #[must_use]
    pub fn velocity(&self, position: Vec3, target: Vec3, speed: f32, now: f32) -> Vec3 {
        let toward = position.horizontal_direction_to(target);
        let distance = position.horizontal_distance(target);

        if distance > self.max {
            toward * speed
        } else if distance < self.min {
            toward * -speed
        } else {
            let perpendicular = Vec3::new(-toward.z, 0.0, toward.x);
            perpendicular * ((now * STRAFE_FREQUENCY).sin() * speed * STRAFE_FACTOR)
        }
    }
}
