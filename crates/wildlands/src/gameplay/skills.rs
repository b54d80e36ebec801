//! # Skills and Inventory
//!
//! Player progression. Each skill levels up when its experience reaches
//! `100 x level`; the surplus carries into the next level.

use crate::gameplay::resource::ResourceType;

/// Experience needed per level step.
pub const XP_PER_LEVEL: u32 = 100;

/// Agility experience per whole unit walked.
pub const WALK_XP_PER_UNIT: u32 = 1;

/// Agility experience per whole unit sprinted.
pub const SPRINT_XP_PER_UNIT: u32 = 2;

/// Strength experience per landed hit.
pub const HIT_XP: u32 = 5;

/// Mining experience per mining action.
pub const MINE_XP: u32 = 3;

/// A single levelled skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Skill {
    /// Current level (starts at 1).
    pub level: u32,
    /// Experience toward the next level.
    pub experience: u32,
}

impl Skill {
    /// Level 1, no experience.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: 1,
            experience: 0,
        }
    }

    /// Experience required to leave the current level.
    #[inline]
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        XP_PER_LEVEL * self.level
    }

    /// Adds experience, returns the number of levels gained.
    pub fn add_experience(&mut self, amount: u32) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        while self.experience >= self.threshold() {
            self.experience -= self.threshold();
            self.level += 1;
            gained += 1;
        }
        gained
    }

    /// Multiplier `1 + per_level * (level - 1)`.
    #[inline]
    #[must_use]
    fn modifier(&self, per_level: f32) -> f32 {
        1.0 + per_level * (self.level - 1) as f32
    }
}

impl Default for Skill {
    fn default() -> Self {
        Self::new()
    }
}

/// The player's skill set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Skills {
    /// Movement speed.
    pub agility: Skill,
    /// Melee damage.
    pub strength: Skill,
    /// Mining damage.
    pub mining: Skill,
}

impl Skills {
    /// Movement speed multiplier (+2% per level above 1).
    #[must_use]
    pub fn speed_modifier(&self) -> f32 {
        self.agility.modifier(0.02)
    }

    /// Melee damage multiplier (+5% per level above 1).
    #[must_use]
    pub fn damage_modifier(&self) -> f32 {
        self.strength.modifier(0.05)
    }

    /// Mining damage multiplier (+10% per level above 1).
    #[must_use]
    pub fn mining_modifier(&self) -> f32 {
        self.mining.modifier(0.10)
    }
}

/// Resource counts carried by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: [u32; 3],
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub const fn new() -> Self {
        Self { counts: [0; 3] }
    }

    /// Adds `amount` of `kind`.
    pub fn add(&mut self, kind: ResourceType, amount: u32) {
        let slot = &mut self.counts[kind.index()];
        *slot = slot.saturating_add(amount);
    }

    /// Count of `kind`.
    #[inline]
    #[must_use]
    pub const fn count(&self, kind: ResourceType) -> u32 {
        self.counts[kind.index()]
    }

    /// Sum over all kinds.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// (kind, count) pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, u32)> + '_ {
        ResourceType::ALL.into_iter().map(|kind| (kind, self.count(kind)))
    }
}
