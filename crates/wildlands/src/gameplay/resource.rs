//! # Resource Nodes
//!
//! Minable deposits placed when a chunk first loads. A depleted node stays
//! in the collection forever with `is_active() == false`; callers filter on
//! that flag.

use wildlands_core::Vec3;

/// Kinds of minable resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// Soft orange ore.
    Copper,
    /// Dark grey ore.
    Iron,
    /// Common rock.
    Stone,
}

impl ResourceType {
    /// All resource types, in inventory order.
    pub const ALL: [Self; 3] = [Self::Copper, Self::Iron, Self::Stone];

    /// Health of a fresh node.
    #[must_use]
    pub const fn max_health(self) -> f32 {
        match self {
            Self::Copper => 80.0,
            Self::Iron => 120.0,
            Self::Stone => 100.0,
        }
    }

    /// Display color (RGBA).
    #[must_use]
    pub const fn color(self) -> [f32; 4] {
        match self {
            Self::Copper => [0.85, 0.50, 0.25, 1.0],
            Self::Iron => [0.45, 0.45, 0.50, 1.0],
            Self::Stone => [0.60, 0.60, 0.58, 1.0],
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Copper => "Copper",
            Self::Iron => "Iron",
            Self::Stone => "Stone",
        }
    }

    /// Dense index in `0..3`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Index of a node in the world's resource list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceId(pub u32);

impl ResourceId {
    /// Position in the resource list.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Half-extent of a rendered node.
pub const RESOURCE_SIZE: f32 = 0.4;

/// A minable resource deposit.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceNode {
    position: Vec3,
    resource_type: ResourceType,
    health: f32,
    max_health: f32,
    active: bool,
}

impl ResourceNode {
    /// Creates a full-health node.
    #[must_use]
    pub fn new(resource_type: ResourceType, position: Vec3) -> Self {
        let max_health = resource_type.max_health();
        Self {
            position,
            resource_type,
            health: max_health,
            max_health,
            active: true,
        }
    }

    /// World position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Resource kind.
    #[inline]
    #[must_use]
    pub const fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Remaining health.
    #[inline]
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Health when fresh.
    #[inline]
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.max_health
    }

    /// False once depleted.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Applies mining damage.
    ///
    /// Returns the number of resources gained: 1 on the hit that depletes
    /// the node, 0 otherwise (including every hit on a depleted node).
    pub fn mine(&mut self, damage: f32) -> u32 {
        if !self.active {
            return 0;
        }

        self.health = (self.health - damage.max(0.0)).max(0.0);
        if self.health > 0.0 {
            return 0;
        }

        self.active = false;
        tracing::debug!(
            resource = self.resource_type.name(),
            x = self.position.x,
            z = self.position.z,
            "Resource node depleted"
        );
        1
    }
}
