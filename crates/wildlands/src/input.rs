//! Input collaborator.
//!
//! Picking (ray casts against terrain and entities) happens outside the
//! simulation; it only delivers already-resolved orders.

use crate::gameplay::npc::NpcId;
use crate::gameplay::resource::ResourceId;

/// Orders collected for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    /// Ground point to walk to (world x, z).
    pub move_target: Option<[f32; 2]>,
    /// Sprint modifier held.
    pub sprint: bool,
    /// NPC to engage.
    pub attack_target: Option<NpcId>,
    /// Resource node to mine.
    pub mine_target: Option<ResourceId>,
}

impl InputFrame {
    /// A frame that only walks.
    #[must_use]
    pub fn walk_to(x: f32, z: f32) -> Self {
        Self {
            move_target: Some([x, z]),
            ..Self::default()
        }
    }
}

/// Source of per-tick orders.
pub trait InputSource {
    /// Orders for the current tick.
    fn poll(&self) -> InputFrame;
}

impl InputSource for InputFrame {
    fn poll(&self) -> InputFrame {
        *self
    }
}
