//! # Gameplay Systems
//!
//! This module contains the entity behavior core:
//! - Resource nodes and mining
//! - NPC state machine
//! - Player movement and combat
//! - Skills and inventory

pub mod animation;
pub mod combat;
pub mod movement;
pub mod npc;
pub mod player;
pub mod resource;
pub mod skills;

pub use animation::{AnimationBinding, AnimationHandle, AnimationLibrary, SkeletonHandle};
pub use combat::{roll_attack, AttackOutcome, AttackTimer, CombatBand, CombatStats};
pub use npc::{Npc, NpcId, NpcState, NpcStats, NpcType};
pub use player::{Player, PlayerId};
pub use resource::{ResourceId, ResourceNode, ResourceType};
pub use skills::{Inventory, Skill, Skills};
