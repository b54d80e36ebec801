//! # WILDLANDS
//!
//! A continuously streamed world: procedural terrain chunks around the
//! player, minable resource nodes, and NPCs driven by a small state machine.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                          Simulation                               │
//! │                                                                   │
//! │  ┌──────────────┐  height   ┌──────────────┐   ┌──────────────┐   │
//! │  │ ChunkManager │<──────────│    Player    │<─>│  NPC arena   │   │
//! │  │              │<──────────│              │   │              │   │
//! │  │  terrain +   │  height   └──────────────┘   └──────────────┘   │
//! │  │  spawning    │─────── append ──────────────────────^           │
//! │  └──────┬───────┘─────── append ──> resource nodes                │
//! │         │                                                         │
//! └─────────┼─────────────────────────────────────────────────────────┘
//!           v
//!   MeshBackend / TextureProvider / Overlay / AnimationLibrary
//!   (collaborators supplied by the embedding frontend)
//! ```
//!
//! ## Modules
//!
//! - `world`: chunk streaming and deterministic spawning
//! - `gameplay`: resources, NPCs, player, combat, skills
//! - `render`: collaborator traits and the headless backend
//! - `simulation`: fixed-step tick orchestration

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod gameplay;
pub mod hud;
pub mod input;
pub mod render;
pub mod simulation;
pub mod world;

pub use config::WorldConfig;
pub use error::{AssetError, WorldError, WorldResult};
pub use gameplay::{Npc, NpcId, NpcState, NpcType, Player, PlayerId, ResourceId, ResourceNode, ResourceType};
pub use hud::{Overlay, Rect};
pub use input::{InputFrame, InputSource};
pub use render::{HeadlessBackend, MeshBackend, TextureProvider};
pub use simulation::Simulation;
pub use world::{ChunkManager, FlatGround, GroundQuery, WorldStats};
