//! # World
//!
//! Chunk streaming and deterministic per-chunk entity spawning.

pub mod chunk_manager;
pub mod spawning;

pub use chunk_manager::{ChunkManager, LoadedChunk, SpawnTargets, WorldStats};
pub use spawning::{spawn_plan, SpawnEntry, SpawnKind, SpawnTable};

/// Terrain height lookup used to clamp entities to the ground.
pub trait GroundQuery {
    /// Ground height at world (x, z).
    fn height_at(&self, x: f32, z: f32) -> f32;
}

/// Infinite flat ground at a fixed height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatGround(pub f32);

impl GroundQuery for FlatGround {
    #[inline]
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.0
    }
}
