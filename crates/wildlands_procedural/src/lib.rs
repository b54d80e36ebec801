//! # WILDLANDS Procedural Generation
//!
//! Deterministic terrain for an endless, streamed world.
//!
//! ## Design Principles
//!
//! 1. **Pure**: Height is a function of world (x, z) only. No seeds, no state.
//! 2. **Chunked**: The world is tiled into `CHUNK_SIZE x CHUNK_SIZE` cell chunks
//! 3. **Seamless**: Each chunk carries one extra row/column of samples that
//!    coincides exactly with its neighbour's first row/column
//! 4. **Blended**: Biomes are mixed by weight, never switched per chunk
//!
//! ## Core Components
//!
//! - `noise`: Four-octave height noise
//! - `biome`: Biome weights, discrete classification, terrain shaping
//! - `chunk`: Chunk coordinates, terrain chunk generation, height queries
//! - `validation`: Geometry sanity checks on generated meshes
//! - `texture`: Procedural biome and water textures
//!
//! ## Example
//!
//! ```rust,ignore
//! use wildlands_procedural::{ChunkCoord, ChunkGenerator};
//!
//! let generator = ChunkGenerator::default();
//! let chunk = generator.generate_classified(ChunkCoord::new(0, 0));
//!
//! let ground = chunk.height_at(10.0, 10.0);
//! ```

#![deny(unsafe_code)]

pub mod biome;
pub mod chunk;
pub mod noise;
pub mod texture;
pub mod validation;

pub use biome::{BiomeClassifier, BiomeType, BiomeWeights};
pub use chunk::{
    ChunkCoord, ChunkGenerator, MeshData, TerrainChunk, TerrainVertex, CHUNK_SIZE,
    CHUNK_WORLD_SIZE, DEFAULT_SEA_LEVEL, SCALE, VERTICES_PER_SIDE, WATER_GRID_SIZE,
};
pub use noise::{height_noise, OCTAVES};
pub use texture::{biome_texture_pixels, water_texture_pixels, TEXTURE_SIZE};
pub use validation::{validate_mesh, ValidationReport};
