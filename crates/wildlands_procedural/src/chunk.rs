//! # Chunk System
//!
//! The world is organized into square terrain chunks for:
//! - Streaming (only chunks near the player exist)
//! - Bounded generation cost per load
//! - O(1) ground height queries
//!
//! ## Chunk Format
//!
//! A chunk covers `CHUNK_SIZE x CHUNK_SIZE` cells of `SCALE` world units each.
//! It stores `(CHUNK_SIZE + 1)^2` height samples: the extra row and column
//! sit exactly on the neighbouring chunk's first row and column, so shared
//! edges match bit for bit.
//!
//! Vertices are emitted in world space; the draw transform is identity.

use bytemuck::{Pod, Zeroable};

use crate::biome::{BiomeClassifier, BiomeType};
use crate::validation::{validate_mesh, ValidationReport};

/// Chunk width/depth in grid cells.
pub const CHUNK_SIZE: usize = 64;

/// World units per grid cell.
pub const SCALE: f32 = 0.5;

/// World units covered by one chunk per axis.
pub const CHUNK_WORLD_SIZE: f32 = CHUNK_SIZE as f32 * SCALE;

/// Height samples per chunk side (one extra for seam stitching).
pub const VERTICES_PER_SIDE: usize = CHUNK_SIZE + 1;

/// Water plane quads per chunk side.
pub const WATER_GRID_SIZE: usize = 8;

/// Default sea level (world Y).
pub const DEFAULT_SEA_LEVEL: f32 = -1.0;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not world units).
    pub x: i32,
    /// Z coordinate (in chunks, not world units).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing a world position (floor division by chunk size).
    #[inline]
    #[must_use]
    pub fn from_world_pos(world_x: f32, world_z: f32) -> Self {
        Self {
            x: (world_x / CHUNK_WORLD_SIZE).floor() as i32,
            z: (world_z / CHUNK_WORLD_SIZE).floor() as i32,
        }
    }

    /// Packs the coordinate into a single 64-bit key.
    ///
    /// Each 32-bit coordinate is reinterpreted as unsigned (two's complement),
    /// X in the high half, Z in the low half.
    #[inline]
    #[must_use]
    pub const fn key(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.z as u32 as u64)
    }

    /// Inverse of [`ChunkCoord::key`].
    #[inline]
    #[must_use]
    pub const fn from_key(key: u64) -> Self {
        Self {
            x: (key >> 32) as u32 as i32,
            z: key as u32 as i32,
        }
    }

    /// World X of the chunk's origin corner.
    #[inline]
    #[must_use]
    pub fn origin_x(self) -> f32 {
        grid_to_world(self.x, 0)
    }

    /// World Z of the chunk's origin corner.
    #[inline]
    #[must_use]
    pub fn origin_z(self) -> f32 {
        grid_to_world(self.z, 0)
    }

    /// World (x, z) of the chunk's center.
    #[inline]
    #[must_use]
    pub fn center(self) -> (f32, f32) {
        (
            self.origin_x() + CHUNK_WORLD_SIZE * 0.5,
            self.origin_z() + CHUNK_WORLD_SIZE * 0.5,
        )
    }

    /// Chebyshev (chessboard) distance in chunks.
    #[inline]
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> i32 {
        let distance = self.x.abs_diff(other.x).max(self.z.abs_diff(other.z));
        distance.min(i32::MAX as u32) as i32
    }
}

/// World coordinate of grid line `local` inside chunk `chunk`.
///
/// Computed from the global integer grid index so that a chunk's last line and
/// its neighbour's first line produce the identical float.
#[inline]
fn grid_to_world(chunk: i32, local: usize) -> f32 {
    let global = i64::from(chunk) * CHUNK_SIZE as i64 + local as i64;
    global as f32 * SCALE
}

/// Terrain vertex: world position + texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Texture coordinate, normalized `[0, 1]` across the chunk.
    pub uv: [f32; 2],
}

/// Vertex and index arrays for one mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData<V> {
    /// Vertex array.
    pub vertices: Vec<V>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

impl<V> MeshData<V> {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A generated terrain chunk.
///
/// Immutable once built.
#[derive(Clone, Debug)]
pub struct TerrainChunk {
    /// Chunk position in the world.
    coord: ChunkCoord,
    /// Discrete biome tag (texture and spawn table selection).
    biome: BiomeType,
    /// Heightfield mesh.
    terrain: MeshData<TerrainVertex>,
    /// Water plane, present iff any sample lies below sea level.
    water: Option<MeshData<TerrainVertex>>,
    /// Lowest sample height.
    min_height: f32,
    /// Highest sample height.
    max_height: f32,
    /// Geometry sanity check results.
    validation: ValidationReport,
}

impl TerrainChunk {
    /// Returns the chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Returns the biome tag.
    #[inline]
    #[must_use]
    pub const fn biome(&self) -> BiomeType {
        self.biome
    }

    /// Returns the heightfield mesh.
    #[inline]
    #[must_use]
    pub const fn terrain_mesh(&self) -> &MeshData<TerrainVertex> {
        &self.terrain
    }

    /// Returns the water plane mesh, if any.
    #[inline]
    #[must_use]
    pub const fn water_mesh(&self) -> Option<&MeshData<TerrainVertex>> {
        self.water.as_ref()
    }

    /// Returns (min, max) sample height.
    #[inline]
    #[must_use]
    pub const fn height_range(&self) -> (f32, f32) {
        (self.min_height, self.max_height)
    }

    /// Returns the validation report produced at generation time.
    #[inline]
    #[must_use]
    pub const fn validation(&self) -> &ValidationReport {
        &self.validation
    }

    /// Sample height at local grid indices.
    #[inline]
    fn sample(&self, local_x: usize, local_z: usize) -> f32 {
        self.terrain.vertices[local_z * VERTICES_PER_SIDE + local_x].position[1]
    }

    /// Ground height at a world position by bilinear interpolation.
    ///
    /// Positions outside this chunk's footprint (including its shared far
    /// edge) return 0.0. O(1), no side effects.
    #[must_use]
    pub fn height_at(&self, world_x: f32, world_z: f32) -> f32 {
        let local_x = (world_x - self.coord.origin_x()) / SCALE;
        let local_z = (world_z - self.coord.origin_z()) / SCALE;

        let limit = CHUNK_SIZE as f32;
        // Negated comparison also rejects NaN
        if !(0.0..=limit).contains(&local_x) || !(0.0..=limit).contains(&local_z) {
            return 0.0;
        }

        let cell_x = (local_x.floor() as usize).min(CHUNK_SIZE - 1);
        let cell_z = (local_z.floor() as usize).min(CHUNK_SIZE - 1);
        let fx = local_x - cell_x as f32;
        let fz = local_z - cell_z as f32;

        let h00 = self.sample(cell_x, cell_z);
        let h10 = self.sample(cell_x + 1, cell_z);
        let h01 = self.sample(cell_x, cell_z + 1);
        let h11 = self.sample(cell_x + 1, cell_z + 1);

        let near = h00 + (h10 - h00) * fx;
        let far = h01 + (h11 - h01) * fx;
        near + (far - near) * fz
    }
}

/// Terrain chunk generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChunkGenerator {
    /// Biome classifier / terrain shaper.
    classifier: BiomeClassifier,
}

impl ChunkGenerator {
    /// Creates a new chunk generator with the given sea level.
    #[must_use]
    pub const fn new(sea_level: f32) -> Self {
        Self {
            classifier: BiomeClassifier::new(sea_level),
        }
    }

    /// Returns the sea level.
    #[inline]
    #[must_use]
    pub const fn sea_level(&self) -> f32 {
        self.classifier.sea_level()
    }

    /// Returns the terrain shaper.
    #[inline]
    #[must_use]
    pub const fn classifier(&self) -> &BiomeClassifier {
        &self.classifier
    }

    /// Generates a chunk, tagging it with the biome classified at its center.
    #[must_use]
    pub fn generate_classified(&self, coord: ChunkCoord) -> TerrainChunk {
        let (cx, cz) = coord.center();
        self.generate(coord, BiomeClassifier::classify(cx, cz))
    }

    /// Generates a chunk at the given coordinates.
    ///
    /// `biome` is only a tag; heights always come from the continuous blend.
    /// Validation problems are logged and recorded, never fatal.
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord, biome: BiomeType) -> TerrainChunk {
        let terrain = self.build_heightfield(coord);

        let (min_height, max_height) = terrain
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), h| (lo.min(h), hi.max(h)));

        let water = (min_height < self.sea_level()).then(|| self.build_water_plane(coord));

        let validation = validate_mesh(&terrain.vertices, &terrain.indices);
        if !validation.is_clean() {
            tracing::warn!(
                chunk_x = coord.x,
                chunk_z = coord.z,
                non_finite = validation.non_finite_vertices,
                out_of_bounds = validation.out_of_bounds_vertices,
                dangling = validation.dangling_indices,
                height_range = validation.height_range,
                "Terrain chunk failed validation; keeping degraded mesh"
            );
        }

        TerrainChunk {
            coord,
            biome,
            terrain,
            water,
            min_height,
            max_height,
            validation,
        }
    }

    /// Builds the `(CHUNK_SIZE + 1)^2` heightfield and its triangle list.
    fn build_heightfield(&self, coord: ChunkCoord) -> MeshData<TerrainVertex> {
        let mut vertices = Vec::with_capacity(VERTICES_PER_SIDE * VERTICES_PER_SIDE);
        for local_z in 0..VERTICES_PER_SIDE {
            let world_z = grid_to_world(coord.z, local_z);
            for local_x in 0..VERTICES_PER_SIDE {
                let world_x = grid_to_world(coord.x, local_x);
                let height = self.classifier.terrain_height(world_x, world_z);
                vertices.push(TerrainVertex {
                    position: [world_x, height, world_z],
                    uv: [
                        local_x as f32 / CHUNK_SIZE as f32,
                        local_z as f32 / CHUNK_SIZE as f32,
                    ],
                });
            }
        }

        MeshData {
            vertices,
            indices: grid_indices(CHUNK_SIZE),
        }
    }

    /// Builds a flat, coarse water grid at sea level over the chunk footprint.
    fn build_water_plane(&self, coord: ChunkCoord) -> MeshData<TerrainVertex> {
        let sea_level = self.sea_level();
        let step = CHUNK_WORLD_SIZE / WATER_GRID_SIZE as f32;
        let origin_x = coord.origin_x();
        let origin_z = coord.origin_z();

        let mut vertices = Vec::with_capacity((WATER_GRID_SIZE + 1) * (WATER_GRID_SIZE + 1));
        for j in 0..=WATER_GRID_SIZE {
            for i in 0..=WATER_GRID_SIZE {
                vertices.push(TerrainVertex {
                    position: [origin_x + i as f32 * step, sea_level, origin_z + j as f32 * step],
                    uv: [
                        i as f32 / WATER_GRID_SIZE as f32,
                        j as f32 / WATER_GRID_SIZE as f32,
                    ],
                });
            }
        }

        MeshData {
            vertices,
            indices: grid_indices(WATER_GRID_SIZE),
        }
    }
}

/// Two triangles per cell of a `cells x cells` grid.
///
/// Winding is counter-clockwise seen from +Y, so normals point up.
fn grid_indices(cells: usize) -> Vec<u32> {
    let side = (cells + 1) as u32;
    let mut indices = Vec::with_capacity(cells * cells * 6);
    for z in 0..cells as u32 {
        for x in 0..cells as u32 {
            let a = z * side + x;
            let b = a + 1;
            let c = a + side;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_key_round_trip() {
        for x in (-100_000..100_000).step_by(997) {
            for z in (-100_000..100_000).step_by(1009) {
                let coord = ChunkCoord::new(x, z);
                assert_eq!(ChunkCoord::from_key(coord.key()), coord);
            }
        }

        for coord in [
            ChunkCoord::new(i32::MIN, i32::MAX),
            ChunkCoord::new(-1, -1),
            ChunkCoord::new(0, -1),
            ChunkCoord::new(i32::MAX, i32::MIN),
        ] {
            assert_eq!(ChunkCoord::from_key(coord.key()), coord);
        }
    }

    #[test]
    fn test_negative_keys_distinct() {
        assert_ne!(ChunkCoord::new(-1, 0).key(), ChunkCoord::new(0, -1).key());
        assert_eq!(ChunkCoord::new(-1, -1).key(), u64::MAX);
    }

    #[test]
    fn test_chebyshev_distance_saturates() {
        let far_west = ChunkCoord::new(i32::MIN, 0);
        let far_east = ChunkCoord::new(i32::MAX, 5);
        assert_eq!(far_west.chebyshev_distance(far_east), i32::MAX);
        assert_eq!(ChunkCoord::new(-2, 1).chebyshev_distance(ChunkCoord::new(1, -3)), 4);
    }

    #[test]
    fn test_from_world_pos_floors() {
        assert_eq!(ChunkCoord::from_world_pos(0.0, 0.0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world_pos(31.9, 0.0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world_pos(32.0, 0.0), ChunkCoord::new(1, 0));
        assert_eq!(ChunkCoord::from_world_pos(-0.1, -32.1), ChunkCoord::new(-1, -2));
    }

    #[test]
    fn test_grid_shape() {
        let chunk = ChunkGenerator::default().generate_classified(ChunkCoord::new(3, -2));
        let mesh = chunk.terrain_mesh();
        assert_eq!(mesh.vertices.len(), VERTICES_PER_SIDE * VERTICES_PER_SIDE);
        assert_eq!(mesh.indices.len(), CHUNK_SIZE * CHUNK_SIZE * 6);
        assert!(chunk.validation().is_clean());
    }

    #[test]
    fn test_uv_normalized() {
        let chunk = ChunkGenerator::default().generate_classified(ChunkCoord::new(0, 0));
        let mesh = chunk.terrain_mesh();
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices[VERTICES_PER_SIDE * VERTICES_PER_SIDE - 1].uv, [1.0, 1.0]);
    }

    #[test]
    fn test_winding_faces_up() {
        let chunk = ChunkGenerator::new(-1000.0).generate_classified(ChunkCoord::new(0, 0));
        let mesh = chunk.terrain_mesh();
        for tri in mesh.indices.chunks(3).take(200) {
            let p0 = mesh.vertices[tri[0] as usize].position;
            let p1 = mesh.vertices[tri[1] as usize].position;
            let p2 = mesh.vertices[tri[2] as usize].position;
            let e1 = [p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]];
            let e2 = [p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]];
            // Y component of e1 x e2
            let normal_y = e1[2] * e2[0] - e1[0] * e2[2];
            assert!(normal_y > 0.0, "Triangle {tri:?} faces down");
        }
    }

    #[test]
    fn test_water_iff_below_sea_level() {
        // Sea far below any terrain: no water anywhere
        let dry = ChunkGenerator::new(-1000.0).generate_classified(ChunkCoord::new(0, 0));
        assert!(dry.water_mesh().is_none());

        // Sea far above any terrain: every chunk gets water
        let wet = ChunkGenerator::new(1000.0).generate_classified(ChunkCoord::new(0, 0));
        let water = wet.water_mesh().expect("water plane");
        assert_eq!(water.vertices.len(), (WATER_GRID_SIZE + 1) * (WATER_GRID_SIZE + 1));
        assert_eq!(water.triangle_count(), WATER_GRID_SIZE * WATER_GRID_SIZE * 2);
        assert!(water.vertices.iter().all(|v| v.position[1] == 1000.0));
    }

    #[test]
    fn test_height_at_matches_samples() {
        let generator = ChunkGenerator::default();
        let coord = ChunkCoord::new(-1, 2);
        let chunk = generator.generate_classified(coord);

        // At grid points the query returns the generated sample exactly
        for (lx, lz) in [(0, 0), (10, 20), (63, 63), (64, 64), (64, 0)] {
            let wx = grid_to_world(coord.x, lx);
            let wz = grid_to_world(coord.z, lz);
            let expected = generator.classifier().terrain_height(wx, wz);
            assert!((chunk.height_at(wx, wz) - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_height_at_interpolates_between_samples() {
        let chunk = ChunkGenerator::default().generate_classified(ChunkCoord::new(0, 0));
        let h0 = chunk.height_at(5.0, 5.0);
        let h1 = chunk.height_at(5.5, 5.0);
        let mid = chunk.height_at(5.25, 5.0);
        assert!((mid - (h0 + h1) * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_height_at_outside_returns_zero() {
        let chunk = ChunkGenerator::new(-1000.0).generate_classified(ChunkCoord::new(0, 0));
        assert_eq!(chunk.height_at(-0.5, 10.0), 0.0);
        assert_eq!(chunk.height_at(10.0, CHUNK_WORLD_SIZE + 0.5), 0.0);
        assert_eq!(chunk.height_at(f32::NAN, 1.0), 0.0);
    }

    #[test]
    fn test_generation_deterministic() {
        let generator = ChunkGenerator::default();
        let a = generator.generate_classified(ChunkCoord::new(7, -9));
        let b = generator.generate_classified(ChunkCoord::new(7, -9));
        assert_eq!(a.terrain_mesh(), b.terrain_mesh());
        assert_eq!(a.biome(), b.biome());
    }
}
