//! # Chunk Manager
//!
//! Spatial cache of terrain chunks around the player.
//!
//! ## Lifecycle
//!
//! ```text
//! player crosses chunk boundary
//!   -> load every missing chunk in the (2R+1)^2 square
//!        generate terrain, upload meshes, spawn entities (first load only)
//!   -> unload every chunk with Chebyshev distance > R + 1
//!        release meshes; spawned entities stay in the global collections
//! ```
//!
//! The one-chunk hysteresis ring between `R` and `R + 1` keeps a player
//! pacing along a boundary from thrashing loads and unloads.
//!
//! The manager owns chunks only. Resource and NPC collections belong to the
//! caller and are passed in as [`SpawnTargets`]; the manager only appends.

use std::collections::{HashMap, HashSet};

use wildlands_core::{Arena, Transform};
use wildlands_procedural::{ChunkCoord, ChunkGenerator, TerrainChunk};

use super::spawning::{spawn_plan, SpawnKind};
use super::GroundQuery;
use crate::config::WorldConfig;
use crate::gameplay::npc::Npc;
use crate::gameplay::resource::ResourceNode;
use crate::render::{upload, MeshBackend, MeshHandle, TextureProvider, VertexLayout};

/// Session counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunks generated (reloads count again).
    pub chunks_generated: u64,
    /// Chunks unloaded.
    pub chunks_unloaded: u64,
    /// Chunks currently resident.
    pub resident_chunks: usize,
    /// Generated chunks whose mesh failed validation.
    pub validation_warnings: u64,
    /// Resource nodes appended.
    pub resources_spawned: u64,
    /// NPCs appended.
    pub npcs_spawned: u64,
}

/// A resident chunk and its uploaded meshes.
#[derive(Debug)]
pub struct LoadedChunk {
    /// CPU-side terrain.
    pub terrain: TerrainChunk,
    /// Uploaded terrain mesh.
    pub terrain_mesh: MeshHandle,
    /// Uploaded water plane, if the chunk dips below sea level.
    pub water_mesh: Option<MeshHandle>,
}

/// Append-only entity collections handed to the spawn step.
pub struct SpawnTargets<'a> {
    /// Resource node collection.
    pub resources: &'a mut Vec<ResourceNode>,
    /// NPC arena.
    pub npcs: &'a mut Arena<Npc>,
}

/// Streams chunks around the player.
#[derive(Debug)]
pub struct ChunkManager {
    generator: ChunkGenerator,
    render_distance: i32,
    spawn_entities: bool,
    chunks: HashMap<u64, LoadedChunk>,
    /// Keys that have already spawned their entities.
    spawned: HashSet<u64>,
    player_chunk: Option<ChunkCoord>,
    stats: WorldStats,
}

impl ChunkManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            generator: ChunkGenerator::new(config.sea_level),
            render_distance: config.render_distance_chunks(),
            spawn_entities: config.spawn_entities,
            chunks: HashMap::new(),
            spawned: HashSet::new(),
            player_chunk: None,
            stats: WorldStats::default(),
        }
    }

    /// Loads and unloads chunks for a player at world (x, z).
    ///
    /// No-op while the player stays in the same chunk. Returns true if the
    /// resident set was recomputed.
    pub fn update_chunks_around_player(
        &mut self,
        player_x: f32,
        player_z: f32,
        backend: &mut dyn MeshBackend,
        targets: SpawnTargets<'_>,
    ) -> bool {
        let center = ChunkCoord::from_world_pos(player_x, player_z);
        if self.player_chunk == Some(center) {
            return false;
        }
        self.player_chunk = Some(center);

        let SpawnTargets { resources, npcs } = targets;
        let radius = self.render_distance;
        let mut loaded = 0usize;

        for dz in -radius..=radius {
            for dx in -radius..=radius {
                // Saturates at the edge of the coordinate space
                let coord = ChunkCoord::new(center.x.saturating_add(dx), center.z.saturating_add(dz));
                if self.chunks.contains_key(&coord.key()) {
                    continue;
                }
                self.load_chunk(coord, backend, resources, npcs);
                loaded += 1;
            }
        }

        let unloaded = self.unload_beyond(center, radius + 1, backend);

        self.stats.resident_chunks = self.chunks.len();
        tracing::debug!(
            chunk_x = center.x,
            chunk_z = center.z,
            loaded,
            unloaded,
            resident = self.chunks.len(),
            "Player changed chunk"
        );
        true
    }

    fn load_chunk(
        &mut self,
        coord: ChunkCoord,
        backend: &mut dyn MeshBackend,
        resources: &mut Vec<ResourceNode>,
        npcs: &mut Arena<Npc>,
    ) {
        let terrain = self.generator.generate_classified(coord);
        self.stats.chunks_generated += 1;
        if !terrain.validation().is_clean() {
            self.stats.validation_warnings += 1;
        }

        let terrain_mesh = upload(backend, terrain.terrain_mesh(), VertexLayout::PositionUv);
        let water_mesh = terrain
            .water_mesh()
            .map(|water| upload(backend, water, VertexLayout::PositionUv));

        if self.spawn_entities && self.spawned.insert(coord.key()) {
            self.spawn_entities_for(&terrain, resources, npcs);
        }

        tracing::debug!(
            chunk_x = coord.x,
            chunk_z = coord.z,
            biome = terrain.biome().name(),
            water = water_mesh.is_some(),
            "Chunk loaded"
        );

        self.chunks.insert(
            coord.key(),
            LoadedChunk {
                terrain,
                terrain_mesh,
                water_mesh,
            },
        );
    }

    fn spawn_entities_for(
        &mut self,
        terrain: &TerrainChunk,
        resources: &mut Vec<ResourceNode>,
        npcs: &mut Arena<Npc>,
    ) {
        let mut resource_count = 0u64;
        let mut npc_count = 0u64;

        for entry in spawn_plan(terrain, self.generator.sea_level()) {
            match entry.kind {
                SpawnKind::Resource(kind) => {
                    resources.push(ResourceNode::new(kind, entry.position));
                    resource_count += 1;
                }
                SpawnKind::Npc(kind) => {
                    npcs.insert(Npc::new(kind, entry.position));
                    npc_count += 1;
                }
            }
        }

        self.stats.resources_spawned += resource_count;
        self.stats.npcs_spawned += npc_count;

        let coord = terrain.coord();
        tracing::debug!(
            chunk_x = coord.x,
            chunk_z = coord.z,
            biome = terrain.biome().name(),
            resources = resource_count,
            npcs = npc_count,
            "Chunk spawned entities"
        );
    }

    /// Unloads chunks farther than `keep` (Chebyshev) from `center`.
    fn unload_beyond(&mut self, center: ChunkCoord, keep: i32, backend: &mut dyn MeshBackend) -> usize {
        let doomed: Vec<u64> = self
            .chunks
            .keys()
            .copied()
            .filter(|&key| ChunkCoord::from_key(key).chebyshev_distance(center) > keep)
            .collect();

        for key in &doomed {
            if let Some(chunk) = self.chunks.remove(key) {
                release(backend, &chunk);
                self.stats.chunks_unloaded += 1;
                tracing::debug!(
                    chunk_x = chunk.terrain.coord().x,
                    chunk_z = chunk.terrain.coord().z,
                    "Chunk unloaded"
                );
            }
        }

        doomed.len()
    }

    /// Releases every resident chunk. Spawn bookkeeping is kept.
    pub fn unload_all(&mut self, backend: &mut dyn MeshBackend) {
        for (_, chunk) in self.chunks.drain() {
            release(backend, &chunk);
            self.stats.chunks_unloaded += 1;
        }
        self.player_chunk = None;
        self.stats.resident_chunks = 0;
    }

    /// Ground height at world (x, z). 0.0 if the containing chunk is not
    /// resident.
    #[must_use]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.chunk(ChunkCoord::from_world_pos(x, z))
            .map_or(0.0, |chunk| chunk.terrain.height_at(x, z))
    }

    /// Resident chunk at `coord`.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&LoadedChunk> {
        self.chunks.get(&coord.key())
    }

    /// True if `coord` is resident.
    #[must_use]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord.key())
    }

    /// Number of resident chunks.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Resident chunk coordinates, in no particular order.
    pub fn loaded_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().map(|&key| ChunkCoord::from_key(key))
    }

    /// Chunk the player was last seen in.
    #[must_use]
    pub const fn player_chunk(&self) -> Option<ChunkCoord> {
        self.player_chunk
    }

    /// Session counters.
    #[must_use]
    pub const fn stats(&self) -> &WorldStats {
        &self.stats
    }

    /// Water surface height.
    #[must_use]
    pub const fn sea_level(&self) -> f32 {
        self.generator.sea_level()
    }

    /// Draws every resident chunk: terrain first, then water.
    pub fn draw(&self, backend: &mut dyn MeshBackend, textures: &mut dyn TextureProvider) {
        for chunk in self.chunks.values() {
            let texture = textures.biome_texture(chunk.terrain.biome());
            backend.draw(chunk.terrain_mesh, Some(texture), Transform::IDENTITY);
        }

        let water = textures.water_texture();
        for mesh in self.chunks.values().filter_map(|chunk| chunk.water_mesh) {
            backend.draw(mesh, Some(water), Transform::IDENTITY);
        }
    }
}

impl GroundQuery for ChunkManager {
    #[inline]
    fn height_at(&self, x: f32, z: f32) -> f32 {
        ChunkManager::height_at(self, x, z)
    }
}

fn release(backend: &mut dyn MeshBackend, chunk: &LoadedChunk) {
    backend.release_mesh(chunk.terrain_mesh);
    if let Some(water) = chunk.water_mesh {
        backend.release_mesh(water);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;
    use wildlands_procedural::CHUNK_WORLD_SIZE;

    fn manager(render_distance: u32, spawn_entities: bool) -> ChunkManager {
        ChunkManager::new(&WorldConfig {
            render_distance,
            spawn_entities,
            ..WorldConfig::default()
        })
    }

    fn step(
        manager: &mut ChunkManager,
        backend: &mut HeadlessBackend,
        resources: &mut Vec<ResourceNode>,
        npcs: &mut Arena<Npc>,
        x: f32,
        z: f32,
    ) -> bool {
        manager.update_chunks_around_player(x, z, backend, SpawnTargets { resources, npcs })
    }

    #[test]
    fn test_initial_load_fills_square() {
        let mut world = manager(2, false);
        let mut backend = HeadlessBackend::new();
        let (mut resources, mut npcs) = (Vec::new(), Arena::new());

        assert!(step(&mut world, &mut backend, &mut resources, &mut npcs, 1.0, 1.0));
        assert_eq!(world.loaded_count(), 25);
        assert_eq!(world.stats().resident_chunks, 25);
        assert_eq!(world.player_chunk(), Some(ChunkCoord::new(0, 0)));
        for coord in world.loaded_coords() {
            assert!(coord.chebyshev_distance(ChunkCoord::new(0, 0)) <= 2);
        }
    }

    #[test]
    fn test_same_chunk_is_debounced() {
        let mut world = manager(1, true);
        let mut backend = HeadlessBackend::new();
        let (mut resources, mut npcs) = (Vec::new(), Arena::new());

        assert!(step(&mut world, &mut backend, &mut resources, &mut npcs, 1.0, 1.0));
        let uploads = backend.uploads();
        let npc_count = npcs.len();

        for i in 0..50 {
            let offset = i as f32 * 0.5;
            assert!(!step(&mut world, &mut backend, &mut resources, &mut npcs, 1.0 + offset, 2.0));
        }
        assert_eq!(backend.uploads(), uploads);
        assert_eq!(npcs.len(), npc_count);
    }

    #[test]
    fn test_unload_uses_hysteresis_ring() {
        let mut world = manager(1, false);
        let mut backend = HeadlessBackend::new();
        let (mut resources, mut npcs) = (Vec::new(), Arena::new());

        step(&mut world, &mut backend, &mut resources, &mut npcs, 1.0, 1.0);
        // One chunk east: nothing is farther than R + 1 = 2 yet
        step(&mut world, &mut backend, &mut resources, &mut npcs, CHUNK_WORLD_SIZE + 1.0, 1.0);
        assert_eq!(world.loaded_count(), 12);
        assert_eq!(world.stats().chunks_unloaded, 0);

        // Jump three chunks east of the start: columns -1 and 0 go
        step(&mut world, &mut backend, &mut resources, &mut npcs, 3.0 * CHUNK_WORLD_SIZE + 1.0, 1.0);
        assert!(!world.is_loaded(ChunkCoord::new(0, 0)));
        assert!(!world.is_loaded(ChunkCoord::new(-1, 0)));
        assert!(world.is_loaded(ChunkCoord::new(1, 0)));
        for coord in world.loaded_coords() {
            assert!(coord.chebyshev_distance(ChunkCoord::new(3, 0)) <= 2);
        }
    }

    #[test]
    fn test_edge_of_coordinate_space() {
        let mut world = manager(1, false);
        let mut backend = HeadlessBackend::new();
        let (mut resources, mut npcs) = (Vec::new(), Arena::new());

        assert!(step(&mut world, &mut backend, &mut resources, &mut npcs, 1.0e12, 0.0));
        assert_eq!(world.player_chunk().map(|c| c.x), Some(i32::MAX));
        // Columns past i32::MAX collapse onto the last one
        assert_eq!(world.loaded_count(), 6);

        step(&mut world, &mut backend, &mut resources, &mut npcs, -1.0e12, 0.0);
        assert_eq!(world.player_chunk().map(|c| c.x), Some(i32::MIN));
        assert!(world.loaded_coords().all(|c| c.x <= i32::MIN + 1));
    }

    #[test]
    fn test_meshes_released_on_unload() {
        let mut world = manager(1, false);
        let mut backend = HeadlessBackend::new();
        let (mut resources, mut npcs) = (Vec::new(), Arena::new());

        step(&mut world, &mut backend, &mut resources, &mut npcs, 1.0, 1.0);
        step(&mut world, &mut backend, &mut resources, &mut npcs, 20.0 * CHUNK_WORLD_SIZE, 1.0);
        assert_eq!(world.loaded_count(), 9);
        assert_eq!(backend.uploads() - backend.releases(), backend.live_meshes() as u64);

        world.unload_all(&mut backend);
        assert_eq!(backend.live_meshes(), 0);
        assert_eq!(world.loaded_count(), 0);
    }

    #[test]
    fn test_reload_does_not_respawn() {
        let mut world = manager(1, true);
        let mut backend = HeadlessBackend::new();
        let (mut resources, mut npcs) = (Vec::new(), Arena::new());

        step(&mut world, &mut backend, &mut resources, &mut npcs, 1.0, 1.0);
        let first = (resources.len(), npcs.len());

        step(&mut world, &mut backend, &mut resources, &mut npcs, 50.0 * CHUNK_WORLD_SIZE, 1.0);
        let far = (resources.len(), npcs.len());

        step(&mut world, &mut backend, &mut resources, &mut npcs, 1.0, 1.0);
        assert!(world.is_loaded(ChunkCoord::new(0, 0)));
        assert_eq!((resources.len(), npcs.len()), far);
        assert!(far.0 >= first.0 && far.1 >= first.1);
    }

    #[test]
    fn test_height_matches_chunk_and_zero_when_unloaded() {
        let mut world = manager(1, false);
        let mut backend = HeadlessBackend::new();
        let (mut resources, mut npcs) = (Vec::new(), Arena::new());
        step(&mut world, &mut backend, &mut resources, &mut npcs, 1.0, 1.0);

        let generator = ChunkGenerator::default();
        let reference = generator.generate_classified(ChunkCoord::new(0, 0));
        for (x, z) in [(3.3, 7.9), (0.0, 0.0), (31.5, 12.25)] {
            assert_eq!(world.height_at(x, z), reference.height_at(x, z));
        }

        assert_eq!(world.height_at(10_000.0, -10_000.0), 0.0);
    }

    #[test]
    fn test_draw_submits_resident_chunks() {
        let mut world = manager(1, false);
        let mut backend = HeadlessBackend::new();
        let mut textures = HeadlessBackend::new();
        let (mut resources, mut npcs) = (Vec::new(), Arena::new());
        step(&mut world, &mut backend, &mut resources, &mut npcs, 1.0, 1.0);

        let water_chunks = world
            .loaded_coords()
            .filter(|&coord| world.chunk(coord).is_some_and(|c| c.water_mesh.is_some()))
            .count();
        world.draw(&mut backend, &mut textures);
        assert_eq!(backend.draw_calls() as usize, 9 + water_chunks);
    }
}
