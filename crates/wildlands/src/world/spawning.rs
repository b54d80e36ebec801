//! # Procedural Spawning
//!
//! Resource and NPC placement for a freshly generated chunk.
//!
//! Every decision is drawn from [`spawn_hash`], a pure function of
//! `(chunk x, chunk z, attempt, salt)`. Generating the same chunk twice
//! therefore yields the same plan; no RNG state is involved.
//!
//! The spawn table is picked from the chunk's discrete biome tag, while
//! heights come from the continuous blend. Near biome borders the two can
//! disagree and a mountain-looking slope may spawn desert copper; that is
//! the expected world layout.
//!
//! ## Attempt Layout
//!
//! | Attempts | Use |
//! |----------|-----|
//! | `0..resource_attempts` | resource nodes |
//! | `1000..1000 + npc_attempts` | regular NPCs |
//! | `2000` | village roll and center |
//! | `2001..` | village members |

use wildlands_core::Vec3;
use wildlands_procedural::{BiomeType, ChunkCoord, TerrainChunk, CHUNK_WORLD_SIZE};

use crate::gameplay::npc::NpcType;
use crate::gameplay::resource::ResourceType;

/// Entities are placed this far above the ground sample.
pub const SPAWN_HEIGHT_OFFSET: f32 = 0.5;

/// Keeps candidates away from chunk edges.
const EDGE_MARGIN: f32 = 1.0;

const HASH_X: u32 = 73_856_093;
const HASH_Z: u32 = 19_349_663;
const HASH_ATTEMPT: u32 = 83_492_791;
const HASH_SALT: u32 = 0x9E37_79B9;

const NPC_ATTEMPT_BASE: u32 = 1000;
const VILLAGE_ATTEMPT: u32 = 2000;

const SALT_CHANCE: u32 = 0;
const SALT_X: u32 = 1;
const SALT_Z: u32 = 2;
const SALT_KIND: u32 = 3;

/// Village centers stay inside this local window (world units).
const VILLAGE_CENTER_MIN: f32 = 8.0;
const VILLAGE_CENTER_SPAN: f32 = 16.0;
const VILLAGE_MIN_SIZE: u32 = 3;
const VILLAGE_MAX_SIZE: u32 = 6;
const VILLAGE_MIN_RADIUS: f32 = 2.0;
const VILLAGE_RADIUS_SPAN: f32 = 3.0;

/// Deterministic value in `[0, 1)` for a spawn decision.
#[must_use]
pub fn spawn_hash(coord: ChunkCoord, attempt: u32, salt: u32) -> f32 {
    let mut h = (coord.x as u32)
        .wrapping_mul(HASH_X)
        .wrapping_add((coord.z as u32).wrapping_mul(HASH_Z))
        .wrapping_add(attempt.wrapping_mul(HASH_ATTEMPT))
        .wrapping_add(salt.wrapping_mul(HASH_SALT));

    // murmur3 finalizer
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;

    (h >> 8) as f32 / (1u32 << 24) as f32
}

// ============================================================================
// SPAWN TABLES
// ============================================================================

/// Per-biome density and eligible types.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnTable {
    /// Resource candidates per chunk.
    pub resource_attempts: u32,
    /// Probability a resource candidate spawns.
    pub resource_chance: f32,
    /// Weighted resource types.
    pub resources: &'static [(ResourceType, f32)],
    /// NPC candidates per chunk.
    pub npc_attempts: u32,
    /// Probability an NPC candidate spawns.
    pub npc_chance: f32,
    /// Weighted NPC types.
    pub npcs: &'static [(NpcType, f32)],
    /// Probability the chunk hosts a village.
    pub village_chance: f32,
}

static MOUNTAINS: SpawnTable = SpawnTable {
    resource_attempts: 12,
    resource_chance: 0.6,
    resources: &[(ResourceType::Iron, 0.55), (ResourceType::Stone, 0.45)],
    npc_attempts: 2,
    npc_chance: 0.25,
    npcs: &[(NpcType::Wanderer, 1.0)],
    village_chance: 0.0,
};

static DESERT: SpawnTable = SpawnTable {
    resource_attempts: 8,
    resource_chance: 0.45,
    resources: &[(ResourceType::Copper, 0.6), (ResourceType::Stone, 0.4)],
    npc_attempts: 2,
    npc_chance: 0.2,
    npcs: &[(NpcType::Wanderer, 0.6), (NpcType::Merchant, 0.4)],
    village_chance: 0.0,
};

static GRASSLAND: SpawnTable = SpawnTable {
    resource_attempts: 8,
    resource_chance: 0.4,
    resources: &[
        (ResourceType::Copper, 0.34),
        (ResourceType::Iron, 0.33),
        (ResourceType::Stone, 0.33),
    ],
    npc_attempts: 4,
    npc_chance: 0.4,
    npcs: &[
        (NpcType::Villager, 0.5),
        (NpcType::Merchant, 0.25),
        (NpcType::Wanderer, 0.25),
    ],
    village_chance: 0.15,
};

static SWAMP: SpawnTable = SpawnTable {
    resource_attempts: 4,
    resource_chance: 0.3,
    resources: &[(ResourceType::Iron, 0.5), (ResourceType::Stone, 0.5)],
    npc_attempts: 1,
    npc_chance: 0.15,
    npcs: &[(NpcType::Wanderer, 1.0)],
    village_chance: 0.0,
};

impl SpawnTable {
    /// Table for a biome.
    #[must_use]
    pub fn for_biome(biome: BiomeType) -> &'static Self {
        match biome {
            BiomeType::Mountains => &MOUNTAINS,
            BiomeType::Desert => &DESERT,
            BiomeType::Grassland => &GRASSLAND,
            BiomeType::Swamp => &SWAMP,
        }
    }
}

/// Weighted choice; `roll` in `[0, 1)`.
fn pick<T: Copy>(weights: &[(T, f32)], roll: f32) -> Option<T> {
    let total: f32 = weights.iter().map(|(_, w)| w).sum();
    let mut remaining = roll * total;
    for &(item, weight) in weights {
        if remaining < weight {
            return Some(item);
        }
        remaining -= weight;
    }
    weights.last().map(|&(item, _)| item)
}

// ============================================================================
// SPAWN PLAN
// ============================================================================

/// What to spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnKind {
    /// A resource node.
    Resource(ResourceType),
    /// An NPC.
    Npc(NpcType),
}

/// One planned spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnEntry {
    /// Entity kind.
    pub kind: SpawnKind,
    /// World position, [`SPAWN_HEIGHT_OFFSET`] above the ground.
    pub position: Vec3,
}

/// Ground position for a local candidate, or `None` when underwater.
fn place(chunk: &TerrainChunk, sea_level: f32, local_x: f32, local_z: f32) -> Option<Vec3> {
    let coord = chunk.coord();
    let x = coord.origin_x() + local_x;
    let z = coord.origin_z() + local_z;
    let ground = chunk.height_at(x, z);
    (ground >= sea_level).then(|| Vec3::new(x, ground + SPAWN_HEIGHT_OFFSET, z))
}

/// Local offset inside the edge margin for `roll` in `[0, 1)`.
fn local_offset(roll: f32) -> f32 {
    EDGE_MARGIN + roll * (CHUNK_WORLD_SIZE - 2.0 * EDGE_MARGIN)
}

/// Everything `chunk` spawns. Pure: same chunk, same plan.
///
/// Candidates whose ground sample lies below `sea_level` are skipped.
#[must_use]
pub fn spawn_plan(chunk: &TerrainChunk, sea_level: f32) -> Vec<SpawnEntry> {
    let coord = chunk.coord();
    let table = SpawnTable::for_biome(chunk.biome());
    let mut plan = Vec::new();

    for attempt in 0..table.resource_attempts {
        if spawn_hash(coord, attempt, SALT_CHANCE) >= table.resource_chance {
            continue;
        }
        let local_x = local_offset(spawn_hash(coord, attempt, SALT_X));
        let local_z = local_offset(spawn_hash(coord, attempt, SALT_Z));
        let (Some(position), Some(kind)) = (
            place(chunk, sea_level, local_x, local_z),
            pick(table.resources, spawn_hash(coord, attempt, SALT_KIND)),
        ) else {
            continue;
        };
        plan.push(SpawnEntry {
            kind: SpawnKind::Resource(kind),
            position,
        });
    }

    for i in 0..table.npc_attempts {
        let attempt = NPC_ATTEMPT_BASE + i;
        if spawn_hash(coord, attempt, SALT_CHANCE) >= table.npc_chance {
            continue;
        }
        let local_x = local_offset(spawn_hash(coord, attempt, SALT_X));
        let local_z = local_offset(spawn_hash(coord, attempt, SALT_Z));
        let (Some(position), Some(kind)) = (
            place(chunk, sea_level, local_x, local_z),
            pick(table.npcs, spawn_hash(coord, attempt, SALT_KIND)),
        ) else {
            continue;
        };
        plan.push(SpawnEntry {
            kind: SpawnKind::Npc(kind),
            position,
        });
    }

    if spawn_hash(coord, VILLAGE_ATTEMPT, SALT_CHANCE) < table.village_chance {
        plan_village(chunk, sea_level, &mut plan);
    }

    plan
}

/// Appends a cluster of villagers around a deterministic center.
fn plan_village(chunk: &TerrainChunk, sea_level: f32, plan: &mut Vec<SpawnEntry>) {
    let coord = chunk.coord();
    let center_x = VILLAGE_CENTER_MIN + spawn_hash(coord, VILLAGE_ATTEMPT, SALT_X) * VILLAGE_CENTER_SPAN;
    let center_z = VILLAGE_CENTER_MIN + spawn_hash(coord, VILLAGE_ATTEMPT, SALT_Z) * VILLAGE_CENTER_SPAN;
    let size_span = (VILLAGE_MAX_SIZE - VILLAGE_MIN_SIZE + 1) as f32;
    let size = VILLAGE_MIN_SIZE + (spawn_hash(coord, VILLAGE_ATTEMPT, SALT_KIND) * size_span) as u32;

    for member in 0..size.min(VILLAGE_MAX_SIZE) {
        let attempt = VILLAGE_ATTEMPT + 1 + member;
        let angle = spawn_hash(coord, attempt, SALT_X) * std::f32::consts::TAU;
        let radius = VILLAGE_MIN_RADIUS + spawn_hash(coord, attempt, SALT_Z) * VILLAGE_RADIUS_SPAN;
        let local_x = center_x + angle.cos() * radius;
        let local_z = center_z + angle.sin() * radius;
        if let Some(position) = place(chunk, sea_level, local_x, local_z) {
            plan.push(SpawnEntry {
                kind: SpawnKind::Npc(NpcType::Villager),
                position,
            });
        }
    }

    tracing::debug!(
        chunk_x = coord.x,
        chunk_z = coord.z,
        center_x = coord.origin_x() + center_x,
        center_z = coord.origin_z() + center_z,
        size,
        "Village planned"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildlands_procedural::ChunkGenerator;

    const DRY: f32 = -1000.0;

    fn chunk(x: i32, z: i32, biome: BiomeType) -> TerrainChunk {
        ChunkGenerator::new(DRY).generate(ChunkCoord::new(x, z), biome)
    }

    #[test]
    fn test_hash_range_and_spread() {
        let mut sum = 0.0;
        for attempt in 0..1000 {
            let value = spawn_hash(ChunkCoord::new(-3, 7), attempt, SALT_X);
            assert!((0.0..1.0).contains(&value));
            sum += value;
        }
        let mean = sum / 1000.0;
        assert!((0.4..0.6).contains(&mean), "Mean {mean} not near 0.5");

        assert_ne!(
            spawn_hash(ChunkCoord::new(1, 2), 0, SALT_X),
            spawn_hash(ChunkCoord::new(2, 1), 0, SALT_X)
        );
    }

    #[test]
    fn test_plan_is_deterministic() {
        for (x, z) in [(0, 0), (-5, 3), (12, -40)] {
            let generator = ChunkGenerator::default();
            let a = spawn_plan(&generator.generate_classified(ChunkCoord::new(x, z)), -1.0);
            let b = spawn_plan(&generator.generate_classified(ChunkCoord::new(x, z)), -1.0);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_entries_inside_chunk_above_ground() {
        for biome in BiomeType::ALL {
            for i in 0..8 {
                let terrain = chunk(i, -i, biome);
                let coord = terrain.coord();
                for entry in spawn_plan(&terrain, DRY) {
                    let p = entry.position;
                    assert!(p.x >= coord.origin_x() && p.x <= coord.origin_x() + CHUNK_WORLD_SIZE);
                    assert!(p.z >= coord.origin_z() && p.z <= coord.origin_z() + CHUNK_WORLD_SIZE);
                    let ground = terrain.height_at(p.x, p.z);
                    assert!((p.y - ground - SPAWN_HEIGHT_OFFSET).abs() < 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_biome_tables_restrict_types() {
        for i in 0..20 {
            for entry in spawn_plan(&chunk(i, 3, BiomeType::Mountains), DRY) {
                assert!(matches!(
                    entry.kind,
                    SpawnKind::Resource(ResourceType::Iron | ResourceType::Stone)
                        | SpawnKind::Npc(NpcType::Wanderer)
                ));
            }
            for entry in spawn_plan(&chunk(i, 3, BiomeType::Desert), DRY) {
                assert!(!matches!(
                    entry.kind,
                    SpawnKind::Resource(ResourceType::Iron) | SpawnKind::Npc(NpcType::Villager)
                ));
            }
        }
    }

    #[test]
    fn test_mountains_denser_than_swamp() {
        let count = |biome| {
            (0..30)
                .map(|i| spawn_plan(&chunk(i, i * 2, biome), DRY).len())
                .sum::<usize>()
        };
        assert!(count(BiomeType::Mountains) > count(BiomeType::Swamp));
    }

    #[test]
    fn test_underwater_candidates_skipped() {
        let terrain = chunk(0, 0, BiomeType::Mountains);
        assert!(spawn_plan(&terrain, 1000.0).is_empty());
    }

    #[test]
    fn test_village_cluster() {
        let terrain = chunk(4, 4, BiomeType::Grassland);
        let mut plan = Vec::new();
        plan_village(&terrain, DRY, &mut plan);

        assert!((3..=6).contains(&plan.len()), "Village of {}", plan.len());
        for pair in plan.windows(2) {
            assert_eq!(pair[0].kind, SpawnKind::Npc(NpcType::Villager));
            assert!(pair[0].position.horizontal_distance(pair[1].position) <= 10.0 + 1e-3);
        }
    }

    #[test]
    fn test_grassland_eventually_hosts_village() {
        let villages = (0..200)
            .filter(|&i| spawn_hash(ChunkCoord::new(i, 0), VILLAGE_ATTEMPT, SALT_CHANCE) < 0.15)
            .count();
        assert!(villages > 0);

        let other = SpawnTable::for_biome(BiomeType::Mountains);
        assert_eq!(other.village_chance, 0.0);
    }
}
