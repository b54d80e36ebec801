//! # Entity Meshes
//!
//! NPCs and resource nodes are drawn as vertex-colored cubes. One mesh per
//! entity kind is uploaded on first use and reused for every instance; the
//! per-instance transform carries position and scale.
//!
//! Damage flash: an NPC's color is lerped toward red while flashing. The
//! lerp is quantized to [`FLASH_LEVELS`] steps so the mesh cache stays small.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wildlands_core::{Arena, Transform, Vec3};
use wildlands_procedural::MeshData;

use super::{upload, MeshBackend, MeshHandle, VertexLayout};
use crate::gameplay::npc::{Npc, NpcType};
use crate::gameplay::resource::{ResourceNode, ResourceType, RESOURCE_SIZE};

/// Number of discrete flash tints (excluding "no flash").
pub const FLASH_LEVELS: u8 = 4;

/// Tint NPCs flash toward.
pub const FLASH_COLOR: [f32; 4] = [1.0, 0.1, 0.1, 1.0];

/// Entity vertex: position + packed RGBA8 color.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct EntityVertex {
    /// Model-space position.
    pub position: [f32; 3],
    /// RGBA8, red in the low byte.
    pub color: u32,
}

/// Packs linear `[r, g, b, a]` in `[0, 1]` into RGBA8.
#[must_use]
pub fn pack_color(color: [f32; 4]) -> u32 {
    let [r, g, b, a] = color.map(|c| u32::from((c.clamp(0.0, 1.0) * 255.0).round() as u8));
    r | (g << 8) | (b << 16) | (a << 24)
}

/// Linear blend between two colors.
#[must_use]
pub fn lerp_color(from: [f32; 4], to: [f32; 4], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
        from[2] + (to[2] - from[2]) * t,
        from[3] + (to[3] - from[3]) * t,
    ]
}

/// Unit cube centered on the origin, faces wound counter-clockwise seen
/// from outside.
#[must_use]
pub fn cube_mesh(color: u32) -> MeshData<EntityVertex> {
    let vertices = (0..8u32)
        .map(|i| {
            let axis = |bit: u32| if i & bit == 0 { -0.5 } else { 0.5 };
            EntityVertex {
                position: [axis(1), axis(2), axis(4)],
                color,
            }
        })
        .collect();

    #[rustfmt::skip]
    let indices = vec![
        0, 4, 6, 0, 6, 2, // -X
        1, 3, 7, 1, 7, 5, // +X
        0, 1, 5, 0, 5, 4, // -Y
        2, 6, 7, 2, 7, 3, // +Y
        0, 2, 3, 0, 3, 1, // -Z
        4, 5, 7, 4, 7, 6, // +Z
    ];

    MeshData { vertices, indices }
}

/// Mesh cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// NPC body with a flash level in `0..=FLASH_LEVELS`.
    Npc(NpcType, u8),
    /// Resource node.
    Resource(ResourceType),
}

impl EntityKind {
    /// Vertex color for this kind.
    #[must_use]
    pub fn color(self) -> u32 {
        match self {
            Self::Npc(npc_type, level) => {
                let t = f32::from(level) / f32::from(FLASH_LEVELS);
                pack_color(lerp_color(npc_type.color(), FLASH_COLOR, t))
            }
            Self::Resource(resource_type) => pack_color(resource_type.color()),
        }
    }
}

/// Lazily uploads and draws entity cubes.
#[derive(Debug, Default)]
pub struct EntityRenderer {
    meshes: HashMap<EntityKind, MeshHandle>,
}

impl EntityRenderer {
    /// Creates an empty renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meshes uploaded so far.
    #[must_use]
    pub fn cached_meshes(&self) -> usize {
        self.meshes.len()
    }

    fn mesh_for(&mut self, backend: &mut dyn MeshBackend, kind: EntityKind) -> MeshHandle {
        *self
            .meshes
            .entry(kind)
            .or_insert_with(|| upload(backend, &cube_mesh(kind.color()), VertexLayout::PositionColor))
    }

    /// Draws every active NPC.
    pub fn draw_npcs(&mut self, backend: &mut dyn MeshBackend, npcs: &Arena<Npc>, now: f32) {
        for (_, npc) in npcs.iter().filter(|(_, npc)| npc.is_active()) {
            let level = (npc.flash_intensity(now) * f32::from(FLASH_LEVELS)).ceil() as u8;
            let mesh = self.mesh_for(backend, EntityKind::Npc(npc.npc_type(), level.min(FLASH_LEVELS)));
            let size = npc.stats().size;
            backend.draw(mesh, None, Transform::new(npc.position(), size * 2.0));
        }
    }

    /// Draws every active resource node.
    pub fn draw_resources(&mut self, backend: &mut dyn MeshBackend, resources: &[ResourceNode]) {
        for node in resources.iter().filter(|node| node.is_active()) {
            let mesh = self.mesh_for(backend, EntityKind::Resource(node.resource_type()));
            let center = node.position() + Vec3::new(0.0, RESOURCE_SIZE, 0.0);
            backend.draw(mesh, None, Transform::new(center, RESOURCE_SIZE * 2.0));
        }
    }

    /// Releases every cached mesh.
    pub fn release_all(&mut self, backend: &mut dyn MeshBackend) {
        for (_, mesh) in self.meshes.drain() {
            backend.release_mesh(mesh);
        }
    }
}
