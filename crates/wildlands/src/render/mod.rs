//! # Render Collaborators
//!
//! The simulation never touches a graphics API. It hands vertex/index arrays
//! to a [`MeshBackend`] and asks a [`TextureProvider`] for textures; both are
//! implemented by whatever frontend embeds the world.
//!
//! ## Vertex Formats
//!
//! | Layout | Type | Bytes |
//! |--------|------|-------|
//! | [`VertexLayout::PositionUv`] | [`wildlands_procedural::TerrainVertex`] | 20 |
//! | [`VertexLayout::PositionColor`] | [`entity::EntityVertex`] | 16 |

pub mod entity;
pub mod headless;

use bytemuck::Pod;
use wildlands_core::Transform;
use wildlands_procedural::{BiomeType, MeshData};

pub use entity::{EntityRenderer, EntityVertex};
pub use headless::HeadlessBackend;

/// GPU mesh issued by a [`MeshBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// GPU texture issued by a [`TextureProvider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Vertex layout descriptor passed with every upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexLayout {
    /// `[f32; 3]` position + `[f32; 2]` uv.
    PositionUv,
    /// `[f32; 3]` position + packed RGBA8 `u32`.
    PositionColor,
}

impl VertexLayout {
    /// Bytes per vertex.
    #[must_use]
    pub const fn stride(self) -> usize {
        match self {
            Self::PositionUv => 20,
            Self::PositionColor => 16,
        }
    }
}

/// Mesh upload and draw submission.
pub trait MeshBackend {
    /// Uploads raw vertex bytes and indices, returning a handle.
    fn upload_mesh(&mut self, vertices: &[u8], indices: &[u32], layout: VertexLayout) -> MeshHandle;

    /// Destroys a mesh. Unknown handles are ignored.
    fn release_mesh(&mut self, mesh: MeshHandle);

    /// Queues a draw.
    fn draw(&mut self, mesh: MeshHandle, texture: Option<TextureHandle>, transform: Transform);
}

/// Procedural texture source.
pub trait TextureProvider {
    /// Texture for a biome. Same biome, same texture.
    fn biome_texture(&mut self, biome: BiomeType) -> TextureHandle;

    /// Water surface texture.
    fn water_texture(&mut self) -> TextureHandle;
}

/// Uploads a typed mesh through a byte-oriented backend.
pub fn upload<V: Pod>(backend: &mut dyn MeshBackend, mesh: &MeshData<V>, layout: VertexLayout) -> MeshHandle {
    debug_assert_eq!(std::mem::size_of::<V>(), layout.stride());
    backend.upload_mesh(bytemuck::cast_slice(&mesh.vertices), &mesh.indices, layout)
}
