//! Headless backend: counts uploads and draws, keeps texture pixels in
//! memory. Used by the headless binary, benches and tests.

use std::collections::HashMap;

use wildlands_core::Transform;
use wildlands_procedural::{biome_texture_pixels, water_texture_pixels, BiomeType, TEXTURE_SIZE};

use super::{MeshBackend, MeshHandle, TextureHandle, TextureProvider, VertexLayout};

#[derive(Clone, Copy, Debug)]
struct MeshRecord {
    vertex_count: usize,
    index_count: usize,
}

/// In-memory [`MeshBackend`] + [`TextureProvider`].
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    meshes: HashMap<MeshHandle, MeshRecord>,
    next_mesh: u32,
    uploads: u64,
    releases: u64,
    draw_calls: u64,
    frame_draws: u64,
    textures: Vec<Vec<u8>>,
    biome_textures: HashMap<BiomeType, TextureHandle>,
    water_texture: Option<TextureHandle>,
}

impl HeadlessBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Meshes uploaded and not yet released.
    #[must_use]
    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Total uploads.
    #[must_use]
    pub const fn uploads(&self) -> u64 {
        self.uploads
    }

    /// Total releases of known meshes.
    #[must_use]
    pub const fn releases(&self) -> u64 {
        self.releases
    }

    /// Total draws since creation.
    #[must_use]
    pub const fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    /// Draws since the last [`Self::begin_frame`].
    #[must_use]
    pub const fn frame_draws(&self) -> u64 {
        self.frame_draws
    }

    /// Resets the per-frame draw counter.
    pub fn begin_frame(&mut self) {
        self.frame_draws = 0;
    }

    /// Triangle count of a live mesh.
    #[must_use]
    pub fn triangle_count(&self, mesh: MeshHandle) -> Option<usize> {
        self.meshes.get(&mesh).map(|record| record.index_count / 3)
    }

    /// Vertex count of a live mesh.
    #[must_use]
    pub fn vertex_count(&self, mesh: MeshHandle) -> Option<usize> {
        self.meshes.get(&mesh).map(|record| record.vertex_count)
    }

    /// RGBA pixels of a texture.
    #[must_use]
    pub fn texture_pixels(&self, texture: TextureHandle) -> Option<&[u8]> {
        self.textures.get(texture.0 as usize).map(Vec::as_slice)
    }

    fn store_texture(&mut self, pixels: Vec<u8>) -> TextureHandle {
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(pixels);
        handle
    }
}

impl MeshBackend for HeadlessBackend {
    fn upload_mesh(&mut self, vertices: &[u8], indices: &[u32], layout: VertexLayout) -> MeshHandle {
        let handle = MeshHandle(self.next_mesh);
        self.next_mesh = self.next_mesh.wrapping_add(1);
        self.uploads += 1;
        self.meshes.insert(
            handle,
            MeshRecord {
                vertex_count: vertices.len() / layout.stride(),
                index_count: indices.len(),
            },
        );
        handle
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        if self.meshes.remove(&mesh).is_some() {
            self.releases += 1;
        }
    }

    fn draw(&mut self, mesh: MeshHandle, _texture: Option<TextureHandle>, _transform: Transform) {
        if self.meshes.contains_key(&mesh) {
            self.draw_calls += 1;
            self.frame_draws += 1;
        } else {
            tracing::warn!(mesh = mesh.0, "Draw of released mesh ignored");
        }
    }
}

impl TextureProvider for HeadlessBackend {
    fn biome_texture(&mut self, biome: BiomeType) -> TextureHandle {
        if let Some(&handle) = self.biome_textures.get(&biome) {
            return handle;
        }
        let handle = self.store_texture(biome_texture_pixels(biome, TEXTURE_SIZE));
        self.biome_textures.insert(biome, handle);
        handle
    }

    fn water_texture(&mut self) -> TextureHandle {
        if let Some(handle) = self.water_texture {
            return handle;
        }
        let handle = self.store_texture(water_texture_pixels(TEXTURE_SIZE));
        self.water_texture = Some(handle);
        handle
    }
}
