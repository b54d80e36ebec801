//! # Procedural Textures
//!
//! Deterministic RGBA8 pixel buffers for chunk and water surfaces.
//! A texture provider uploads these once per biome; the buffers themselves
//! never touch a graphics API.

use crate::biome::BiomeType;
use crate::noise::{height_noise, MAX_AMPLITUDE};

/// Default texture edge length in pixels.
pub const TEXTURE_SIZE: usize = 64;

/// Base color (linear RGB) per biome.
const fn base_color(biome: BiomeType) -> [f32; 3] {
    match biome {
        BiomeType::Desert => [0.86, 0.76, 0.52],
        BiomeType::Mountains => [0.50, 0.48, 0.46],
        BiomeType::Swamp => [0.30, 0.36, 0.22],
        BiomeType::Grassland => [0.33, 0.60, 0.25],
    }
}

/// Per-biome detail strength and feature frequency.
const fn detail(biome: BiomeType) -> (f32, f32) {
    match biome {
        BiomeType::Desert => (0.08, 9.0),
        BiomeType::Mountains => (0.18, 23.0),
        BiomeType::Swamp => (0.12, 5.0),
        BiomeType::Grassland => (0.10, 17.0),
    }
}

const WATER_COLOR: [f32; 3] = [0.15, 0.35, 0.65];
const WATER_ALPHA: u8 = 200;

#[inline]
fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Fills an RGBA8 buffer of `size x size` pixels, modulating `color` by
/// noise sampled at `frequency` texels per noise unit.
fn fill(size: usize, color: [f32; 3], strength: f32, frequency: f32, alpha: u8) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(size * size * 4);
    for py in 0..size {
        for px in 0..size {
            let sample = height_noise(px as f32 * frequency, py as f32 * frequency) / MAX_AMPLITUDE;
            let shade = 1.0 + sample * strength;
            pixels.extend_from_slice(&[
                to_u8(color[0] * shade),
                to_u8(color[1] * shade),
                to_u8(color[2] * shade),
                alpha,
            ]);
        }
    }
    pixels
}

/// Generates the RGBA8 texture for a biome.
///
/// Same biome and size always produce the same bytes.
#[must_use]
pub fn biome_texture_pixels(biome: BiomeType, size: usize) -> Vec<u8> {
    let (strength, frequency) = detail(biome);
    fill(size, base_color(biome), strength, frequency, u8::MAX)
}

/// Generates the translucent RGBA8 water texture.
#[must_use]
pub fn water_texture_pixels(size: usize) -> Vec<u8> {
    fill(size, WATER_COLOR, 0.06, 31.0, WATER_ALPHA)
}
