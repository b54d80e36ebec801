//! # Height Noise
//!
//! Four octaves of sine/cosine products at geometrically increasing frequency
//! and decreasing amplitude.
//!
//! ## Determinism Guarantee
//!
//! There is no seed and no per-call randomness. The same world coordinate
//! always yields the same value, which is what lets two chunks generated
//! independently agree on their shared edge.

/// Octave table: (spatial frequency, amplitude).
pub const OCTAVES: [(f32, f32); 4] = [(0.01, 1.0), (0.03, 0.5), (0.08, 0.25), (0.15, 0.125)];

/// Final scale applied to the octave sum.
pub const OUTPUT_SCALE: f32 = 0.4;

/// Phase offsets per octave so octaves do not share their zero crossings.
const PHASES: [(f32, f32); 4] = [(0.0, 0.0), (1.7, 2.3), (4.1, 0.9), (2.9, 5.3)];

/// Upper bound of `|height_noise(x, z)|`.
pub const MAX_AMPLITUDE: f32 = (1.0 + 0.5 + 0.25 + 0.125) * OUTPUT_SCALE;

/// Samples the height noise at a world position.
///
/// # Returns
///
/// A value in `[-MAX_AMPLITUDE, MAX_AMPLITUDE]` (0.75).
#[inline]
#[must_use]
pub fn height_noise(world_x: f32, world_z: f32) -> f32 {
    let mut total = 0.0;
    for ((frequency, amplitude), (phase_x, phase_z)) in OCTAVES.iter().zip(PHASES.iter()) {
        total += amplitude
            * (world_x * frequency + phase_x).sin()
            * (world_z * frequency + phase_z).cos();
    }
    total * OUTPUT_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        for i in 0..100 {
            let x = i as f32 * 13.7 - 600.0;
            let z = i as f32 * -7.3 + 250.0;
            assert_eq!(height_noise(x, z), height_noise(x, z));
        }
    }

    #[test]
    fn test_range() {
        for i in 0..10_000 {
            let x = (i as f32 * 0.37) - 1800.0;
            let z = (i as f32 * 0.53) - 2650.0;
            let value = height_noise(x, z);
            assert!(
                value.abs() <= MAX_AMPLITUDE + 1e-5,
                "Value {value} out of range at ({x}, {z})"
            );
        }
    }

    #[test]
    fn test_continuity() {
        let x = 100.0;
        let z = -42.0;
        let delta = 0.01;

        let v1 = height_noise(x, z);
        let v2 = height_noise(x + delta, z);
        let v3 = height_noise(x, z + delta);

        assert!((v1 - v2).abs() < 0.01, "Noise should be continuous in x");
        assert!((v1 - v3).abs() < 0.01, "Noise should be continuous in z");
    }

    #[test]
    fn test_not_constant() {
        let samples: Vec<f32> = (0..50).map(|i| height_noise(i as f32 * 10.0, 0.0)).collect();
        let min = samples.iter().copied().fold(f32::INFINITY, f32::min);
        let max = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!(max - min > 0.1, "Noise should vary across the world");
    }
}
