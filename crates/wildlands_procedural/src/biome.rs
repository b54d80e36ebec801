//! # Biome Classification
//!
//! Two views of the same large-scale biome noise:
//!
//! - **Weights** (`BiomeClassifier::weights`): a continuous blend of all four
//!   biomes used to shape terrain height. Blending is what keeps terrain
//!   seamless across biome borders.
//! - **Classification** (`BiomeClassifier::classify`): a single biome chosen
//!   by ordered thresholds. Used for discrete decisions such as spawn tables
//!   and chunk textures.
//!
//! The two can disagree near a border. That is accepted; unifying them would
//! move world features around.

use crate::noise::{height_noise, MAX_AMPLITUDE};

/// Biome types in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BiomeType {
    /// Dry dunes, low relief.
    Desert = 0,
    /// High ridged terrain.
    Mountains = 1,
    /// Low, wet, mostly at or under sea level.
    Swamp = 2,
    /// Rolling hills.
    Grassland = 3,
}

impl BiomeType {
    /// All biomes in index order.
    pub const ALL: [Self; 4] = [Self::Desert, Self::Mountains, Self::Swamp, Self::Grassland];

    /// Returns the display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Desert => "Desert",
            Self::Mountains => "Mountains",
            Self::Swamp => "Swamp",
            Self::Grassland => "Grassland",
        }
    }

    /// Discrete classification from a biome noise value.
    ///
    /// Thresholds are checked in order: swamp, desert, grassland, mountains.
    #[must_use]
    pub fn from_biome_noise(value: f32) -> Self {
        if value < -0.3 {
            Self::Swamp
        } else if value < -0.1 {
            Self::Desert
        } else if value < 0.2 {
            Self::Grassland
        } else {
            Self::Mountains
        }
    }

    /// Terrain height this biome would produce on its own.
    ///
    /// Each biome combines the height noise differently.
    #[must_use]
    pub fn shaped_height(self, x: f32, z: f32) -> f32 {
        let base = height_noise(x, z);
        match self {
            Self::Desert => {
                // Long low dunes with a little ripple
                height_noise(x * 0.5, z * 0.5) * 4.0 + height_noise(x * 2.0, z * 2.0) * 0.5 + 1.0
            }
            Self::Mountains => {
                // Ridge term in [0, 1]: 1 on noise zero crossings
                let ridge = 1.0 - height_noise(x * 1.7, z * 1.7).abs() / MAX_AMPLITUDE;
                base * 18.0 + ridge * 10.0 + 8.0
            }
            Self::Swamp => base * 2.0 + height_noise(x * 3.0, z * 3.0) * 0.5 - 1.2,
            Self::Grassland => base * 6.0 + height_noise(x * 0.7, z * 0.7) * 2.0 + 1.5,
        }
    }
}

/// Per-biome blend weights.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BiomeWeights {
    /// Desert weight.
    pub desert: f32,
    /// Mountains weight.
    pub mountains: f32,
    /// Swamp weight.
    pub swamp: f32,
    /// Grassland weight.
    pub grassland: f32,
}

impl BiomeWeights {
    /// Unnormalized weights shaped by distance from each biome's threshold.
    #[must_use]
    pub fn from_biome_noise(value: f32) -> Self {
        Self {
            swamp: 1.0 - ((value + 0.3) / 0.4).clamp(0.0, 1.0),
            desert: (1.0 - (value + 0.2).abs() / 0.2).max(0.0),
            grassland: (1.0 - (value - 0.05).abs() / 0.3).max(0.0),
            mountains: ((value - 0.1) / 0.3).clamp(0.0, 1.0),
        }
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f32 {
        self.desert + self.mountains + self.swamp + self.grassland
    }

    /// Scales the weights to sum to 1. Left unchanged when the total is zero.
    #[must_use]
    pub fn normalized(self) -> Self {
        let total = self.total();
        if total > 0.0 {
            Self {
                desert: self.desert / total,
                mountains: self.mountains / total,
                swamp: self.swamp / total,
                grassland: self.grassland / total,
            }
        } else {
            self
        }
    }

    /// Weight for one biome.
    #[must_use]
    pub const fn get(&self, biome: BiomeType) -> f32 {
        match biome {
            BiomeType::Desert => self.desert,
            BiomeType::Mountains => self.mountains,
            BiomeType::Swamp => self.swamp,
            BiomeType::Grassland => self.grassland,
        }
    }
}

/// Biome classifier and terrain shaper.
///
/// Holds no noise state; everything is derived from world position. The only
/// parameter is the sea level used for underwater flattening and ocean floors.
#[derive(Clone, Copy, Debug)]
pub struct BiomeClassifier {
    /// Sea level (world Y).
    sea_level: f32,
}

impl BiomeClassifier {
    /// Primary biome noise frequency.
    const BIOME_FREQUENCY: f32 = 0.001;
    /// Secondary biome noise frequency.
    const BIOME_DETAIL_FREQUENCY: f32 = 0.0005;
    /// Weight of the secondary term.
    const BIOME_DETAIL_WEIGHT: f32 = 0.3;

    /// Ocean noise frequencies (x, z).
    const OCEAN_FREQUENCY: (f32, f32) = (0.0002, 0.00025);
    /// Ocean noise below this marks ocean.
    const OCEAN_THRESHOLD: f32 = -0.6;
    /// Width of the shore band in ocean-noise units.
    const SHORE_BAND: f32 = 0.1;
    /// Shallowest ocean floor depth below sea level.
    const OCEAN_MIN_DEPTH: f32 = 3.0;
    /// Additional depth at the deepest ocean noise.
    const OCEAN_EXTRA_DEPTH: f32 = 12.0;

    /// Underwater flattening per unit of depth.
    const FLATTEN_PER_UNIT: f32 = 0.1;
    /// Maximum underwater flattening.
    const MAX_FLATTEN: f32 = 0.8;

    /// Creates a classifier for the given sea level.
    #[must_use]
    pub const fn new(sea_level: f32) -> Self {
        Self { sea_level }
    }

    /// Returns the sea level.
    #[inline]
    #[must_use]
    pub const fn sea_level(&self) -> f32 {
        self.sea_level
    }

    /// Large-scale biome noise, roughly in `[-1.3, 1.3]`.
    #[must_use]
    pub fn biome_noise(x: f32, z: f32) -> f32 {
        let primary = (x * Self::BIOME_FREQUENCY).sin() * (z * Self::BIOME_FREQUENCY).cos();
        let detail = (x * Self::BIOME_DETAIL_FREQUENCY + 1.3).sin()
            * (z * Self::BIOME_DETAIL_FREQUENCY - 0.7).cos();
        primary + detail * Self::BIOME_DETAIL_WEIGHT
    }

    /// Very-low-frequency ocean noise in `[-1, 1]`.
    #[must_use]
    pub fn ocean_noise(x: f32, z: f32) -> f32 {
        (x * Self::OCEAN_FREQUENCY.0 + 0.7).sin() * (z * Self::OCEAN_FREQUENCY.1 - 1.1).cos()
    }

    /// Returns true if the position lies in an ocean region.
    #[must_use]
    pub fn is_ocean(x: f32, z: f32) -> bool {
        Self::ocean_noise(x, z) < Self::OCEAN_THRESHOLD
    }

    /// Discrete biome at a world position.
    #[must_use]
    pub fn classify(x: f32, z: f32) -> BiomeType {
        BiomeType::from_biome_noise(Self::biome_noise(x, z))
    }

    /// Normalized blend weights at a world position.
    #[must_use]
    pub fn weights(x: f32, z: f32) -> BiomeWeights {
        BiomeWeights::from_biome_noise(Self::biome_noise(x, z)).normalized()
    }

    /// Weighted blend of every biome's shaped height.
    ///
    /// Biomes with zero weight are skipped.
    #[must_use]
    pub fn blended_height(x: f32, z: f32) -> f32 {
        let weights = Self::weights(x, z);
        BiomeType::ALL
            .iter()
            .map(|&biome| (biome, weights.get(biome)))
            .filter(|&(_, weight)| weight > 0.0)
            .map(|(biome, weight)| biome.shaped_height(x, z) * weight)
            .sum()
    }

    /// Final terrain height at a world position.
    ///
    /// Blended height, flattened toward sea level when underwater, then
    /// carved into an ocean floor where the ocean noise says so.
    #[must_use]
    pub fn terrain_height(&self, x: f32, z: f32) -> f32 {
        let height = self.flatten_underwater(Self::blended_height(x, z));

        let ocean = Self::ocean_noise(x, z);
        if ocean >= Self::OCEAN_THRESHOLD {
            return height;
        }

        // 0 at the threshold, 1 once past the shore band
        let shore = ((Self::OCEAN_THRESHOLD - ocean) / Self::SHORE_BAND).clamp(0.0, 1.0);
        height + (self.ocean_floor(ocean) - height) * shore
    }

    /// Ocean floor height for a given ocean noise value.
    fn ocean_floor(&self, ocean: f32) -> f32 {
        // Ocean noise bottoms out at -1, so depth grows across [-0.6, -1]
        let depth = ((Self::OCEAN_THRESHOLD - ocean) / (1.0 + Self::OCEAN_THRESHOLD)).clamp(0.0, 1.0);
        self.sea_level - Self::OCEAN_MIN_DEPTH - depth * Self::OCEAN_EXTRA_DEPTH
    }

    /// Pulls underwater terrain toward sea level in proportion to depth.
    fn flatten_underwater(&self, height: f32) -> f32 {
        if height >= self.sea_level {
            return height;
        }
        let depth = self.sea_level - height;
        let flatten = (depth * Self::FLATTEN_PER_UNIT).min(Self::MAX_FLATTEN);
        height + depth * flatten
    }
}

impl Default for BiomeClassifier {
    fn default() -> Self {
        Self::new(crate::chunk::DEFAULT_SEA_LEVEL)
    }
}
