//! # Mesh Validation
//!
//! Geometry sanity checks run on every generated terrain chunk.
//!
//! A failed check never aborts generation. The caller gets a report with a
//! count per problem category, logs it, and keeps the (possibly degraded)
//! mesh.

use crate::chunk::TerrainVertex;

/// Largest |x| or |z| a vertex may have.
pub const POSITION_SANITY_BOUND: f32 = 1.0e6;

/// Largest allowed (max - min) height within a single chunk.
pub const MAX_HEIGHT_RANGE: f32 = 100.0;

/// Result of validating one mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ValidationReport {
    /// Vertices with a NaN or infinite component.
    pub non_finite_vertices: u32,
    /// Vertices whose |x| or |z| exceeds [`POSITION_SANITY_BOUND`].
    pub out_of_bounds_vertices: u32,
    /// Indices that do not reference an existing vertex.
    pub dangling_indices: u32,
    /// Height range (max - min) over the finite vertices.
    pub height_range: f32,
}

impl ValidationReport {
    /// True if the height range exceeds [`MAX_HEIGHT_RANGE`].
    #[inline]
    #[must_use]
    pub fn excessive_height_range(&self) -> bool {
        self.height_range > MAX_HEIGHT_RANGE
    }

    /// True if no check failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.non_finite_vertices == 0
            && self.out_of_bounds_vertices == 0
            && self.dangling_indices == 0
            && !self.excessive_height_range()
    }
}

/// Validates a terrain mesh.
#[must_use]
pub fn validate_mesh(vertices: &[TerrainVertex], indices: &[u32]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut min_height = f32::INFINITY;
    let mut max_height = f32::NEG_INFINITY;

    for vertex in vertices {
        let [x, y, z] = vertex.position;
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            report.non_finite_vertices += 1;
            continue;
        }
        if x.abs() > POSITION_SANITY_BOUND || z.abs() > POSITION_SANITY_BOUND {
            report.out_of_bounds_vertices += 1;
        }
        min_height = min_height.min(y);
        max_height = max_height.max(y);
    }

    let vertex_count = vertices.len();
    report.dangling_indices = indices
        .iter()
        .filter(|&&index| index as usize >= vertex_count)
        .count() as u32;

    if max_height >= min_height {
        report.height_range = max_height - min_height;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32, z: f32) -> TerrainVertex {
        TerrainVertex {
            position: [x, y, z],
            uv: [0.0, 0.0],
        }
    }

    #[test]
    fn test_clean_mesh() {
        let vertices = [vertex(0.0, 1.0, 0.0), vertex(1.0, 2.0, 0.0), vertex(0.0, 3.0, 1.0)];
        let report = validate_mesh(&vertices, &[0, 1, 2]);
        assert!(report.is_clean());
        assert!((report.height_range - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_detects_each_category() {
        let vertices = [
            vertex(f32::NAN, 0.0, 0.0),
            vertex(2.0e6, 0.0, 0.0),
            vertex(0.0, -60.0, 0.0),
            vertex(0.0, 60.0, 0.0),
        ];
        let report = validate_mesh(&vertices, &[0, 1, 2, 3, 4, 9]);
        assert_eq!(report.non_finite_vertices, 1);
        assert_eq!(report.out_of_bounds_vertices, 1);
        assert_eq!(report.dangling_indices, 2);
        assert!(report.excessive_height_range());
        assert!(!report.is_clean());
    }

    #[test]
    fn test_empty_mesh() {
        let report = validate_mesh(&[], &[]);
        assert!(report.is_clean());
        assert_eq!(report.height_range, 0.0);
    }
}
