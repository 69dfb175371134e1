//! Parsed shape geometry
//!
//! Flat buffers as read from a mesh file: positions, texture coordinates and
//! face corners, three corners per triangle.

use glam::{Vec2, Vec3};
use serde::Serialize;

/// One triangle corner: zero-based indices into the vertex and texture buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaceCorner {
    pub vertex: usize,
    pub texture: usize,
}

impl FaceCorner {
    pub fn new(vertex: usize, texture: usize) -> Self {
        Self { vertex, texture }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Degenerate box around a single point
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grow to include `point`, axis by axis
    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Geometry of one custom shape
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShapeGeometry {
    pub vertices: Vec<Vec3>,
    pub textures: Vec<Vec2>,
    pub faces: Vec<FaceCorner>,
    bounds: Option<Aabb>,
    square_size: u32,
}

impl ShapeGeometry {
    pub fn new(square_size: u32) -> Self {
        Self {
            square_size,
            ..Self::default()
        }
    }

    /// Append a vertex and grow the bounding box
    pub fn push_vertex(&mut self, position: Vec3) {
        self.vertices.push(position);
        match &mut self.bounds {
            Some(bounds) => bounds.extend(position),
            None => self.bounds = Some(Aabb::from_point(position)),
        }
    }

    pub fn push_texture(&mut self, uv: Vec2) {
        self.textures.push(uv);
    }

    pub fn push_triangle(&mut self, corners: [FaceCorner; 3]) {
        self.faces.extend(corners);
    }

    /// Bounding box of all vertices; `None` until a vertex was added
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Square size the geometry was loaded with
    pub fn square_size(&self) -> u32 {
        self.square_size
    }

    /// Bounding box extent measured in map squares
    pub fn size_in_squares(&self) -> Option<Vec3> {
        if self.square_size == 0 {
            return None;
        }
        self.bounds.map(|bounds| bounds.size() / self.square_size as f32)
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.textures.is_empty() && self.faces.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.textures.clear();
        self.faces.clear();
        self.bounds = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_vertex_initializes_bounds() {
        let mut geometry = ShapeGeometry::default();
        assert_eq!(geometry.bounds(), None);

        geometry.push_vertex(Vec3::new(1.0, -2.0, 3.0));
        let bounds = geometry.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(bounds.max, Vec3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn test_bounds_are_per_axis() {
        let mut geometry = ShapeGeometry::default();
        geometry.push_vertex(Vec3::new(0.0, 5.0, 0.0));
        geometry.push_vertex(Vec3::new(3.0, -1.0, 2.0));
        geometry.push_vertex(Vec3::new(-4.0, 0.0, 1.0));

        let bounds = geometry.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-4.0, -1.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 5.0, 2.0));
        assert_eq!(bounds.size(), Vec3::new(7.0, 6.0, 2.0));
    }

    #[test]
    fn test_clear_resets_bounds() {
        let mut geometry = ShapeGeometry::new(16);
        geometry.push_vertex(Vec3::ONE);
        geometry.push_triangle([FaceCorner::new(0, 0); 3]);
        geometry.clear();
        assert!(geometry.is_empty());
        assert_eq!(geometry.bounds(), None);
        assert_eq!(geometry.square_size(), 16);
    }

    #[test]
    fn test_size_in_squares() {
        let mut geometry = ShapeGeometry::new(16);
        assert_eq!(geometry.size_in_squares(), None);
        geometry.push_vertex(Vec3::ZERO);
        geometry.push_vertex(Vec3::new(32.0, 16.0, 8.0));
        assert_eq!(geometry.size_in_squares(), Some(Vec3::new(2.0, 1.0, 0.5)));
    }

    proptest! {
        #[test]
        fn prop_bounds_match_extrema(
            points in prop::collection::vec((-1.0e6f32..1.0e6, -1.0e6f32..1.0e6, -1.0e6f32..1.0e6), 1..64)
        ) {
            let mut geometry = ShapeGeometry::default();
            for &(x, y, z) in &points {
                geometry.push_vertex(Vec3::new(x, y, z));
            }
            let bounds = geometry.bounds().unwrap();

            let min_x = points.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
            let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
            let min_z = points.iter().map(|p| p.2).fold(f32::INFINITY, f32::min);
            let max_x = points.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
            let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
            let max_z = points.iter().map(|p| p.2).fold(f32::NEG_INFINITY, f32::max);

            prop_assert_eq!(bounds.min, Vec3::new(min_x, min_y, min_z));
            prop_assert_eq!(bounds.max, Vec3::new(max_x, max_y, max_z));
        }
    }
}
