//! Geometry data: points, edges, and polygons
//!
//! Geometry is immutable once constructed; [`Geometry::new`] validates every
//! index eagerly so malformed meshes fail at scene-build time rather than
//! mid-rasterization.

use crate::foundation::math::Point3;
use crate::scene::SceneError;

/// An unordered pair of point indices forming a wireframe edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// First endpoint index
    pub a: usize,
    /// Second endpoint index
    pub b: usize,
}

impl Edge {
    /// Create a new edge between two point indices
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }
}

/// A convex planar face described by an ordered list of point indices
///
/// Vertices are wound consistently so that the cross product of the first
/// two edge vectors points out of the solid. Quads are the largest face the
/// solid fill path subdivides; larger polygons are stored as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Ordered point indices (at least 3)
    pub vertices: Vec<usize>,
    /// Optional per-polygon override color (replaces the style base color)
    pub color: Option<[u8; 3]>,
    /// Optional per-vertex texture coordinates
    pub uvs: Option<Vec<[f32; 2]>>,
}

impl Polygon {
    /// Create a polygon from point indices
    pub fn new(vertices: Vec<usize>) -> Self {
        Self {
            vertices,
            color: None,
            uvs: None,
        }
    }

    /// Builder pattern: set an override color
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = Some(color);
        self
    }

    /// Builder pattern: set per-vertex texture coordinates
    pub fn with_uvs(mut self, uvs: Vec<[f32; 2]>) -> Self {
        self.uvs = Some(uvs);
        self
    }
}

/// Immutable mesh data owned by a scene node
///
/// Point indices are positions in the point list; edges drive the wireframe
/// draw mode and polygons drive the solid draw mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    points: Vec<Point3>,
    edges: Vec<Edge>,
    polygons: Vec<Polygon>,
}

impl Geometry {
    /// Create geometry, validating all edge and polygon indices
    ///
    /// # Errors
    /// Returns a [`SceneError`] if any polygon has fewer than three vertices,
    /// any index is out of range, or a polygon's texture coordinate list does
    /// not match its vertex count.
    pub fn new(
        points: Vec<Point3>,
        edges: Vec<Edge>,
        polygons: Vec<Polygon>,
    ) -> Result<Self, SceneError> {
        let point_count = points.len();

        for (i, edge) in edges.iter().enumerate() {
            for index in [edge.a, edge.b] {
                if index >= point_count {
                    return Err(SceneError::EdgeIndexOutOfRange {
                        edge: i,
                        index,
                        point_count,
                    });
                }
            }
        }

        for (i, polygon) in polygons.iter().enumerate() {
            if polygon.vertices.len() < 3 {
                return Err(SceneError::PolygonTooSmall {
                    polygon: i,
                    vertex_count: polygon.vertices.len(),
                });
            }
            for &index in &polygon.vertices {
                if index >= point_count {
                    return Err(SceneError::PolygonIndexOutOfRange {
                        polygon: i,
                        index,
                        point_count,
                    });
                }
            }
            if let Some(uvs) = &polygon.uvs {
                if uvs.len() != polygon.vertices.len() {
                    return Err(SceneError::PolygonUvMismatch {
                        polygon: i,
                        uv_count: uvs.len(),
                        vertex_count: polygon.vertices.len(),
                    });
                }
            }
        }

        Ok(Self {
            points,
            edges,
            polygons,
        })
    }

    /// Construct without validation, for generators whose indices are
    /// correct by construction
    pub(crate) fn new_unchecked(
        points: Vec<Point3>,
        edges: Vec<Edge>,
        polygons: Vec<Polygon>,
    ) -> Self {
        Self {
            points,
            edges,
            polygons,
        }
    }

    /// Point positions in model space
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Wireframe edges
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Solid faces
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_points() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_valid_geometry_constructs() {
        let geometry = Geometry::new(
            triangle_points(),
            vec![Edge::new(0, 1), Edge::new(1, 2)],
            vec![Polygon::new(vec![0, 1, 2])],
        );
        assert!(geometry.is_ok());
    }

    #[test]
    fn test_polygon_index_out_of_range_rejected() {
        let result = Geometry::new(triangle_points(), vec![], vec![Polygon::new(vec![0, 1, 3])]);
        assert!(matches!(
            result,
            Err(SceneError::PolygonIndexOutOfRange {
                polygon: 0,
                index: 3,
                point_count: 3,
            })
        ));
    }

    #[test]
    fn test_degenerate_polygon_rejected() {
        let result = Geometry::new(triangle_points(), vec![], vec![Polygon::new(vec![0, 1])]);
        assert!(matches!(result, Err(SceneError::PolygonTooSmall { .. })));
    }

    #[test]
    fn test_edge_index_out_of_range_rejected() {
        let result = Geometry::new(triangle_points(), vec![Edge::new(0, 9)], vec![]);
        assert!(matches!(
            result,
            Err(SceneError::EdgeIndexOutOfRange { edge: 0, index: 9, .. })
        ));
    }

    #[test]
    fn test_uv_count_mismatch_rejected() {
        let polygon = Polygon::new(vec![0, 1, 2]).with_uvs(vec![[0.0, 0.0], [1.0, 0.0]]);
        let result = Geometry::new(triangle_points(), vec![], vec![polygon]);
        assert!(matches!(result, Err(SceneError::PolygonUvMismatch { .. })));
    }
}
