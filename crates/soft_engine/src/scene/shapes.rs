//! Procedural mesh generators
//!
//! Small constructors for the primitive solids used by demos and tests.
//! All faces are wound so that the cross product of the first two edge
//! vectors points out of the solid, matching the pipeline's culling and
//! lighting conventions.

use crate::foundation::math::Point3;
use crate::scene::{Edge, Geometry, Polygon};

/// Axis-aligned cube centered at the origin
pub fn cube(scale: f32) -> Geometry {
    let s = scale * 0.5;
    let points = vec![
        Point3::new(-s, -s, -s),
        Point3::new(s, -s, -s),
        Point3::new(s, s, -s),
        Point3::new(-s, s, -s),
        Point3::new(-s, -s, s),
        Point3::new(s, -s, s),
        Point3::new(s, s, s),
        Point3::new(-s, s, s),
    ];
    let edges = vec![
        Edge::new(0, 1),
        Edge::new(1, 2),
        Edge::new(2, 3),
        Edge::new(3, 0),
        Edge::new(4, 5),
        Edge::new(5, 6),
        Edge::new(6, 7),
        Edge::new(7, 4),
        Edge::new(0, 4),
        Edge::new(1, 5),
        Edge::new(2, 6),
        Edge::new(3, 7),
    ];
    let polygons = vec![
        Polygon::new(vec![0, 3, 2, 1]), // -Z
        Polygon::new(vec![4, 5, 6, 7]), // +Z
        Polygon::new(vec![0, 4, 7, 3]), // -X
        Polygon::new(vec![1, 2, 6, 5]), // +X
        Polygon::new(vec![0, 1, 5, 4]), // -Y
        Polygon::new(vec![3, 7, 6, 2]), // +Y
    ];
    Geometry::new_unchecked(points, edges, polygons)
}

/// Flat quad in the XY plane, facing the negative Z axis
pub fn plane(width: f32, height: f32) -> Geometry {
    let w = width * 0.5;
    let h = height * 0.5;
    let points = vec![
        Point3::new(-w, -h, 0.0),
        Point3::new(w, -h, 0.0),
        Point3::new(w, h, 0.0),
        Point3::new(-w, h, 0.0),
    ];
    let edges = vec![
        Edge::new(0, 1),
        Edge::new(1, 2),
        Edge::new(2, 3),
        Edge::new(3, 0),
    ];
    let polygons = vec![Polygon::new(vec![0, 3, 2, 1])];
    Geometry::new_unchecked(points, edges, polygons)
}

/// Square-based pyramid with its base on the XZ plane and apex on +Y
pub fn pyramid(scale: f32) -> Geometry {
    let s = scale * 0.5;
    let points = vec![
        Point3::new(-s, 0.0, -s),
        Point3::new(s, 0.0, -s),
        Point3::new(s, 0.0, s),
        Point3::new(-s, 0.0, s),
        Point3::new(0.0, scale, 0.0),
    ];
    let edges = vec![
        Edge::new(0, 1),
        Edge::new(1, 2),
        Edge::new(2, 3),
        Edge::new(3, 0),
        Edge::new(0, 4),
        Edge::new(1, 4),
        Edge::new(2, 4),
        Edge::new(3, 4),
    ];
    let polygons = vec![
        Polygon::new(vec![0, 1, 2, 3]), // base, facing -Y
        Polygon::new(vec![1, 0, 4]),    // -Z side
        Polygon::new(vec![2, 1, 4]),    // +X side
        Polygon::new(vec![3, 2, 4]),    // +Z side
        Polygon::new(vec![0, 3, 4]),    // -X side
    ];
    Geometry::new_unchecked(points, edges, polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn face_normal(geometry: &Geometry, polygon: usize) -> Vec3 {
        let vertices = &geometry.polygons()[polygon].vertices;
        let p0 = geometry.points()[vertices[0]];
        let p1 = geometry.points()[vertices[1]];
        let p2 = geometry.points()[vertices[2]];
        (p1 - p0).cross(&(p2 - p0)).normalize()
    }

    #[test]
    fn test_cube_face_normals_point_outward() {
        let cube = cube(1.0);
        let expected = [
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        for (i, normal) in expected.iter().enumerate() {
            assert_relative_eq!(face_normal(&cube, i), *normal, epsilon = 1.0e-6);
        }
    }

    #[test]
    fn test_plane_faces_negative_z() {
        let plane = plane(2.0, 2.0);
        assert_relative_eq!(
            face_normal(&plane, 0),
            Vec3::new(0.0, 0.0, -1.0),
            epsilon = 1.0e-6
        );
    }

    #[test]
    fn test_pyramid_base_faces_down() {
        let pyramid = pyramid(1.0);
        assert_relative_eq!(
            face_normal(&pyramid, 0),
            Vec3::new(0.0, -1.0, 0.0),
            epsilon = 1.0e-6
        );
    }
}
