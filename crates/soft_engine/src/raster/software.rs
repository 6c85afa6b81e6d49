//! Software triangle rasterizer
//!
//! Fills the render list's primitives into a [`Framebuffer`] without any
//! hardware acceleration. Solid polygons go through a fixed-point half-edge
//! scan: vertices are snapped to 28.4 sub-pixel coordinates so adjacent
//! triangles share edges exactly, and a top-left fill-convention bias
//! assigns every boundary pixel to exactly one of two neighbors.
//!
//! Shading is flat: every covered pixel of a polygon receives the same
//! color, either the style's base color (`Plain`) or the additive sum of
//! all light contributions (`LightSource`). There is no interpolation
//! across the face and no per-pixel allocation.

use crate::foundation::math::{constants, Vec3};
use crate::raster::{Framebuffer, RasterError};
use crate::scene::{
    DrawMode, PolygonView, RenderEntry, RenderList, ResolvedLight, ScreenVertex, ShadeMode,
};

/// Sub-pixel precision: coordinates are scaled by 16 (28.4 fixed point)
const SUBPIXEL_SHIFT: i64 = 4;
const SUBPIXEL_SCALE: f32 = 16.0;

/// Screen coordinates are clamped to this band before the fixed-point
/// conversion. Partially clipped polygons carry defensively projected
/// vertices that can be arbitrarily far off screen; the clamp keeps the
/// 64-bit edge functions from overflowing while the bounding box still
/// restricts actual work to the buffer.
const COORD_LIMIT: f32 = 16384.0;

fn to_fixed(value: f32) -> i64 {
    (value.clamp(-COORD_LIMIT, COORD_LIMIT) * SUBPIXEL_SCALE).round() as i64
}

/// Rasterizer for the fully software fill path
#[derive(Debug, Default)]
pub struct SoftwareRasterizer;

impl SoftwareRasterizer {
    /// Create a rasterizer
    pub fn new() -> Self {
        Self
    }

    /// Draw a computed frame into the target buffer
    ///
    /// Clears the buffer's alpha channel, then draws every entry in render
    /// list order (back-to-front). The buffer must match the viewport the
    /// list was projected for.
    ///
    /// # Errors
    /// Returns [`RasterError::SizeMismatch`] when the buffer dimensions do
    /// not match the render list's viewport.
    pub fn render(&self, list: &RenderList<'_>, target: &mut Framebuffer) -> Result<(), RasterError> {
        if target.width() != list.viewport.width || target.height() != list.viewport.height {
            return Err(RasterError::SizeMismatch {
                actual_width: target.width(),
                actual_height: target.height(),
                expected_width: list.viewport.width,
                expected_height: list.viewport.height,
            });
        }

        target.clear();
        for entry in &list.entries {
            match entry.style.draw_mode {
                DrawMode::Solid => draw_solid(entry, &list.lights, target),
                DrawMode::Wireframe => draw_wireframe(entry, target),
                DrawMode::Point => draw_points(entry, target),
            }
        }
        Ok(())
    }
}

/// Fill the entry's visible polygons in their sorted order
///
/// Triangles are filled directly; quads split along the `[0, 2]` diagonal.
/// Vertices beyond the fourth are not subdivided further.
fn draw_solid(entry: &RenderEntry<'_>, lights: &[ResolvedLight], target: &mut Framebuffer) {
    for view in &entry.polygons {
        let polygon = &entry.geometry.polygons()[view.index];
        let color = shade_polygon(entry, view, polygon.color, lights);

        let vertices = &polygon.vertices;
        let coords = entry.coords;
        fill_triangle(
            target,
            &coords[vertices[0]],
            &coords[vertices[1]],
            &coords[vertices[2]],
            color,
        );
        if vertices.len() >= 4 {
            fill_triangle(
                target,
                &coords[vertices[0]],
                &coords[vertices[2]],
                &coords[vertices[3]],
                color,
            );
        }
    }
}

/// Compute the flat fill color for one polygon
fn shade_polygon(
    entry: &RenderEntry<'_>,
    view: &PolygonView,
    override_color: Option<[u8; 3]>,
    lights: &[ResolvedLight],
) -> [u8; 4] {
    let style = entry.style;
    let base = override_color.unwrap_or(style.color);
    let alpha = (style.opacity.clamp(0.0, 1.0) * 255.0) as u8;

    match style.shade_mode {
        ShadeMode::Plain => [base[0], base[1], base[2], alpha],
        ShadeMode::LightSource => {
            let mut lit = Vec3::zeros();
            for light in lights {
                match light {
                    ResolvedLight::Directional {
                        direction,
                        color,
                        intensity,
                    } => {
                        let brightness = (-direction).dot(&view.normal).max(0.0);
                        lit += color * (brightness * intensity);
                    }
                    ResolvedLight::Point {
                        position,
                        color,
                        intensity,
                        falloff,
                    } => {
                        let to_light = position - view.centroid;
                        let distance = to_light.magnitude();
                        if distance < constants::EPSILON {
                            continue;
                        }
                        let brightness = (to_light / distance).dot(&view.normal).max(0.0);
                        let attenuation = if *falloff > 0.0 {
                            1.0 / (1.0 + falloff * distance)
                        } else {
                            1.0
                        };
                        lit += color * (brightness * intensity * attenuation);
                    }
                }
            }
            [
                scale_channel(base[0], lit.x),
                scale_channel(base[1], lit.y),
                scale_channel(base[2], lit.z),
                alpha,
            ]
        }
    }
}

fn scale_channel(base: u8, light: f32) -> u8 {
    (base as f32 * light).clamp(0.0, 255.0) as u8
}

/// Fill-convention bias for a directed edge: boundary pixels belong to the
/// triangle only on its top and left edges, so shared edges between
/// neighbors are drawn exactly once.
fn edge_bias(ax: i64, ay: i64, bx: i64, by: i64) -> i64 {
    let dx = bx - ax;
    let dy = by - ay;
    // Top edge: horizontal and pointing left. Left edge: going upward
    // (screen Y grows downward).
    if (dy == 0 && dx < 0) || dy < 0 {
        0
    } else {
        -1
    }
}

/// Fill one screen-space triangle with a flat color
///
/// Vertices are snapped to 28.4 fixed point and the winding normalized, so
/// callers may pass either orientation. Degenerate (zero-area) triangles
/// rasterize to nothing.
pub(crate) fn fill_triangle(
    target: &mut Framebuffer,
    v0: &ScreenVertex,
    v1: &ScreenVertex,
    v2: &ScreenVertex,
    color: [u8; 4],
) {
    let x0 = to_fixed(v0.x);
    let y0 = to_fixed(v0.y);
    let mut x1 = to_fixed(v1.x);
    let mut y1 = to_fixed(v1.y);
    let mut x2 = to_fixed(v2.x);
    let mut y2 = to_fixed(v2.y);

    let area = (x1 - x0) * (y2 - y0) - (y1 - y0) * (x2 - x0);
    if area == 0 {
        return;
    }
    if area < 0 {
        std::mem::swap(&mut x1, &mut x2);
        std::mem::swap(&mut y1, &mut y2);
    }

    // Integer bounding box, clipped to the buffer
    let min_x = ((x0.min(x1).min(x2)) >> SUBPIXEL_SHIFT).max(0);
    let max_x = ((x0.max(x1).max(x2)) >> SUBPIXEL_SHIFT).min(target.width() as i64 - 1);
    let min_y = ((y0.min(y1).min(y2)) >> SUBPIXEL_SHIFT).max(0);
    let max_y = ((y0.max(y1).max(y2)) >> SUBPIXEL_SHIFT).min(target.height() as i64 - 1);

    let bias0 = edge_bias(x0, y0, x1, y1);
    let bias1 = edge_bias(x1, y1, x2, y2);
    let bias2 = edge_bias(x2, y2, x0, y0);

    for y in min_y..=max_y {
        let py = (y << SUBPIXEL_SHIFT) + (1 << (SUBPIXEL_SHIFT - 1));
        for x in min_x..=max_x {
            let px = (x << SUBPIXEL_SHIFT) + (1 << (SUBPIXEL_SHIFT - 1));

            let e0 = (x1 - x0) * (py - y0) - (y1 - y0) * (px - x0);
            let e1 = (x2 - x1) * (py - y1) - (y2 - y1) * (px - x1);
            let e2 = (x0 - x2) * (py - y2) - (y0 - y2) * (px - x2);

            if e0 + bias0 >= 0 && e1 + bias1 >= 0 && e2 + bias2 >= 0 {
                target.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Draw the entry's edge list as single-pixel lines
///
/// Line width and scale are honored by canvas-backed presentation layers;
/// the software path always draws hairlines.
fn draw_wireframe(entry: &RenderEntry<'_>, target: &mut Framebuffer) {
    let style = entry.style;
    let alpha = (style.opacity.clamp(0.0, 1.0) * 255.0) as u8;
    let color = [style.color[0], style.color[1], style.color[2], alpha];

    for edge in entry.geometry.edges() {
        if entry.clip[edge.a].is_visible() && entry.clip[edge.b].is_visible() {
            draw_line(target, &entry.coords[edge.a], &entry.coords[edge.b], color);
        }
    }
}

/// Plot every unclipped point as a single pixel
fn draw_points(entry: &RenderEntry<'_>, target: &mut Framebuffer) {
    let style = entry.style;
    let alpha = (style.opacity.clamp(0.0, 1.0) * 255.0) as u8;
    let color = [style.color[0], style.color[1], style.color[2], alpha];

    for (coord, clip) in entry.coords.iter().zip(entry.clip) {
        if clip.is_visible() {
            draw_line_pixel(target, coord.x, coord.y, color);
        }
    }
}

fn draw_line_pixel(target: &mut Framebuffer, x: f32, y: f32, color: [u8; 4]) {
    let xi = x.round() as i64;
    let yi = y.round() as i64;
    if xi >= 0 && yi >= 0 {
        target.put_pixel(xi as u32, yi as u32, color);
    }
}

/// Bresenham line between two screen vertices
fn draw_line(target: &mut Framebuffer, a: &ScreenVertex, b: &ScreenVertex, color: [u8; 4]) {
    let mut x0 = a.x.round() as i64;
    let mut y0 = a.y.round() as i64;
    let x1 = b.x.round() as i64;
    let y1 = b.y.round() as i64;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x0 >= 0 && y0 >= 0 {
            target.put_pixel(x0 as u32, y0 as u32, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x0 += sx;
        }
        if doubled <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Point3};
    use crate::scene::{
        shapes, Camera, Geometry, Light, Perspective, Polygon, Scene, SceneNode, Style, Viewport,
    };

    fn vertex(x: f32, y: f32) -> ScreenVertex {
        ScreenVertex { x, y, z: 0.0 }
    }

    fn test_scene(camera_position: Vec3) -> Scene {
        Scene::new(
            Camera::new(camera_position, Vec3::zeros()),
            Perspective::new(90.0, 0.1, 100.0),
            Viewport::new(400, 400),
        )
    }

    #[test]
    fn test_degenerate_triangle_rasterizes_to_nothing() {
        let mut buffer = Framebuffer::new(64, 64);
        fill_triangle(
            &mut buffer,
            &vertex(10.0, 10.0),
            &vertex(30.0, 30.0),
            &vertex(50.0, 50.0),
            [255; 4],
        );
        assert_eq!(buffer.coverage(), 0);
    }

    #[test]
    fn test_adjacent_triangles_share_edges_without_gaps_or_overlap() {
        // Two triangles covering a rectangle. Half-integer corners put
        // pixel centers exactly on the outline and on the shared diagonal,
        // so the fill-convention bias is genuinely exercised.
        let corners = [
            vertex(10.5, 10.5),
            vertex(90.5, 10.5),
            vertex(90.5, 50.5),
            vertex(10.5, 50.5),
        ];
        let mut first = Framebuffer::new(128, 64);
        let mut second = Framebuffer::new(128, 64);
        fill_triangle(&mut first, &corners[0], &corners[1], &corners[2], [255; 4]);
        fill_triangle(&mut second, &corners[0], &corners[2], &corners[3], [255; 4]);

        let mut union = 0usize;
        let mut overlap = 0usize;
        for y in 0..64 {
            for x in 0..128 {
                let in_first = first.pixel(x, y).unwrap()[3] != 0;
                let in_second = second.pixel(x, y).unwrap()[3] != 0;
                if in_first || in_second {
                    union += 1;
                }
                if in_first && in_second {
                    overlap += 1;
                }
            }
        }

        // 80 columns by 40 rows: each boundary row/column is owned by
        // exactly one side of the rectangle's outline
        assert_eq!(union, 80 * 40, "gap along the shared edge");
        assert_eq!(overlap, 0, "double-written pixels along the shared edge");
    }

    #[test]
    fn test_winding_is_normalized_before_filling() {
        let mut forward = Framebuffer::new(64, 64);
        let mut reversed = Framebuffer::new(64, 64);
        fill_triangle(
            &mut forward,
            &vertex(5.0, 5.0),
            &vertex(40.0, 8.0),
            &vertex(20.0, 45.0),
            [255; 4],
        );
        fill_triangle(
            &mut reversed,
            &vertex(20.0, 45.0),
            &vertex(40.0, 8.0),
            &vertex(5.0, 5.0),
            [255; 4],
        );
        assert!(forward.coverage() > 0);
        assert_eq!(forward.coverage(), reversed.coverage());
    }

    #[test]
    fn test_backfacing_triangle_draws_nothing_and_flipped_matches_area() {
        let geometry = |order: Vec<usize>| {
            Geometry::new(
                vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(0.0, 1.0, 0.0),
                ],
                vec![],
                vec![Polygon::new(order)],
            )
            .unwrap()
        };

        let rasterizer = SoftwareRasterizer::new();
        let mut buffer = Framebuffer::new(400, 400);

        // Wound so its normal points away from the camera: culled upstream
        let mut away = test_scene(Vec3::new(0.0, 0.0, -5.0))
            .with_node(SceneNode::mesh(geometry(vec![0, 1, 2]), Style::default()));
        let list = away.compute_frame(0.0).unwrap();
        rasterizer.render(&list, &mut buffer).unwrap();
        assert_eq!(buffer.coverage(), 0);

        // Reversed winding faces the camera; coverage approximates the
        // analytic screen-space area of the projected triangle (800 px^2)
        let mut toward = test_scene(Vec3::new(0.0, 0.0, -5.0))
            .with_node(SceneNode::mesh(geometry(vec![0, 2, 1]), Style::default()));
        let list = toward.compute_frame(0.0).unwrap();
        rasterizer.render(&list, &mut buffer).unwrap();
        let coverage = buffer.coverage() as f32;
        assert!(
            (coverage - 800.0).abs() < 100.0,
            "coverage {coverage} far from analytic area 800"
        );
    }

    #[test]
    fn test_on_axis_cube_coverage_matches_front_face_area() {
        let mut scene = test_scene(Vec3::new(0.0, 0.0, -5.0))
            .with_node(SceneNode::mesh(shapes::cube(1.0), Style::default()));
        let list = scene.compute_frame(0.0).unwrap();

        let mut buffer = Framebuffer::new(400, 400);
        SoftwareRasterizer::new().render(&list, &mut buffer).unwrap();

        // The facing quad spans 400 * (1/18) half-extents on screen:
        // a square of side 44.44 px, about 1975 px^2
        let coverage = buffer.coverage() as f32;
        assert!(
            (coverage - 1975.3).abs() < 180.0,
            "coverage {coverage} far from analytic area 1975.3"
        );
    }

    #[test]
    fn test_directional_light_head_on_gives_exact_flat_color() {
        let style = Style::default()
            .with_shade_mode(ShadeMode::LightSource)
            .with_color([200, 100, 50]);
        let mut scene = test_scene(Vec3::new(0.0, 0.0, -5.0))
            .with_node(SceneNode::mesh(shapes::plane(2.0, 2.0), style))
            .with_node(SceneNode::light(Light::directional(
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                1.0,
            )));
        let list = scene.compute_frame(0.0).unwrap();

        let mut buffer = Framebuffer::new(400, 400);
        SoftwareRasterizer::new().render(&list, &mut buffer).unwrap();
        assert!(buffer.coverage() > 0);

        // Head-on light at intensity 1: lit color equals the base color on
        // every covered pixel, with no variation across the quad
        for y in 0..400 {
            for x in 0..400 {
                let pixel = buffer.pixel(x, y).unwrap();
                if pixel[3] != 0 {
                    assert_eq!(&pixel[..3], &[200, 100, 50]);
                }
            }
        }
    }

    #[test]
    fn test_point_light_falloff_darkens_distant_surfaces() {
        let style = || {
            Style::default()
                .with_shade_mode(ShadeMode::LightSource)
                .with_color([255, 255, 255])
        };
        let lit_at = |plane_z: f32| -> [u8; 4] {
            let mut scene = test_scene(Vec3::new(0.0, 0.0, -5.0))
                .with_node(
                    SceneNode::mesh(shapes::plane(1.0, 1.0), style())
                        .with_transform(Mat4::new_translation(&Vec3::new(0.0, 0.0, plane_z))),
                )
                .with_node(
                    SceneNode::light(Light::point(Vec3::new(1.0, 1.0, 1.0), 1.0, 0.5))
                        .with_transform(Mat4::new_translation(&Vec3::new(0.0, 0.0, -2.0))),
                );
            let list = scene.compute_frame(0.0).unwrap();
            let mut buffer = Framebuffer::new(400, 400);
            SoftwareRasterizer::new().render(&list, &mut buffer).unwrap();
            buffer.pixel(200, 200).unwrap()
        };

        let near = lit_at(0.0);
        let far = lit_at(2.0);
        assert!(near[3] != 0 && far[3] != 0);
        assert!(
            near[0] > far[0],
            "near surface {near:?} should be brighter than far {far:?}"
        );
    }

    #[test]
    fn test_per_polygon_override_color_wins() {
        let geometry = Geometry::new(
            vec![
                Point3::new(-1.0, -1.0, 0.0),
                Point3::new(1.0, -1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(-1.0, 1.0, 0.0),
            ],
            vec![],
            vec![Polygon::new(vec![0, 3, 2, 1]).with_color([9, 90, 200])],
        )
        .unwrap();
        let mut scene = test_scene(Vec3::new(0.0, 0.0, -5.0)).with_node(SceneNode::mesh(
            geometry,
            Style::default().with_color([1, 2, 3]),
        ));
        let list = scene.compute_frame(0.0).unwrap();

        let mut buffer = Framebuffer::new(400, 400);
        SoftwareRasterizer::new().render(&list, &mut buffer).unwrap();
        assert_eq!(buffer.pixel(200, 200).unwrap(), [9, 90, 200, 255]);
    }

    #[test]
    fn test_wireframe_mode_draws_edges() {
        let mut scene = test_scene(Vec3::new(0.0, 0.0, -5.0)).with_node(SceneNode::mesh(
            shapes::cube(1.0),
            Style::default().with_draw_mode(DrawMode::Wireframe),
        ));
        let list = scene.compute_frame(0.0).unwrap();

        let mut buffer = Framebuffer::new(400, 400);
        SoftwareRasterizer::new().render(&list, &mut buffer).unwrap();
        // A hairline cube outline covers far fewer pixels than a fill
        let coverage = buffer.coverage();
        assert!(coverage > 100, "expected an outline, got {coverage} pixels");
        assert!(coverage < 1000, "outline unexpectedly dense: {coverage} pixels");
    }

    #[test]
    fn test_point_mode_plots_single_pixels() {
        let geometry =
            Geometry::new(vec![Point3::new(0.0, 0.0, 0.0)], vec![], vec![]).unwrap();
        let mut scene = test_scene(Vec3::new(0.0, 0.0, -5.0)).with_node(SceneNode::mesh(
            geometry,
            Style::default()
                .with_draw_mode(DrawMode::Point)
                .with_color([255, 0, 0]),
        ));
        let list = scene.compute_frame(0.0).unwrap();

        let mut buffer = Framebuffer::new(400, 400);
        SoftwareRasterizer::new().render(&list, &mut buffer).unwrap();
        assert_eq!(buffer.coverage(), 1);
        assert_eq!(buffer.pixel(200, 200).unwrap(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_mismatched_buffer_rejected() {
        let mut scene = test_scene(Vec3::new(0.0, 0.0, -5.0));
        let list = scene.compute_frame(0.0).unwrap();
        let mut buffer = Framebuffer::new(100, 100);
        assert!(matches!(
            SoftwareRasterizer::new().render(&list, &mut buffer),
            Err(RasterError::SizeMismatch { .. })
        ));
    }

}
