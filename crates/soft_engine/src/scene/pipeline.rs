//! Per-frame scene pipeline
//!
//! Walks the entity graph, composes world transforms, projects every point
//! into screen space, clips against the canonical view volume, and builds
//! the depth-ordered render list the rasterizer consumes.
//!
//! Visibility uses the painter's algorithm: entities and polygons are
//! drawn back-to-front by average depth instead of per-pixel depth testing.
//! For coplanar or interpenetrating geometry this ordering is approximate
//! by design.

use std::cmp::Ordering;

use crate::foundation::math::{constants, Mat4, Point3, Vec3};
use crate::scene::node::NodeKind;
use crate::scene::render_list::{
    ClipFlags, PolygonView, RenderEntry, RenderList, ResolvedLight, ScreenVertex,
};
use crate::scene::{
    Camera, FrameContext, Geometry, GeometrySortMode, Light, ObjectSortMode, Perspective, Polygon,
    SceneError, SceneNode, ShadeMode, Style, Viewport,
};

/// A complete renderable scene: camera, projection, viewport, and the
/// root list of graph nodes
pub struct Scene {
    /// Camera producing the view matrix
    pub camera: Camera,
    /// Perspective projection settings
    pub perspective: Perspective,
    /// Output raster dimensions
    pub viewport: Viewport,
    /// Root nodes of the entity graph, traversed in array order
    pub root: Vec<SceneNode>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(camera: Camera, perspective: Perspective, viewport: Viewport) -> Self {
        Self {
            camera,
            perspective,
            viewport,
            root: Vec::new(),
        }
    }

    /// Builder pattern: append a root node
    pub fn with_node(mut self, node: SceneNode) -> Self {
        self.root.push(node);
        self
    }

    /// Find a node by id anywhere in the graph
    pub fn find_node(&self, id: &str) -> Option<&SceneNode> {
        self.root.iter().find_map(|node| node.find_node(id))
    }

    /// Find a node by id anywhere in the graph, mutably
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut SceneNode> {
        self.root.iter_mut().find_map(|node| node.find_node_mut(id))
    }

    /// Compute one frame: traverse, transform, project, clip, and sort
    ///
    /// The returned [`RenderList`] borrows per-node transient buffers, so
    /// the scene cannot be mutated again until the list is dropped — the
    /// next traversal would overwrite the data the list points into.
    ///
    /// # Errors
    /// Returns a [`SceneError`] when the camera, perspective, viewport, or
    /// any enabled light is malformed. Numeric edge cases (points at the
    /// camera plane, degenerate faces) never error; they degrade to
    /// clipped points or culled polygons.
    pub fn compute_frame(&mut self, time: f32) -> Result<RenderList<'_>, SceneError> {
        self.camera.validate()?;
        self.perspective.validate()?;
        self.viewport.validate()?;

        let view = self.camera.view_matrix();
        let projection = self.perspective.projection_matrix(self.viewport.aspect());
        let view_projection = projection * view;

        // Phase 1: hooks, world matrices, and per-point projection into the
        // node-local transient buffers.
        {
            let ctx = FrameContext {
                camera: &self.camera,
                perspective: &self.perspective,
                viewport: &self.viewport,
                time,
            };
            let width = self.viewport.width as f32;
            let height = self.viewport.height as f32;
            let mut capture = move |node: &mut SceneNode| {
                project_node_points(node, &view_projection, width, height);
            };
            let identity = Mat4::identity();
            let mut i = 0;
            while i < self.root.len() {
                self.root[i].update_recursive(&identity, &ctx, &mut capture);
                i += 1;
            }
        }

        // Phase 2: flatten enabled nodes into render entries and resolved
        // lights, borrowing the transients written above.
        let mut entries = Vec::new();
        let mut lights = Vec::new();
        for node in &self.root {
            collect_node(node, &mut entries, &mut lights)?;
        }

        sort_entries(&mut entries);
        log::trace!(
            "computed frame: {} entries, {} lights",
            entries.len(),
            lights.len()
        );

        Ok(RenderList {
            viewport: self.viewport,
            entries,
            lights,
        })
    }
}

/// Project a mesh node's points into clip and screen space
///
/// Every point gets a finite screen coordinate even when clipped; the
/// divide guard substitutes an epsilon for `w` values close to zero so no
/// NaN or infinity can reach the render list.
fn project_node_points(node: &mut SceneNode, view_projection: &Mat4, width: f32, height: f32) {
    let (kind, frame) = (&node.kind, &mut node.frame);
    let NodeKind::Mesh { geometry, .. } = kind else {
        return;
    };

    frame.coords.clear();
    frame.world_coords.clear();
    frame.clip.clear();

    let world = frame.world_matrix;
    for point in geometry.points() {
        let world_point = world.transform_point(point);
        let clip_position = view_projection * world_point.to_homogeneous();
        let w = clip_position.w;

        let mut flags = ClipFlags::empty();
        if w <= constants::EPSILON {
            flags |= ClipFlags::NEAR;
        }
        if clip_position.x < -w {
            flags |= ClipFlags::LEFT;
        }
        if clip_position.x > w {
            flags |= ClipFlags::RIGHT;
        }
        if clip_position.y < -w {
            flags |= ClipFlags::BOTTOM;
        }
        if clip_position.y > w {
            flags |= ClipFlags::TOP;
        }
        if clip_position.z < -w {
            flags |= ClipFlags::NEAR;
        }
        if clip_position.z > w {
            flags |= ClipFlags::FAR;
        }

        let divisor = if w.abs() < constants::EPSILON {
            constants::EPSILON
        } else {
            w
        };
        frame.coords.push(ScreenVertex {
            x: (clip_position.x / divisor * 0.5 + 0.5) * width,
            y: (1.0 - (clip_position.y / divisor * 0.5 + 0.5)) * height,
            z: clip_position.z / divisor,
        });
        frame.world_coords.push(world_point);
        frame.clip.push(flags);
    }
}

fn collect_node<'a>(
    node: &'a SceneNode,
    entries: &mut Vec<RenderEntry<'a>>,
    lights: &mut Vec<ResolvedLight>,
) -> Result<(), SceneError> {
    if !node.enabled {
        return Ok(());
    }

    match &node.kind {
        NodeKind::Group => {}
        NodeKind::Light(light) => {
            light.validate()?;
            lights.push(resolve_light(light, &node.frame.world_matrix));
        }
        NodeKind::Mesh { geometry, style } => {
            entries.push(build_entry(node, geometry, style));
        }
    }

    for child in &node.children {
        collect_node(child, entries, lights)?;
    }
    Ok(())
}

fn resolve_light(light: &Light, world: &Mat4) -> ResolvedLight {
    match light {
        Light::Directional {
            direction,
            color,
            intensity,
        } => ResolvedLight::Directional {
            direction: *direction,
            color: *color,
            intensity: *intensity,
        },
        Light::Point {
            position,
            color,
            intensity,
            falloff,
        } => ResolvedLight::Point {
            position: world.transform_point(position),
            color: *color,
            intensity: *intensity,
            falloff: *falloff,
        },
    }
}

fn build_entry<'a>(
    node: &'a SceneNode,
    geometry: &'a Geometry,
    style: &'a Style,
) -> RenderEntry<'a> {
    let coords: &[ScreenVertex] = &node.frame.coords;
    let world_coords: &[Point3] = &node.frame.world_coords;
    let clip: &[ClipFlags] = &node.frame.clip;

    let mut polygons = Vec::with_capacity(geometry.polygons().len());
    for (index, polygon) in geometry.polygons().iter().enumerate() {
        // A polygon is dropped only when every vertex is clipped
        if polygon.vertices.iter().all(|&v| !clip[v].is_visible()) {
            continue;
        }
        if !style.double_sided && screen_signed_area(polygon, coords) <= 0.0 {
            continue;
        }

        let (normal, centroid) = if style.shade_mode == ShadeMode::LightSource {
            world_normal_and_centroid(polygon, world_coords)
        } else {
            (Vec3::zeros(), Point3::origin())
        };

        let avg_depth = polygon
            .vertices
            .iter()
            .map(|&v| coords[v].z)
            .sum::<f32>()
            / polygon.vertices.len() as f32;

        polygons.push(PolygonView {
            index,
            normal,
            centroid,
            avg_depth,
        });
    }

    if style.geometry_sort_mode == GeometrySortMode::Automatic {
        // Stable back-to-front: far (larger depth) polygons first
        polygons.sort_by(|a, b| b.avg_depth.total_cmp(&a.avg_depth));
    }

    let avg_depth = if coords.is_empty() {
        0.0
    } else {
        coords.iter().map(|c| c.z).sum::<f32>() / coords.len() as f32
    };

    RenderEntry {
        id: node.id.as_deref(),
        geometry,
        style,
        coords,
        world_coords,
        clip,
        polygons,
        avg_depth,
    }
}

/// Signed screen-space area of a polygon (twice the area, trapezoid form)
///
/// Positive for front-facing polygons under the outward winding convention;
/// negative or zero means the face points away from the viewer.
fn screen_signed_area(polygon: &Polygon, coords: &[ScreenVertex]) -> f32 {
    let vertices = &polygon.vertices;
    let n = vertices.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = &coords[vertices[i]];
        let b = &coords[vertices[(i + 1) % n]];
        area += (b.x - a.x) * (b.y + a.y);
    }
    0.5 * area
}

/// World-space unit normal (cross of the first two edges) and centroid
///
/// A degenerate face yields a zero normal, which shades to black rather
/// than propagating non-finite values.
fn world_normal_and_centroid(polygon: &Polygon, world_coords: &[Point3]) -> (Vec3, Point3) {
    let vertices = &polygon.vertices;
    let p0 = world_coords[vertices[0]];
    let p1 = world_coords[vertices[1]];
    let p2 = world_coords[vertices[2]];

    let cross = (p1 - p0).cross(&(p2 - p0));
    let length = cross.magnitude();
    let normal = if length < constants::EPSILON {
        Vec3::zeros()
    } else {
        cross / length
    };

    let mut centroid = Vec3::zeros();
    for &v in vertices {
        centroid += world_coords[v].coords;
    }
    (normal, Point3::from(centroid / vertices.len() as f32))
}

fn sort_rank(mode: ObjectSortMode) -> u8 {
    match mode {
        ObjectSortMode::Back => 0,
        ObjectSortMode::Sorted => 1,
        ObjectSortMode::Front => 2,
    }
}

/// Order entities back-to-front, honoring the per-style sort class
///
/// The sort is stable, so entities with equal keys keep their traversal
/// order — the deterministic tie-break the painter's algorithm relies on.
fn sort_entries(entries: &mut [RenderEntry<'_>]) {
    entries.sort_by(|a, b| {
        let rank_a = sort_rank(a.style.object_sort_mode);
        let rank_b = sort_rank(b.style.object_sort_mode);
        match rank_a.cmp(&rank_b) {
            Ordering::Equal if rank_a == sort_rank(ObjectSortMode::Sorted) => {
                b.avg_depth.total_cmp(&a.avg_depth)
            }
            ordering => ordering,
        }
    });
}
