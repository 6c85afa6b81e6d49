//! Per-frame render list
//!
//! The render list is the pipeline's output: a flattened, depth-ordered set
//! of drawable entities with precomputed screen coordinates. Entries borrow
//! the per-node transient buffers written during traversal, so the list is
//! valid only until the next frame begins — enforced at compile time by the
//! borrow it holds on the scene.

use bitflags::bitflags;

use crate::foundation::math::{Point3, Vec3};
use crate::scene::{Geometry, Style, Viewport};

bitflags! {
    /// Clip outcodes for a single projected point
    ///
    /// A point with any flag set lies outside the canonical view volume (or
    /// too close to the camera plane for a safe perspective divide). Points
    /// exactly on a boundary are inside and carry no flag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ClipFlags: u8 {
        /// `x < -w`
        const LEFT = 1 << 0;
        /// `x > w`
        const RIGHT = 1 << 1;
        /// `y < -w`
        const BOTTOM = 1 << 2;
        /// `y > w`
        const TOP = 1 << 3;
        /// `z < -w`, or `w` below the divide guard epsilon
        const NEAR = 1 << 4;
        /// `z > w`
        const FAR = 1 << 5;
    }
}

impl ClipFlags {
    /// Whether the point survives clipping
    pub fn is_visible(self) -> bool {
        self.is_empty()
    }
}

/// A projected point in screen space
///
/// `x`/`y` are pixel coordinates (origin top-left, Y down); `z` is the
/// normalized depth retained for back-to-front ordering, growing toward the
/// far plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    /// Pixel X coordinate
    pub x: f32,
    /// Pixel Y coordinate (increases downward)
    pub y: f32,
    /// Normalized depth in `[-1, 1]`, far plane at `+1`
    pub z: f32,
}

/// Per-frame annotation of one visible polygon
#[derive(Debug, Clone)]
pub struct PolygonView {
    /// Index into the source geometry's polygon list
    pub index: usize,
    /// World-space unit normal (zero vector when the face is degenerate)
    pub normal: Vec3,
    /// World-space centroid of the polygon's vertices
    pub centroid: Point3,
    /// Average screen-space depth, the back-to-front sort key
    pub avg_depth: f32,
}

/// A light resolved into world space for this frame
#[derive(Debug, Clone)]
pub enum ResolvedLight {
    /// Directional light (unaffected by the graph transform)
    Directional {
        /// Unit direction the light travels
        direction: Vec3,
        /// Unit-range RGB color
        color: Vec3,
        /// Scalar brightness multiplier
        intensity: f32,
    },
    /// Point light carried to world space by its node's world matrix
    Point {
        /// World-space position
        position: Point3,
        /// Unit-range RGB color
        color: Vec3,
        /// Scalar brightness multiplier
        intensity: f32,
        /// Linear distance attenuation factor; zero disables attenuation
        falloff: f32,
    },
}

/// One drawable entity in the render list
///
/// Carries borrowed views of the node's geometry, style, and per-point
/// transient arrays, plus the visibility-filtered, depth-sorted polygon set.
#[derive(Debug)]
pub struct RenderEntry<'a> {
    /// The source node's id, if it has one
    pub id: Option<&'a str>,
    /// The node's immutable mesh data
    pub geometry: &'a Geometry,
    /// The node's resolved style
    pub style: &'a Style,
    /// Per-point screen coordinates, indexed like `geometry.points()`
    pub coords: &'a [ScreenVertex],
    /// Per-point world coordinates, indexed like `geometry.points()`
    pub world_coords: &'a [Point3],
    /// Per-point clip outcodes, indexed like `geometry.points()`
    pub clip: &'a [ClipFlags],
    /// Visible polygons in draw order (back-to-front when sorted)
    pub polygons: Vec<PolygonView>,
    /// Average screen depth over all the entity's points
    pub avg_depth: f32,
}

/// The complete depth-ordered output of one pipeline frame
#[derive(Debug)]
pub struct RenderList<'a> {
    /// Viewport the screen coordinates were mapped to
    pub viewport: Viewport,
    /// Entities in draw order
    pub entries: Vec<RenderEntry<'a>>,
    /// All enabled lights, resolved to world space
    pub lights: Vec<ResolvedLight>,
}
