//! Scene management system
//!
//! Provides the hierarchical entity graph and the per-frame transform,
//! projection, clipping, and depth-ordering pipeline.
//!
//! ## Architecture
//!
//! ```text
//! Scene graph (persistent nodes)
//!      ↓ compute_frame
//! Render list (per-frame, depth-ordered)
//!      ↓
//! Rasterizer (graphics)
//! ```
//!
//! The graph owns all node and geometry data persistently across frames.
//! `Scene::compute_frame` produces a [`RenderList`] that borrows into
//! per-node transient buffers; the borrow checker enforces that the list is
//! fully consumed before the next frame mutates the graph.

mod camera;
mod geometry;
mod lighting;
mod node;
mod pipeline;
mod render_list;
pub mod shapes;
mod style;

pub use camera::{Camera, Perspective, Viewport};
pub use geometry::{Edge, Geometry, Polygon};
pub use lighting::Light;
pub use node::{AfterTransformHook, BeforeTransformHook, FrameContext, NodeKind, SceneNode};
pub use pipeline::Scene;
pub use render_list::{
    ClipFlags, PolygonView, RenderEntry, RenderList, ResolvedLight, ScreenVertex,
};
pub use style::{DrawMode, FillMode, GeometrySortMode, ObjectSortMode, ShadeMode, Style};

use thiserror::Error;

/// Errors raised while building or validating scene input
///
/// All variants represent caller contract violations detected eagerly,
/// before any rasterization happens. Numeric edge cases (tiny divisors,
/// degenerate primitives) are recovered locally and never surface here.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A polygon references a point index outside the geometry's point list
    #[error("polygon {polygon} references point index {index}, but geometry has {point_count} points")]
    PolygonIndexOutOfRange {
        /// Index of the offending polygon
        polygon: usize,
        /// The out-of-range point index
        index: usize,
        /// Number of points in the geometry
        point_count: usize,
    },

    /// A polygon has fewer than three vertices
    #[error("polygon {polygon} has {vertex_count} vertices, at least 3 required")]
    PolygonTooSmall {
        /// Index of the offending polygon
        polygon: usize,
        /// Number of vertices the polygon actually has
        vertex_count: usize,
    },

    /// A polygon's texture coordinate list does not match its vertex list
    #[error("polygon {polygon} has {uv_count} texture coordinates for {vertex_count} vertices")]
    PolygonUvMismatch {
        /// Index of the offending polygon
        polygon: usize,
        /// Number of texture coordinates supplied
        uv_count: usize,
        /// Number of vertices the polygon has
        vertex_count: usize,
    },

    /// An edge references a point index outside the geometry's point list
    #[error("edge {edge} references point index {index}, but geometry has {point_count} points")]
    EdgeIndexOutOfRange {
        /// Index of the offending edge
        edge: usize,
        /// The out-of-range point index
        index: usize,
        /// Number of points in the geometry
        point_count: usize,
    },

    /// The camera configuration cannot produce a view matrix
    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    /// The perspective configuration cannot produce a projection matrix
    #[error("invalid perspective: {0}")]
    InvalidPerspective(String),

    /// The viewport has a zero dimension
    #[error("invalid viewport: {width}x{height}")]
    InvalidViewport {
        /// Viewport width in pixels
        width: u32,
        /// Viewport height in pixels
        height: u32,
    },

    /// A light carries non-finite or otherwise unusable parameters
    #[error("invalid light: {0}")]
    InvalidLight(String),
}
