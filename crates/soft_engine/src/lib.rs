//! # Soft Engine
//!
//! A self-contained software 3D renderer with no GPU dependency.
//!
//! ## Features
//!
//! - **Scene Graph**: Hierarchical nodes with composed transforms and
//!   per-node callback hooks
//! - **Projection Pipeline**: Look-at camera, perspective projection,
//!   homogeneous clipping, back-face culling
//! - **Painter's Ordering**: Depth-sorted render lists instead of a Z-buffer
//! - **Software Rasterizer**: Fixed-point half-edge triangle fill with flat
//!   and light-source shading
//!
//! ## Quick Start
//!
//! ```rust
//! use soft_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = Scene::new(
//!         Camera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::zeros()),
//!         Perspective::new(60.0, 0.1, 100.0),
//!         Viewport::new(320, 240),
//!     )
//!     .with_node(SceneNode::mesh(shapes::cube(1.0), Style::default()));
//!
//!     let mut buffer = Framebuffer::new(320, 240);
//!     let list = scene.compute_frame(0.0)?;
//!     SoftwareRasterizer::new().render(&list, &mut buffer)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod raster;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{ConfigError, RenderConfig},
        foundation::{
            math::{Mat4, Mat4Ext, Point3, Vec3, Vec4},
            time::Timer,
        },
        raster::{Framebuffer, RasterError, SoftwareRasterizer},
        scene::{
            shapes, Camera, DrawMode, Geometry, Light, Perspective, RenderList, Scene, SceneError,
            SceneNode, ShadeMode, Style, Viewport,
        },
    };
}
