//! Software rasterization
//!
//! Consumes the depth-ordered render list and fills an RGBA pixel buffer.
//! The entire path runs on the CPU; no GPU or windowing dependency.

mod framebuffer;
mod software;

pub use framebuffer::Framebuffer;
pub use software::SoftwareRasterizer;

use thiserror::Error;

/// Errors raised by the rasterizer
#[derive(Debug, Error)]
pub enum RasterError {
    /// The target buffer does not match the render list's viewport
    #[error("framebuffer is {actual_width}x{actual_height}, but the render list targets {expected_width}x{expected_height}")]
    SizeMismatch {
        /// Width of the supplied framebuffer
        actual_width: u32,
        /// Height of the supplied framebuffer
        actual_height: u32,
        /// Width the render list was projected for
        expected_width: u32,
        /// Height the render list was projected for
        expected_height: u32,
    },
}
