//! Camera, projection, and viewport primitives
//!
//! The camera produces a view matrix via a standard look-at construction;
//! the perspective settings produce the projection matrix mapping the view
//! frustum into the canonical clip volume. Both are validated eagerly so a
//! degenerate configuration aborts the frame before any geometry is touched.

use crate::foundation::math::{constants, utils, Mat4, Mat4Ext, Vec3};
use crate::scene::SceneError;

/// Camera position and orientation in world space
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Point the camera is looking at in world space
    pub look_at: Vec3,
    /// Up vector for camera orientation (typically `[0, 1, 0]`)
    pub up: Vec3,
}

impl Camera {
    /// Create a camera at a position looking at a target with Y-up orientation
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self {
            position,
            look_at,
            up: Vec3::y(),
        }
    }

    /// Builder pattern: set a custom up vector
    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    /// Validate the camera configuration
    pub fn validate(&self) -> Result<(), SceneError> {
        let forward = self.look_at - self.position;
        if forward.magnitude() < constants::EPSILON {
            return Err(SceneError::InvalidCamera(
                "position and look-at target coincide".to_string(),
            ));
        }
        if self.up.magnitude() < constants::EPSILON {
            return Err(SceneError::InvalidCamera("up vector has zero length".to_string()));
        }
        if forward.normalize().cross(&self.up.normalize()).magnitude() < constants::EPSILON {
            return Err(SceneError::InvalidCamera(
                "up vector is parallel to the view direction".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate the world-to-camera view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.look_at, self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -10.0), Vec3::zeros())
    }
}

/// Perspective projection parameters
#[derive(Debug, Clone, Copy)]
pub struct Perspective {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Distance to the near clipping plane (must be positive)
    pub near: f32,
    /// Distance to the far clipping plane (must exceed near)
    pub far: f32,
}

impl Perspective {
    /// Create perspective settings
    pub fn new(fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            fov_degrees,
            near,
            far,
        }
    }

    /// Validate the projection parameters
    pub fn validate(&self) -> Result<(), SceneError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(SceneError::InvalidPerspective(format!(
                "field of view {} degrees outside (0, 180)",
                self.fov_degrees
            )));
        }
        if self.near <= 0.0 {
            return Err(SceneError::InvalidPerspective(format!(
                "near plane {} must be positive",
                self.near
            )));
        }
        if self.far <= self.near {
            return Err(SceneError::InvalidPerspective(format!(
                "far plane {} must exceed near plane {}",
                self.far, self.near
            )));
        }
        Ok(())
    }

    /// Generate the projection matrix for the given aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(utils::deg_to_rad(self.fov_degrees), aspect, self.near, self.far)
    }
}

impl Default for Perspective {
    fn default() -> Self {
        Self::new(45.0, 0.1, 1000.0)
    }
}

/// Output raster dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Validate that both dimensions are non-zero
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Width / height ratio used by the projection
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
