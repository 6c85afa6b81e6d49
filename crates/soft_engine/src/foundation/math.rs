//! Math utilities and types
//!
//! Provides fundamental math types for the transform and projection pipeline.
//! All types are thin aliases over nalgebra; the `Mat4Ext` trait adds the
//! projection/view constructors the renderer needs.

pub use nalgebra::{
    Matrix3, Matrix4,
    Quaternion,
    Unit,
    Vector2, Vector3, Vector4,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// Guard value for near-zero denominators (perspective divide,
    /// normal normalization)
    pub const EPSILON: f32 = 1.0e-5;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

/// Extension trait for Mat4 with the constructors the pipeline needs
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a rotation matrix from Euler angles (radians, applied in
    /// X, then Y, then Z order)
    fn rotation_euler(x: f32, y: f32, z: f32) -> Mat4;

    /// Create a perspective projection matrix
    ///
    /// Maps the view frustum to the canonical volume where visible points
    /// satisfy `|x| <= w`, `|y| <= w`, `|z| <= w`. The near plane lands on
    /// `z/w = -1` and the far plane on `z/w = +1`.
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    ///
    /// The camera looks down its negative Z axis in view space; points in
    /// front of the camera have negative view-space Z.
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn rotation_euler(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::rotation_z(z) * Mat4::rotation_y(y) * Mat4::rotation_x(x)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = 1.0 / (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = f / aspect;
        result[(1, 1)] = f;
        result[(2, 2)] = -(far + near) / (far - near);
        result[(2, 3)] = -(2.0 * far * near) / (far - near);
        result[(3, 2)] = -1.0; // Perspective divide trigger (w = -z_view)

        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_euler_matches_axis_chain() {
        let euler = Mat4::rotation_euler(0.3, -0.7, 1.1);
        let chained = Mat4::rotation_z(1.1) * Mat4::rotation_y(-0.7) * Mat4::rotation_x(0.3);
        assert_relative_eq!(euler, chained, epsilon = 1.0e-6);
    }

    #[test]
    fn test_perspective_maps_near_and_far_to_canonical_volume() {
        let proj = Mat4::perspective(utils::deg_to_rad(90.0), 1.0, 1.0, 10.0);

        // A point on the near plane (view-space z = -near) divides to z/w = -1
        let near_clip = proj * Vec4::new(0.0, 0.0, -1.0, 1.0);
        assert_relative_eq!(near_clip.z / near_clip.w, -1.0, epsilon = 1.0e-5);

        // A point on the far plane divides to z/w = +1
        let far_clip = proj * Vec4::new(0.0, 0.0, -10.0, 1.0);
        assert_relative_eq!(far_clip.z / far_clip.w, 1.0, epsilon = 1.0e-5);

        // w equals the view-space distance in front of the camera
        assert_relative_eq!(near_clip.w, 1.0, epsilon = 1.0e-6);
        assert_relative_eq!(far_clip.w, 10.0, epsilon = 1.0e-5);
    }

    #[test]
    fn test_look_at_places_eye_at_view_origin() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let view = Mat4::look_at(eye, Vec3::zeros(), Vec3::y());
        let mapped = view * Vec4::new(eye.x, eye.y, eye.z, 1.0);
        assert_relative_eq!(mapped.x, 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(mapped.y, 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(mapped.z, 0.0, epsilon = 1.0e-5);
    }

    #[test]
    fn test_look_at_target_lies_on_negative_view_z() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, -5.0), Vec3::zeros(), Vec3::y());
        let mapped = view * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(mapped.x, 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(mapped.y, 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(mapped.z, -5.0, epsilon = 1.0e-5);
    }
}
