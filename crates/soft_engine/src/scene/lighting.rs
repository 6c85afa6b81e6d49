//! Light sources
//!
//! Lights live in the scene graph like any other node, so a point light's
//! position is carried through its node's world matrix each frame. Colors
//! are unit-range RGB; contributions from every light are summed by the
//! rasterizer's shading step.

use crate::foundation::math::{Point3, Vec3};
use crate::scene::SceneError;

/// A light source contributing to `ShadeMode::LightSource` shading
#[derive(Debug, Clone)]
pub enum Light {
    /// Parallel rays from a fixed direction (like sunlight)
    Directional {
        /// Direction the light travels, normalized on construction
        direction: Vec3,
        /// Unit-range RGB color
        color: Vec3,
        /// Scalar brightness multiplier
        intensity: f32,
    },
    /// Omnidirectional light at a position in the node's model space
    Point {
        /// Position in the owning node's model space
        position: Point3,
        /// Unit-range RGB color
        color: Vec3,
        /// Scalar brightness multiplier
        intensity: f32,
        /// Linear distance attenuation factor; zero disables attenuation
        falloff: f32,
    },
}

impl Light {
    /// Create a directional light
    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self::Directional {
            direction: direction.normalize(),
            color,
            intensity,
        }
    }

    /// Create a point light at the owning node's origin
    pub fn point(color: Vec3, intensity: f32, falloff: f32) -> Self {
        Self::Point {
            position: Point3::origin(),
            color,
            intensity,
            falloff,
        }
    }

    /// Builder pattern: offset a point light within its node's model space
    pub fn with_position(mut self, position: Point3) -> Self {
        if let Self::Point { position: p, .. } = &mut self {
            *p = position;
        }
        self
    }

    /// Validate light parameters
    pub fn validate(&self) -> Result<(), SceneError> {
        let (color, intensity) = match self {
            Self::Directional {
                direction,
                color,
                intensity,
            } => {
                if !direction.iter().all(|c| c.is_finite()) || direction.magnitude() == 0.0 {
                    return Err(SceneError::InvalidLight(
                        "directional light has a degenerate direction".to_string(),
                    ));
                }
                (color, intensity)
            }
            Self::Point {
                position,
                color,
                intensity,
                falloff,
            } => {
                if !position.iter().all(|c| c.is_finite()) {
                    return Err(SceneError::InvalidLight(
                        "point light position is not finite".to_string(),
                    ));
                }
                if !falloff.is_finite() || *falloff < 0.0 {
                    return Err(SceneError::InvalidLight(format!(
                        "point light falloff {falloff} must be finite and non-negative"
                    )));
                }
                (color, intensity)
            }
        };
        if !color.iter().all(|c| c.is_finite()) {
            return Err(SceneError::InvalidLight("light color is not finite".to_string()));
        }
        if !intensity.is_finite() || *intensity < 0.0 {
            return Err(SceneError::InvalidLight(format!(
                "light intensity {intensity} must be finite and non-negative"
            )));
        }
        Ok(())
    }
}
