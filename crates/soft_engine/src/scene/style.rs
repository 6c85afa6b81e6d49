//! Rendering style attached to each mesh node

use serde::{Deserialize, Serialize};

/// How a mesh's primitives are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// Plot each point as a single pixel
    Point,
    /// Draw the edge list as lines
    Wireframe,
    /// Fill polygons
    Solid,
}

/// How fill colors are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadeMode {
    /// Flat base (or per-polygon override) color
    Plain,
    /// Additive contribution of every scene light
    LightSource,
}

/// Fill strategy hint for the solid draw mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    /// Plain polygon fill
    Fill,
    /// Fill, then stroke the outline with the same color
    FillStroke,
    /// Expand polygons slightly to close seams
    Inflate,
}

/// Sort granularity for polygons within a single entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometrySortMode {
    /// Preserve the geometry's polygon order
    None,
    /// Sort polygons back-to-front by average depth
    Automatic,
}

/// Ordering class for whole entities in the render list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectSortMode {
    /// Always drawn before every sorted entity
    Back,
    /// Sorted back-to-front by the average depth of all points
    Sorted,
    /// Always drawn after every sorted entity
    Front,
}

/// Per-node rendering style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Primitive kind to emit
    pub draw_mode: DrawMode,
    /// Fill color computation
    pub shade_mode: ShadeMode,
    /// Fill strategy hint
    pub fill_mode: FillMode,
    /// Polygon ordering within the entity
    pub geometry_sort_mode: GeometrySortMode,
    /// Entity ordering in the render list
    pub object_sort_mode: ObjectSortMode,
    /// Base color, overridden per-polygon where a polygon carries one
    pub color: [u8; 3],
    /// Skip back-face culling when set
    pub double_sided: bool,
    /// Line width in pixels for the wireframe draw mode
    pub line_width: f32,
    /// Perspective scale factor applied to line widths
    pub line_scale: f32,
    /// Opacity in `[0, 1]`, written to the alpha channel
    pub opacity: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            draw_mode: DrawMode::Solid,
            shade_mode: ShadeMode::Plain,
            fill_mode: FillMode::Fill,
            geometry_sort_mode: GeometrySortMode::Automatic,
            object_sort_mode: ObjectSortMode::Sorted,
            color: [128, 128, 128],
            double_sided: false,
            line_width: 1.0,
            line_scale: 1.0,
            opacity: 1.0,
        }
    }
}

impl Style {
    /// Builder pattern: set the draw mode
    pub fn with_draw_mode(mut self, draw_mode: DrawMode) -> Self {
        self.draw_mode = draw_mode;
        self
    }

    /// Builder pattern: set the shade mode
    pub fn with_shade_mode(mut self, shade_mode: ShadeMode) -> Self {
        self.shade_mode = shade_mode;
        self
    }

    /// Builder pattern: set the base color
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    /// Builder pattern: draw both faces of every polygon
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    /// Builder pattern: set the opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Builder pattern: set the entity sort mode
    pub fn with_object_sort_mode(mut self, mode: ObjectSortMode) -> Self {
        self.object_sort_mode = mode;
        self
    }

    /// Builder pattern: set the polygon sort mode
    pub fn with_geometry_sort_mode(mut self, mode: GeometrySortMode) -> Self {
        self.geometry_sort_mode = mode;
        self
    }
}
