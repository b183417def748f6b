//! Flat Lambertian face shading with a single directional light
use crate::geometry::{Color, Vec3};

/// How face colors are resolved each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingMode {
    /// Base color scaled by the clamped cosine between normal and light.
    #[default]
    Lambert,
    /// Every face drawn in the unmodified base color.
    Flat,
}

impl ShadingMode {
    pub fn toggled(self) -> Self {
        match self {
            ShadingMode::Lambert => ShadingMode::Flat,
            ShadingMode::Flat => ShadingMode::Lambert,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShadingMode::Lambert => "lambert",
            ShadingMode::Flat => "flat",
        }
    }
}

/// Unit normal of a polygon from its first three points in winding order
///
/// The normal is `(p1 - p0) x (p2 - p0)`, so a counter-clockwise triangle in
/// the XY plane has normal +Z. Returns `None` for fewer than three points or
/// a degenerate (collinear or repeated) first triangle.
pub fn face_normal(points: &[Vec3]) -> Option<Vec3> {
    let [p0, p1, p2] = match points {
        [a, b, c, ..] => [*a, *b, *c],
        _ => return None,
    };
    (p1 - p0).cross(&(p2 - p0)).try_normalize()
}

/// Lambertian brightness in [0, 1]; faces without a normal are unlit.
pub fn brightness(normal: Option<Vec3>, light_direction: &Vec3) -> f64 {
    match normal {
        Some(n) => n.dot(light_direction).clamp(0.0, 1.0),
        None => 0.0,
    }
}

/// Shader parameters that stay fixed for a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shader {
    pub light_direction: Vec3,
    pub base_color: Color,
    pub mode: ShadingMode,
}

impl Shader {
    pub fn new(light_direction: Vec3, base_color: Color, mode: ShadingMode) -> Self {
        Self {
            light_direction,
            base_color,
            mode,
        }
    }

    /// Resolve the color of a face from its rotated points.
    pub fn shade(&self, points: &[Vec3]) -> Color {
        match self.mode {
            ShadingMode::Flat => self.base_color,
            ShadingMode::Lambert => {
                let normal = face_normal(points);
                self.base_color
                    .scaled(brightness(normal, &self.light_direction))
            }
        }
    }
}
