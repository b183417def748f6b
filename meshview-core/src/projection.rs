//! Orthographic projection to surface pixel coordinates
use crate::config::ViewerConfig;
use crate::geometry::{Point2D, Vec3};

/// Scale-and-centre projection; depth is dropped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub scale: f64,
    pub width: u32,
    pub height: u32,
}

impl Projector {
    pub fn new(scale: f64, width: u32, height: u32) -> Self {
        Self {
            scale,
            width,
            height,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.scale, config.window_width, config.window_height)
    }

    /// Surface centre, where the model-space origin lands.
    pub fn center(&self) -> Point2D {
        Point2D::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Project a rotated point to screen space
    pub fn project(&self, point: &Vec3) -> Point2D {
        let center = self.center();
        Point2D::new(
            point.x * self.scale + center.x,
            point.y * self.scale + center.y,
        )
    }

    pub fn project_all(&self, points: &[Vec3]) -> Vec<Point2D> {
        points.iter().map(|p| self.project(p)).collect()
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}
