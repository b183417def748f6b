//! Runtime constants for the viewer

use crate::error::ConfigError;
use crate::geometry::{Color, Vec3};
use crate::shading::ShadingMode;

/// Viewer configuration
///
/// Defaults reproduce the reference viewer: an 800x800 window, 0.01 radians
/// of rotation per pixel of pointer travel, 100 pixels per model unit and a
/// 60 fps frame cap.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub window_width: u32,
    pub window_height: u32,
    /// Radians per pixel of pointer movement.
    pub rotate_speed: f64,
    /// Pixels per model unit.
    pub scale: f64,
    /// Unit vector pointing toward the light.
    pub light_direction: Vec3,
    pub base_color: Color,
    pub overlay_color: Color,
    pub background_color: Color,
    pub target_fps: u32,
    pub wireframe: bool,
    pub shading: ShadingMode,
    /// Fixed rotation about Z; pointer input never changes it.
    pub z_angle: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 800,
            rotate_speed: 0.01,
            scale: 100.0,
            light_direction: Vec3::new(0.0, 0.0, -1.0),
            base_color: Color::new(90, 160, 255),
            overlay_color: Color::WHITE,
            background_color: Color::BLACK,
            target_fps: 60,
            wireframe: true,
            shading: ShadingMode::Lambert,
            z_angle: 0.0,
        }
    }
}

impl ViewerConfig {
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotate_speed(mut self, rotate_speed: f64) -> Self {
        self.rotate_speed = rotate_speed;
        self
    }

    pub fn with_light_direction(mut self, light_direction: Vec3) -> Self {
        self.light_direction = light_direction;
        self
    }

    pub fn with_base_color(mut self, color: Color) -> Self {
        self.base_color = color;
        self
    }

    pub fn with_overlay_color(mut self, color: Color) -> Self {
        self.overlay_color = color;
        self
    }

    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    pub fn with_shading(mut self, shading: ShadingMode) -> Self {
        self.shading = shading;
        self
    }

    pub fn with_z_angle(mut self, z_angle: f64) -> Self {
        self.z_angle = z_angle;
        self
    }

    /// Pick a scale so a mesh of `radius` fills `fill` of the shorter window
    /// side.
    pub fn fit_scale(mut self, radius: f64, fill: f64) -> Self {
        let half = self.window_width.min(self.window_height) as f64 / 2.0;
        if radius.is_finite() && radius > 0.0 && half > 0.0 {
            self.scale = half * fill / radius;
        }
        self
    }

    /// Check every constant and normalize the light direction.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::WindowSize {
                width: self.window_width,
                height: self.window_height,
            });
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::Scale(self.scale));
        }
        if self.target_fps == 0 {
            return Err(ConfigError::FrameRate);
        }
        self.light_direction = self
            .light_direction
            .try_normalize()
            .ok_or(ConfigError::LightDirection)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default().validate().unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert!(config.wireframe);
        assert_eq!(config.target_fps, 60);
    }

    #[test]
    fn test_validate_normalizes_light() {
        let config = ViewerConfig::default()
            .with_light_direction(Vec3::new(0.0, 3.0, -4.0))
            .validate()
            .unwrap();
        assert_relative_eq!(config.light_direction.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(config.light_direction.y, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_window = ViewerConfig::default().with_window_size(0, 10);
        assert_eq!(
            zero_window.validate(),
            Err(ConfigError::WindowSize { width: 0, height: 10 })
        );
        assert_eq!(
            ViewerConfig::default().with_scale(0.0).validate(),
            Err(ConfigError::Scale(0.0))
        );
        assert_eq!(
            ViewerConfig::default().with_target_fps(0).validate(),
            Err(ConfigError::FrameRate)
        );
        assert_eq!(
            ViewerConfig::default()
                .with_light_direction(Vec3::ZERO)
                .validate(),
            Err(ConfigError::LightDirection)
        );
    }

    #[test]
    fn test_fit_scale() {
        let config = ViewerConfig::default()
            .with_window_size(200, 100)
            .fit_scale(2.0, 0.8);
        assert_relative_eq!(config.scale, 20.0);

        let unchanged = ViewerConfig::default().fit_scale(0.0, 0.8);
        assert_relative_eq!(unchanged.scale, 100.0);
    }
}
