//! Viewer state and the pointer/key input that drives it
use crate::config::ViewerConfig;
use crate::geometry::Point2D;
use crate::shading::ShadingMode;
use crate::transform::Orientation;

/// A discrete key press reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Char(char),
    Other,
}

/// Events the platform forwards to the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    Quit,
    KeyPress(Key),
    /// The drawable area changed to `width` x `height` pixels.
    Resize { width: u32, height: u32 },
}

/// State carried from one frame to the next
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub orientation: Orientation,
    pub wireframe: bool,
    pub shading: ShadingMode,
    /// Pointer position sampled on the previous frame.
    pub last_pointer: Option<Point2D>,
}

impl ViewerState {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            orientation: Orientation::new(0.0, 0.0, config.z_angle),
            wireframe: config.wireframe,
            shading: config.shading,
            last_pointer: None,
        }
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

/// What a key press changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    ToggledWireframe(bool),
    ToggledShading(ShadingMode),
    Ignored,
}

/// Maps pointer travel to rotation and key presses to mode toggles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputController {
    pub rotate_speed: f64,
    pub wireframe_key: Key,
    pub shading_key: Key,
}

impl InputController {
    pub fn new(rotate_speed: f64) -> Self {
        Self {
            rotate_speed,
            wireframe_key: Key::Space,
            shading_key: Key::Char('s'),
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.rotate_speed)
    }

    /// Apply the pointer delta since the last sample and remember `pointer`.
    ///
    /// Vertical travel turns about X (inverted), horizontal travel turns
    /// about Y. The Z angle is never touched. The first sample only records
    /// the position.
    pub fn update_pointer(&self, state: &mut ViewerState, pointer: Point2D) {
        if let Some(last) = state.last_pointer {
            let dx = pointer.x - last.x;
            let dy = pointer.y - last.y;
            state
                .orientation
                .rotate(-dy * self.rotate_speed, dx * self.rotate_speed, 0.0);
        }
        state.last_pointer = Some(pointer);
    }

    /// Handle one discrete key press.
    pub fn handle_key(&self, state: &mut ViewerState, key: Key) -> InputAction {
        if key == self.wireframe_key {
            state.wireframe = !state.wireframe;
            InputAction::ToggledWireframe(state.wireframe)
        } else if key == self.shading_key {
            state.shading = state.shading.toggled();
            InputAction::ToggledShading(state.shading)
        } else {
            InputAction::Ignored
        }
    }
}

impl Default for InputController {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_sample_only_records() {
        let controller = InputController::new(0.01);
        let mut state = ViewerState::default();
        controller.update_pointer(&mut state, Point2D::new(120.0, 40.0));
        assert_eq!(state.orientation, Orientation::zero());
        assert_eq!(state.last_pointer, Some(Point2D::new(120.0, 40.0)));
    }

    #[test]
    fn test_pointer_delta_rotates() {
        let controller = InputController::new(0.01);
        let mut state = ViewerState::default();
        controller.update_pointer(&mut state, Point2D::new(100.0, 100.0));
        controller.update_pointer(&mut state, Point2D::new(130.0, 80.0));

        assert_relative_eq!(state.orientation.x, 0.2, epsilon = 1e-12);
        assert_relative_eq!(state.orientation.y, 0.3, epsilon = 1e-12);
        assert_eq!(state.orientation.z, 0.0);

        // Standing still changes nothing.
        controller.update_pointer(&mut state, Point2D::new(130.0, 80.0));
        assert_relative_eq!(state.orientation.x, 0.2, epsilon = 1e-12);
        assert_relative_eq!(state.orientation.y, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_z_angle_comes_from_config_only() {
        let config = ViewerConfig::default().with_z_angle(0.5);
        let controller = InputController::from_config(&config);
        let mut state = ViewerState::from_config(&config);
        controller.update_pointer(&mut state, Point2D::new(0.0, 0.0));
        controller.update_pointer(&mut state, Point2D::new(50.0, -20.0));
        assert_eq!(state.orientation.z, 0.5);
    }

    #[test]
    fn test_wireframe_toggles_once_per_press() {
        let controller = InputController::default();
        let mut state = ViewerState::default();
        assert!(state.wireframe);

        assert_eq!(
            controller.handle_key(&mut state, Key::Space),
            InputAction::ToggledWireframe(false)
        );
        assert!(!state.wireframe);
        assert_eq!(
            controller.handle_key(&mut state, Key::Space),
            InputAction::ToggledWireframe(true)
        );
        assert!(state.wireframe);
    }

    #[test]
    fn test_other_keys() {
        let controller = InputController::default();
        let mut state = ViewerState::default();
        assert_eq!(
            controller.handle_key(&mut state, Key::Char('s')),
            InputAction::ToggledShading(ShadingMode::Flat)
        );
        let before = state.clone();
        assert_eq!(
            controller.handle_key(&mut state, Key::Char('x')),
            InputAction::Ignored
        );
        assert_eq!(controller.handle_key(&mut state, Key::Other), InputAction::Ignored);
        assert_eq!(state, before);
    }
}
