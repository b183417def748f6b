//! Frame loop tying input, pipeline and platform together
use tracing::{debug, info, trace, warn};

use crate::config::ViewerConfig;
use crate::error::ConfigError;
use crate::geometry::Point2D;
use crate::input::{InputAction, InputController, PlatformEvent, ViewerState};
use crate::mesh::Mesh;
use crate::render::{Renderer, Surface};
use crate::shading::ShadingMode;

/// Window, input and pacing services supplied by the host
pub trait Platform: Surface {
    /// Drain events received since the previous call.
    fn poll_events(&mut self) -> Result<Vec<PlatformEvent>, Self::Error>;

    /// Latest pointer position, or `None` until the pointer has been seen.
    fn pointer_position(&mut self) -> Option<Point2D>;

    /// Block until the next frame boundary.
    fn tick(&mut self, target_fps: u32);

    /// Per-frame summary, shown by hosts that have somewhere to put it.
    fn show_status(&mut self, _status: &FrameStatus) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStatus {
    pub frame: u64,
    pub faces: usize,
    pub wireframe: bool,
    pub shading: ShadingMode,
}

/// Whether the loop should keep going after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

/// Owns the mesh and all cross-frame state
pub struct Viewer {
    mesh: Mesh,
    config: ViewerConfig,
    controller: InputController,
    renderer: Renderer,
    state: ViewerState,
    frames: u64,
}

impl Viewer {
    pub fn new(mesh: Mesh, config: ViewerConfig) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        Ok(Self {
            controller: InputController::from_config(&config),
            renderer: Renderer::from_config(&config),
            state: ViewerState::from_config(&config),
            mesh,
            config,
            frames: 0,
        })
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Adopt a new window size.
    ///
    /// The projection re-centres on the new window and the scale follows
    /// the shorter side, so the mesh keeps filling the same fraction of it.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ConfigError> {
        let old_side = self.config.window_width.min(self.config.window_height) as f64;
        let new_side = width.min(height) as f64;
        let config = self
            .config
            .clone()
            .with_window_size(width, height)
            .with_scale(self.config.scale * new_side / old_side)
            .validate()?;

        debug!(width, height, scale = config.scale, "window resized");
        self.renderer = Renderer::from_config(&config);
        self.config = config;
        Ok(())
    }

    /// Run one frame: events, pointer, draw, present.
    pub fn frame<P: Platform>(&mut self, platform: &mut P) -> Result<FrameOutcome, P::Error> {
        for event in platform.poll_events()? {
            match event {
                PlatformEvent::Quit => return Ok(FrameOutcome::Quit),
                PlatformEvent::KeyPress(key) => {
                    match self.controller.handle_key(&mut self.state, key) {
                        InputAction::ToggledWireframe(on) => debug!(on, "wireframe toggled"),
                        InputAction::ToggledShading(mode) => {
                            debug!(mode = mode.label(), "shading toggled")
                        }
                        InputAction::Ignored => {}
                    }
                }
                PlatformEvent::Resize { width, height } => {
                    if let Err(err) = self.resize(width, height) {
                        warn!(%err, "keeping the previous window size");
                    }
                }
            }
        }

        if let Some(pointer) = platform.pointer_position() {
            self.controller.update_pointer(&mut self.state, pointer);
        }

        platform.clear(self.config.background_color)?;
        self.renderer.render(platform, &self.mesh, &self.state)?;
        self.frames += 1;
        platform.show_status(&FrameStatus {
            frame: self.frames,
            faces: self.mesh.faces().len(),
            wireframe: self.state.wireframe,
            shading: self.state.shading,
        })?;
        platform.present()?;

        trace!(frame = self.frames, orientation = ?self.state.orientation, "frame drawn");
        Ok(FrameOutcome::Continue)
    }

    /// Loop until the platform reports a quit event.
    pub fn run<P: Platform>(&mut self, platform: &mut P) -> Result<(), P::Error> {
        info!(mesh = %self.mesh, fps = self.config.target_fps, "viewer started");
        loop {
            platform.tick(self.config.target_fps);
            if self.frame(platform)? == FrameOutcome::Quit {
                break;
            }
        }
        info!(frames = self.frames, "viewer stopped");
        Ok(())
    }
}
