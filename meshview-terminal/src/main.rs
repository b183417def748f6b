//! Meshview - rotate an OBJ mesh in the terminal
//!
//! Usage: meshview [path/to/model.obj]
//!
//! Controls:
//!   - Mouse movement: Rotate the mesh
//!   - Space: Toggle the wireframe overlay
//!   - S: Toggle lambert/flat shading
//!   - Q/ESC/Ctrl-C: Quit

use std::env;

use anyhow::{Context, Result};
use meshview_core::{load_obj, Mesh, Viewer, ViewerConfig};
use meshview_terminal::{terminal_pixel_size, TerminalApp};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Terminal pixels are coarse, so pointer travel turns faster than on a
/// desktop window.
const TERMINAL_ROTATE_SPEED: f64 = 0.03;

/// Fraction of the shorter canvas side the mesh should span.
const FILL: f64 = 0.8;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mesh = match env::args().nth(1) {
        Some(path) => {
            load_obj(&path).with_context(|| format!("failed to load mesh from {path}"))?
        }
        None => {
            info!("no OBJ file given, showing the built-in cube");
            Mesh::cube(2.0)
        }
    };

    let (width, height) = terminal_pixel_size().context("cannot query terminal size")?;
    let config = ViewerConfig::default()
        .with_window_size(width, height)
        .with_rotate_speed(TERMINAL_ROTATE_SPEED)
        .fit_scale(mesh.bounding_radius(), FILL);
    let viewer = Viewer::new(mesh, config).context("invalid viewer configuration")?;

    let mut app = TerminalApp::new(viewer);
    app.run().context("terminal renderer failed")?;

    info!(frames = app.viewer().frames(), "exited cleanly");
    Ok(())
}
