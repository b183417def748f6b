//! Meshview Core Library - mesh loading and the per-frame geometry pipeline
//!
//! Loads an OBJ subset into an indexed mesh, rotates it from pointer input,
//! projects orthographically, shades faces with one directional light and
//! orders them back to front for painter's-algorithm drawing. Display,
//! input and pacing are supplied by a [`Platform`] implementation.

pub mod config;
pub mod edges;
pub mod error;
pub mod geometry;
pub mod input;
pub mod mesh;
pub mod obj;
pub mod projection;
pub mod render;
pub mod shading;
pub mod transform;
pub mod viewer;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use error::{ConfigError, MeshError, MeshResult};
pub use geometry::{Color, Point2D, Vec3};
pub use input::{InputController, Key, PlatformEvent, ViewerState};
pub use mesh::{Edge, Face, Mesh};
pub use obj::{load_obj, parse_obj};
pub use projection::Projector;
pub use render::{FaceRenderRecord, Frame, Renderer, Surface};
pub use shading::{Shader, ShadingMode};
pub use transform::{Mat3, Orientation, Transform};
pub use viewer::{FrameOutcome, FrameStatus, Platform, Viewer};
