//! Painter's-algorithm face ordering and draw-call issue
//!
//! Faces are sorted by the mean depth of their rotated vertices and drawn
//! farthest first. This is exact only for convex, non-interpenetrating faces;
//! concave or self-overlapping geometry can show ordering artifacts.

use std::cmp::Ordering;

use tracing::trace;

use crate::config::ViewerConfig;
use crate::geometry::{Color, Point2D, Vec3};
use crate::input::ViewerState;
use crate::mesh::{Face, Mesh};
use crate::projection::Projector;
use crate::shading::{face_normal, Shader, ShadingMode};
use crate::transform::Transform;

/// Drawing primitives provided by the display backend
pub trait Surface {
    type Error;

    fn clear(&mut self, color: Color) -> Result<(), Self::Error>;

    fn draw_polygon(&mut self, points: &[Point2D], color: Color) -> Result<(), Self::Error>;

    fn draw_line(&mut self, from: Point2D, to: Point2D, color: Color) -> Result<(), Self::Error>;

    fn present(&mut self) -> Result<(), Self::Error>;
}

/// Per-frame draw information for one face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRenderRecord {
    /// Index into the mesh's face list.
    pub face: usize,
    pub depth: f64,
    pub color: Color,
}

/// Mean Z of a face's rotated vertices.
pub fn average_depth(face: &Face, rotated: &[Vec3]) -> f64 {
    let sum: f64 = face.indices.iter().map(|&i| rotated[i].z).sum();
    sum / face.len() as f64
}

/// Back-to-front order: descending depth, ties broken by ascending face
/// index so equal depths never swap between frames.
pub fn depth_order(a: &FaceRenderRecord, b: &FaceRenderRecord) -> Ordering {
    b.depth
        .total_cmp(&a.depth)
        .then_with(|| a.face.cmp(&b.face))
}

pub fn sort_back_to_front(records: &mut [FaceRenderRecord]) {
    records.sort_by(depth_order);
}

/// Everything computed for one frame before any draw call is made
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub rotated: Vec<Vec3>,
    pub screen: Vec<Point2D>,
    /// Sorted back to front.
    pub records: Vec<FaceRenderRecord>,
    /// Faces with no usable normal that Lambert shading drew black.
    pub unlit: usize,
}

/// Turns a mesh and the current viewer state into draw calls
#[derive(Debug, Clone)]
pub struct Renderer {
    pub projector: Projector,
    pub light_direction: Vec3,
    pub base_color: Color,
    pub overlay_color: Color,
}

impl Renderer {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            projector: Projector::from_config(config),
            light_direction: config.light_direction,
            base_color: config.base_color,
            overlay_color: config.overlay_color,
        }
    }

    /// Rotate, project, shade and sort.
    pub fn prepare(&self, mesh: &Mesh, state: &ViewerState) -> Frame {
        let shader = Shader::new(self.light_direction, self.base_color, state.shading);
        let rotated = Transform::apply(&state.orientation, mesh.vertices());
        let screen = self.projector.project_all(&rotated);

        let mut points = Vec::new();
        let mut unlit = 0usize;
        let mut records: Vec<FaceRenderRecord> = mesh
            .faces()
            .iter()
            .enumerate()
            .map(|(i, face)| {
                points.clear();
                points.extend(face.indices.iter().map(|&v| rotated[v]));
                if state.shading == ShadingMode::Lambert && face_normal(&points).is_none() {
                    unlit += 1;
                }
                FaceRenderRecord {
                    face: i,
                    depth: average_depth(face, &rotated),
                    color: shader.shade(&points),
                }
            })
            .collect();
        sort_back_to_front(&mut records);

        if unlit > 0 {
            trace!(unlit, "degenerate faces drawn unlit");
        }

        Frame {
            rotated,
            screen,
            records,
            unlit,
        }
    }

    /// Issue polygon calls back to front, then the optional edge overlay.
    pub fn draw<S: Surface>(
        &self,
        surface: &mut S,
        mesh: &Mesh,
        frame: &Frame,
        wireframe: bool,
    ) -> Result<(), S::Error> {
        let faces = mesh.faces();
        let mut polygon = Vec::new();
        for record in &frame.records {
            polygon.clear();
            polygon.extend(faces[record.face].indices.iter().map(|&i| frame.screen[i]));
            surface.draw_polygon(&polygon, record.color)?;
        }

        if wireframe {
            for edge in mesh.edges() {
                surface.draw_line(frame.screen[edge.a], frame.screen[edge.b], self.overlay_color)?;
            }
        }
        Ok(())
    }

    pub fn render<S: Surface>(
        &self,
        surface: &mut S,
        mesh: &Mesh,
        state: &ViewerState,
    ) -> Result<Frame, S::Error> {
        let frame = self.prepare(mesh, state);
        self.draw(surface, mesh, &frame, state.wireframe)?;
        Ok(frame)
    }
}
