//! Indexed polygon mesh: vertices, faces and the derived edge set

use std::fmt;

use crate::edges::extract_edges;
use crate::error::{MeshError, MeshResult};
use crate::geometry::Vec3;

/// A planar polygon given as vertex indices in winding order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub indices: Vec<usize>,
}

impl Face {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Consecutive index pairs, including the pair that closes the polygon.
    pub fn sides(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.indices.len();
        (0..n).map(move |i| (self.indices[i], self.indices[(i + 1) % n]))
    }
}

impl From<Vec<usize>> for Face {
    fn from(indices: Vec<usize>) -> Self {
        Self::new(indices)
    }
}

/// An undirected edge between two vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// Orientation-independent key, smaller index first.
    pub fn key(&self) -> (usize, usize) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

/// Immutable mesh loaded once at startup
///
/// Every face index is guaranteed to be a valid index into `vertices`, and
/// every face has at least three indices.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    edges: Vec<Edge>,
}

impl Mesh {
    /// Build a mesh from raw parts, checking face arity and index bounds.
    pub fn from_parts(vertices: Vec<Vec3>, faces: Vec<Face>) -> MeshResult<Self> {
        for (i, face) in faces.iter().enumerate() {
            if let Some(reason) = face_problem(face, vertices.len()) {
                return Err(MeshError::InvalidFace { face: i, reason });
            }
        }
        if faces.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        Ok(Self::assemble(vertices, faces))
    }

    /// Caller has already validated every face.
    pub(crate) fn assemble(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        let edges = extract_edges(&faces);
        Self {
            vertices,
            faces,
            edges,
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Distance from the origin to the farthest vertex.
    pub fn bounding_radius(&self) -> f64 {
        self.vertices
            .iter()
            .map(Vec3::length)
            .fold(0.0, f64::max)
    }

    /// Axis-aligned cube centred on the origin, faces wound so that their
    /// normals point outward.
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        let faces = [
            [0, 3, 2, 1], // -z
            [4, 5, 6, 7], // +z
            [0, 1, 5, 4], // -y
            [3, 7, 6, 2], // +y
            [0, 4, 7, 3], // -x
            [1, 2, 6, 5], // +x
        ]
        .into_iter()
        .map(|f| Face::new(f.to_vec()))
        .collect();

        Self::assemble(vertices, faces)
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vertices, {} faces, {} edges",
            self.vertices.len(),
            self.faces.len(),
            self.edges.len()
        )
    }
}

/// Describe why `face` cannot index a vertex list of `vertex_count`.
pub(crate) fn face_problem(face: &Face, vertex_count: usize) -> Option<String> {
    if face.len() < 3 {
        return Some(format!("face needs at least 3 vertices, got {}", face.len()));
    }
    face.indices
        .iter()
        .find(|&&i| i >= vertex_count)
        .map(|&i| {
            format!(
                "vertex index {} out of range (mesh has {vertex_count} vertices)",
                i + 1
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_face_sides_wrap_around() {
        let face = Face::new(vec![4, 7, 9]);
        let sides: Vec<_> = face.sides().collect();
        assert_eq!(sides, vec![(4, 7), (7, 9), (9, 4)]);
    }

    #[test]
    fn test_from_parts_accepts_valid_faces() {
        let mesh = Mesh::from_parts(triangle(), vec![Face::new(vec![0, 1, 2])]).unwrap();
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.faces().len(), 1);
        assert_eq!(mesh.edges().len(), 3);
    }

    #[test]
    fn test_from_parts_rejects_out_of_range_index() {
        let err = Mesh::from_parts(triangle(), vec![Face::new(vec![0, 1, 3])]).unwrap_err();
        assert!(matches!(err, MeshError::InvalidFace { face: 0, .. }));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_from_parts_rejects_short_face() {
        let faces = vec![Face::new(vec![0, 1, 2]), Face::new(vec![0, 1])];
        let err = Mesh::from_parts(triangle(), faces).unwrap_err();
        assert!(matches!(err, MeshError::InvalidFace { face: 1, .. }));
    }

    #[test]
    fn test_from_parts_rejects_empty() {
        let err = Mesh::from_parts(triangle(), Vec::new()).unwrap_err();
        assert!(matches!(err, MeshError::EmptyMesh));
    }

    #[test]
    fn test_cube() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.vertices().len(), 8);
        assert_eq!(cube.faces().len(), 6);
        assert_eq!(cube.edges().len(), 12);
        assert!((cube.bounding_radius() - 3f64.sqrt()).abs() < 1e-12);
        assert_eq!(cube.to_string(), "8 vertices, 6 faces, 12 edges");
    }

    #[test]
    fn test_huge_coordinates_have_finite_radius() {
        let vertices = vec![
            Vec3::new(1e200, 0.0, 0.0),
            Vec3::new(0.0, 1e200, 0.0),
            Vec3::new(0.0, 0.0, 1e200),
        ];
        let mesh = Mesh::from_parts(vertices, vec![Face::new(vec![0, 1, 2])]).unwrap();
        let radius = mesh.bounding_radius();
        assert!((radius / 1e200 - 1.0).abs() < 1e-12);

        let config = crate::config::ViewerConfig::default().fit_scale(radius, 0.8);
        assert!((config.scale * 1e200 - 320.0).abs() < 1e-9);
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = Mesh::cube(2.0);
        let v = cube.vertices();
        for face in cube.faces() {
            let [a, b, c] = [v[face.indices[0]], v[face.indices[1]], v[face.indices[2]]];
            let normal = (b - a).cross(&(c - a));
            let centroid = face
                .indices
                .iter()
                .fold(Vec3::ZERO, |acc, &i| acc + v[i])
                * (1.0 / face.len() as f64);
            assert!(normal.dot(&centroid) > 0.0, "face {:?} is wound inward", face);
        }
    }
}
