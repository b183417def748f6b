//! Unique undirected edge extraction for wireframe overlays

use std::collections::HashSet;

use crate::mesh::{Edge, Face};

/// Collect every distinct undirected edge of `faces`.
///
/// Edges are returned in first-insertion order, keeping the orientation in
/// which each edge was first seen. An edge shared by adjacent faces appears
/// once.
pub fn extract_edges(faces: &[Face]) -> Vec<Edge> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for face in faces {
        for (a, b) in face.sides() {
            let edge = Edge::new(a, b);
            if seen.insert(edge.key()) {
                edges.push(edge);
            }
        }
    }

    edges
}
