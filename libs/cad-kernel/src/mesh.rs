//! # Mesh Data Structures
//!
//! Triangle meshes and edge polylines produced by a kernel.
//!
//! Geometry is computed in f64 and stored as flat f32 buffers, the layout
//! a renderer uploads directly.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Discretized edges: flat line segments plus the segment count per edge.
///
/// # Example
///
/// ```rust
/// use cad_kernel::EdgeMesh;
/// use glam::DVec3;
///
/// let mut edges = EdgeMesh::new();
/// edges.push_polyline(&[DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0)]);
/// assert_eq!(edges.segments_per_edge, vec![2]);
/// assert_eq!(edges.edges.len(), 2 * 6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeMesh {
    /// Segment endpoints, 6 floats per segment
    pub edges: Vec<f32>,
    /// Number of segments of each edge, in edge order
    pub segments_per_edge: Vec<u32>,
}

impl EdgeMesh {
    /// Creates an empty edge mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one edge given as a polyline. Polylines with fewer than two
    /// points contribute an edge with no segments.
    pub fn push_polyline(&mut self, points: &[DVec3]) {
        let mut segments = 0u32;
        for pair in points.windows(2) {
            push_point(&mut self.edges, pair[0]);
            push_point(&mut self.edges, pair[1]);
            segments += 1;
        }
        self.segments_per_edge.push(segments);
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.segments_per_edge.len()
    }

    /// Returns true if no edge was added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments_per_edge.is_empty()
    }

    /// Iterates over every segment endpoint.
    pub fn positions(&self) -> impl Iterator<Item = DVec3> + '_ {
        points_of(&self.edges)
    }
}

/// A triangulated shape.
///
/// # Example
///
/// ```rust
/// use cad_kernel::ShapeMesh;
/// use glam::DVec3;
///
/// let mut mesh = ShapeMesh::new();
/// let square = [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y];
/// mesh.push_face(&square, DVec3::Z);
/// assert_eq!(mesh.triangle_count(), 2);
/// assert_eq!(mesh.triangles_per_face, vec![2]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeMesh {
    /// Vertex positions, 3 floats per vertex
    pub vertices: Vec<f32>,
    /// Vertex normals, aligned with `vertices`
    pub normals: Vec<f32>,
    /// Triangle indices, 3 per triangle
    pub triangles: Vec<u32>,
    /// Number of triangles of each face, in face order
    pub triangles_per_face: Vec<u32>,
    /// Wireframe edges, present when requested
    pub edges: Option<EdgeMesh>,
    /// Positions of the shape's vertices, 3 floats per vertex
    pub obj_vertices: Vec<f32>,
}

impl ShapeMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3, normal: DVec3) -> u32 {
        let index = (self.vertices.len() / 3) as u32;
        push_point(&mut self.vertices, position);
        push_point(&mut self.normals, normal);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.extend_from_slice(&[v0, v1, v2]);
    }

    /// Appends a convex planar face as a triangle fan around its first
    /// point.
    pub fn push_face(&mut self, outline: &[DVec3], normal: DVec3) {
        let base = outline
            .iter()
            .map(|&p| self.add_vertex(p, normal))
            .collect::<Vec<_>>();
        let mut count = 0u32;
        for i in 1..base.len().saturating_sub(1) {
            self.add_triangle(base[0], base[i], base[i + 1]);
            count += 1;
        }
        self.triangles_per_face.push(count);
    }

    /// Records a vertex of the shape itself.
    pub fn push_obj_vertex(&mut self, position: DVec3) {
        push_point(&mut self.obj_vertices, position);
    }

    /// Number of mesh vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.triangles_per_face.len()
    }

    /// Iterates over every position carried by the mesh: triangle
    /// vertices, edge points and shape vertices.
    pub fn positions(&self) -> impl Iterator<Item = DVec3> + '_ {
        let edge_points = self.edges.iter().flat_map(|edges| edges.positions());
        points_of(&self.vertices)
            .chain(edge_points)
            .chain(points_of(&self.obj_vertices))
    }
}

fn push_point(buffer: &mut Vec<f32>, point: DVec3) {
    buffer.extend_from_slice(&point.as_vec3().to_array());
}

fn points_of(buffer: &[f32]) -> impl Iterator<Item = DVec3> + '_ {
    buffer
        .chunks_exact(3)
        .map(|c| DVec3::new(c[0] as f64, c[1] as f64, c[2] as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_fan() {
        let mut mesh = ShapeMesh::new();
        let pentagon = (0..5)
            .map(|i| {
                let a = i as f64 * std::f64::consts::TAU / 5.0;
                DVec3::new(a.cos(), a.sin(), 0.0)
            })
            .collect::<Vec<_>>();
        mesh.push_face(&pentagon, DVec3::Z);
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.triangle_count(), 3);
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
    }

    #[test]
    fn test_degenerate_polyline() {
        let mut edges = EdgeMesh::new();
        edges.push_polyline(&[DVec3::ZERO]);
        assert_eq!(edges.edge_count(), 1);
        assert_eq!(edges.segments_per_edge, vec![0]);
        assert!(edges.edges.is_empty());
    }

    #[test]
    fn test_positions_cover_all_buffers() {
        let mut mesh = ShapeMesh::new();
        mesh.push_face(&[DVec3::ZERO, DVec3::X, DVec3::Y], DVec3::Z);
        let mut edges = EdgeMesh::new();
        edges.push_polyline(&[DVec3::ZERO, DVec3::new(0.0, 0.0, 5.0)]);
        mesh.edges = Some(edges);
        mesh.push_obj_vertex(DVec3::new(-2.0, 0.0, 0.0));

        let max_z = mesh.positions().map(|p| p.z).fold(f64::MIN, f64::max);
        let min_x = mesh.positions().map(|p| p.x).fold(f64::MAX, f64::min);
        assert_eq!(max_z, 5.0);
        assert_eq!(min_x, -2.0);
    }
}
