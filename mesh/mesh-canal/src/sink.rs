//! Mesh sink trait and the default indexed mesh container.

use std::collections::BTreeSet;

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A sink the mesh generator writes vertices and faces into.
///
/// The generator only ever inserts; it never reads the mesh back, so any
/// externally owned mesh structure can adapt to this trait. Handles are
/// dense `u32` indices in insertion order.
///
/// # Winding Order
///
/// Faces are emitted with counter-clockwise winding when viewed from outside
/// the tube, so normals computed by the right-hand rule point outward.
pub trait MeshSink {
    /// Insert a vertex and return its handle.
    fn insert_vertex(&mut self, position: Point3<f64>) -> u32;

    /// Insert a triangle face.
    fn insert_triangle(&mut self, a: u32, b: u32, c: u32);

    /// Insert a quadrilateral face.
    fn insert_quad(&mut self, a: u32, b: u32, c: u32, d: u32);
}

/// A mesh face: triangle (caps) or quadrilateral (ring strips).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Face {
    /// Triangle face `[v0, v1, v2]`.
    Triangle([u32; 3]),
    /// Quadrilateral face `[v0, v1, v2, v3]`.
    Quad([u32; 4]),
}

impl Face {
    /// The face's vertex handles.
    #[must_use]
    pub fn vertices(&self) -> &[u32] {
        match self {
            Face::Triangle(v) => v,
            Face::Quad(v) => v,
        }
    }
}

/// The default indexed mesh produced by canal-surface meshing.
///
/// Stores vertex positions and mixed triangle/quad faces. Ring strips stay
/// quads (the offset alternation of the generator is what keeps them well
/// shaped); downstream consumers that need pure triangles can split each
/// quad along either diagonal.
///
/// # Example
///
/// ```
/// use mesh_canal::{CanalMesh, MeshSink};
/// use nalgebra::Point3;
///
/// let mut mesh = CanalMesh::new();
/// let a = mesh.insert_vertex(Point3::new(0.0, 0.0, 0.0));
/// let b = mesh.insert_vertex(Point3::new(1.0, 0.0, 0.0));
/// let c = mesh.insert_vertex(Point3::new(0.0, 1.0, 0.0));
/// mesh.insert_triangle(a, b, c);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CanalMesh {
    /// Vertex positions, indexed by handle.
    pub vertices: Vec<Point3<f64>>,
    /// Faces referencing vertices by handle.
    pub faces: Vec<Face>,
}

impl CanalMesh {
    /// Create an empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces (quads count once).
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of triangle faces.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.faces
            .iter()
            .filter(|f| matches!(f, Face::Triangle(_)))
            .count()
    }

    /// Number of quad faces.
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.faces
            .iter()
            .filter(|f| matches!(f, Face::Quad(_)))
            .count()
    }

    /// Check if the mesh has no geometry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }

    /// Number of distinct undirected edges over all faces.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        let mut edges = BTreeSet::new();
        for face in &self.faces {
            let vs = face.vertices();
            for i in 0..vs.len() {
                let a = vs[i];
                let b = vs[(i + 1) % vs.len()];
                edges.insert((a.min(b), a.max(b)));
            }
        }
        edges.len()
    }

    /// Euler characteristic `V - E + F`, counting quads as single faces.
    ///
    /// A closed tube (capped at both ends) is topologically a sphere and has
    /// characteristic 2.
    #[must_use]
    pub fn euler_characteristic(&self) -> i64 {
        self.vertex_count() as i64 - self.edge_count() as i64 + self.face_count() as i64
    }
}

impl MeshSink for CanalMesh {
    fn insert_vertex(&mut self, position: Point3<f64>) -> u32 {
        let handle = self.vertices.len() as u32;
        self.vertices.push(position);
        handle
    }

    fn insert_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.faces.push(Face::Triangle([a, b, c]));
    }

    fn insert_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.faces.push(Face::Quad([a, b, c, d]));
    }
}
