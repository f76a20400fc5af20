//! # Mesh Data Structure
//!
//! Polygon mesh used for tessellated fragments and the final envelope.

use config::constants::EPSILON;
use glam::{DMat4, DVec3};

/// A polygon face: vertex indices in counter-clockwise order seen from outside.
pub type Face = Vec<u32>;

/// A polygon mesh with n-gon faces.
///
/// Sphere bands and cone sides are quads, sphere poles are triangle fans and
/// cone caps are single n-gons, matching the host's own primitives so the
/// bevel and subdivision stages see the same topology.
///
/// # Example
///
/// ```rust
/// use armature_skin::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 1.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_face(vec![0, 1, 2, 3]);
/// assert_eq!(mesh.triangle_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    vertices: Vec<DVec3>,
    /// Polygon faces
    faces: Vec<Face>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Creates a mesh from existing buffers.
    pub fn from_parts(vertices: Vec<DVec3>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns the number of triangles a fan triangulation would produce.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.len().saturating_sub(2)).sum()
    }

    /// Returns true if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a face by vertex indices.
    pub fn add_face(&mut self, face: Face) {
        debug_assert!(face.len() >= 3, "Face must have at least 3 vertices");
        self.faces.push(face);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the faces.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Splits the mesh back into its buffers.
    pub fn into_parts(self) -> (Vec<DVec3>, Vec<Face>) {
        (self.vertices, self.faces)
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let Some((first, rest)) = self.vertices.split_first() else {
            return (DVec3::ZERO, DVec3::ZERO);
        };

        rest.iter()
            .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)))
    }

    /// Transforms all vertices by a 4x4 matrix.
    pub fn transform(&mut self, matrix: &DMat4) {
        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }
    }

    /// Translates the mesh by a vector.
    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Appends another mesh, rebasing its face indices.
    ///
    /// The two meshes share no vertices afterwards; coincident positions
    /// are only merged by a later weld.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|face| face.iter().map(|&i| i + offset).collect()),
        );
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - Every face has at least 3 vertices
    /// - All face indices are valid
    /// - No face repeats a vertex
    /// - No face has zero area
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        self.faces.iter().all(|face| {
            if face.len() < 3 || face.iter().any(|&i| i >= vertex_count) {
                return false;
            }

            if (1..face.len()).any(|k| face[..k].contains(&face[k])) {
                return false;
            }

            self.face_area_vector(face).length() >= EPSILON
        })
    }

    /// Newell's area vector of a face: its direction is the face normal and
    /// its length twice the face area.
    pub fn face_area_vector(&self, face: &[u32]) -> DVec3 {
        newell_area_vector(&self.vertices, face)
    }

    /// Fan-triangulates every face.
    pub fn triangulate(&self) -> Vec<[u32; 3]> {
        let mut triangles = Vec::with_capacity(self.triangle_count());
        for face in &self.faces {
            for k in 1..face.len().saturating_sub(1) {
                triangles.push([face[0], face[k], face[k + 1]]);
            }
        }
        triangles
    }

    /// Exports vertices as f32 array for GPU.
    ///
    /// Returns flattened [x, y, z, x, y, z, ...] array.
    pub fn vertices_f32(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
            .collect()
    }

    /// Exports triangulated indices as u32 array for GPU.
    ///
    /// Returns flattened [i0, i1, i2, i0, i1, i2, ...] array.
    pub fn indices_u32(&self) -> Vec<u32> {
        self.triangulate().into_iter().flatten().collect()
    }
}

/// Newell's area vector of a polygon over `vertices`.
pub(crate) fn newell_area_vector(vertices: &[DVec3], face: &[u32]) -> DVec3 {
    let n = face.len();
    (0..n).fold(DVec3::ZERO, |acc, k| {
        let a = vertices[face[k] as usize];
        let b = vertices[face[(k + 1) % n] as usize];
        acc + a.cross(b)
    })
}
