//! # Tolerance Weld
//!
//! Chain-merge of near-coincident vertices ("remove doubles").
//!
//! Two vertices end up in the same cluster when a chain of pairwise
//! distances `<= tolerance` connects them. Each cluster is replaced by its
//! first-encountered member, so representatives of different clusters are
//! always more than `tolerance` apart.
//!
//! ## Acceleration
//!
//! Vertices are hashed into a grid of cubic cells with side `tolerance`;
//! any partner within `tolerance` lies in one of the 27 cells around a
//! vertex. Expected cost is linear for the spread-out vertex sets that
//! tessellated bones produce; it only approaches quadratic when a large
//! share of the vertices fall into the same few cells.

use config::constants::EPSILON;
use glam::DVec3;
use std::collections::HashMap;

use crate::error::{ConvertError, ConvertResult};
use crate::mesh::{newell_area_vector, Face, Mesh};

/// 3D cell coordinate for spatial hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i64,
    y: i64,
    z: i64,
}

impl CellCoord {
    /// Creates a cell coordinate from 3D position.
    fn from_position(pos: DVec3, cell_size: f64) -> Self {
        // `as` saturates, so far-away points share the boundary cell
        Self {
            x: (pos.x / cell_size).floor() as i64,
            y: (pos.y / cell_size).floor() as i64,
            z: (pos.z / cell_size).floor() as i64,
        }
    }

    /// The cell itself and its 26 neighbours.
    fn neighbourhood(self) -> impl Iterator<Item = CellCoord> {
        (-1i64..=1).flat_map(move |dx| {
            (-1i64..=1).flat_map(move |dy| {
                (-1i64..=1).map(move |dz| CellCoord {
                    x: self.x.saturating_add(dx),
                    y: self.y.saturating_add(dy),
                    z: self.z.saturating_add(dz),
                })
            })
        })
    }
}

/// Union-find over vertex indices whose roots are always the smallest
/// index of their set.
struct Clusters {
    parent: Vec<u32>,
}

impl Clusters {
    fn new(count: usize) -> Self {
        Self {
            parent: (0..count as u32).collect(),
        }
    }

    fn find(&mut self, mut i: u32) -> u32 {
        while self.parent[i as usize] != i {
            let grandparent = self.parent[self.parent[i as usize] as usize];
            self.parent[i as usize] = grandparent;
            i = grandparent;
        }
        i
    }

    fn union(&mut self, a: u32, b: u32) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[high as usize] = low;
        }
    }
}

/// Old-to-new vertex mapping produced by a weld.
///
/// # Example
///
/// ```rust
/// use armature_skin::dedup::WeldMap;
/// use glam::DVec3;
///
/// let points = [DVec3::ZERO, DVec3::new(0.0005, 0.0, 0.0), DVec3::X];
/// let map = WeldMap::build(&points, 0.001).unwrap();
/// assert_eq!(map.vertex_count(), 2);
/// assert_eq!(map.remap(1), 0);
/// assert_eq!(map.remap(2), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeldMap {
    /// New index of every old vertex
    remap: Vec<u32>,
    /// Old index of every new vertex (cluster representatives, ascending)
    kept: Vec<u32>,
}

impl WeldMap {
    /// Mapping that keeps every vertex.
    pub fn identity(count: usize) -> Self {
        let ids: Vec<u32> = (0..count as u32).collect();
        Self {
            remap: ids.clone(),
            kept: ids,
        }
    }

    /// Clusters `positions` with the given tolerance.
    ///
    /// A tolerance of zero disables welding and returns the identity.
    ///
    /// # Errors
    ///
    /// [`ConvertError::InvalidTolerance`] for negative or NaN tolerances.
    pub fn build(positions: &[DVec3], tolerance: f64) -> ConvertResult<Self> {
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(ConvertError::InvalidTolerance(tolerance));
        }
        if tolerance == 0.0 || positions.is_empty() {
            return Ok(Self::identity(positions.len()));
        }

        let limit = tolerance * tolerance;
        let mut clusters = Clusters::new(positions.len());
        let mut grid: HashMap<CellCoord, Vec<u32>> = HashMap::new();

        for (i, &p) in positions.iter().enumerate() {
            let cell = CellCoord::from_position(p, tolerance);
            for neighbour in cell.neighbourhood() {
                if let Some(members) = grid.get(&neighbour) {
                    for &j in members {
                        if p.distance_squared(positions[j as usize]) <= limit {
                            clusters.union(i as u32, j);
                        }
                    }
                }
            }
            grid.entry(cell).or_default().push(i as u32);
        }

        let mut remap = vec![0u32; positions.len()];
        let mut kept = Vec::new();
        for i in 0..positions.len() as u32 {
            let root = clusters.find(i);
            if root == i {
                remap[i as usize] = kept.len() as u32;
                kept.push(i);
            } else {
                // Roots are the smallest member, so already numbered
                remap[i as usize] = remap[root as usize];
            }
        }

        Ok(Self { remap, kept })
    }

    /// New index of old vertex `old`.
    #[inline]
    pub fn remap(&self, old: u32) -> u32 {
        self.remap[old as usize]
    }

    /// Old indices of the surviving vertices, in new-index order.
    pub fn kept(&self) -> &[u32] {
        &self.kept
    }

    /// Number of vertices after welding.
    pub fn vertex_count(&self) -> usize {
        self.kept.len()
    }

    /// Number of vertices removed by welding.
    pub fn merged_count(&self) -> usize {
        self.remap.len() - self.kept.len()
    }

    /// Gathers per-vertex data of the representatives.
    pub fn gather<T: Copy>(&self, data: &[T]) -> Vec<T> {
        self.kept.iter().map(|&i| data[i as usize]).collect()
    }

    /// Rewrites a face, dropping it when welding left fewer than three
    /// corners or pinched it onto itself.
    ///
    /// Neighbouring corners that collapsed together are merged, including
    /// across the wrap from last to first corner. Any other repeated corner
    /// (a quad whose diagonal collapsed) drops the whole face.
    pub fn remap_face(&self, face: &[u32]) -> Option<Face> {
        let mut out: Face = Vec::with_capacity(face.len());
        for &old in face {
            let new = self.remap(old);
            if out.last() != Some(&new) {
                out.push(new);
            }
        }
        while out.len() > 1 && out.first() == out.last() {
            out.pop();
        }

        let mut distinct = out.clone();
        distinct.sort_unstable();
        distinct.dedup();
        (distinct.len() >= 3 && distinct.len() == out.len()).then_some(out)
    }

    /// Rewrites an edge, dropping it when both ends collapsed together.
    pub fn remap_edge(&self, edge: [u32; 2]) -> Option<[u32; 2]> {
        let (a, b) = (self.remap(edge[0]), self.remap(edge[1]));
        (a != b).then_some([a, b])
    }
}

/// Welds a mesh, rewriting faces and dropping the degenerate ones.
///
/// # Example
///
/// ```rust
/// use armature_skin::{dedup::weld_mesh, Mesh};
/// use glam::DVec3;
///
/// let mut a = Mesh::new();
/// a.add_vertex(DVec3::ZERO);
/// a.add_vertex(DVec3::X);
/// a.add_vertex(DVec3::Y);
/// a.add_face(vec![0, 1, 2]);
/// let mut b = a.clone();
/// b.merge(&a);
///
/// let welded = weld_mesh(b, 0.001).unwrap();
/// assert_eq!(welded.vertex_count(), 3);
/// assert_eq!(welded.face_count(), 2);
/// ```
pub fn weld_mesh(mesh: Mesh, tolerance: f64) -> ConvertResult<Mesh> {
    let map = WeldMap::build(mesh.vertices(), tolerance)?;
    if map.merged_count() == 0 {
        return Ok(mesh);
    }

    let (vertices, faces) = mesh.into_parts();
    let face_count = faces.len();
    let vertex_count = vertices.len();

    let vertices = map.gather(&vertices);
    let faces: Vec<Face> = faces
        .iter()
        .filter_map(|f| map.remap_face(f))
        .filter(|f| newell_area_vector(&vertices, f).length() >= EPSILON)
        .collect();

    log::debug!(
        "weld: merged {} of {} vertices, dropped {} degenerate faces (tolerance {})",
        map.merged_count(),
        vertex_count,
        face_count - faces.len(),
        tolerance
    );

    Ok(Mesh::from_parts(vertices, faces))
}
