//! # Skin Graph Builder
//!
//! One vertex per distinct bone endpoint, one edge per bone and a radius per
//! vertex. The host's skin-inflation stage turns this graph into tubes.

use config::JointRadius;
use glam::DVec3;
use std::collections::HashSet;

use crate::dedup::{ExactIndex, PointKey, WeldMap};
use crate::error::ConvertResult;
use crate::skeleton::{Endpoint, Skeleton};

/// Vertex/edge graph with a radius attribute per vertex.
///
/// Positions are in world space. `radii.len() == vertices.len()` always
/// holds and every radius is non-negative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkinGraph {
    vertices: Vec<DVec3>,
    radii: Vec<f64>,
    edges: Vec<[u32; 2]>,
}

impl SkinGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex with its radius and returns its index.
    pub fn add_vertex(&mut self, position: DVec3, radius: f64) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.radii.push(radius);
        index
    }

    /// Adds an edge between two existing vertices.
    pub fn add_edge(&mut self, a: u32, b: u32) {
        debug_assert!((a as usize) < self.vertices.len() && (b as usize) < self.vertices.len());
        self.edges.push([a, b]);
    }

    /// Returns the vertex positions.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns the per-vertex radii, parallel to [`SkinGraph::vertices`].
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Returns the edges as vertex index pairs (head, tail).
    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges touching a vertex.
    pub fn degree(&self, vertex: u32) -> usize {
        self.edges
            .iter()
            .filter(|e| e[0] == vertex || e[1] == vertex)
            .count()
    }

    /// Number of edges that repeat an earlier edge's vertex pair, in either
    /// direction.
    pub fn parallel_edge_count(&self) -> usize {
        let mut seen = HashSet::with_capacity(self.edges.len());
        self.edges
            .iter()
            .filter(|&&[a, b]| !seen.insert((a.min(b), a.max(b))))
            .count()
    }

    /// Welds vertices within `tolerance`; edges whose ends collapse together
    /// are dropped.
    ///
    /// The surviving vertex of a cluster keeps its own radius under
    /// [`JointRadius::FirstWins`] and the largest radius of the cluster under
    /// [`JointRadius::Max`], the same rule exact joints follow.
    pub fn weld(self, tolerance: f64, policy: JointRadius) -> ConvertResult<Self> {
        let map = WeldMap::build(&self.vertices, tolerance)?;
        if map.merged_count() == 0 {
            return Ok(self);
        }

        let mut radii = map.gather(&self.radii);
        if policy == JointRadius::Max {
            for (old, &radius) in self.radii.iter().enumerate() {
                let kept = &mut radii[map.remap(old as u32) as usize];
                *kept = kept.max(radius);
            }
        }

        log::debug!(
            "skin graph weld: merged {} of {} vertices",
            map.merged_count(),
            self.vertices.len()
        );

        Ok(Self {
            vertices: map.gather(&self.vertices),
            radii,
            edges: self
                .edges
                .iter()
                .filter_map(|&e| map.remap_edge(e))
                .collect(),
        })
    }
}

/// Builds the skin graph with the first-wins radius policy.
///
/// # Example
///
/// ```rust
/// use armature_skin::{build_skin_graph, Bone, Skeleton};
/// use glam::DVec3;
///
/// let skeleton = Skeleton::new("Armature", DVec3::ZERO)
///     .with_bone(Bone::new("a", DVec3::ZERO, DVec3::Z).with_radii(0.1, 0.1))
///     .with_bone(Bone::new("b", DVec3::Z, DVec3::new(0.0, 0.0, 2.0)).with_radii(0.1, 0.1));
/// let graph = build_skin_graph(&skeleton).unwrap();
/// assert_eq!(graph.vertex_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// ```
pub fn build_skin_graph(skeleton: &Skeleton) -> ConvertResult<SkinGraph> {
    build_skin_graph_with(skeleton, JointRadius::FirstWins)
}

/// Builds the skin graph.
///
/// Bones are walked in list order. Each endpoint is resolved through an
/// exact-coordinate index (after the skeleton location is applied); a new
/// coordinate becomes a vertex carrying that endpoint's radius. When a later
/// endpoint lands on an existing vertex with a different radius, `policy`
/// decides which radius stays. Each bone then contributes one edge from its
/// head vertex to its tail vertex. Edges are not deduplicated: two bones
/// with the same endpoints yield parallel edges.
///
/// # Errors
///
/// Fails before building anything if any bone is degenerate, non-finite or
/// has a negative radius.
pub fn build_skin_graph_with(skeleton: &Skeleton, policy: JointRadius) -> ConvertResult<SkinGraph> {
    skeleton.validate()?;

    let mut index = ExactIndex::with_capacity(skeleton.bone_count() * 2);
    let mut graph = SkinGraph::new();

    let mut resolve = |graph: &mut SkinGraph, endpoint: Endpoint| -> u32 {
        let (id, is_new) = index.lookup_or_insert(PointKey::new(endpoint.position));
        if is_new {
            graph.add_vertex(endpoint.position, endpoint.radius);
        } else if policy == JointRadius::Max {
            let radius = &mut graph.radii[id as usize];
            *radius = radius.max(endpoint.radius);
        }
        id
    };

    for bone in &skeleton.bones {
        let (head, tail) = skeleton.world_endpoints(bone);
        let head_id = resolve(&mut graph, head);
        let tail_id = resolve(&mut graph, tail);
        graph.add_edge(head_id, tail_id);
    }

    let parallel = graph.parallel_edge_count();
    if parallel > 0 {
        log::warn!(
            "skeleton '{}': {} bone(s) duplicate another bone's endpoints; parallel edges kept",
            skeleton.name,
            parallel
        );
    }

    log::debug!(
        "skin graph for '{}': {} vertices, {} edges",
        skeleton.name,
        graph.vertex_count(),
        graph.edge_count()
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::skeleton::Bone;

    fn chain() -> Skeleton {
        Skeleton::new("Armature", DVec3::ZERO)
            .with_bone(Bone::new("a", DVec3::ZERO, DVec3::Z).with_radii(0.1, 0.2))
            .with_bone(
                Bone::new("b", DVec3::Z, DVec3::new(0.0, 0.0, 2.0))
                    .with_radii(0.4, 0.05)
                    .with_parent(0),
            )
    }

    #[test]
    fn test_single_bone() {
        let skeleton = Skeleton::new("Armature", DVec3::ZERO).with_bone(
            Bone::new("a", DVec3::ZERO, DVec3::new(0.0, 0.0, 2.0)).with_radii(0.1, 0.05),
        );
        let graph = build_skin_graph(&skeleton).unwrap();
        assert_eq!(graph.vertices(), &[DVec3::ZERO, DVec3::new(0.0, 0.0, 2.0)]);
        assert_eq!(graph.radii(), &[0.1, 0.05]);
        assert_eq!(graph.edges(), &[[0, 1]]);
    }

    #[test]
    fn test_shared_joint_first_wins() {
        let graph = build_skin_graph(&chain()).unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edges(), &[[0, 1], [1, 2]]);
        // Bone "a" introduced the joint with its tail radius
        assert_eq!(graph.radii(), &[0.1, 0.2, 0.05]);
        assert_eq!(graph.degree(1), 2);
    }

    #[test]
    fn test_shared_joint_max_wins() {
        let graph = build_skin_graph_with(&chain(), JointRadius::Max).unwrap();
        assert_eq!(graph.radii(), &[0.1, 0.4, 0.05]);
    }

    #[test]
    fn test_location_applied() {
        let mut skeleton = chain();
        skeleton.location = DVec3::new(1.0, 0.0, 0.0);
        let graph = build_skin_graph(&skeleton).unwrap();
        assert_eq!(graph.vertices()[0], DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(graph.vertices()[2], DVec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_parallel_edges_kept() {
        let skeleton = Skeleton::new("Armature", DVec3::ZERO)
            .with_bone(Bone::new("a", DVec3::ZERO, DVec3::Z))
            .with_bone(Bone::new("b", DVec3::Z, DVec3::ZERO));
        let graph = build_skin_graph(&skeleton).unwrap();
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.parallel_edge_count(), 1);
    }

    #[test]
    fn test_degenerate_bone_rejected() {
        let skeleton = chain().with_bone(Bone::new("c", DVec3::X, DVec3::X));
        assert!(matches!(
            build_skin_graph(&skeleton),
            Err(ConvertError::DegenerateBone { index: 2, .. })
        ));
    }

    #[test]
    fn test_empty_skeleton() {
        let graph = build_skin_graph(&Skeleton::new("Armature", DVec3::ZERO)).unwrap();
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_weld_collapses_near_joint() {
        let skeleton = Skeleton::new("Armature", DVec3::ZERO)
            .with_bone(Bone::new("a", DVec3::ZERO, DVec3::Z).with_radii(0.1, 0.3))
            .with_bone(
                Bone::new("b", DVec3::new(0.0, 0.0, 1.0004), DVec3::new(0.0, 0.0, 2.0))
                    .with_radii(0.2, 0.1),
            );
        let graph = build_skin_graph(&skeleton).unwrap();
        assert_eq!(graph.vertex_count(), 4);

        let welded = graph.weld(0.001, JointRadius::FirstWins).unwrap();
        assert_eq!(welded.vertex_count(), 3);
        assert_eq!(welded.radii(), &[0.1, 0.3, 0.1]);
        assert_eq!(welded.edges(), &[[0, 1], [1, 2]]);
    }

    #[test]
    fn test_weld_keeps_largest_radius_under_max() {
        let skeleton = Skeleton::new("Armature", DVec3::ZERO)
            .with_bone(Bone::new("a", DVec3::ZERO, DVec3::Z).with_radii(0.1, 0.2))
            .with_bone(
                Bone::new("b", DVec3::new(0.0, 0.0, 1.0004), DVec3::new(0.0, 0.0, 2.0))
                    .with_radii(0.5, 0.1),
            );
        let graph = build_skin_graph_with(&skeleton, JointRadius::Max).unwrap();
        let welded = graph.clone().weld(0.001, JointRadius::Max).unwrap();
        assert_eq!(welded.radii(), &[0.1, 0.5, 0.1]);

        let first = graph.weld(0.001, JointRadius::FirstWins).unwrap();
        assert_eq!(first.radii(), &[0.1, 0.2, 0.1]);
    }

    #[test]
    fn test_weld_drops_collapsed_edge() {
        let mut graph = SkinGraph::new();
        graph.add_vertex(DVec3::ZERO, 0.1);
        graph.add_vertex(DVec3::new(0.0005, 0.0, 0.0), 0.1);
        graph.add_edge(0, 1);
        let welded = graph.weld(0.001, JointRadius::FirstWins).unwrap();
        assert_eq!(welded.vertex_count(), 1);
        assert_eq!(welded.edge_count(), 0);
        assert_eq!(welded.radii().len(), 1);
    }
}
