//! Deduplication tests.

use super::*;
use crate::error::ConvertError;
use crate::mesh::Mesh;

// =============================================================================
// EXACT INDEX
// =============================================================================

#[test]
fn test_exact_index_assigns_sequential_ids() {
    let mut index = ExactIndex::new();
    let points = [DVec3::ZERO, DVec3::X, DVec3::ZERO, DVec3::Y, DVec3::X];
    let ids: Vec<(u32, bool)> = points
        .iter()
        .map(|&p| index.lookup_or_insert(PointKey::new(p)))
        .collect();
    assert_eq!(
        ids,
        vec![(0, true), (1, true), (0, false), (2, true), (1, false)]
    );
    assert_eq!(index.len(), 3);
    assert_eq!(index.get(&PointKey::new(DVec3::Y)), Some(2));
}

#[test]
fn test_point_key_folds_negative_zero() {
    assert_eq!(
        PointKey::new(DVec3::new(-0.0, 0.0, 1.0)),
        PointKey::new(DVec3::new(0.0, 0.0, 1.0))
    );
}

#[test]
fn test_point_key_is_exact() {
    assert_ne!(
        PointKey::new(DVec3::new(0.0, 0.0, 1.0)),
        PointKey::new(DVec3::new(0.0, 0.0, 1.0 + f64::EPSILON))
    );
}

#[test]
fn test_endpoint_key_includes_radius() {
    let mut index = ExactIndex::new();
    assert!(index.lookup_or_insert(EndpointKey::new(DVec3::Z, 0.1)).1);
    assert!(index.lookup_or_insert(EndpointKey::new(DVec3::Z, 0.2)).1);
    assert!(!index.lookup_or_insert(EndpointKey::new(DVec3::Z, 0.1)).1);
}

// =============================================================================
// WELD MAP
// =============================================================================

#[test]
fn test_weld_zero_tolerance_is_identity() {
    let points = [DVec3::ZERO, DVec3::ZERO, DVec3::X];
    let map = WeldMap::build(&points, 0.0).unwrap();
    assert_eq!(map, WeldMap::identity(3));
    assert_eq!(map.merged_count(), 0);
}

#[test]
fn test_weld_negative_tolerance_rejected() {
    assert_eq!(
        WeldMap::build(&[DVec3::ZERO], -0.1),
        Err(ConvertError::InvalidTolerance(-0.1))
    );
    assert!(WeldMap::build(&[DVec3::ZERO], f64::NAN).is_err());
}

#[test]
fn test_weld_chains_merge_transitively() {
    // 0-1 and 1-2 are within tolerance, 0-2 is not
    let points = [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(0.0008, 0.0, 0.0),
        DVec3::new(0.0016, 0.0, 0.0),
        DVec3::new(1.0, 0.0, 0.0),
    ];
    let map = WeldMap::build(&points, 0.001).unwrap();
    assert_eq!(map.vertex_count(), 2);
    assert_eq!(map.remap(0), 0);
    assert_eq!(map.remap(1), 0);
    assert_eq!(map.remap(2), 0);
    assert_eq!(map.remap(3), 1);
}

#[test]
fn test_weld_keeps_first_encountered_position() {
    let points = [
        DVec3::X,
        DVec3::new(5.0, 5.0, 5.0),
        DVec3::new(5.0, 5.0, 5.0005),
    ];
    let map = WeldMap::build(&points, 0.001).unwrap();
    assert_eq!(map.kept(), &[0, 1]);
    assert_eq!(map.gather(&points), vec![DVec3::X, DVec3::new(5.0, 5.0, 5.0)]);
}

#[test]
fn test_weld_across_cell_boundaries() {
    // Straddles the grid cell boundary at x = 0
    let points = [DVec3::new(-0.0004, 0.0, 0.0), DVec3::new(0.0004, 0.0, 0.0)];
    let map = WeldMap::build(&points, 0.001).unwrap();
    assert_eq!(map.vertex_count(), 1);
}

#[test]
fn test_weld_distance_is_inclusive() {
    let points = [DVec3::ZERO, DVec3::new(0.5, 0.0, 0.0)];
    let map = WeldMap::build(&points, 0.5).unwrap();
    assert_eq!(map.vertex_count(), 1);
}

#[test]
fn test_weld_monotonic_in_tolerance() {
    let points: Vec<DVec3> = (0..200)
        .map(|i| {
            let t = i as f64 * 0.37;
            DVec3::new(t.sin(), (t * 1.3).cos(), (i % 7) as f64 * 0.003)
        })
        .collect();
    let mut previous = usize::MAX;
    for tolerance in [0.0, 0.001, 0.005, 0.02, 0.1, 0.5, 2.0] {
        let count = WeldMap::build(&points, tolerance).unwrap().vertex_count();
        assert!(count <= previous, "tolerance {} grew count", tolerance);
        previous = count;
    }
}

#[test]
fn test_remap_face_drops_collapsed_triangle() {
    let points = [DVec3::ZERO, DVec3::new(0.0001, 0.0, 0.0), DVec3::Y];
    let map = WeldMap::build(&points, 0.001).unwrap();
    assert_eq!(map.remap_face(&[0, 1, 2]), None);
}

#[test]
fn test_remap_face_shrinks_quad_to_triangle() {
    let points = [
        DVec3::ZERO,
        DVec3::X,
        DVec3::new(1.0, 1.0, 0.0),
        DVec3::new(0.0, 0.0, 0.0002),
    ];
    let map = WeldMap::build(&points, 0.001).unwrap();
    // Corner 3 wraps around onto corner 0
    assert_eq!(map.remap_face(&[0, 1, 2, 3]), Some(vec![0, 1, 2]));
}

#[test]
fn test_remap_face_drops_collapsed_diagonal() {
    let points = [
        DVec3::ZERO,
        DVec3::X,
        DVec3::new(0.0005, 0.0, 0.0),
        DVec3::Y,
    ];
    let map = WeldMap::build(&points, 0.001).unwrap();
    // Corners 0 and 2 are not neighbours but weld together
    assert_eq!(map.remap(2), map.remap(0));
    assert_eq!(map.remap_face(&[0, 1, 2, 3]), None);
}

#[test]
fn test_remap_edge_drops_self_loop() {
    let points = [DVec3::ZERO, DVec3::new(0.0, 0.0001, 0.0), DVec3::Z];
    let map = WeldMap::build(&points, 0.001).unwrap();
    assert_eq!(map.remap_edge([0, 1]), None);
    assert_eq!(map.remap_edge([1, 2]), Some([0, 1]));
}

// =============================================================================
// WELD MESH
// =============================================================================

fn square(offset: DVec3) -> Mesh {
    let mut mesh = Mesh::new();
    mesh.add_vertex(offset);
    mesh.add_vertex(offset + DVec3::X);
    mesh.add_vertex(offset + DVec3::new(1.0, 1.0, 0.0));
    mesh.add_vertex(offset + DVec3::Y);
    mesh.add_face(vec![0, 1, 2, 3]);
    mesh
}

#[test]
fn test_weld_mesh_joins_adjacent_squares() {
    let mut mesh = square(DVec3::ZERO);
    mesh.merge(&square(DVec3::new(1.0, 0.0, 0.0)));
    let welded = weld_mesh(mesh, 0.001).unwrap();
    assert_eq!(welded.vertex_count(), 6);
    assert_eq!(welded.face_count(), 2);
    assert!(welded.validate());
}

#[test]
fn test_weld_mesh_drops_squashed_face() {
    let mut mesh = square(DVec3::ZERO);
    let tiny = Mesh::from_parts(
        vec![
            DVec3::new(5.0, 0.0, 0.0),
            DVec3::new(5.0001, 0.0, 0.0),
            DVec3::new(5.0, 0.0001, 0.0),
        ],
        vec![vec![0, 1, 2]],
    );
    mesh.merge(&tiny);
    let welded = weld_mesh(mesh, 0.001).unwrap();
    assert_eq!(welded.vertex_count(), 5);
    assert_eq!(welded.face_count(), 1);
    assert!(welded.faces().iter().all(|f| f.len() >= 3));
}

#[test]
fn test_weld_mesh_drops_pinched_quad() {
    let mesh = Mesh::from_parts(
        vec![
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(0.0005, 0.0, 0.0),
            DVec3::Y,
        ],
        vec![vec![0, 1, 2, 3]],
    );
    let welded = weld_mesh(mesh, 0.001).unwrap();
    assert_eq!(welded.vertex_count(), 3);
    assert_eq!(welded.face_count(), 0);
    assert!(welded.validate());
}

#[test]
fn test_weld_mesh_drops_flattened_face() {
    // Corner 3 lands on corner 2, leaving three collinear corners
    let mesh = Mesh::from_parts(
        vec![
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0005, 0.0),
        ],
        vec![vec![0, 1, 2, 3]],
    );
    let welded = weld_mesh(mesh, 0.001).unwrap();
    assert_eq!(welded.vertex_count(), 3);
    assert_eq!(welded.face_count(), 0);
}

#[test]
fn test_weld_mesh_untouched_when_nothing_merges() {
    let mesh = square(DVec3::ZERO);
    let welded = weld_mesh(mesh.clone(), 0.001).unwrap();
    assert_eq!(welded, mesh);
}
