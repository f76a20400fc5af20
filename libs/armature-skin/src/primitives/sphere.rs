//! # Sphere Primitive
//!
//! UV sphere with pole vertices, the shape the host produces for its own
//! sphere primitive.

use glam::DVec3;
use std::f64::consts::PI;

use super::{ring_point, Resolution};
use crate::mesh::Mesh;

/// Creates a UV sphere centered on `center`.
///
/// A zero radius produces an empty fragment: a point contributes no surface.
///
/// # Layout
///
/// - vertex 0: north pole, last vertex: south pole
/// - `rings - 1` loops of `segments` vertices in between
/// - triangle fans at the poles, quads between loops
///
/// # Example
///
/// ```rust
/// use armature_skin::primitives::{tessellate_sphere, Resolution};
/// use glam::DVec3;
///
/// let mesh = tessellate_sphere(DVec3::ZERO, 1.0, Resolution::new(8, 4));
/// assert_eq!(mesh.vertex_count(), 2 + 8 * 3);
/// assert_eq!(mesh.face_count(), 8 * 4);
/// ```
pub fn tessellate_sphere(center: DVec3, radius: f64, resolution: Resolution) -> Mesh {
    if radius <= 0.0 {
        return Mesh::new();
    }

    let Resolution { segments, rings } = Resolution::new(resolution.segments, resolution.rings);
    let loop_count = rings - 1;
    let mut mesh = Mesh::with_capacity(
        (2 + segments * loop_count) as usize,
        (segments * rings) as usize,
    );

    let north = mesh.add_vertex(DVec3::new(0.0, 0.0, radius));

    // Vertex loops from north to south
    let loops: Vec<Vec<u32>> = (1..rings)
        .map(|i| {
            let phi = PI * i as f64 / rings as f64;
            let ring_radius = radius * phi.sin();
            let z = radius * phi.cos();
            (0..segments)
                .map(|j| mesh.add_vertex(ring_point(ring_radius, j, segments, z)))
                .collect()
        })
        .collect();

    let south = mesh.add_vertex(DVec3::new(0.0, 0.0, -radius));

    // North cap
    let first = &loops[0];
    for j in 0..segments as usize {
        let j_next = (j + 1) % segments as usize;
        mesh.add_face(vec![north, first[j], first[j_next]]);
    }

    // Bands between adjacent loops
    for pair in loops.windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        for j in 0..segments as usize {
            let j_next = (j + 1) % segments as usize;
            mesh.add_face(vec![upper[j], lower[j], lower[j_next], upper[j_next]]);
        }
    }

    // South cap, reversed
    let last = &loops[loops.len() - 1];
    for j in 0..segments as usize {
        let j_next = (j + 1) % segments as usize;
        mesh.add_face(vec![south, last[j_next], last[j]]);
    }

    mesh.translate(center);
    mesh
}
