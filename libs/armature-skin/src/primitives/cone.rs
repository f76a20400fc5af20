//! # Cone Primitive
//!
//! Tapered cylinder spanning a bone. Equal radii give a cylinder, a zero
//! radius collapses that end to an apex.

use glam::DVec3;

use super::{ring_point, Resolution};
use crate::error::ConvertResult;
use crate::geometry::segment_transform;
use crate::mesh::Mesh;

/// Creates a cone from `p1` (radius `r1`) to `p2` (radius `r2`).
///
/// The canonical shape is built centered on the origin along +Z with the
/// `r1` end at `-length/2`, then placed with [`segment_transform`].
/// Non-zero ends are closed with a single n-gon cap. When both radii are
/// zero the fragment is empty.
///
/// # Errors
///
/// Propagates [`crate::ConvertError::DegenerateSegment`] when `p1 == p2`.
///
/// # Example
///
/// ```rust
/// use armature_skin::primitives::{tessellate_cone, Resolution};
/// use glam::DVec3;
///
/// // Cylinder
/// let mesh = tessellate_cone(DVec3::ZERO, DVec3::Z, 0.5, 0.5, Resolution::new(8, 2)).unwrap();
/// assert_eq!(mesh.vertex_count(), 16);
/// assert_eq!(mesh.face_count(), 8 + 2);
///
/// // True cone
/// let cone = tessellate_cone(DVec3::ZERO, DVec3::Z, 0.5, 0.0, Resolution::new(8, 2)).unwrap();
/// assert_eq!(cone.vertex_count(), 9);
/// ```
pub fn tessellate_cone(
    p1: DVec3,
    p2: DVec3,
    r1: f64,
    r2: f64,
    resolution: Resolution,
) -> ConvertResult<Mesh> {
    let placement = segment_transform(p1, p2)?;

    if r1 <= 0.0 && r2 <= 0.0 {
        return Ok(Mesh::new());
    }

    let segments = Resolution::new(resolution.segments, resolution.rings).segments;
    let half = placement.length / 2.0;
    let mut mesh = Mesh::new();

    let mut end = |radius: f64, z: f64| -> Vec<u32> {
        if radius > 0.0 {
            (0..segments)
                .map(|j| mesh.add_vertex(ring_point(radius, j, segments, z)))
                .collect()
        } else {
            vec![mesh.add_vertex(DVec3::new(0.0, 0.0, z))]
        }
    };

    let bottom = end(r1, -half);
    let top = end(r2, half);

    // Sides
    for j in 0..segments as usize {
        let j_next = (j + 1) % segments as usize;
        match (bottom.len(), top.len()) {
            (1, _) => mesh.add_face(vec![bottom[0], top[j_next], top[j]]),
            (_, 1) => mesh.add_face(vec![bottom[j], bottom[j_next], top[0]]),
            _ => mesh.add_face(vec![bottom[j], bottom[j_next], top[j_next], top[j]]),
        }
    }

    // Caps
    if bottom.len() > 1 {
        mesh.add_face(bottom.iter().rev().copied().collect());
    }
    if top.len() > 1 {
        mesh.add_face(top);
    }

    mesh.transform(&placement.matrix());
    Ok(mesh)
}
