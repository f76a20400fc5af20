//! # Envelope Mesh Builder
//!
//! Explicit union of spheres (at bone endpoints) and cones (along bones),
//! welded into one mesh whose origin sits on the skeleton location.

use glam::DVec3;

use crate::dedup::{weld_mesh, EndpointKey, ExactIndex};
use crate::error::ConvertResult;
use crate::mesh::Mesh;
use crate::primitives::{tessellate_cone, tessellate_sphere, Resolution};
use crate::skeleton::Skeleton;

/// Envelope mesh in local coordinates plus the world point its origin
/// stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeMesh {
    pub mesh: Mesh,
    pub origin: DVec3,
}

impl EnvelopeMesh {
    /// Vertex positions moved back into world space.
    pub fn world_vertices(&self) -> Vec<DVec3> {
        self.mesh.vertices().iter().map(|&v| v + self.origin).collect()
    }
}

/// Builds the envelope mesh with the fixed primitive resolutions.
///
/// # Steps
///
/// 1. Validate every bone; a zero-length bone aborts with
///    [`crate::ConvertError::DegenerateBone`] before any placement math.
/// 2. For each bone: a sphere at the tail and one at the head unless an
///    endpoint with the same coordinate and radius already has one, then a
///    cone from tail (tail radius) to head (head radius).
/// 3. Concatenate all fragments.
/// 4. Weld with `weld_tolerance` (0 disables welding).
/// 5. Rebase positions on the skeleton location.
///
/// # Example
///
/// ```rust
/// use armature_skin::{build_envelope, Skeleton};
/// use glam::DVec3;
///
/// let skeleton = Skeleton::single_bone("Armature", DVec3::new(0.0, 0.0, 5.0));
/// let envelope = build_envelope(&skeleton, 0.001).unwrap();
/// assert_eq!(envelope.origin, DVec3::new(0.0, 0.0, 5.0));
/// assert!(envelope.mesh.vertex_count() > 0);
/// ```
pub fn build_envelope(skeleton: &Skeleton, weld_tolerance: f64) -> ConvertResult<EnvelopeMesh> {
    build_envelope_with(skeleton, weld_tolerance, Resolution::sphere(), Resolution::cone())
}

/// Builds the envelope mesh with explicit primitive resolutions.
pub fn build_envelope_with(
    skeleton: &Skeleton,
    weld_tolerance: f64,
    sphere: Resolution,
    cone: Resolution,
) -> ConvertResult<EnvelopeMesh> {
    skeleton.validate()?;

    let mut spheres = ExactIndex::with_capacity(skeleton.bone_count() * 2);
    let mut fragments: Vec<Mesh> = Vec::with_capacity(skeleton.bone_count() * 3);

    for bone in &skeleton.bones {
        let (head, tail) = skeleton.world_endpoints(bone);

        for endpoint in [tail, head] {
            let key = EndpointKey::new(endpoint.position, endpoint.radius);
            if spheres.lookup_or_insert(key).1 {
                fragments.push(tessellate_sphere(endpoint.position, endpoint.radius, sphere));
            }
        }

        fragments.push(tessellate_cone(
            tail.position,
            head.position,
            tail.radius,
            head.radius,
            cone,
        )?);
    }

    let (vertex_total, face_total) = fragments.iter().fold((0, 0), |(v, f), m| {
        (v + m.vertex_count(), f + m.face_count())
    });
    let mut union = Mesh::with_capacity(vertex_total, face_total);
    for fragment in &fragments {
        union.merge(fragment);
    }

    let mut mesh = weld_mesh(union, weld_tolerance)?;
    mesh.translate(-skeleton.location);

    log::debug!(
        "envelope for '{}': {} spheres, {} cones, {} -> {} vertices, {} faces",
        skeleton.name,
        spheres.len(),
        skeleton.bone_count(),
        vertex_total,
        mesh.vertex_count(),
        mesh.face_count()
    );

    Ok(EnvelopeMesh {
        mesh,
        origin: skeleton.location,
    })
}
