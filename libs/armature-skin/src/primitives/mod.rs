//! # Primitives
//!
//! Tessellated fragments placed at bone endpoints (spheres) and along bone
//! segments (cones). Fragments are returned by value and composed by the
//! envelope builder.

pub mod cone;
pub mod sphere;

pub use cone::tessellate_cone;
pub use sphere::tessellate_sphere;

use config::constants::{CONE_SEGMENTS, MIN_RINGS, MIN_SEGMENTS, SPHERE_RINGS, SPHERE_SEGMENTS};

/// Angular resolution of a tessellated primitive.
///
/// # Example
///
/// ```rust
/// use armature_skin::primitives::Resolution;
///
/// let res = Resolution::new(2, 1);
/// assert_eq!(res.segments, 3);
/// assert_eq!(res.rings, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Segments around the circumference
    pub segments: u32,
    /// Latitude rings (spheres only)
    pub rings: u32,
}

impl Resolution {
    /// Creates a resolution, clamping to the smallest closed shape.
    pub fn new(segments: u32, rings: u32) -> Self {
        Self {
            segments: segments.max(MIN_SEGMENTS),
            rings: rings.max(MIN_RINGS),
        }
    }

    /// Fixed resolution of endpoint spheres.
    pub const fn sphere() -> Self {
        Self {
            segments: SPHERE_SEGMENTS,
            rings: SPHERE_RINGS,
        }
    }

    /// Fixed resolution of bone cones.
    pub const fn cone() -> Self {
        Self {
            segments: CONE_SEGMENTS,
            rings: MIN_RINGS,
        }
    }
}

/// Point on a circle of `radius` in the XY plane at height `z`.
#[inline]
fn ring_point(radius: f64, segment: u32, segments: u32, z: f64) -> glam::DVec3 {
    let theta = std::f64::consts::TAU * segment as f64 / segments as f64;
    glam::DVec3::new(radius * theta.cos(), radius * theta.sin(), z)
}
