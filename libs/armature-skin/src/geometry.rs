//! # Segment Placement
//!
//! Length and orientation of a bone segment, used to move a canonical
//! Z-aligned shape onto the segment.

use glam::{DMat4, DQuat, DVec3};

use crate::error::{ConvertError, ConvertResult};

/// Placement of a shape spanning `p1 -> p2`.
///
/// The rotation is Euler XYZ with X fixed at zero: first `polar` about Y,
/// then `azimuth` about Z. Applied to +Z it yields the segment direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentTransform {
    /// Euclidean distance between the endpoints
    pub length: f64,
    /// `atan2(dy, dx)`
    pub azimuth: f64,
    /// `acos(dz / length)`
    pub polar: f64,
    /// Segment midpoint
    pub midpoint: DVec3,
}

impl SegmentTransform {
    /// Rotation taking +Z onto the segment direction.
    pub fn rotation(&self) -> DQuat {
        DQuat::from_rotation_z(self.azimuth) * DQuat::from_rotation_y(self.polar)
    }

    /// Matrix placing a shape centered on the origin along +Z onto the segment.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation(), self.midpoint)
    }

    /// Unit direction from `p1` to `p2`.
    pub fn direction(&self) -> DVec3 {
        self.rotation() * DVec3::Z
    }
}

/// Computes length and orientation of the segment `p1 -> p2`.
///
/// # Errors
///
/// [`ConvertError::DegenerateSegment`] when the points coincide (or the
/// length is not a number); the polar angle would divide by zero.
///
/// # Example
///
/// ```rust
/// use armature_skin::geometry::segment_transform;
/// use glam::DVec3;
///
/// let t = segment_transform(DVec3::ZERO, DVec3::new(0.0, 0.0, 2.0)).unwrap();
/// assert_eq!(t.length, 2.0);
/// assert_eq!(t.polar, 0.0);
/// assert_eq!(t.midpoint, DVec3::new(0.0, 0.0, 1.0));
/// ```
pub fn segment_transform(p1: DVec3, p2: DVec3) -> ConvertResult<SegmentTransform> {
    let delta = p2 - p1;
    let length = delta.length();

    if length.is_nan() || length == 0.0 {
        return Err(ConvertError::DegenerateSegment { point: p1 });
    }

    Ok(SegmentTransform {
        length,
        azimuth: delta.y.atan2(delta.x),
        // Rounding can push the ratio a hair past ±1
        polar: (delta.z / length).clamp(-1.0, 1.0).acos(),
        midpoint: p1 + delta / 2.0,
    })
}
