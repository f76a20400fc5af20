//! # Skeleton Input
//!
//! Bones and the skeleton that owns them. Both are plain values; the
//! conversion engine never mutates them.

use config::constants::{DEFAULT_BONE_HEAD_RADIUS, DEFAULT_BONE_LENGTH, DEFAULT_BONE_TAIL_RADIUS};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, ConvertResult};

/// A rigid segment of the skeleton, in the skeleton's local space.
///
/// The parent link only documents hierarchy; conversion treats bones as an
/// unordered set of segments and joints emerge from coincident endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub head: DVec3,
    pub tail: DVec3,
    pub head_radius: f64,
    pub tail_radius: f64,
    #[serde(default)]
    pub parent: Option<usize>,
}

impl Bone {
    /// Creates a bone with the default envelope radii.
    pub fn new(name: impl Into<String>, head: DVec3, tail: DVec3) -> Self {
        Self {
            name: name.into(),
            head,
            tail,
            head_radius: DEFAULT_BONE_HEAD_RADIUS,
            tail_radius: DEFAULT_BONE_TAIL_RADIUS,
            parent: None,
        }
    }

    /// Sets both endpoint radii.
    pub fn with_radii(mut self, head_radius: f64, tail_radius: f64) -> Self {
        self.head_radius = head_radius;
        self.tail_radius = tail_radius;
        self
    }

    /// Sets the parent bone index.
    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Distance between head and tail.
    pub fn length(&self) -> f64 {
        self.head.distance(self.tail)
    }
}

/// A bone endpoint in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    pub position: DVec3,
    pub radius: f64,
}

/// All bones of one armature plus the armature's world location.
///
/// # Example
///
/// ```rust
/// use armature_skin::{Bone, Skeleton};
/// use glam::DVec3;
///
/// let skeleton = Skeleton::new("Armature", DVec3::new(1.0, 0.0, 0.0))
///     .with_bone(Bone::new("root", DVec3::ZERO, DVec3::Z));
/// let (head, tail) = skeleton.world_endpoints(&skeleton.bones[0]);
/// assert_eq!(head.position, DVec3::new(1.0, 0.0, 0.0));
/// assert_eq!(tail.position, DVec3::new(1.0, 0.0, 1.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub name: String,
    #[serde(default)]
    pub location: DVec3,
    #[serde(default)]
    pub bones: Vec<Bone>,
}

impl Skeleton {
    /// Creates an empty skeleton at the given location.
    pub fn new(name: impl Into<String>, location: DVec3) -> Self {
        Self {
            name: name.into(),
            location,
            bones: Vec::new(),
        }
    }

    /// The armature a sculptor starts from: one bone along +Z.
    pub fn single_bone(name: impl Into<String>, location: DVec3) -> Self {
        Self::new(name, location).with_bone(Bone::new(
            "Bone",
            DVec3::ZERO,
            DVec3::new(0.0, 0.0, DEFAULT_BONE_LENGTH),
        ))
    }

    /// Appends a bone.
    pub fn with_bone(mut self, bone: Bone) -> Self {
        self.bones.push(bone);
        self
    }

    /// Appends a bone and returns its index.
    pub fn add_bone(&mut self, bone: Bone) -> usize {
        self.bones.push(bone);
        self.bones.len() - 1
    }

    /// Returns the number of bones.
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Head and tail of a bone with the skeleton location applied.
    pub fn world_endpoints(&self, bone: &Bone) -> (Endpoint, Endpoint) {
        (
            Endpoint {
                position: bone.head + self.location,
                radius: bone.head_radius,
            },
            Endpoint {
                position: bone.tail + self.location,
                radius: bone.tail_radius,
            },
        )
    }

    /// Checks every bone before any geometry is built, so a bad bone aborts
    /// the whole conversion instead of leaving a partial mesh.
    ///
    /// Rejects non-finite coordinates, negative or NaN radii and bones whose
    /// world-space head equals their tail.
    pub fn validate(&self) -> ConvertResult<()> {
        for (index, bone) in self.bones.iter().enumerate() {
            let (head, tail) = self.world_endpoints(bone);

            if !head.position.is_finite() || !tail.position.is_finite() {
                return Err(ConvertError::NonFiniteCoordinate {
                    index,
                    name: bone.name.clone(),
                });
            }

            for radius in [bone.head_radius, bone.tail_radius] {
                if !radius.is_finite() || radius < 0.0 {
                    return Err(ConvertError::NegativeRadius {
                        index,
                        name: bone.name.clone(),
                        radius,
                    });
                }
            }

            // Also catches distinct points whose distance underflows to zero
            if head.position.distance(tail.position) == 0.0 {
                return Err(ConvertError::degenerate_bone(
                    index,
                    bone.name.clone(),
                    head.position,
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bone_defaults() {
        let skeleton = Skeleton::single_bone("Armature", DVec3::ZERO);
        assert_eq!(skeleton.bone_count(), 1);
        let bone = &skeleton.bones[0];
        assert_eq!(bone.head, DVec3::ZERO);
        assert_eq!(bone.tail, DVec3::Z);
        assert_eq!(bone.head_radius, 0.1);
        assert_eq!(bone.tail_radius, 0.05);
        assert_eq!(bone.length(), 1.0);
    }

    #[test]
    fn test_world_endpoints_apply_location() {
        let skeleton = Skeleton::new("Armature", DVec3::new(0.0, 2.0, 0.0))
            .with_bone(Bone::new("b", DVec3::ZERO, DVec3::X).with_radii(0.3, 0.2));
        let (head, tail) = skeleton.world_endpoints(&skeleton.bones[0]);
        assert_eq!(head.position, DVec3::new(0.0, 2.0, 0.0));
        assert_eq!(head.radius, 0.3);
        assert_eq!(tail.position, DVec3::new(1.0, 2.0, 0.0));
        assert_eq!(tail.radius, 0.2);
    }

    #[test]
    fn test_validate_rejects_zero_length() {
        let skeleton = Skeleton::new("Armature", DVec3::ZERO)
            .with_bone(Bone::new("ok", DVec3::ZERO, DVec3::Z))
            .with_bone(Bone::new("flat", DVec3::X, DVec3::X));
        match skeleton.validate() {
            Err(ConvertError::DegenerateBone { index, name, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(name, "flat");
            }
            other => panic!("expected degenerate bone, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_underflowing_length() {
        let skeleton = Skeleton::new("Armature", DVec3::ZERO)
            .with_bone(Bone::new("speck", DVec3::ZERO, DVec3::new(1e-200, 0.0, 0.0)));
        assert!(matches!(
            skeleton.validate(),
            Err(ConvertError::DegenerateBone { index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_negative_radius() {
        let skeleton = Skeleton::new("Armature", DVec3::ZERO)
            .with_bone(Bone::new("b", DVec3::ZERO, DVec3::Z).with_radii(-0.1, 0.1));
        assert!(matches!(
            skeleton.validate(),
            Err(ConvertError::NegativeRadius { index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let skeleton = Skeleton::new("Armature", DVec3::ZERO)
            .with_bone(Bone::new("b", DVec3::new(f64::NAN, 0.0, 0.0), DVec3::Z));
        assert!(matches!(
            skeleton.validate(),
            Err(ConvertError::NonFiniteCoordinate { index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_accepts_zero_radius() {
        let skeleton = Skeleton::new("Armature", DVec3::ZERO)
            .with_bone(Bone::new("b", DVec3::ZERO, DVec3::Z).with_radii(0.0, 0.2));
        assert!(skeleton.validate().is_ok());
    }

    #[test]
    fn test_skeleton_deserializes_without_location() {
        let json = r#"{
            "name": "Armature",
            "bones": [
                { "name": "b", "head": [0.0, 0.0, 0.0], "tail": [0.0, 0.0, 2.0],
                  "head_radius": 0.1, "tail_radius": 0.05 }
            ]
        }"#;
        let skeleton: Skeleton = serde_json::from_str(json).unwrap();
        assert_eq!(skeleton.location, DVec3::ZERO);
        assert_eq!(skeleton.bones[0].tail, DVec3::new(0.0, 0.0, 2.0));
        assert_eq!(skeleton.bones[0].parent, None);
    }
}
