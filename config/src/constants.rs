//! # Configuration Constants
//!
//! Centralized constants for skeleton conversion. Tessellation resolution,
//! post-processing defaults and precision values are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Resolution**: Fixed tessellation parameters for spheres and cones
//! - **Post-processing**: Default stage parameters (subdivision, bevel)
//! - **Armature**: Default bone dimensions for a freshly added envelope

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Default distance under which envelope vertices are welded together.
///
/// Matches the "clean limit" of the sculpting tools panel. A value of zero
/// disables welding entirely.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_WELD_DISTANCE;
///
/// assert!(DEFAULT_WELD_DISTANCE > 0.0);
/// ```
pub const DEFAULT_WELD_DISTANCE: f64 = 0.001;

// =============================================================================
// RESOLUTION CONSTANTS
// =============================================================================

/// Number of longitudinal segments of an endpoint sphere.
///
/// Matches the host's default UV sphere.
pub const SPHERE_SEGMENTS: u32 = 32;

/// Number of latitudinal rings of an endpoint sphere.
///
/// A UV sphere with `SPHERE_RINGS` rings has `SPHERE_RINGS - 1` vertex
/// loops plus two pole vertices.
pub const SPHERE_RINGS: u32 = 16;

/// Number of vertices around each end of a bone cone.
///
/// Equal to [`SPHERE_SEGMENTS`] so cone rims line up with sphere equators
/// when a bone is axis aligned.
pub const CONE_SEGMENTS: u32 = 32;

/// Minimum segment count for any circular cross-section.
///
/// # Example
///
/// ```rust
/// use config::constants::{MIN_SEGMENTS, CONE_SEGMENTS};
///
/// let segments = 2u32.max(MIN_SEGMENTS);
/// assert_eq!(segments, 3);
/// assert!(CONE_SEGMENTS >= MIN_SEGMENTS);
/// ```
pub const MIN_SEGMENTS: u32 = 3;

/// Minimum ring count for a sphere (one vertex loop between the poles).
pub const MIN_RINGS: u32 = 2;

// =============================================================================
// POST-PROCESSING CONSTANTS
// =============================================================================

/// Default level of the final subdivision stage.
pub const DEFAULT_SUBDIVISION_LEVELS: u32 = 2;

/// Default level of the subdivision stage run before skin inflation.
pub const DEFAULT_PRE_SUBDIVISION_LEVELS: u32 = 0;

/// Upper bound accepted for any subdivision level.
///
/// Each level roughly quadruples the face count; beyond this the host
/// refuses to evaluate the stage.
pub const MAX_SUBDIVISION_LEVELS: u32 = 11;

/// Angle threshold of the envelope bevel stage, in degrees.
///
/// # Example
///
/// ```rust
/// use config::constants::{bevel_angle_limit, BEVEL_ANGLE_LIMIT_DEGREES};
///
/// assert!((bevel_angle_limit() - BEVEL_ANGLE_LIMIT_DEGREES.to_radians()).abs() < 1e-12);
/// ```
pub const BEVEL_ANGLE_LIMIT_DEGREES: f64 = 70.0;

/// Segment count of the envelope bevel stage.
pub const BEVEL_SEGMENTS: u32 = 2;

// =============================================================================
// ARMATURE CONSTANTS
// =============================================================================

/// Head radius of a freshly added bone.
pub const DEFAULT_BONE_HEAD_RADIUS: f64 = 0.1;

/// Tail radius of a freshly added bone.
pub const DEFAULT_BONE_TAIL_RADIUS: f64 = 0.05;

/// Length of a freshly added bone along +Z.
pub const DEFAULT_BONE_LENGTH: f64 = 1.0;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Returns the bevel angle threshold in radians.
#[inline]
pub fn bevel_angle_limit() -> f64 {
    BEVEL_ANGLE_LIMIT_DEGREES.to_radians()
}
