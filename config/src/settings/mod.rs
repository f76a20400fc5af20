//! Per-skeleton conversion settings.
//!
//! The sculpting panel exposes three user-adjustable values; they are
//! gathered here into one validated struct that the conversion coordinator
//! receives by value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_PRE_SUBDIVISION_LEVELS, DEFAULT_SUBDIVISION_LEVELS, DEFAULT_WELD_DISTANCE,
    MAX_SUBDIVISION_LEVELS,
};

/// How a skin-graph vertex picks its radius when several bone endpoints
/// land on the same coordinate with different radii.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointRadius {
    /// The first bone (in list order) that introduces the coordinate decides.
    #[default]
    FirstWins,
    /// The largest radius among all endpoints at the coordinate is kept.
    Max,
}

/// Settings consumed by a single conversion.
///
/// # Examples
/// ```
/// use config::settings::ConversionConfig;
/// let cfg = ConversionConfig::default();
/// assert_eq!(cfg.subdivision_levels, 2);
/// assert_eq!(cfg.pre_subdivision_levels, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Level of the final subdivision stage.
    pub subdivision_levels: u32,
    /// Level of the subdivision stage placed before skin inflation.
    pub pre_subdivision_levels: u32,
    /// Distance under which vertices are welded (0 disables welding).
    pub weld_distance: f64,
    /// Radius policy for shared skin-graph joints.
    pub joint_radius: JointRadius,
    /// Whether the skin graph is also welded with `weld_distance`.
    pub weld_skin_graph: bool,
}

impl ConversionConfig {
    /// Builds a configuration, rejecting out-of-range values.
    ///
    /// # Examples
    /// ```
    /// use config::settings::ConversionConfig;
    /// let cfg = ConversionConfig::new(3, 1, 0.01).expect("valid config");
    /// assert_eq!(cfg.subdivision_levels, 3);
    /// assert!(ConversionConfig::new(2, 0, -1.0).is_err());
    /// ```
    pub fn new(
        subdivision_levels: u32,
        pre_subdivision_levels: u32,
        weld_distance: f64,
    ) -> Result<Self, ConfigError> {
        let cfg = Self {
            subdivision_levels,
            pre_subdivision_levels,
            weld_distance,
            ..Self::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Sets the joint radius policy.
    pub fn with_joint_radius(mut self, joint_radius: JointRadius) -> Self {
        self.joint_radius = joint_radius;
        self
    }

    /// Enables or disables welding of the skin graph.
    pub fn with_skin_graph_weld(mut self, enabled: bool) -> Self {
        self.weld_skin_graph = enabled;
        self
    }

    /// Checks every field. Deserialized settings must pass through here
    /// before use since serde bypasses [`ConversionConfig::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.weld_distance.is_finite() || self.weld_distance < 0.0 {
            return Err(ConfigError::InvalidWeldDistance(self.weld_distance));
        }
        if self.subdivision_levels > MAX_SUBDIVISION_LEVELS {
            return Err(ConfigError::InvalidLevels {
                name: "subdivision_levels",
                value: self.subdivision_levels,
            });
        }
        if self.pre_subdivision_levels > MAX_SUBDIVISION_LEVELS {
            return Err(ConfigError::InvalidLevels {
                name: "pre_subdivision_levels",
                value: self.pre_subdivision_levels,
            });
        }
        Ok(())
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            subdivision_levels: DEFAULT_SUBDIVISION_LEVELS,
            pre_subdivision_levels: DEFAULT_PRE_SUBDIVISION_LEVELS,
            weld_distance: DEFAULT_WELD_DISTANCE,
            joint_radius: JointRadius::FirstWins,
            weld_skin_graph: true,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Raised when the weld distance is negative or not finite.
    #[error("weld distance must be finite and non-negative: {0}")]
    InvalidWeldDistance(f64),
    /// Raised when a subdivision level exceeds the supported maximum.
    #[error("{name} must be <= {max}: {value}", max = MAX_SUBDIVISION_LEVELS)]
    InvalidLevels { name: &'static str, value: u32 },
}
