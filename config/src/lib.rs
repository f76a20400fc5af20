//! # Config Crate
//!
//! Centralized configuration for armature-to-mesh conversion.
//! All magic numbers and tunable parameters are defined here so the
//! conversion engine never scatters literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_WELD_DISTANCE, SPHERE_SEGMENTS};
//! use config::settings::ConversionConfig;
//!
//! let cfg = ConversionConfig::default();
//! assert_eq!(cfg.weld_distance, DEFAULT_WELD_DISTANCE);
//! assert!(SPHERE_SEGMENTS >= 3);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Validated Settings**: Per-skeleton settings are checked on construction
//! - **Host Compatible**: Defaults match the sculpting host's primitives

pub mod constants;
pub mod settings;

pub use settings::{ConfigError, ConversionConfig, JointRadius};
