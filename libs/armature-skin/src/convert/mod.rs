//! # Incremental Update Coordinator
//!
//! Decides whether a conversion creates a new derived object or regenerates
//! an existing one in place, and drives the host collaborators accordingly.
//!
//! ## States
//!
//! ```text
//! Unconverted --convert(existing = None)--> Converted { handle, mode }
//! Converted   --convert(existing = Some)--> Converted (same handle, new buffers)
//! ```
//!
//! Geometry is built before the host is touched, so a failing conversion
//! leaves objects, buffers and selection exactly as they were.

pub mod host;
pub mod memory;

pub use host::{
    CursorScope, DerivedMesh, Host, MeshHandle, MeshId, MeshStorage, Scene, Stage, StageStack,
};
pub use memory::MemoryHost;

use config::constants::{bevel_angle_limit, BEVEL_SEGMENTS};
use config::ConversionConfig;
use serde::{Deserialize, Serialize};

use crate::envelope::build_envelope;
use crate::error::{ConvertError, ConvertResult};
use crate::skeleton::Skeleton;
use crate::skin_graph::build_skin_graph_with;

/// Which representation a conversion produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionMode {
    /// Vertex/edge/radius graph inflated by a skin stage.
    Skin,
    /// Explicit sphere and cone surface.
    Envelope,
}

impl ConversionMode {
    /// Suffix used when naming a new derived object.
    pub fn label(self) -> &'static str {
        match self {
            ConversionMode::Skin => "Skin",
            ConversionMode::Envelope => "Envelope",
        }
    }

    /// Stages attached to a freshly created object.
    ///
    /// - skin: subdivision (pre level), skin inflation, subdivision (final level)
    /// - envelope: bevel (70°, 2 segments), subdivision (final level)
    pub fn default_stages(self, config: &ConversionConfig) -> Vec<Stage> {
        match self {
            ConversionMode::Skin => vec![
                Stage::Subdivision {
                    levels: config.pre_subdivision_levels,
                },
                Stage::SkinInflation,
                Stage::Subdivision {
                    levels: config.subdivision_levels,
                },
            ],
            ConversionMode::Envelope => vec![
                Stage::Bevel {
                    angle_limit: bevel_angle_limit(),
                    segments: BEVEL_SEGMENTS,
                },
                Stage::Subdivision {
                    levels: config.subdivision_levels,
                },
            ],
        }
    }
}

/// Builds the geometry for `mode` without touching any host state.
pub fn build_derived(
    skeleton: &Skeleton,
    mode: ConversionMode,
    config: &ConversionConfig,
) -> ConvertResult<DerivedMesh> {
    match mode {
        ConversionMode::Skin => {
            let graph = build_skin_graph_with(skeleton, config.joint_radius)?;
            let graph = if config.weld_skin_graph {
                graph.weld(config.weld_distance, config.joint_radius)?
            } else {
                graph
            };
            Ok(DerivedMesh::Skin(graph))
        }
        ConversionMode::Envelope => Ok(DerivedMesh::Envelope(build_envelope(
            skeleton,
            config.weld_distance,
        )?)),
    }
}

/// Converts a skeleton into a derived object.
///
/// Without `existing`, a new object is created, given the mode's default
/// stages and made active. With `existing`, the object's buffers are
/// replaced and the old ones freed; its handle, stages and the active
/// selection are left alone. The 3D cursor is restored on every exit path.
///
/// # Errors
///
/// - [`ConvertError::Config`] for invalid settings
/// - [`ConvertError::MissingTarget`] when `existing` left the scene
/// - any builder error (degenerate bone, invalid tolerance, ...)
///
/// # Example
///
/// ```rust
/// use armature_skin::convert::{convert, ConversionMode, MemoryHost};
/// use armature_skin::Skeleton;
/// use config::ConversionConfig;
/// use glam::DVec3;
///
/// let mut host = MemoryHost::new();
/// let mut skeleton = Skeleton::single_bone("Armature", DVec3::ZERO);
/// let config = ConversionConfig::default();
///
/// let handle = convert(&mut host, &skeleton, ConversionMode::Skin, None, &config).unwrap();
/// skeleton.bones[0].tail = DVec3::new(0.0, 0.0, 3.0);
/// let again = convert(&mut host, &skeleton, ConversionMode::Skin, Some(&handle), &config).unwrap();
/// assert_eq!(handle, again);
/// ```
pub fn convert<H: Host>(
    host: &mut H,
    skeleton: &Skeleton,
    mode: ConversionMode,
    existing: Option<&MeshHandle>,
    config: &ConversionConfig,
) -> ConvertResult<MeshHandle> {
    config.validate()?;

    if let Some(target) = existing {
        if !host.contains_object(target) {
            return Err(ConvertError::missing_target(target.name()));
        }
    }

    let stages = match existing {
        Some(_) => Vec::new(),
        None => mode.default_stages(config),
    };
    for stage in &stages {
        stage.validate()?;
    }

    let derived = build_derived(skeleton, mode, config)?;

    let mut scope = CursorScope::enter(host, skeleton.location);
    let handle = match existing {
        None => create(&mut *scope, skeleton, mode, derived, stages),
        Some(target) => regenerate(&mut *scope, target, mode, derived),
    };
    Ok(handle)
}

fn create<H: Host>(
    host: &mut H,
    skeleton: &Skeleton,
    mode: ConversionMode,
    derived: DerivedMesh,
    stages: Vec<Stage>,
) -> MeshHandle {
    let origin = derived.origin();
    let vertex_count = derived.vertex_count();
    let mesh = host.allocate_mesh(derived);
    let name = format!("{}_{}", skeleton.name, mode.label());
    let handle = host.create_object(&name, mesh, origin);

    for stage in stages {
        host.attach_stage(&handle, stage);
    }
    host.set_active_object(Some(handle.clone()));

    log::info!(
        "created {} object '{}' from '{}' ({} vertices)",
        mode.label(),
        handle.name(),
        skeleton.name,
        vertex_count
    );
    handle
}

fn regenerate<H: Host>(
    host: &mut H,
    target: &MeshHandle,
    mode: ConversionMode,
    derived: DerivedMesh,
) -> MeshHandle {
    let active = host.active_object();
    let origin = derived.origin();
    let vertex_count = derived.vertex_count();

    let mesh = host.allocate_mesh(derived);
    if let Some(previous) = host.bind_mesh(target, mesh) {
        host.free_mesh(previous);
    }
    host.set_object_location(target, origin);
    host.set_active_object(active);

    log::info!(
        "regenerated '{}' as {} ({} vertices)",
        target.name(),
        mode.label(),
        vertex_count
    );
    target.clone()
}

/// Association between a skeleton and its derived object, persisted by the
/// caller next to the skeleton.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConversionState {
    /// No derived object yet.
    #[default]
    Unconverted,
    /// A derived object exists.
    Converted {
        handle: MeshHandle,
        mode: ConversionMode,
    },
}

impl ConversionState {
    /// Handle of the derived object, if any.
    pub fn handle(&self) -> Option<&MeshHandle> {
        match self {
            ConversionState::Unconverted => None,
            ConversionState::Converted { handle, .. } => Some(handle),
        }
    }

    /// Mode of the last successful conversion, if any.
    pub fn mode(&self) -> Option<ConversionMode> {
        match self {
            ConversionState::Unconverted => None,
            ConversionState::Converted { mode, .. } => Some(*mode),
        }
    }

    /// Creates the derived object, or regenerates it in place when one is
    /// already associated. On error the state is unchanged.
    ///
    /// Switching mode on a converted skeleton only swaps the builder; the
    /// stages attached by the first conversion stay as they are.
    pub fn convert<H: Host>(
        &mut self,
        host: &mut H,
        skeleton: &Skeleton,
        mode: ConversionMode,
        config: &ConversionConfig,
    ) -> ConvertResult<MeshHandle> {
        if let Some(previous) = self.mode() {
            if previous != mode {
                log::warn!(
                    "'{}' switches from {} to {}; stages of the first conversion are kept",
                    skeleton.name,
                    previous.label(),
                    mode.label()
                );
            }
        }

        let handle = convert(host, skeleton, mode, self.handle(), config)?;
        *self = ConversionState::Converted {
            handle: handle.clone(),
            mode,
        };
        Ok(handle)
    }

    /// Always creates a new derived object and associates it, leaving any
    /// previous object in the scene untouched.
    pub fn convert_new<H: Host>(
        &mut self,
        host: &mut H,
        skeleton: &Skeleton,
        mode: ConversionMode,
        config: &ConversionConfig,
    ) -> ConvertResult<MeshHandle> {
        let handle = convert(host, skeleton, mode, None, config)?;
        *self = ConversionState::Converted {
            handle: handle.clone(),
            mode,
        };
        Ok(handle)
    }

    /// Drops the association when its object is gone from the scene.
    /// Returns true if the state changed.
    pub fn prune<S: Scene>(&mut self, scene: &S) -> bool {
        match self.handle() {
            Some(handle) if !scene.contains_object(handle) => {
                *self = ConversionState::Unconverted;
                true
            }
            _ => false,
        }
    }
}
