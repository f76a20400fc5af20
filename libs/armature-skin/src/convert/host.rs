//! # Host Collaborators
//!
//! Narrow interfaces to the application that owns objects, mesh buffers and
//! post-processing stacks. The coordinator only talks to the host through
//! these traits.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

use crate::envelope::EnvelopeMesh;
use crate::error::{ConvertError, ConvertResult};
use crate::skin_graph::SkinGraph;

/// Identity of a derived object. Survives every in-place regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle {
    id: u64,
    name: String,
}

impl MeshHandle {
    /// Creates a handle; only hosts mint these.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Host-assigned object id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Object name as shown by the host.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Key of a mesh buffer held by the mesh storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u64);

/// Geometry produced by a conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedMesh {
    /// Vertex/edge graph with radii, in world space.
    Skin(SkinGraph),
    /// Welded sphere/cone surface, local to its origin.
    Envelope(EnvelopeMesh),
}

impl DerivedMesh {
    /// World point of the mesh's local origin.
    pub fn origin(&self) -> DVec3 {
        match self {
            DerivedMesh::Skin(_) => DVec3::ZERO,
            DerivedMesh::Envelope(envelope) => envelope.origin,
        }
    }

    /// Local vertex positions.
    pub fn vertices(&self) -> &[DVec3] {
        match self {
            DerivedMesh::Skin(graph) => graph.vertices(),
            DerivedMesh::Envelope(envelope) => envelope.mesh.vertices(),
        }
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    /// The skin graph, if this is one.
    pub fn as_skin(&self) -> Option<&SkinGraph> {
        match self {
            DerivedMesh::Skin(graph) => Some(graph),
            DerivedMesh::Envelope(_) => None,
        }
    }

    /// The envelope mesh, if this is one.
    pub fn as_envelope(&self) -> Option<&EnvelopeMesh> {
        match self {
            DerivedMesh::Envelope(envelope) => Some(envelope),
            DerivedMesh::Skin(_) => None,
        }
    }
}

/// A procedural post-processing stage attached to a derived object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stage {
    /// Subdivision surface with the given level.
    Subdivision { levels: u32 },
    /// Inflates a skin graph's edges into tubes.
    SkinInflation,
    /// Angle-limited bevel.
    Bevel { angle_limit: f64, segments: u32 },
}

impl Stage {
    /// Name the host shows in its stage stack.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Subdivision { .. } => "Subdivision",
            Stage::SkinInflation => "Skin",
            Stage::Bevel { .. } => "Bevel",
        }
    }

    /// Checks the stage parameters.
    pub fn validate(&self) -> ConvertResult<()> {
        match *self {
            Stage::Bevel { segments: 0, .. } => {
                Err(ConvertError::invalid_stage("bevel needs at least one segment"))
            }
            Stage::Bevel { angle_limit, .. } if !angle_limit.is_finite() || angle_limit < 0.0 => {
                Err(ConvertError::invalid_stage(format!(
                    "bevel angle must be a non-negative finite angle: {angle_limit}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Allocates and frees mesh buffers.
pub trait MeshStorage {
    /// Takes ownership of new buffers and returns their key.
    fn allocate_mesh(&mut self, mesh: DerivedMesh) -> MeshId;

    /// Returns the buffers behind a key.
    fn mesh(&self, id: MeshId) -> Option<&DerivedMesh>;

    /// Frees superseded buffers.
    fn free_mesh(&mut self, id: MeshId) -> Option<DerivedMesh>;
}

/// Objects, selection and the 3D cursor.
pub trait Scene {
    /// Creates an object bound to `mesh` at `location`. The host may adjust
    /// the name to keep it unique.
    fn create_object(&mut self, name: &str, mesh: MeshId, location: DVec3) -> MeshHandle;

    /// Returns true if the object is still in the scene.
    fn contains_object(&self, handle: &MeshHandle) -> bool;

    /// Mesh bound to an object.
    fn object_mesh(&self, handle: &MeshHandle) -> Option<MeshId>;

    /// Binds another mesh to an object, returning the previous one.
    fn bind_mesh(&mut self, handle: &MeshHandle, mesh: MeshId) -> Option<MeshId>;

    /// Moves an object.
    fn set_object_location(&mut self, handle: &MeshHandle, location: DVec3);

    /// Removes an object from the scene.
    fn unlink_object(&mut self, handle: &MeshHandle);

    /// Currently active object.
    fn active_object(&self) -> Option<MeshHandle>;

    /// Changes the active object.
    fn set_active_object(&mut self, handle: Option<MeshHandle>);

    /// Global 3D cursor.
    fn cursor_location(&self) -> DVec3;

    /// Moves the global 3D cursor.
    fn set_cursor_location(&mut self, location: DVec3);
}

/// Procedural stage stacks on objects.
pub trait StageStack {
    /// Appends a stage to an object's stack.
    fn attach_stage(&mut self, handle: &MeshHandle, stage: Stage);

    /// Stages attached to an object, in evaluation order.
    fn stages(&self, handle: &MeshHandle) -> Vec<Stage>;
}

/// Everything the coordinator needs from the host.
pub trait Host: Scene + MeshStorage + StageStack {}

impl<T: Scene + MeshStorage + StageStack> Host for T {}

/// Moves the 3D cursor for the duration of a scope and puts it back when
/// dropped, on success and on every error path.
pub struct CursorScope<'a, H: Scene> {
    host: &'a mut H,
    saved: DVec3,
}

impl<'a, H: Scene> CursorScope<'a, H> {
    /// Saves the cursor and moves it to `location`.
    pub fn enter(host: &'a mut H, location: DVec3) -> Self {
        let saved = host.cursor_location();
        host.set_cursor_location(location);
        Self { host, saved }
    }
}

impl<H: Scene> Deref for CursorScope<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: Scene> DerefMut for CursorScope<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: Scene> Drop for CursorScope<'_, H> {
    fn drop(&mut self) {
        self.host.set_cursor_location(self.saved);
    }
}
