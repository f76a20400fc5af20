//! In-memory host: objects, buffers and stage stacks kept in plain maps.
//! Useful headless and in tests.

use glam::DVec3;
use std::collections::{BTreeMap, HashMap};

use super::host::{DerivedMesh, MeshHandle, MeshId, MeshStorage, Scene, Stage, StageStack};

/// An object in a [`MemoryHost`] scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub handle: MeshHandle,
    pub mesh: MeshId,
    pub location: DVec3,
    pub stages: Vec<Stage>,
}

/// Scene, mesh storage and stage stacks in memory.
///
/// Object names are kept unique the way the sculpting host does it: a
/// taken name gets a `.001`, `.002`, ... suffix.
#[derive(Debug, Default)]
pub struct MemoryHost {
    next_id: u64,
    meshes: HashMap<MeshId, DerivedMesh>,
    objects: BTreeMap<u64, SceneObject>,
    active: Option<MeshHandle>,
    cursor: DVec3,
}

impl MemoryHost {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an object by handle.
    pub fn object(&self, handle: &MeshHandle) -> Option<&SceneObject> {
        self.objects
            .get(&handle.id())
            .filter(|object| object.handle == *handle)
    }

    /// Looks up an object by name.
    pub fn object_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.values().find(|o| o.handle.name() == name)
    }

    /// Buffers bound to an object.
    pub fn object_data(&self, handle: &MeshHandle) -> Option<&DerivedMesh> {
        self.object(handle).and_then(|o| self.meshes.get(&o.mesh))
    }

    /// Number of objects in the scene.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of live mesh buffers.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn unique_name(&self, name: &str) -> String {
        if self.object_by_name(name).is_none() {
            return name.to_string();
        }
        (1u32..)
            .map(|n| format!("{name}.{n:03}"))
            .find(|candidate| self.object_by_name(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }
}

impl MeshStorage for MemoryHost {
    fn allocate_mesh(&mut self, mesh: DerivedMesh) -> MeshId {
        let id = MeshId(self.next_id());
        self.meshes.insert(id, mesh);
        id
    }

    fn mesh(&self, id: MeshId) -> Option<&DerivedMesh> {
        self.meshes.get(&id)
    }

    fn free_mesh(&mut self, id: MeshId) -> Option<DerivedMesh> {
        self.meshes.remove(&id)
    }
}

impl Scene for MemoryHost {
    fn create_object(&mut self, name: &str, mesh: MeshId, location: DVec3) -> MeshHandle {
        let handle = MeshHandle::new(self.next_id(), self.unique_name(name));
        self.objects.insert(
            handle.id(),
            SceneObject {
                handle: handle.clone(),
                mesh,
                location,
                stages: Vec::new(),
            },
        );
        handle
    }

    fn contains_object(&self, handle: &MeshHandle) -> bool {
        self.object(handle).is_some()
    }

    fn object_mesh(&self, handle: &MeshHandle) -> Option<MeshId> {
        self.object(handle).map(|o| o.mesh)
    }

    fn bind_mesh(&mut self, handle: &MeshHandle, mesh: MeshId) -> Option<MeshId> {
        let object = self.objects.get_mut(&handle.id())?;
        Some(std::mem::replace(&mut object.mesh, mesh))
    }

    fn set_object_location(&mut self, handle: &MeshHandle, location: DVec3) {
        if let Some(object) = self.objects.get_mut(&handle.id()) {
            object.location = location;
        }
    }

    fn unlink_object(&mut self, handle: &MeshHandle) {
        if let Some(object) = self.objects.remove(&handle.id()) {
            self.meshes.remove(&object.mesh);
        }
        if self.active.as_ref() == Some(handle) {
            self.active = None;
        }
    }

    fn active_object(&self) -> Option<MeshHandle> {
        self.active.clone()
    }

    fn set_active_object(&mut self, handle: Option<MeshHandle>) {
        self.active = handle;
    }

    fn cursor_location(&self) -> DVec3 {
        self.cursor
    }

    fn set_cursor_location(&mut self, location: DVec3) {
        self.cursor = location;
    }
}

impl StageStack for MemoryHost {
    fn attach_stage(&mut self, handle: &MeshHandle, stage: Stage) {
        if let Some(object) = self.objects.get_mut(&handle.id()) {
            object.stages.push(stage);
        }
    }

    fn stages(&self, handle: &MeshHandle) -> Vec<Stage> {
        self.object(handle)
            .map(|o| o.stages.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skin_graph::SkinGraph;

    fn empty_skin() -> DerivedMesh {
        DerivedMesh::Skin(SkinGraph::new())
    }

    #[test]
    fn test_unique_names() {
        let mut host = MemoryHost::new();
        let a = host.allocate_mesh(empty_skin());
        let b = host.allocate_mesh(empty_skin());
        let c = host.allocate_mesh(empty_skin());
        let first = host.create_object("Skin", a, DVec3::ZERO);
        let second = host.create_object("Skin", b, DVec3::ZERO);
        let third = host.create_object("Skin", c, DVec3::ZERO);
        assert_eq!(first.name(), "Skin");
        assert_eq!(second.name(), "Skin.001");
        assert_eq!(third.name(), "Skin.002");
    }

    #[test]
    fn test_bind_returns_previous_mesh() {
        let mut host = MemoryHost::new();
        let a = host.allocate_mesh(empty_skin());
        let b = host.allocate_mesh(empty_skin());
        let handle = host.create_object("Skin", a, DVec3::ZERO);
        assert_eq!(host.bind_mesh(&handle, b), Some(a));
        assert_eq!(host.object_mesh(&handle), Some(b));
    }

    #[test]
    fn test_unlink_frees_buffers_and_selection() {
        let mut host = MemoryHost::new();
        let a = host.allocate_mesh(empty_skin());
        let handle = host.create_object("Skin", a, DVec3::ZERO);
        host.set_active_object(Some(handle.clone()));
        host.unlink_object(&handle);
        assert!(!host.contains_object(&handle));
        assert_eq!(host.mesh_count(), 0);
        assert_eq!(host.active_object(), None);
    }

    #[test]
    fn test_stale_handle_not_found() {
        let mut host = MemoryHost::new();
        let a = host.allocate_mesh(empty_skin());
        let handle = host.create_object("Skin", a, DVec3::ZERO);
        let stale = MeshHandle::new(handle.id(), "Other");
        assert!(!host.contains_object(&stale));
    }
}
