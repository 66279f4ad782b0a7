//! Host scene-graph seam. The terrain core builds and positions nodes through
//! this trait; what a node actually is belongs to the host engine.
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use verdant_geom::Vec3;
use verdant_mesh_cpu::MeshBuild;

/// Opaque handle to a host-side scene node a terrain node can parent under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneHandle(pub u64);

/// Host scene node. Implementations must tolerate calls from worker threads;
/// attach/detach (`set_parent`) only ever happens on the coordinator thread.
pub trait SceneNode: Send + Sync {
    /// Independent copy of this node (template instantiation).
    fn clone_node(&self) -> Box<dyn SceneNode>;
    fn set_active(&mut self, active: bool);
    fn set_parent(&mut self, parent: Option<SceneHandle>);
    fn set_translate(&mut self, translate: Vec3);
    fn set_name(&mut self, name: &str);
    /// Hands the accumulated geometry to the host for upload.
    fn bind_mesh(&mut self, mesh: &MeshBuild);
}

/// No-op node for headless hosts and tests.
#[derive(Default, Clone)]
pub struct NullNode;

impl SceneNode for NullNode {
    fn clone_node(&self) -> Box<dyn SceneNode> {
        Box::new(NullNode)
    }
    fn set_active(&mut self, _active: bool) {}
    fn set_parent(&mut self, _parent: Option<SceneHandle>) {}
    fn set_translate(&mut self, _translate: Vec3) {}
    fn set_name(&mut self, _name: &str) {}
    fn bind_mesh(&mut self, _mesh: &MeshBuild) {}
}

/// Test double that records what the core did to it. Clones share the counters
/// so a test can observe nodes instantiated from a template it retains.
#[derive(Default, Clone)]
pub struct RecordingNode {
    pub state: Arc<RecordingState>,
}

#[derive(Default)]
pub struct RecordingState {
    pub clones: AtomicUsize,
    pub binds: AtomicUsize,
    pub attaches: AtomicUsize,
    pub detaches: AtomicUsize,
    pub last_vertex_count: AtomicUsize,
    pub last_triangle_count: AtomicUsize,
}

impl RecordingNode {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneNode for RecordingNode {
    fn clone_node(&self) -> Box<dyn SceneNode> {
        self.state.clones.fetch_add(1, Ordering::Relaxed);
        Box::new(self.clone())
    }
    fn set_active(&mut self, _active: bool) {}
    fn set_parent(&mut self, parent: Option<SceneHandle>) {
        match parent {
            Some(_) => self.state.attaches.fetch_add(1, Ordering::Relaxed),
            None => self.state.detaches.fetch_add(1, Ordering::Relaxed),
        };
    }
    fn set_translate(&mut self, _translate: Vec3) {}
    fn set_name(&mut self, _name: &str) {}
    fn bind_mesh(&mut self, mesh: &MeshBuild) {
        self.state.binds.fetch_add(1, Ordering::Relaxed);
        self.state
            .last_vertex_count
            .store(mesh.vertex_count(), Ordering::Relaxed);
        self.state
            .last_triangle_count
            .store(mesh.triangle_count(), Ordering::Relaxed);
    }
}
