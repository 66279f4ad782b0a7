//! Chunks: the unit of streaming, generation, and eviction. A chunk owns a
//! sparse voxel store plus whatever feature objects generators realized in it.
#![forbid(unsafe_code)]

mod voxelmap;

pub use voxelmap::VoxelMap;

use verdant_geom::{Aabb, Vec3};
use verdant_items::InstanceId;
use verdant_scene::SceneHandle;
use verdant_world::ChunkCoord;

/// One procedural feature family (grass, trees, ...). Prototypes are cloned
/// per chunk; the clone fills voxels, builds geometry, and afterwards owns the
/// realized scene state for that chunk.
pub trait FeatureGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Fills the chunk's voxels. Runs on a worker thread with exclusive
    /// chunk ownership; must not fail (produce nothing instead).
    fn create(&mut self, chunk: &mut Chunk);

    /// Builds renderable geometry from the chunk's voxels. Returns whether
    /// any geometry was produced.
    fn create_object(&mut self, chunk: &Chunk) -> bool;

    /// Attach (`Some`) or detach (`None`) the realized scene objects.
    fn active(&mut self, parent: Option<SceneHandle>);

    /// A single voxel at `at` changed from `old_id` to `new_id`. Generators
    /// whose output depends on either id rebuild wholesale; others no-op.
    fn update(&mut self, chunk: &Chunk, at: (i32, i32, i32), old_id: InstanceId, new_id: InstanceId);

    /// Independent instance sharing sub-type identity but no realized state.
    fn clone_box(&self) -> Box<dyn FeatureGenerator>;
}

pub struct Chunk {
    coord: ChunkCoord,
    size: i32,
    voxels: VoxelMap,
    features: Vec<Box<dyn FeatureGenerator>>,
    dirty: bool,
}

impl Chunk {
    /// New chunk at `coord`; starts dirty (needs generation).
    pub fn new(size: i32, coord: ChunkCoord) -> Self {
        Self {
            coord,
            size,
            voxels: VoxelMap::for_chunk(size),
            features: Vec::new(),
            dirty: true,
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    #[inline]
    pub fn voxels(&self) -> &VoxelMap {
        &self.voxels
    }

    #[inline]
    pub fn get(&self, bx: i32, by: i32, bz: i32) -> InstanceId {
        self.voxels.get(bx, by, bz)
    }

    #[inline]
    pub fn set(&mut self, bx: i32, by: i32, bz: i32, id: InstanceId) -> bool {
        self.voxels.set(bx, by, bz, id)
    }

    /// Chebyshev distance to another chunk coordinate.
    #[inline]
    pub fn distance(&self, other: ChunkCoord) -> i32 {
        self.coord.chebyshev(other)
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// World-space position of the chunk's minimum corner.
    #[inline]
    pub fn world_origin(&self, scale: f32) -> Vec3 {
        let span = self.size as f32 * scale;
        Vec3::new(
            self.coord.cx as f32 * span,
            self.coord.cy as f32 * span,
            self.coord.cz as f32 * span,
        )
    }

    /// World-space bounding box, for frustum tests.
    pub fn aabb(&self, scale: f32) -> Aabb {
        let min = self.world_origin(scale);
        let span = self.size as f32 * scale;
        Aabb::new(min, min + Vec3::splat(span))
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Runs every generator prototype against this chunk: voxel fill, then
    /// geometry build. Clones that produced geometry are retained as the
    /// chunk's feature objects; previous realizations are discarded first.
    pub fn realize(&mut self, generators: &[Box<dyn FeatureGenerator>]) {
        self.features.clear();
        let mut realized = Vec::with_capacity(generators.len());
        for proto in generators {
            let mut generator = proto.clone_box();
            generator.create(self);
            if generator.create_object(self) {
                realized.push(generator);
            }
        }
        self.features = realized;
    }

    /// Forwards attach/detach to every realized feature object.
    pub fn active(&mut self, parent: Option<SceneHandle>) {
        for feature in &mut self.features {
            feature.active(parent);
        }
    }

    /// Tells retained features about a single-voxel edit so they can rebuild.
    pub fn notify_edit(&mut self, at: (i32, i32, i32), old_id: InstanceId, new_id: InstanceId) {
        let mut features = std::mem::take(&mut self.features);
        for feature in &mut features {
            feature.update(self, at, old_id, new_id);
        }
        self.features = features;
    }
}
