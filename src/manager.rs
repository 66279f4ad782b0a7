use std::sync::Arc;

use hashbrown::HashMap;

use verdant_chunk::{Chunk, FeatureGenerator};
use verdant_geom::{Aabb, Frustum, Vec3};
use verdant_items::{AIR, InstanceId, ItemRegistry};
use verdant_runtime::{BuildJob, Runtime};
use verdant_scene::SceneHandle;
use verdant_world::{ChunkCoord, WorldConfig};

use crate::camera::ViewCamera;
use crate::input::EditInput;
use crate::raycast;

/// A coordinate's occupancy. `Building` marks exclusive ownership by a worker
/// thread; the coordinator touches the chunk again only when the build lands.
enum ChunkSlot {
    Building,
    Ready(Chunk),
}

/// Owns the live-chunk set and the worker pool. Each frame it evicts chunks
/// that fell out of range, attaches finished builds, schedules new builds by
/// visibility-then-distance priority, and services block-edit ray casts.
pub struct WorldManager {
    cfg: WorldConfig,
    generators: Arc<Vec<Box<dyn FeatureGenerator>>>,
    registry: ItemRegistry,
    runtime: Option<Runtime>,
    chunks: HashMap<ChunkCoord, ChunkSlot>,
    scene_parent: Option<SceneHandle>,
    next_job_id: u64,
    placed_item: InstanceId,
}

impl WorldManager {
    pub fn new(
        cfg: WorldConfig,
        registry: ItemRegistry,
        generators: Vec<Box<dyn FeatureGenerator>>,
    ) -> Self {
        Self {
            cfg,
            generators: Arc::new(generators),
            registry,
            runtime: None,
            chunks: HashMap::new(),
            scene_parent: None,
            next_job_id: 0,
            placed_item: 1,
        }
    }

    /// Item written by [`add_block`](Self::add_block); defaults to id 1.
    pub fn set_placed_item(&mut self, id: InstanceId) {
        self.placed_item = id;
    }

    pub fn config(&self) -> &WorldConfig {
        &self.cfg
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    pub fn live_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn ready_chunks(&self) -> usize {
        self.chunks
            .values()
            .filter(|s| matches!(s, ChunkSlot::Ready(_)))
            .count()
    }

    pub fn pending_builds(&self) -> usize {
        self.chunks
            .values()
            .filter(|s| matches!(s, ChunkSlot::Building))
            .count()
    }

    pub fn chunk_at(&self, coord: ChunkCoord) -> Option<&Chunk> {
        match self.chunks.get(&coord) {
            Some(ChunkSlot::Ready(chunk)) => Some(chunk),
            _ => None,
        }
    }

    /// Id at a world voxel cell; air when no live chunk covers it.
    pub fn voxel_at(&self, coord: ChunkCoord, voxel: (i32, i32, i32)) -> InstanceId {
        self.sample(coord, voxel).unwrap_or(AIR)
    }

    /// Flags a live chunk for regeneration on a later frame.
    pub fn mark_dirty(&mut self, coord: ChunkCoord) -> bool {
        match self.chunks.get_mut(&coord) {
            Some(ChunkSlot::Ready(chunk)) => {
                chunk.set_dirty(true);
                true
            }
            _ => false,
        }
    }

    /// Spawns the worker pool and records the scene node chunks attach under.
    pub fn on_activate(&mut self, parent: Option<SceneHandle>) -> std::io::Result<()> {
        self.scene_parent = parent;
        self.runtime = Some(Runtime::new(self.generators.clone(), self.cfg.workers)?);
        log::info!(
            "terrain online: {} workers, budget {} chunks",
            self.runtime.as_ref().map_or(0, Runtime::worker_count),
            self.cfg.chunk_budget()
        );
        Ok(())
    }

    /// One frame of streaming and editing.
    pub fn on_frame(&mut self, camera: &dyn ViewCamera, input: &dyn EditInput) {
        let center = self.center_chunk(camera.eye());
        self.delete_chunks(center);
        self.check_chunks();
        self.create_chunks(center, &camera.frustum());
        self.hit_chunks(camera, input);
    }

    /// Detaches everything and joins the workers. In-flight builds finish
    /// before the pool shuts down; their chunks are dropped unattached.
    pub fn on_deactivate(&mut self) {
        for slot in self.chunks.values_mut() {
            if let ChunkSlot::Ready(chunk) = slot {
                chunk.active(None);
            }
        }
        self.chunks.clear();
        if let Some(rt) = self.runtime.take() {
            rt.shutdown();
        }
        self.scene_parent = None;
    }

    /// Chunks tile the ground layer; the viewpoint's altitude does not move
    /// the streaming window.
    fn center_chunk(&self, eye: Vec3) -> ChunkCoord {
        let span = self.cfg.chunk_span();
        ChunkCoord::new(
            eye.x.div_euclid(span) as i32,
            0,
            eye.z.div_euclid(span) as i32,
        )
    }

    fn delete_chunks(&mut self, center: ChunkCoord) {
        let radius = self.cfg.delete_radius;
        self.chunks.retain(|coord, slot| {
            if coord.chebyshev(center) <= radius {
                return true;
            }
            match slot {
                // A build in flight cannot be cancelled; it attaches when it
                // lands and is evicted on the following frame.
                ChunkSlot::Building => true,
                ChunkSlot::Ready(chunk) => {
                    chunk.active(None);
                    log::debug!("evicted chunk {coord:?}");
                    false
                }
            }
        });
    }

    fn check_chunks(&mut self) {
        let results = match &self.runtime {
            Some(rt) => rt.drain_worker_results(),
            None => return,
        };
        for out in results {
            let mut chunk = out.chunk;
            let coord = chunk.coord();
            log::debug!(
                "chunk {coord:?} built in {} ms ({} features)",
                out.t_realize_ms,
                chunk.feature_count()
            );
            match self.chunks.get_mut(&coord) {
                Some(slot) if matches!(slot, ChunkSlot::Building) => {
                    chunk.active(self.scene_parent);
                    *slot = ChunkSlot::Ready(chunk);
                }
                // The slot was dropped or replaced while the build ran.
                _ => chunk.active(None),
            }
        }
    }

    fn create_chunks(&mut self, center: ChunkCoord, frustum: &Frustum) {
        let (workers, busy) = match &self.runtime {
            Some(rt) => (rt.worker_count(), rt.queued_jobs() + rt.inflight_jobs()),
            None => return,
        };
        if self.chunks.len() > self.cfg.chunk_budget() {
            return;
        }
        for _ in 0..workers.saturating_sub(busy) {
            let Some(coord) = self.best_candidate(center, frustum) else {
                break;
            };
            let mut chunk = match self.chunks.remove(&coord) {
                Some(ChunkSlot::Ready(existing)) => existing,
                Some(ChunkSlot::Building) => {
                    self.chunks.insert(coord, ChunkSlot::Building);
                    break;
                }
                None => Chunk::new(self.cfg.chunk_size, coord),
            };
            chunk.active(None);
            chunk.set_dirty(false);
            let job_id = self.next_job_id;
            self.next_job_id += 1;
            let submitted = match &self.runtime {
                Some(rt) => rt.submit_build_job(BuildJob { chunk, job_id }),
                None => return,
            };
            match submitted {
                Ok(()) => {
                    self.chunks.insert(coord, ChunkSlot::Building);
                }
                Err(job) => {
                    // Queue full; put the chunk back and retry next frame.
                    let mut chunk = job.chunk;
                    chunk.set_dirty(true);
                    self.chunks.insert(coord, ChunkSlot::Ready(chunk));
                    break;
                }
            }
        }
    }

    /// Lowest-score uncovered coordinate in the square of half-width
    /// `create_radius` around `center`. Frustum visibility dominates distance:
    /// an off-screen candidate never beats an on-screen one.
    fn best_candidate(&self, center: ChunkCoord, frustum: &Frustum) -> Option<ChunkCoord> {
        let r = self.cfg.create_radius;
        let span = self.cfg.chunk_span();
        let mut best: Option<(u32, ChunkCoord)> = None;
        for dz in -r..=r {
            for dx in -r..=r {
                let coord = ChunkCoord::new(center.cx + dx, 0, center.cz + dz);
                match self.chunks.get(&coord) {
                    Some(ChunkSlot::Building) => continue,
                    Some(ChunkSlot::Ready(chunk)) if !chunk.is_dirty() => continue,
                    _ => {}
                }
                let min = Vec3::new(
                    coord.cx as f32 * span,
                    coord.cy as f32 * span,
                    coord.cz as f32 * span,
                );
                let aabb = Aabb::new(min, min + Vec3::splat(span));
                let penalty: u32 = if frustum.intersects_aabb(aabb) { 0 } else { 1 };
                let score = (penalty << 24) | coord.chebyshev(center) as u32;
                if best.is_none_or(|(s, _)| score < s) {
                    best = Some((score, coord));
                }
            }
        }
        best.map(|(_, coord)| coord)
    }

    fn hit_chunks(&mut self, camera: &dyn ViewCamera, input: &dyn EditInput) {
        let remove = input.remove_pressed() && (input.cursor_locked() || input.modifier_down());
        let add = input.add_pressed();
        if !remove && !add {
            return;
        }
        let (origin, direction) = camera.pick_ray(input.cursor_pos());
        if remove {
            self.remove_block(origin, direction);
        }
        if add {
            self.add_block(origin, direction);
        }
    }

    fn sample(&self, coord: ChunkCoord, voxel: (i32, i32, i32)) -> Option<InstanceId> {
        match self.chunks.get(&coord) {
            Some(ChunkSlot::Ready(chunk)) => Some(chunk.get(voxel.0, voxel.1, voxel.2)),
            _ => None,
        }
    }

    /// Clears the first solid voxel along the ray. Returns whether an edit
    /// happened.
    pub fn remove_block(&mut self, origin: Vec3, direction: Vec3) -> bool {
        let hit = raycast::cast_ray(origin, direction, &self.cfg, |c, v| self.sample(c, v));
        let Some(hit) = hit else {
            return false;
        };
        let Some(ChunkSlot::Ready(chunk)) = self.chunks.get_mut(&hit.coord) else {
            return false;
        };
        let (x, y, z) = hit.voxel;
        let old = chunk.get(x, y, z);
        if old == AIR {
            return false;
        }
        chunk.set(x, y, z, AIR);
        chunk.notify_edit(hit.voxel, old, AIR);
        // Rebuilt feature objects come back unparented; reattach them.
        chunk.active(self.scene_parent);
        log::info!("removed item {old} at {:?} {:?}", hit.coord, hit.voxel);
        true
    }

    /// Places the configured item in the empty cell just in front of the
    /// first solid voxel along the ray. Returns whether an edit happened.
    pub fn add_block(&mut self, origin: Vec3, direction: Vec3) -> bool {
        let item = self.placed_item;
        let site = raycast::find_placement(origin, direction, &self.cfg, |c, v| self.sample(c, v));
        let Some((coord, voxel)) = site else {
            return false;
        };
        let (x, y, z) = voxel;
        let size = self.cfg.chunk_size;
        // A position in the last half-voxel of a chunk edge rounds one past
        // the valid range; it reads as air but is not a writable cell.
        if !(0..size).contains(&x) || !(0..size).contains(&y) || !(0..size).contains(&z) {
            return false;
        }
        let Some(ChunkSlot::Ready(chunk)) = self.chunks.get_mut(&coord) else {
            return false;
        };
        if chunk.get(x, y, z) != AIR {
            return false;
        }
        chunk.set(x, y, z, item);
        chunk.notify_edit(voxel, AIR, item);
        chunk.active(self.scene_parent);
        log::info!("placed item {item} at {coord:?} {voxel:?}");
        true
    }
}
