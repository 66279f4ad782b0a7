use std::sync::Arc;

use verdant_chunk::{Chunk, FeatureGenerator};
use verdant_items::{AIR, InstanceId, ItemRegistry};
use verdant_scene::{SceneHandle, SceneNode};
use verdant_world::{NoiseField, TreeParams};

use crate::common::{activate_objects, build_objects, column_height};
use crate::salts::{TERRAIN_SALT, TREE_GATE_SALT};

/// Trees: a low-frequency gate field picks host columns, each of which gets a
/// wood trunk rooted at terrain height and a spherical leaf canopy around the
/// trunk top. Columns within `margin` of the chunk border are skipped so
/// canopies never clip at chunk seams.
pub struct TreeGen {
    wood_id: InstanceId,
    leaf_id: InstanceId,
    params: TreeParams,
    scale: f32,
    terrain: Arc<NoiseField>,
    gate: Arc<NoiseField>,
    template: Arc<dyn SceneNode>,
    objects: Vec<Box<dyn SceneNode>>,
}

impl TreeGen {
    pub fn new(
        registry: &mut ItemRegistry,
        params: TreeParams,
        scale: f32,
        seed: i32,
        template: Arc<dyn SceneNode>,
    ) -> Self {
        Self {
            wood_id: registry.register("wood"),
            leaf_id: registry.register("leaf"),
            params,
            scale,
            terrain: Arc::new(NoiseField::with_salt(seed, TERRAIN_SALT, params.frequency)),
            gate: Arc::new(NoiseField::with_salt(
                seed,
                TREE_GATE_SALT,
                params.gate_frequency,
            )),
            template,
            objects: Vec::new(),
        }
    }

    pub fn wood_id(&self) -> InstanceId {
        self.wood_id
    }

    pub fn leaf_id(&self) -> InstanceId {
        self.leaf_id
    }

    fn grow(&self, chunk: &mut Chunk, x: i32, ground: i32, z: i32) {
        let size = chunk.size();
        let top = (ground + self.params.trunk_height).min(size - 1);
        for y in ground..top {
            chunk.set(x, y, z, self.wood_id);
        }
        let r = self.params.canopy_radius;
        for dz in -r..=r {
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy + dz * dz > r * r {
                        continue;
                    }
                    let (cx, cy, cz) = (x + dx, top + dy, z + dz);
                    if cx < 0 || cx >= size || cy < 0 || cy >= size || cz < 0 || cz >= size {
                        continue;
                    }
                    if chunk.get(cx, cy, cz) == AIR {
                        chunk.set(cx, cy, cz, self.leaf_id);
                    }
                }
            }
        }
    }
}

impl FeatureGenerator for TreeGen {
    fn name(&self) -> &str {
        "tree"
    }

    fn create(&mut self, chunk: &mut Chunk) {
        let size = chunk.size();
        let margin = self.params.margin.clamp(0, size / 2);
        let base_x = chunk.coord().cx * size;
        let base_z = chunk.coord().cz * size;
        for z in margin..size - margin {
            for x in margin..size - margin {
                let (wx, wz) = (base_x + x, base_z + z);
                if self.gate.fbm2_01(wx as f32, wz as f32, 1, 1.0, 1.0) <= self.params.gate_threshold
                {
                    continue;
                }
                let ground = column_height(
                    &self.terrain,
                    wx,
                    wz,
                    self.params.octaves,
                    self.params.persistence,
                    self.params.lacunarity,
                    self.params.max_height,
                );
                if ground >= size {
                    continue;
                }
                self.grow(chunk, x, ground, z);
            }
        }
    }

    fn create_object(&mut self, chunk: &Chunk) -> bool {
        self.objects = build_objects(
            chunk,
            self.scale,
            self.template.as_ref(),
            &[(self.wood_id, "wood"), (self.leaf_id, "leaf")],
            false,
        );
        !self.objects.is_empty()
    }

    fn active(&mut self, parent: Option<SceneHandle>) {
        activate_objects(&mut self.objects, parent);
    }

    fn update(&mut self, chunk: &Chunk, _at: (i32, i32, i32), old_id: InstanceId, new_id: InstanceId) {
        let mine = [self.wood_id, self.leaf_id];
        if mine.contains(&old_id) || mine.contains(&new_id) {
            activate_objects(&mut self.objects, None);
            self.create_object(chunk);
        }
    }

    fn clone_box(&self) -> Box<dyn FeatureGenerator> {
        Box::new(Self {
            wood_id: self.wood_id,
            leaf_id: self.leaf_id,
            params: self.params,
            scale: self.scale,
            terrain: self.terrain.clone(),
            gate: self.gate.clone(),
            template: self.template.clone(),
            objects: Vec::new(),
        })
    }
}
