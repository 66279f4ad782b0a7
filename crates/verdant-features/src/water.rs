use std::sync::Arc;

use verdant_chunk::{Chunk, FeatureGenerator};
use verdant_items::{InstanceId, ItemRegistry};
use verdant_scene::{SceneHandle, SceneNode};
use verdant_world::{NoiseField, WaterParams};

use crate::common::{activate_objects, build_objects, column_height};
use crate::salts::TERRAIN_SALT;

/// Sea fill: columns whose terrain height falls below the sea level get water
/// from the terrain surface up to it. Uses the terrain noise salt, so its
/// height agrees with [`GrassGen`](crate::GrassGen)'s as long as the terrain
/// fields of `WaterParams` match the grass ones (the defaults do).
pub struct WaterGen {
    id: InstanceId,
    params: WaterParams,
    scale: f32,
    noise: Arc<NoiseField>,
    template: Arc<dyn SceneNode>,
    objects: Vec<Box<dyn SceneNode>>,
}

impl WaterGen {
    pub fn new(
        registry: &mut ItemRegistry,
        params: WaterParams,
        scale: f32,
        seed: i32,
        template: Arc<dyn SceneNode>,
    ) -> Self {
        Self {
            id: registry.register("water"),
            params,
            scale,
            noise: Arc::new(NoiseField::with_salt(seed, TERRAIN_SALT, params.frequency)),
            template,
            objects: Vec::new(),
        }
    }

    pub fn item_id(&self) -> InstanceId {
        self.id
    }
}

impl FeatureGenerator for WaterGen {
    fn name(&self) -> &str {
        "water"
    }

    fn create(&mut self, chunk: &mut Chunk) {
        let size = chunk.size();
        let sea = self.params.sea_level.min(size);
        let base_x = chunk.coord().cx * size;
        let base_z = chunk.coord().cz * size;
        for z in 0..size {
            for x in 0..size {
                let height = column_height(
                    &self.noise,
                    base_x + x,
                    base_z + z,
                    self.params.octaves,
                    self.params.persistence,
                    self.params.lacunarity,
                    self.params.max_height,
                );
                if height >= sea {
                    continue;
                }
                for y in height..sea {
                    chunk.set(x, y, z, self.id);
                }
            }
        }
    }

    fn create_object(&mut self, chunk: &Chunk) -> bool {
        self.objects = build_objects(
            chunk,
            self.scale,
            self.template.as_ref(),
            &[(self.id, "water")],
            false,
        );
        !self.objects.is_empty()
    }

    fn active(&mut self, parent: Option<SceneHandle>) {
        activate_objects(&mut self.objects, parent);
    }

    fn update(&mut self, chunk: &Chunk, _at: (i32, i32, i32), old_id: InstanceId, new_id: InstanceId) {
        if old_id == self.id || new_id == self.id {
            activate_objects(&mut self.objects, None);
            self.create_object(chunk);
        }
    }

    fn clone_box(&self) -> Box<dyn FeatureGenerator> {
        Box::new(Self {
            id: self.id,
            params: self.params,
            scale: self.scale,
            noise: self.noise.clone(),
            template: self.template.clone(),
            objects: Vec::new(),
        })
    }
}
