use std::sync::Arc;

use verdant_chunk::{Chunk, FeatureGenerator};
use verdant_items::{InstanceId, ItemRegistry};
use verdant_scene::{SceneHandle, SceneNode};
use verdant_world::{GrassParams, NoiseField};

use crate::common::{activate_objects, build_objects, column_height};
use crate::salts::TERRAIN_SALT;

/// Ground terrain: every column fills `[0, height)` with grass. The bottom
/// layer's -Y face is suppressed (nothing ever looks at the world floor).
pub struct GrassGen {
    id: InstanceId,
    params: GrassParams,
    scale: f32,
    noise: Arc<NoiseField>,
    template: Arc<dyn SceneNode>,
    objects: Vec<Box<dyn SceneNode>>,
}

impl GrassGen {
    pub fn new(
        registry: &mut ItemRegistry,
        params: GrassParams,
        scale: f32,
        seed: i32,
        template: Arc<dyn SceneNode>,
    ) -> Self {
        Self {
            id: registry.register("grass"),
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

impl FeatureGenerator for GrassGen {
    fn name(&self) -> &str {
        "grass"
    }

    fn create(&mut self, chunk: &mut Chunk) {
        let size = chunk.size();
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
                )
                .min(size);
                for y in 0..height {
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
            &[(self.id, "grass")],
            true,
        );
        !self.objects.is_empty()
    }

    fn active(&mut self, parent: Option<SceneHandle>) {
        activate_objects(&mut self.objects, parent);
    }

    fn update(&mut self, chunk: &Chunk, _at: (i32, i32, i32), old_id: InstanceId, new_id: InstanceId) {
        if old_id == self.id || new_id == self.id {
            // Detach the outgoing nodes; the caller reattaches the rebuild.
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
