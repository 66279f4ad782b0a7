use std::sync::Arc;

use verdant_chunk::{Chunk, FeatureGenerator};
use verdant_items::{InstanceId, ItemRegistry};
use verdant_scene::{SceneHandle, SceneNode};
use verdant_world::{CloudParams, NoiseField};

use crate::common::{activate_objects, build_objects};
use crate::salts::CLOUD_SALT;

/// Clouds: a 3-D density field sampled inside a fixed altitude band; voxels
/// above the density threshold become cloud.
pub struct CloudGen {
    id: InstanceId,
    params: CloudParams,
    scale: f32,
    noise: Arc<NoiseField>,
    template: Arc<dyn SceneNode>,
    objects: Vec<Box<dyn SceneNode>>,
}

impl CloudGen {
    pub fn new(
        registry: &mut ItemRegistry,
        params: CloudParams,
        scale: f32,
        seed: i32,
        template: Arc<dyn SceneNode>,
    ) -> Self {
        Self {
            id: registry.register("cloud"),
            params,
            scale,
            noise: Arc::new(NoiseField::with_salt(seed, CLOUD_SALT, params.frequency)),
            template,
            objects: Vec::new(),
        }
    }

    pub fn item_id(&self) -> InstanceId {
        self.id
    }
}

impl FeatureGenerator for CloudGen {
    fn name(&self) -> &str {
        "cloud"
    }

    fn create(&mut self, chunk: &mut Chunk) {
        let size = chunk.size();
        let band_min = self.params.band_min.clamp(0, size);
        let band_max = self.params.band_max.clamp(band_min, size);
        let base_x = chunk.coord().cx * size;
        let base_z = chunk.coord().cz * size;
        for z in 0..size {
            for x in 0..size {
                for y in band_min..band_max {
                    let density = self.noise.fbm3_01(
                        (base_x + x) as f32,
                        y as f32,
                        (base_z + z) as f32,
                        self.params.octaves,
                        self.params.persistence,
                        self.params.lacunarity,
                    );
                    if density > self.params.threshold {
                        chunk.set(x, y, z, self.id);
                    }
                }
            }
        }
    }

    fn create_object(&mut self, chunk: &Chunk) -> bool {
        self.objects = build_objects(
            chunk,
            self.scale,
            self.template.as_ref(),
            &[(self.id, "cloud")],
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
