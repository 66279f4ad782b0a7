#![forbid(unsafe_code)]
//! Procedural voxel features: terrain, sea fill, clouds and trees, each a
//! [`FeatureGenerator`] that writes voxels into a chunk and realizes scene
//! objects from the visible-face mesh of its own item ids.

mod cloud;
mod common;
mod grass;
mod salts;
mod tree;
mod water;

pub use cloud::CloudGen;
pub use grass::GrassGen;
pub use tree::TreeGen;
pub use water::WaterGen;

use std::sync::Arc;

use verdant_chunk::FeatureGenerator;
use verdant_items::ItemRegistry;
use verdant_scene::SceneNode;
use verdant_world::{GenParams, WorldConfig};

/// The stock generator lineup, registered in a fixed order so item ids are
/// stable across runs: grass 1, water 2, cloud 3, wood 4, leaf 5.
pub fn standard_set(
    registry: &mut ItemRegistry,
    cfg: &WorldConfig,
    params: &GenParams,
    template: Arc<dyn SceneNode>,
) -> Vec<Box<dyn FeatureGenerator>> {
    let scale = cfg.world_scale;
    let seed = cfg.seed;
    vec![
        Box::new(GrassGen::new(
            registry,
            params.grass,
            scale,
            seed,
            template.clone(),
        )),
        Box::new(WaterGen::new(
            registry,
            params.water,
            scale,
            seed,
            template.clone(),
        )),
        Box::new(CloudGen::new(
            registry,
            params.cloud,
            scale,
            seed,
            template.clone(),
        )),
        Box::new(TreeGen::new(registry, params.tree, scale, seed, template)),
    ]
}
