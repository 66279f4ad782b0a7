use std::sync::Arc;
use std::sync::atomic::Ordering;

use verdant_chunk::{Chunk, FeatureGenerator};
use verdant_features::{CloudGen, GrassGen, TreeGen, WaterGen};
use verdant_items::{AIR, ItemRegistry};
use verdant_scene::RecordingNode;
use verdant_world::{ChunkCoord, CloudParams, GrassParams, TreeParams, WaterParams};

fn grass_gen(recorder: &RecordingNode) -> (GrassGen, u16) {
    let mut reg = ItemRegistry::new();
    let generator = GrassGen::new(
        &mut reg,
        GrassParams::default(),
        2.0,
        7,
        Arc::new(recorder.clone()),
    );
    let id = generator.item_id();
    (generator, id)
}

#[test]
fn lone_voxel_meshes_all_six_faces() {
    let recorder = RecordingNode::new();
    let (mut generator, id) = grass_gen(&recorder);
    let mut chunk = Chunk::new(8, ChunkCoord::new(0, 0, 0));
    chunk.set(4, 4, 4, id);

    assert!(generator.create_object(&chunk));
    assert_eq!(recorder.state.binds.load(Ordering::Relaxed), 1);
    assert_eq!(recorder.state.last_vertex_count.load(Ordering::Relaxed), 24);
    assert_eq!(recorder.state.last_triangle_count.load(Ordering::Relaxed), 12);
}

#[test]
fn touching_voxels_hide_their_shared_faces() {
    let recorder = RecordingNode::new();
    let (mut generator, id) = grass_gen(&recorder);
    let mut chunk = Chunk::new(8, ChunkCoord::new(0, 0, 0));
    chunk.set(4, 4, 4, id);
    chunk.set(5, 4, 4, id);

    assert!(generator.create_object(&chunk));
    // 12 faces minus the two between the pair.
    assert_eq!(recorder.state.last_triangle_count.load(Ordering::Relaxed), 20);
}

#[test]
fn grass_suppresses_the_world_floor_face() {
    let recorder = RecordingNode::new();
    let (mut generator, id) = grass_gen(&recorder);
    let mut chunk = Chunk::new(8, ChunkCoord::new(0, 0, 0));
    chunk.set(4, 0, 4, id);

    assert!(generator.create_object(&chunk));
    assert_eq!(recorder.state.last_triangle_count.load(Ordering::Relaxed), 10);
}

#[test]
fn water_keeps_its_bottom_face() {
    let recorder = RecordingNode::new();
    let mut reg = ItemRegistry::new();
    let mut generator = WaterGen::new(
        &mut reg,
        WaterParams::default(),
        2.0,
        7,
        Arc::new(recorder.clone()),
    );
    let id = generator.item_id();
    let mut chunk = Chunk::new(8, ChunkCoord::new(0, 0, 0));
    chunk.set(4, 0, 4, id);

    assert!(generator.create_object(&chunk));
    assert_eq!(recorder.state.last_triangle_count.load(Ordering::Relaxed), 12);
}

#[test]
fn terrain_generation_is_deterministic() {
    let recorder = RecordingNode::new();
    let (mut a, _) = grass_gen(&recorder);
    let (mut b, _) = grass_gen(&recorder);
    let coord = ChunkCoord::new(2, 0, -1);
    let mut first = Chunk::new(16, coord);
    let mut second = Chunk::new(16, coord);
    a.create(&mut first);
    b.create(&mut second);

    let mut lhs: Vec<_> = first.voxels().iter().collect();
    let mut rhs: Vec<_> = second.voxels().iter().collect();
    lhs.sort_unstable();
    rhs.sort_unstable();
    assert!(!lhs.is_empty());
    assert_eq!(lhs, rhs);
}

#[test]
fn water_sits_on_terrain_below_sea_level() {
    let recorder = RecordingNode::new();
    let mut reg = ItemRegistry::new();
    let mut grass = GrassGen::new(
        &mut reg,
        GrassParams::default(),
        2.0,
        7,
        Arc::new(recorder.clone()),
    );
    // A generous sea level so the default terrain is guaranteed to dip under it.
    let params = WaterParams {
        sea_level: 12,
        ..WaterParams::default()
    };
    let mut water = WaterGen::new(&mut reg, params, 2.0, 7, Arc::new(recorder.clone()));
    let grass_id = grass.item_id();
    let water_id = water.item_id();
    let sea = params.sea_level;

    let mut chunk = Chunk::new(32, ChunkCoord::new(0, 0, 0));
    grass.create(&mut chunk);
    water.create(&mut chunk);

    let mut saw_water = false;
    for z in 0..32 {
        for x in 0..32 {
            for y in 0..32 {
                if chunk.get(x, y, z) != water_id {
                    continue;
                }
                saw_water = true;
                assert!(y < sea, "water above sea level at ({x},{y},{z})");
                let below = chunk.get(x, y - 1, z);
                assert!(
                    y == 0 || below == water_id || below == grass_id,
                    "floating water at ({x},{y},{z})"
                );
            }
        }
    }
    assert!(saw_water, "default terrain should dip below sea level somewhere");
}

#[test]
fn clouds_stay_inside_their_altitude_band() {
    let recorder = RecordingNode::new();
    let mut reg = ItemRegistry::new();
    let params = CloudParams {
        threshold: 0.0,
        ..CloudParams::default()
    };
    let mut generator = CloudGen::new(&mut reg, params, 2.0, 7, Arc::new(recorder.clone()));
    let id = generator.item_id();

    let mut chunk = Chunk::new(32, ChunkCoord::new(1, 0, 1));
    generator.create(&mut chunk);

    let mut saw_cloud = false;
    for (_, y, _, vid) in chunk.voxels().iter() {
        if vid == id {
            saw_cloud = true;
            assert!((params.band_min..params.band_max).contains(&y));
        }
    }
    assert!(saw_cloud);
}

#[test]
fn trees_respect_the_border_margin_and_root_on_grass() {
    let recorder = RecordingNode::new();
    let mut reg = ItemRegistry::new();
    let mut grass = GrassGen::new(
        &mut reg,
        GrassParams::default(),
        2.0,
        7,
        Arc::new(recorder.clone()),
    );
    let grass_id = grass.item_id();
    // Open the gate everywhere so every eligible column hosts a tree.
    let params = TreeParams {
        gate_threshold: -1.0,
        ..TreeParams::default()
    };
    let mut tree = TreeGen::new(&mut reg, params, 2.0, 7, Arc::new(recorder.clone()));
    let wood_id = tree.wood_id();
    let leaf_id = tree.leaf_id();

    let size = 32;
    let mut chunk = Chunk::new(size, ChunkCoord::new(0, 0, 0));
    grass.create(&mut chunk);
    tree.create(&mut chunk);

    let mut saw_wood = false;
    let mut saw_leaf = false;
    for (x, y, z, vid) in chunk.voxels().iter() {
        if vid == wood_id {
            saw_wood = true;
            assert!((params.margin..size - params.margin).contains(&x));
            assert!((params.margin..size - params.margin).contains(&z));
            let below = chunk.get(x, y - 1, z);
            assert!(
                below == wood_id || below == grass_id,
                "trunk not rooted on terrain at ({x},{y},{z})"
            );
        } else if vid == leaf_id {
            saw_leaf = true;
        }
    }
    assert!(saw_wood);
    assert!(saw_leaf);
}

#[test]
fn edits_rebuild_only_the_affected_generator() {
    let grass_recorder = RecordingNode::new();
    let cloud_recorder = RecordingNode::new();
    let mut reg = ItemRegistry::new();
    let grass = GrassGen::new(
        &mut reg,
        GrassParams::default(),
        2.0,
        7,
        Arc::new(grass_recorder.clone()),
    );
    let grass_id = grass.item_id();
    let cloud = CloudGen::new(
        &mut reg,
        CloudParams {
            threshold: 0.0,
            ..CloudParams::default()
        },
        2.0,
        7,
        Arc::new(cloud_recorder.clone()),
    );
    let gens: Vec<Box<dyn FeatureGenerator>> = vec![Box::new(grass), Box::new(cloud)];

    let mut chunk = Chunk::new(32, ChunkCoord::new(0, 0, 0));
    chunk.realize(&gens);
    assert_eq!(chunk.feature_count(), 2);

    let grass_binds = grass_recorder.state.binds.load(Ordering::Relaxed);
    let cloud_binds = cloud_recorder.state.binds.load(Ordering::Relaxed);

    // Dig out a grass voxel: grass remeshes, clouds are untouched.
    let old = chunk.get(5, 0, 5);
    assert_eq!(old, grass_id);
    chunk.set(5, 0, 5, AIR);
    chunk.notify_edit((5, 0, 5), old, AIR);

    assert_eq!(
        grass_recorder.state.binds.load(Ordering::Relaxed),
        grass_binds + 1
    );
    assert_eq!(
        cloud_recorder.state.binds.load(Ordering::Relaxed),
        cloud_binds
    );
}
