use verdant_chunk::Chunk;
use verdant_items::InstanceId;
use verdant_mesh_cpu::{Face, MeshBuild};
use verdant_scene::{SceneHandle, SceneNode};
use verdant_world::NoiseField;

/// Which of the six faces of the voxel at `(x,y,z)` are visible: a face shows
/// iff the neighbor's id differs from the voxel's own. Out-of-chunk neighbors
/// read as air, so chunk-border faces are visible. `skip_floor` suppresses the
/// -Y face on the bottom layer (per-generator choice, not a global rule).
pub(crate) fn visible_faces(
    chunk: &Chunk,
    x: i32,
    y: i32,
    z: i32,
    id: InstanceId,
    skip_floor: bool,
) -> [bool; 6] {
    let mut vis = [false; 6];
    for face in Face::all() {
        if skip_floor && face == Face::NegY && y == 0 {
            continue;
        }
        let (dx, dy, dz) = face.delta();
        vis[face.index()] = chunk.get(x + dx, y + dy, z + dz) != id;
    }
    vis
}

/// Accumulates the visible faces of every voxel carrying `id` into one mesh.
pub(crate) fn mesh_item(chunk: &Chunk, id: InstanceId, scale: f32, skip_floor: bool) -> MeshBuild {
    let mut mb = MeshBuild::default();
    for (x, y, z, vid) in chunk.voxels().iter() {
        if vid != id {
            continue;
        }
        let vis = visible_faces(chunk, x, y, z, id, skip_floor);
        for face in Face::all() {
            if vis[face.index()] {
                mb.add_voxel_face(face, x, y, z, scale);
            }
        }
    }
    mb
}

/// One realized scene object per item sub-type that produced geometry. Nodes
/// are cloned from `template`, named deterministically from the chunk's
/// world-space offset, and positioned there.
pub(crate) fn build_objects(
    chunk: &Chunk,
    scale: f32,
    template: &dyn SceneNode,
    items: &[(InstanceId, &str)],
    skip_floor: bool,
) -> Vec<Box<dyn SceneNode>> {
    let origin = chunk.world_origin(scale);
    let mut objects = Vec::new();
    for (id, name) in items {
        let mesh = mesh_item(chunk, *id, scale, skip_floor);
        if mesh.is_empty() {
            continue;
        }
        let mut node = template.clone_node();
        node.set_name(&format!(
            "{}_{}_{}_{}",
            name, origin.x as i32, origin.y as i32, origin.z as i32
        ));
        node.set_translate(origin);
        node.bind_mesh(&mesh);
        objects.push(node);
    }
    objects
}

/// Attach/detach shared by every generator.
pub(crate) fn activate_objects(objects: &mut [Box<dyn SceneNode>], parent: Option<SceneHandle>) {
    for node in objects {
        node.set_parent(parent);
        node.set_active(parent.is_some());
    }
}

/// Column height in `[1, max_height]` from 2-D fBm at world voxel coords.
pub(crate) fn column_height(
    noise: &NoiseField,
    wx: i32,
    wz: i32,
    octaves: u32,
    persistence: f32,
    lacunarity: f32,
    max_height: i32,
) -> i32 {
    let h = noise.fbm2_01(wx as f32, wz as f32, octaves, persistence, lacunarity);
    1 + (h * (max_height.max(1) - 1) as f32).round() as i32
}
