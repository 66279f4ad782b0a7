#![forbid(unsafe_code)]
//! Streaming, editable voxel terrain for a host game engine: chunks around
//! the viewpoint are filled and meshed on background threads, prioritized by
//! frustum visibility and distance, and single voxels can be added or removed
//! through screen-space ray casts.

mod camera;
mod input;
mod manager;
mod raycast;

pub use camera::ViewCamera;
pub use input::EditInput;
pub use manager::WorldManager;
pub use raycast::{RayHit, cast_ray, find_placement};

pub use verdant_chunk::{Chunk, FeatureGenerator, VoxelMap};
pub use verdant_features::{CloudGen, GrassGen, TreeGen, WaterGen, standard_set};
pub use verdant_geom::{Aabb, Frustum, Vec3};
pub use verdant_items::{AIR, InstanceId, ItemRegistry};
pub use verdant_mesh_cpu::{Face, MeshBuild};
pub use verdant_runtime::{BuildJob, JobOut, Runtime};
pub use verdant_scene::{NullNode, RecordingNode, SceneHandle, SceneNode};
pub use verdant_world::{ChunkCoord, GenParams, WorldConfig};
