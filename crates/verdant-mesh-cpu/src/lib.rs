//! CPU-side mesh accumulation for voxel faces.
#![forbid(unsafe_code)]

mod face;
mod mesh_build;

pub use face::Face;
pub use mesh_build::MeshBuild;
