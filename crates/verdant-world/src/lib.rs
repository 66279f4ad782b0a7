//! World-level scalars: chunk coordinates, configuration, and coherent noise.
#![forbid(unsafe_code)]

mod chunk_coord;
mod config;
mod noise;

pub use chunk_coord::ChunkCoord;
pub use config::{CloudParams, GenParams, GrassParams, TreeParams, WaterParams, WorldConfig};
pub use noise::NoiseField;
