use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Scalar configuration shared by the manager, chunks, and generators.
///
/// Chunks never hold a live back-reference to their owner; this struct is
/// passed (by copy or reference) wherever sizing or radii are needed.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct WorldConfig {
    /// Voxels per chunk edge.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: i32,
    /// World units per voxel step.
    #[serde(default = "default_world_scale")]
    pub world_scale: f32,
    /// Half-width of the square scanned for new chunk builds.
    #[serde(default = "default_create_radius")]
    pub create_radius: i32,
    /// Chebyshev distance past which live chunks are evicted.
    #[serde(default = "default_delete_radius")]
    pub delete_radius: i32,
    /// Maximum world-space distance an edit ray travels.
    #[serde(default = "default_hit_radius")]
    pub hit_radius: f32,
    /// Background build threads; 0 means "derive from available parallelism".
    #[serde(default)]
    pub workers: usize,
    #[serde(default)]
    pub seed: i32,
}

fn default_chunk_size() -> i32 {
    32
}
fn default_world_scale() -> f32 {
    2.0
}
fn default_create_radius() -> i32 {
    3
}
fn default_delete_radius() -> i32 {
    5
}
fn default_hit_radius() -> f32 {
    64.0
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            world_scale: default_world_scale(),
            create_radius: default_create_radius(),
            delete_radius: default_delete_radius(),
            hit_radius: default_hit_radius(),
            workers: 0,
            seed: 0,
        }
    }
}

impl WorldConfig {
    /// Edge length of a chunk in world units.
    #[inline]
    pub fn chunk_span(&self) -> f32 {
        self.chunk_size as f32 * self.world_scale
    }

    /// Hard cap on the live-chunk set.
    #[inline]
    pub fn chunk_budget(&self) -> usize {
        let r = self.delete_radius.max(1) as usize;
        r * r * r
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let cfg: WorldConfig = toml::from_str(&text)?;
        Ok(cfg)
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct GrassParams {
    #[serde(default = "default_grass_octaves")]
    pub octaves: u32,
    #[serde(default = "default_grass_persistence")]
    pub persistence: f32,
    #[serde(default = "default_grass_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_grass_frequency")]
    pub frequency: f32,
    /// Column heights map into `[1, max_height]` voxels.
    #[serde(default = "default_grass_max_height")]
    pub max_height: i32,
}

fn default_grass_octaves() -> u32 {
    4
}
fn default_grass_persistence() -> f32 {
    0.5
}
fn default_grass_lacunarity() -> f32 {
    2.0
}
fn default_grass_frequency() -> f32 {
    0.015
}
fn default_grass_max_height() -> i32 {
    14
}

impl Default for GrassParams {
    fn default() -> Self {
        Self {
            octaves: default_grass_octaves(),
            persistence: default_grass_persistence(),
            lacunarity: default_grass_lacunarity(),
            frequency: default_grass_frequency(),
            max_height: default_grass_max_height(),
        }
    }
}

/// The terrain fields (`octaves` through `max_height`) must equal the
/// [`GrassParams`] values for water to sit exactly on the grass surface; the
/// defaults are taken from the grass defaults for that reason.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct WaterParams {
    #[serde(default = "default_grass_octaves")]
    pub octaves: u32,
    #[serde(default = "default_grass_persistence")]
    pub persistence: f32,
    #[serde(default = "default_grass_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_grass_frequency")]
    pub frequency: f32,
    #[serde(default = "default_grass_max_height")]
    pub max_height: i32,
    /// Columns whose terrain height falls below this fill with water up to it.
    #[serde(default = "default_sea_level")]
    pub sea_level: i32,
}

fn default_sea_level() -> i32 {
    5
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            octaves: default_grass_octaves(),
            persistence: default_grass_persistence(),
            lacunarity: default_grass_lacunarity(),
            frequency: default_grass_frequency(),
            max_height: default_grass_max_height(),
            sea_level: default_sea_level(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct CloudParams {
    #[serde(default = "default_cloud_octaves")]
    pub octaves: u32,
    #[serde(default = "default_cloud_persistence")]
    pub persistence: f32,
    #[serde(default = "default_cloud_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_cloud_frequency")]
    pub frequency: f32,
    /// Altitude band (local voxel y, inclusive/exclusive) the 3-D field is sampled in.
    #[serde(default = "default_cloud_band_min")]
    pub band_min: i32,
    #[serde(default = "default_cloud_band_max")]
    pub band_max: i32,
    /// Density above which a voxel becomes cloud.
    #[serde(default = "default_cloud_threshold")]
    pub threshold: f32,
}

fn default_cloud_octaves() -> u32 {
    3
}
fn default_cloud_persistence() -> f32 {
    0.6
}
fn default_cloud_lacunarity() -> f32 {
    2.0
}
fn default_cloud_frequency() -> f32 {
    0.03
}
fn default_cloud_band_min() -> i32 {
    26
}
fn default_cloud_band_max() -> i32 {
    30
}
fn default_cloud_threshold() -> f32 {
    0.45
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            octaves: default_cloud_octaves(),
            persistence: default_cloud_persistence(),
            lacunarity: default_cloud_lacunarity(),
            frequency: default_cloud_frequency(),
            band_min: default_cloud_band_min(),
            band_max: default_cloud_band_max(),
            threshold: default_cloud_threshold(),
        }
    }
}

/// Like [`WaterParams`], the terrain fields must match [`GrassParams`] so
/// trunks root at the grass surface; the defaults come from the grass
/// defaults.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct TreeParams {
    #[serde(default = "default_grass_octaves")]
    pub octaves: u32,
    #[serde(default = "default_grass_persistence")]
    pub persistence: f32,
    #[serde(default = "default_grass_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_grass_frequency")]
    pub frequency: f32,
    #[serde(default = "default_grass_max_height")]
    pub max_height: i32,
    /// Columns this close to a chunk border grow no trunks (canopies would clip).
    #[serde(default = "default_tree_margin")]
    pub margin: i32,
    #[serde(default = "default_trunk_height")]
    pub trunk_height: i32,
    #[serde(default = "default_canopy_radius")]
    pub canopy_radius: i32,
    /// Gate-noise value above which a column hosts a tree.
    #[serde(default = "default_tree_gate")]
    pub gate_threshold: f32,
    #[serde(default = "default_gate_frequency")]
    pub gate_frequency: f32,
}

fn default_tree_margin() -> i32 {
    3
}
fn default_trunk_height() -> i32 {
    4
}
fn default_canopy_radius() -> i32 {
    3
}
fn default_tree_gate() -> f32 {
    0.72
}
fn default_gate_frequency() -> f32 {
    0.11
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            octaves: default_grass_octaves(),
            persistence: default_grass_persistence(),
            lacunarity: default_grass_lacunarity(),
            frequency: default_grass_frequency(),
            max_height: default_grass_max_height(),
            margin: default_tree_margin(),
            trunk_height: default_trunk_height(),
            canopy_radius: default_canopy_radius(),
            gate_threshold: default_tree_gate(),
            gate_frequency: default_gate_frequency(),
        }
    }
}

/// Per-generator tuning, loadable from TOML alongside `WorldConfig`. Water
/// and tree heights only line up with the grass surface while their terrain
/// fields stay equal to the grass ones; override them together.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct GenParams {
    #[serde(default)]
    pub grass: GrassParams,
    #[serde(default)]
    pub water: WaterParams,
    #[serde(default)]
    pub cloud: CloudParams,
    #[serde(default)]
    pub tree: TreeParams,
}

impl GenParams {
    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let params: GenParams = toml::from_str(&text)?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = WorldConfig::default();
        assert_eq!(cfg.chunk_size, 32);
        assert_eq!(cfg.chunk_span(), 64.0);
        assert_eq!(cfg.chunk_budget(), 125);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: WorldConfig = toml::from_str("create_radius = 1\ndelete_radius = 2").unwrap();
        assert_eq!(cfg.create_radius, 1);
        assert_eq!(cfg.delete_radius, 2);
        assert_eq!(cfg.chunk_size, 32);

        let gp: GenParams = toml::from_str("[grass]\nmax_height = 9").unwrap();
        assert_eq!(gp.grass.max_height, 9);
        assert_eq!(gp.cloud.band_max, 30);
    }

    #[test]
    fn water_and_tree_terrain_defaults_track_grass() {
        let gp = GenParams::default();
        for (octaves, persistence, lacunarity, frequency, max_height) in [
            (
                gp.water.octaves,
                gp.water.persistence,
                gp.water.lacunarity,
                gp.water.frequency,
                gp.water.max_height,
            ),
            (
                gp.tree.octaves,
                gp.tree.persistence,
                gp.tree.lacunarity,
                gp.tree.frequency,
                gp.tree.max_height,
            ),
        ] {
            assert_eq!(octaves, gp.grass.octaves);
            assert_eq!(persistence, gp.grass.persistence);
            assert_eq!(lacunarity, gp.grass.lacunarity);
            assert_eq!(frequency, gp.grass.frequency);
            assert_eq!(max_height, gp.grass.max_height);
        }
    }
}
