//! Seed salts keeping the generators' noise fields decorrelated. Grass, water
//! and trees share the terrain salt so they agree on column heights.

pub(crate) const TERRAIN_SALT: i32 = 0;
pub(crate) const CLOUD_SALT: i32 = 99_173;
pub(crate) const TREE_GATE_SALT: i32 = 41_337;
