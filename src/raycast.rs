use verdant_geom::Vec3;
use verdant_items::{AIR, InstanceId};
use verdant_world::{ChunkCoord, WorldConfig};

/// First solid voxel a ray met.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub coord: ChunkCoord,
    pub voxel: (i32, i32, i32),
    /// World-space distance travelled when the voxel was sampled.
    pub distance: f32,
}

/// Unit direction, or `None` for a degenerate (zero/NaN-length) ray.
fn unit(direction: Vec3) -> Option<Vec3> {
    if !direction.is_finite() {
        return None;
    }
    let len = direction.length();
    if !len.is_finite() || len <= f32::EPSILON {
        return None;
    }
    Some(direction / len)
}

/// Chunk coordinate and local voxel coordinate owning world position `p`.
/// Voxel is the local offset divided by the world scale and rounded, so a
/// position within the last half-voxel of a chunk edge resolves one past the
/// valid range; samplers read that as air.
fn locate(p: Vec3, cfg: &WorldConfig) -> (ChunkCoord, (i32, i32, i32)) {
    let span = cfg.chunk_span();
    let coord = ChunkCoord::new(
        p.x.div_euclid(span) as i32,
        p.y.div_euclid(span) as i32,
        p.z.div_euclid(span) as i32,
    );
    let voxel = (
        (p.x.rem_euclid(span) / cfg.world_scale).round() as i32,
        (p.y.rem_euclid(span) / cfg.world_scale).round() as i32,
        (p.z.rem_euclid(span) / cfg.world_scale).round() as i32,
    );
    (coord, voxel)
}

/// Marches `origin + t*direction` in unit steps, sampling each voxel the ray
/// enters, and returns the first non-air voxel within `hit_radius`. `sample`
/// returns `None` for coordinates with no live chunk, which reads as air.
pub fn cast_ray<S>(origin: Vec3, direction: Vec3, cfg: &WorldConfig, sample: S) -> Option<RayHit>
where
    S: Fn(ChunkCoord, (i32, i32, i32)) -> Option<InstanceId>,
{
    let dir = unit(direction)?;
    let mut pos = origin;
    let mut distance = 0.0f32;
    let mut last = None;
    while distance <= cfg.hit_radius {
        let (coord, voxel) = locate(pos, cfg);
        if last != Some((coord, voxel)) {
            last = Some((coord, voxel));
            if let Some(id) = sample(coord, voxel)
                && id != AIR
            {
                return Some(RayHit {
                    coord,
                    voxel,
                    distance,
                });
            }
        }
        pos += dir;
        distance += 1.0;
    }
    None
}

/// Placement site for an added block: runs the forward cast, then walks back
/// from the hit in half-step increments to the first cell that is not solid.
/// Returns `None` when the forward cast misses, when the walk reaches the ray
/// origin, or when the first non-solid cell has no live chunk to write into.
pub fn find_placement<S>(
    origin: Vec3,
    direction: Vec3,
    cfg: &WorldConfig,
    sample: S,
) -> Option<(ChunkCoord, (i32, i32, i32))>
where
    S: Fn(ChunkCoord, (i32, i32, i32)) -> Option<InstanceId>,
{
    let dir = unit(direction)?;
    let hit = cast_ray(origin, direction, cfg, |c, v| sample(c, v))?;
    let mut pos = origin + dir * hit.distance;
    let mut travelled = hit.distance;
    let mut last = Some((hit.coord, hit.voxel));
    while travelled > 0.0 {
        pos -= dir * 0.5;
        travelled -= 0.5;
        let (coord, voxel) = locate(pos, cfg);
        if last == Some((coord, voxel)) {
            continue;
        }
        last = Some((coord, voxel));
        match sample(coord, voxel) {
            Some(id) if id != AIR => continue,
            Some(_) => return Some((coord, voxel)),
            None => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> WorldConfig {
        WorldConfig::default()
    }

    #[test]
    fn degenerate_directions_miss() {
        let solid = |_c: ChunkCoord, _v: (i32, i32, i32)| Some(3u16);
        let origin = Vec3::new(1.0, 1.0, 1.0);
        assert!(cast_ray(origin, Vec3::ZERO, &cfg(), solid).is_none());
        assert!(cast_ray(origin, Vec3::new(f32::NAN, 0.0, 0.0), &cfg(), solid).is_none());
    }

    #[test]
    fn misses_past_hit_radius() {
        let air = |_c: ChunkCoord, _v: (i32, i32, i32)| Some(AIR);
        let hit = cast_ray(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), &cfg(), air);
        assert!(hit.is_none());
    }

    #[test]
    fn finds_first_solid_voxel_along_axis() {
        // Solid wall at voxel x >= 10 in chunk (0,0,0).
        let sample = |c: ChunkCoord, v: (i32, i32, i32)| {
            if c == ChunkCoord::new(0, 0, 0) && v.0 >= 10 {
                Some(7u16)
            } else {
                Some(AIR)
            }
        };
        let hit = cast_ray(
            Vec3::new(0.0, 4.0, 4.0),
            Vec3::new(2.0, 0.0, 0.0),
            &cfg(),
            sample,
        )
        .unwrap();
        assert_eq!(hit.coord, ChunkCoord::new(0, 0, 0));
        assert_eq!(hit.voxel.0, 10);
        assert_eq!(hit.voxel.1, 2);
        assert_eq!(hit.voxel.2, 2);
    }

    #[test]
    fn ray_crosses_chunk_borders() {
        // Nothing solid until chunk (1,0,0).
        let sample = |c: ChunkCoord, _v: (i32, i32, i32)| {
            if c.cx >= 1 { Some(5u16) } else { Some(AIR) }
        };
        let mut cfg = cfg();
        cfg.hit_radius = 200.0;
        let hit = cast_ray(
            Vec3::new(0.5, 1.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            &cfg,
            sample,
        )
        .unwrap();
        assert_eq!(hit.coord, ChunkCoord::new(1, 0, 0));
    }

    #[test]
    fn placement_lands_on_the_near_side_of_the_hit() {
        let sample = |c: ChunkCoord, v: (i32, i32, i32)| {
            if c == ChunkCoord::new(0, 0, 0) && v.0 >= 10 {
                Some(7u16)
            } else {
                Some(AIR)
            }
        };
        let (coord, voxel) = find_placement(
            Vec3::new(0.0, 4.0, 4.0),
            Vec3::new(1.0, 0.0, 0.0),
            &cfg(),
            sample,
        )
        .unwrap();
        assert_eq!(coord, ChunkCoord::new(0, 0, 0));
        assert_eq!(voxel, (9, 2, 2));
    }

    #[test]
    fn placement_requires_a_live_chunk() {
        // The wall sits at the -X edge of chunk (1,0,0); walking back exits
        // into chunk (0,0,0), which is not live.
        let sample = |c: ChunkCoord, v: (i32, i32, i32)| {
            if c == ChunkCoord::new(1, 0, 0) {
                if v.0 == 0 { Some(7u16) } else { Some(AIR) }
            } else {
                None
            }
        };
        let mut cfg = cfg();
        cfg.hit_radius = 200.0;
        let placed = find_placement(
            Vec3::new(2.0, 1.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            &cfg,
            sample,
        );
        assert!(placed.is_none());
    }
}
