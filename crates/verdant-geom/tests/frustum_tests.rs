use verdant_geom::{Aabb, Frustum, Vec3};

fn unit_box_at(center: Vec3) -> Aabb {
    Aabb::new(center - Vec3::splat(0.5), center + Vec3::splat(0.5))
}

fn looking_down_x() -> Frustum {
    Frustum::from_camera(
        Vec3::ZERO,
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::UP,
        70.0,
        16.0 / 9.0,
        0.1,
        100.0,
    )
}

#[test]
fn box_ahead_is_inside() {
    let f = looking_down_x();
    assert!(f.intersects_aabb(unit_box_at(Vec3::new(10.0, 0.0, 0.0))));
}

#[test]
fn box_behind_is_outside() {
    let f = looking_down_x();
    assert!(!f.intersects_aabb(unit_box_at(Vec3::new(-10.0, 0.0, 0.0))));
}

#[test]
fn box_past_far_plane_is_outside() {
    let f = looking_down_x();
    assert!(!f.intersects_aabb(unit_box_at(Vec3::new(150.0, 0.0, 0.0))));
}

#[test]
fn box_far_off_axis_is_outside() {
    let f = looking_down_x();
    // Well outside a 70-degree cone at this depth.
    assert!(!f.intersects_aabb(unit_box_at(Vec3::new(5.0, 0.0, 80.0))));
    assert!(!f.intersects_aabb(unit_box_at(Vec3::new(5.0, 80.0, 0.0))));
}

#[test]
fn box_straddling_a_side_plane_intersects() {
    let f = looking_down_x();
    // Large box centered off-axis but overlapping the cone.
    let b = Aabb::new(Vec3::new(9.0, -1.0, -30.0), Vec3::new(11.0, 1.0, 1.0));
    assert!(f.intersects_aabb(b));
}

#[test]
fn eye_containing_box_intersects() {
    let f = looking_down_x();
    assert!(f.intersects_aabb(unit_box_at(Vec3::new(0.3, 0.0, 0.0))));
}
