//! Geometry primitives for the terrain crates: vectors, boxes, and the camera frustum.
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }

    /// True when every component is a real number (no NaN/inf).
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn center(self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Plane in the form `n . p + d = 0`; `n` points toward the inside half-space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub n: Vec3,
    pub d: f32,
}

impl Plane {
    #[inline]
    pub fn from_point_normal(point: Vec3, n: Vec3) -> Self {
        let n = n.normalized();
        Self { n, d: -n.dot(point) }
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.n.dot(p) + self.d
    }
}

/// Camera view volume as six inward-facing planes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Builds the frustum of a perspective camera. `forward` need not be unit length;
    /// `fov_y_deg` is the full vertical field of view.
    pub fn from_camera(
        eye: Vec3,
        forward: Vec3,
        up: Vec3,
        fov_y_deg: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let fwd = forward.normalized();
        let right = fwd.cross(up).normalized();
        let up = right.cross(fwd).normalized();

        let half_v = (fov_y_deg.to_radians() * 0.5).tan() * far;
        let half_h = half_v * aspect;
        let to_far = fwd * far;

        let near_p = Plane::from_point_normal(eye + fwd * near, fwd);
        let far_p = Plane::from_point_normal(eye + to_far, -fwd);
        // Side planes pass through the eye; normals derived from the far-plane edge vectors.
        let right_p = Plane::from_point_normal(eye, up.cross(to_far + right * half_h));
        let left_p = Plane::from_point_normal(eye, (to_far - right * half_h).cross(up));
        let top_p = Plane::from_point_normal(eye, (to_far + up * half_v).cross(right));
        let bottom_p = Plane::from_point_normal(eye, right.cross(to_far - up * half_v));

        Self {
            planes: [near_p, far_p, left_p, right_p, top_p, bottom_p],
        }
    }

    /// Conservative AABB test: false only when the box is fully outside some
    /// plane.
    pub fn intersects_aabb(&self, aabb: Aabb) -> bool {
        for plane in &self.planes {
            // Farthest-along-the-normal corner of the box.
            let p = Vec3::new(
                if plane.n.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.n.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.n.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            if plane.signed_distance(p) < 0.0 {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // The prop_assume! filters below reject more samples than the
        // default cap of 1024 allows.
        #![proptest_config(ProptestConfig {
            max_global_rejects: 65536,
            ..ProptestConfig::default()
        })]

        #[test]
        fn dot_commutes(a: Vec3, b: Vec3) {
            prop_assume!(a.is_finite() && b.is_finite());
            prop_assume!(a.dot(b).is_finite());
            prop_assert_eq!(a.dot(b), b.dot(a));
        }

        #[test]
        fn cross_anticommutes(a: Vec3, b: Vec3) {
            prop_assume!(a.is_finite() && b.is_finite());
            prop_assume!(a.cross(b).is_finite());
            prop_assert_eq!(a.cross(b), -(b.cross(a)));
        }

        #[test]
        fn cross_is_orthogonal_to_unit_inputs(a: Vec3, b: Vec3) {
            prop_assume!(a.is_finite() && b.is_finite());
            prop_assume!(a.length() > 1e-3 && b.length() > 1e-3);
            let (a, b) = (a.normalized(), b.normalized());
            let c = a.cross(b);
            prop_assume!(c.length() > 1e-3);
            prop_assert!(c.dot(a).abs() < 1e-3);
            prop_assert!(c.dot(b).abs() < 1e-3);
        }

        #[test]
        fn normalized_has_unit_length(a: Vec3) {
            prop_assume!(a.is_finite());
            prop_assume!(a.length() > 1e-3 && a.length() < 1e12);
            prop_assert!((a.normalized().length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn aabb_center_is_the_midpoint() {
        let aabb = Aabb::new(Vec3::new(-2.0, 0.0, 4.0), Vec3::new(2.0, 6.0, 8.0));
        assert_eq!(aabb.center(), Vec3::new(0.0, 3.0, 6.0));
    }
}
