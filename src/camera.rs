use verdant_geom::{Frustum, Vec3};

/// Viewpoint collaborator: where the viewer stands, what it can see, and how
/// a cursor position becomes a world-space pick ray. Implemented by the host
/// engine's camera.
pub trait ViewCamera {
    fn eye(&self) -> Vec3;
    fn frustum(&self) -> Frustum;
    /// World-space `(origin, direction)` for a cursor position in pixels.
    fn pick_ray(&self, cursor: (f32, f32)) -> (Vec3, Vec3);
}
