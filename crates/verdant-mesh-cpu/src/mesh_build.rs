use verdant_geom::Vec3;

use crate::face::Face;

/// Vertex/index accumulation the host's mesh uploader consumes: interleaved
/// positions, normals, UVs, and triangle indices.
#[derive(Default, Clone, Debug)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
}

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.idx.clear();
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.idx.reserve(n_quads * 6);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Appends a quad (two triangles) with explicit per-vertex UVs. Winding is
    /// corrected against `n` so front faces always match the face normal.
    pub fn add_quad_uv(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, n: Vec3, mut uvs: [(f32, f32); 4]) {
        let base = (self.pos.len() / 3) as u32;
        let mut vs = [a, d, c, b];
        let e1 = vs[1] - vs[0];
        let e2 = vs[2] - vs[0];
        if e1.cross(e2).dot(n) < 0.0 {
            vs.swap(1, 3);
            uvs.swap(1, 3);
        }
        for i in 0..4 {
            self.pos.extend_from_slice(&[vs[i].x, vs[i].y, vs[i].z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            self.uv.extend_from_slice(&[uvs[i].0, uvs[i].1]);
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Emits a face-aligned square of edge `s` whose plane min-corner is `origin`.
    pub fn add_face_rect(&mut self, face: Face, origin: Vec3, s: f32) {
        let o = origin;
        let (a, b, c, d) = match face {
            Face::PosY => (
                o,
                Vec3::new(o.x + s, o.y, o.z),
                Vec3::new(o.x + s, o.y, o.z + s),
                Vec3::new(o.x, o.y, o.z + s),
            ),
            Face::NegY => (
                Vec3::new(o.x, o.y, o.z + s),
                Vec3::new(o.x + s, o.y, o.z + s),
                Vec3::new(o.x + s, o.y, o.z),
                o,
            ),
            Face::PosX => (
                Vec3::new(o.x, o.y + s, o.z + s),
                Vec3::new(o.x, o.y + s, o.z),
                o,
                Vec3::new(o.x, o.y, o.z + s),
            ),
            Face::NegX => (
                Vec3::new(o.x, o.y + s, o.z),
                Vec3::new(o.x, o.y + s, o.z + s),
                Vec3::new(o.x, o.y, o.z + s),
                o,
            ),
            Face::PosZ => (
                Vec3::new(o.x + s, o.y + s, o.z),
                Vec3::new(o.x, o.y + s, o.z),
                o,
                Vec3::new(o.x + s, o.y, o.z),
            ),
            Face::NegZ => (
                Vec3::new(o.x, o.y + s, o.z),
                Vec3::new(o.x + s, o.y + s, o.z),
                Vec3::new(o.x + s, o.y, o.z),
                o,
            ),
        };
        // UVs anchored to world-space so adjacent faces tile seamlessly.
        let uv_from = |p: Vec3| match face {
            Face::PosY | Face::NegY => (p.x, p.z),
            Face::PosX | Face::NegX => (p.z, p.y),
            Face::PosZ | Face::NegZ => (p.x, p.y),
        };
        let uvs = [uv_from(a), uv_from(d), uv_from(c), uv_from(b)];
        self.add_quad_uv(a, b, c, d, face.normal(), uvs);
    }

    /// Emits one face of the voxel cell at integer grid `(x,y,z)`; the cell
    /// spans `scale` world units per axis (2.0 engine-wide).
    pub fn add_voxel_face(&mut self, face: Face, x: i32, y: i32, z: i32, scale: f32) {
        let min = Vec3::new(x as f32 * scale, y as f32 * scale, z as f32 * scale);
        let origin = match face {
            Face::PosY => Vec3::new(min.x, min.y + scale, min.z),
            Face::PosX => Vec3::new(min.x + scale, min.y, min.z),
            Face::PosZ => Vec3::new(min.x, min.y, min.z + scale),
            Face::NegY | Face::NegX | Face::NegZ => min,
        };
        self.add_face_rect(face, origin, scale);
    }
}
