use verdant_geom::Vec3;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

pub const ALL_FACES: [Face; 6] = [
    Face::PosY,
    Face::NegY,
    Face::PosX,
    Face::NegX,
    Face::PosZ,
    Face::NegZ,
];

impl Face {
    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// All six faces in index order.
    #[inline]
    pub fn all() -> [Face; 6] {
        ALL_FACES
    }

    /// Returns the unit-normal vector for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    /// Returns the integer grid delta `(dx,dy,dz)` of the neighbor behind this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }
}
