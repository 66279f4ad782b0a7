use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// Chebyshev distance: max per-axis absolute difference. This is the
    /// radius metric for both eviction and build scheduling.
    #[inline]
    pub fn chebyshev(self, other: ChunkCoord) -> i32 {
        let dx = (self.cx - other.cx).abs();
        let dy = (self.cy - other.cy).abs();
        let dz = (self.cz - other.cz).abs();
        dx.max(dy).max(dz)
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}
