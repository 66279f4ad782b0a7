use fastnoise_lite::{FastNoiseLite, NoiseType};

/// Seeded coherent-noise field with explicit fractal accumulation.
///
/// Octave count, persistence, and lacunarity are call-site parameters so each
/// generator keeps its own shaping; outputs are deterministic for a given
/// seed and inputs.
pub struct NoiseField {
    base: FastNoiseLite,
    frequency: f32,
}

impl NoiseField {
    pub fn new(seed: i32, frequency: f32) -> Self {
        let mut base = FastNoiseLite::with_seed(seed);
        base.set_noise_type(Some(NoiseType::OpenSimplex2));
        // Frequency is applied by hand in the octave loop.
        base.set_frequency(Some(1.0));
        Self { base, frequency }
    }

    /// Salted sub-field, for decorrelated concerns sharing one world seed.
    pub fn with_salt(seed: i32, salt: i32, frequency: f32) -> Self {
        Self::new(seed ^ salt, frequency)
    }

    /// 2-D fractal Brownian motion, normalized to roughly [-1, 1].
    pub fn fbm2(&self, x: f32, z: f32, octaves: u32, persistence: f32, lacunarity: f32) -> f32 {
        let mut sum = 0.0f32;
        let mut amp = 1.0f32;
        let mut freq = self.frequency;
        let mut norm = 0.0f32;
        for _ in 0..octaves.max(1) {
            sum += self.base.get_noise_2d(x * freq, z * freq) * amp;
            norm += amp;
            amp *= persistence;
            freq *= lacunarity;
        }
        if norm > 0.0 { sum / norm } else { 0.0 }
    }

    /// 3-D variant of [`fbm2`](Self::fbm2).
    pub fn fbm3(
        &self,
        x: f32,
        y: f32,
        z: f32,
        octaves: u32,
        persistence: f32,
        lacunarity: f32,
    ) -> f32 {
        let mut sum = 0.0f32;
        let mut amp = 1.0f32;
        let mut freq = self.frequency;
        let mut norm = 0.0f32;
        for _ in 0..octaves.max(1) {
            sum += self.base.get_noise_3d(x * freq, y * freq, z * freq) * amp;
            norm += amp;
            amp *= persistence;
            freq *= lacunarity;
        }
        if norm > 0.0 { sum / norm } else { 0.0 }
    }

    /// fbm2 remapped to [0, 1].
    #[inline]
    pub fn fbm2_01(&self, x: f32, z: f32, octaves: u32, persistence: f32, lacunarity: f32) -> f32 {
        ((self.fbm2(x, z, octaves, persistence, lacunarity) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// fbm3 remapped to [0, 1].
    #[inline]
    pub fn fbm3_01(
        &self,
        x: f32,
        y: f32,
        z: f32,
        octaves: u32,
        persistence: f32,
        lacunarity: f32,
    ) -> f32 {
        ((self.fbm3(x, y, z, octaves, persistence, lacunarity) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}
