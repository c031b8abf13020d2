use noise::{NoiseFn, Simplex};

/// A deterministic height function over plane coordinates.
pub trait HeightSource {
    fn height(&self, x: f32, y: f32) -> f32;
}

impl<F> HeightSource for F
where
    F: Fn(f32, f32) -> f32,
{
    fn height(&self, x: f32, y: f32) -> f32 {
        self(x, y)
    }
}

/// 2D simplex noise, seeded once. Output lies roughly in [-1, 1].
pub struct SimplexHeight {
    seed: u32,
    noise: Simplex,
}

impl SimplexHeight {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            noise: Simplex::new(seed),
        }
    }

    /// A fresh seed drawn from the thread RNG.
    pub fn random() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl HeightSource for SimplexHeight {
    fn height(&self, x: f32, y: f32) -> f32 {
        self.noise.get([x as f64, y as f64]) as f32
    }
}

impl std::fmt::Debug for SimplexHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimplexHeight")
            .field("seed", &self.seed)
            .finish()
    }
}
