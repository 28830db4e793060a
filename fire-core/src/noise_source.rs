//! Coherent noise used to modulate cooling, and the offsets that scroll it.

use ::noise::{NoiseFn, OpenSimplex};
use serde::{Deserialize, Serialize};

/// Smooth, bounded noise over continuous coordinates.
///
/// Implementations must return values in `[-1, 1]` and nearby inputs must
/// give nearby outputs, otherwise the cooling pattern degrades to static.
pub trait NoiseSource {
    fn sample2(&self, x: f64, y: f64) -> f64;

    /// Third axis for drifting noise. Defaults to ignoring `z`.
    fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        let _ = z;
        self.sample2(x, y)
    }
}

/// OpenSimplex noise seeded once per run.
#[derive(Clone, Debug)]
pub struct SimplexNoise {
    seed: u32,
    inner: OpenSimplex,
}

impl SimplexNoise {
    pub fn new(seed: u32) -> SimplexNoise {
        SimplexNoise {
            seed,
            inner: OpenSimplex::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl NoiseSource for SimplexNoise {
    fn sample2(&self, x: f64, y: f64) -> f64 {
        self.inner.get([x, y]).clamp(-1.0, 1.0)
    }

    fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.inner.get([x, y, z]).clamp(-1.0, 1.0)
    }
}

/// Same value everywhere. `-1.0` yields zero cooling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    fn sample2(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }
}

/// Per-frame increments applied to [`NoiseOffsets`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetSteps {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for OffsetSteps {
    fn default() -> Self {
        OffsetSteps {
            x: -0.1,
            y: 1.0,
            z: 0.2,
        }
    }
}

/// Accumulated scroll of the noise field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct NoiseOffsets {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl NoiseOffsets {
    pub fn advance(&mut self, steps: &OffsetSteps) {
        self.x += steps.x;
        self.y += steps.y;
        self.z += steps.z;
    }
}
