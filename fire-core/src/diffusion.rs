//! The per-frame diffusion and cooling pass.
//!
//! Every interior cell becomes the truncated average of its four orthogonal
//! neighbours in the source field, minus a cooling term read from the noise
//! field at the cell's scrolled position. Border cells are never written.

use serde::{Deserialize, Serialize};

use crate::color::rescale;
use crate::grid::{Heat, HeatField};
use crate::noise_source::{NoiseOffsets, NoiseSource};

/// Where the value computed for `(x, y)` is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAlignment {
    /// Store at `(x, y - 1)`: heat climbs one row per frame. Results that
    /// would land on the top border row are dropped.
    #[default]
    Rising,
    /// Store at `(x, y)`: plain symmetric diffusion.
    InPlace,
}

/// Dimensionality of the cooling noise lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseMode {
    /// 2D lookup at the scrolled `(x, y)` position.
    #[default]
    Planar,
    /// 3D lookup, using the z offset as a slowly drifting third axis.
    Drifting,
}

/// Maps remapped noise in `[0, 1]` to a cooling amount.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoolingCurve {
    /// Remapped noise strictly above this triggers a cold snap.
    pub cold_snap_threshold: f64,
    /// Cooling applied during a cold snap.
    pub cold_snap_cooling: f64,
    /// Cooling at remapped noise `1.0` on the linear part of the curve.
    pub max_cooling: f64,
}

impl Default for CoolingCurve {
    fn default() -> Self {
        CoolingCurve {
            cold_snap_threshold: 0.95,
            cold_snap_cooling: 10.0,
            max_cooling: 2.0,
        }
    }
}

impl CoolingCurve {
    pub fn cooling(&self, remapped: f64) -> f64 {
        if remapped > self.cold_snap_threshold {
            self.cold_snap_cooling
        } else {
            rescale(remapped, 0.0, 1.0, 0.0, self.max_cooling)
        }
    }
}

/// Noise output `[-1, 1]` to `[0, 1]`.
pub fn remap_unit(v: f64) -> f64 {
    (v + 1.0) / 2.0
}

/// Parameters of one diffusion pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffusionStep {
    pub feature_size: f64,
    pub offsets: NoiseOffsets,
    pub cooling: CoolingCurve,
    pub alignment: RowAlignment,
    pub noise_mode: NoiseMode,
}

impl DiffusionStep {
    /// Cooling for cell `(x, y)` at the current offsets.
    pub fn cooling_at(&self, noise: &dyn NoiseSource, x: usize, y: usize) -> f64 {
        let nx = (x as f64 + self.offsets.x) / self.feature_size;
        let ny = (y as f64 + self.offsets.y) / self.feature_size;
        let v = match self.noise_mode {
            NoiseMode::Planar => noise.sample2(nx, ny),
            NoiseMode::Drifting => noise.sample3(nx, ny, self.offsets.z / self.feature_size),
        };
        self.cooling.cooling(remap_unit(v))
    }

    /// Writes the diffused, cooled `src` into `dst`.
    ///
    /// `dst` cells that this pass targets are overwritten regardless of
    /// their prior contents; all other `dst` cells are left as they were.
    pub fn apply(&self, src: &HeatField, dst: &mut HeatField, noise: &dyn NoiseSource) {
        debug_assert_eq!(src.width(), dst.width());
        debug_assert_eq!(src.height(), dst.height());
        let (w, h) = (src.width(), src.height());
        if w < 3 || h < 3 {
            return;
        }

        for x in 1..(w - 1) {
            for y in 1..(h - 1) {
                let target_y = match self.alignment {
                    RowAlignment::Rising => y - 1,
                    RowAlignment::InPlace => y,
                };
                if target_y == 0 {
                    continue;
                }

                let sum = u64::from(src.at(x - 1, y))
                    + u64::from(src.at(x + 1, y))
                    + u64::from(src.at(x, y - 1))
                    + u64::from(src.at(x, y + 1));
                let avg = (sum / 4) as f64;

                let cooled = (avg - self.cooling_at(noise, x, y)).max(0.0);
                dst.put(x, target_y, cooled as Heat);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_source::{ConstantNoise, SimplexNoise};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    // Noise value -1 remaps to 0, which the default curve turns into zero cooling.
    const NO_COOLING: ConstantNoise = ConstantNoise(-1.0);

    fn step(alignment: RowAlignment) -> DiffusionStep {
        DiffusionStep {
            feature_size: 10.0,
            offsets: NoiseOffsets::default(),
            cooling: CoolingCurve::default(),
            alignment,
            noise_mode: NoiseMode::Planar,
        }
    }

    fn random_field(w: usize, h: usize, seed: u64) -> HeatField {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut field = HeatField::new(w, h);
        for y in 0..h {
            for x in 0..w {
                field.set(x, y, rng.gen_range(0..=250));
            }
        }
        field
    }

    #[test]
    fn test_cooling_curve() {
        let curve = CoolingCurve::default();
        assert_eq!(curve.cooling(0.0), 0.0);
        assert_eq!(curve.cooling(0.5), 1.0);
        assert_eq!(curve.cooling(0.95), 1.9);
        assert_eq!(curve.cooling(0.951), 10.0);
        assert_eq!(curve.cooling(1.0), 10.0);
    }

    #[test]
    fn test_remap_unit() {
        assert_eq!(remap_unit(-1.0), 0.0);
        assert_eq!(remap_unit(0.0), 0.5);
        assert_eq!(remap_unit(1.0), 1.0);
    }

    #[test]
    fn test_zero_field_stays_zero() {
        for alignment in [RowAlignment::Rising, RowAlignment::InPlace] {
            let src = HeatField::new(12, 9);
            let mut dst = HeatField::new(12, 9);
            step(alignment).apply(&src, &mut dst, &NO_COOLING);
            assert!(dst.cells().iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn test_neighbor_average_truncates() {
        let mut src = HeatField::new(7, 7);
        src.set(2, 3, 10);
        src.set(4, 3, 21);
        src.set(3, 2, 3);
        src.set(3, 4, 7);

        let mut dst = HeatField::new(7, 7);
        step(RowAlignment::InPlace).apply(&src, &mut dst, &NO_COOLING);
        assert_eq!(dst.get(3, 3), Some((10 + 21 + 3 + 7) / 4));

        let mut dst = HeatField::new(7, 7);
        step(RowAlignment::Rising).apply(&src, &mut dst, &NO_COOLING);
        assert_eq!(dst.get(3, 2), Some(10));
    }

    #[test]
    fn test_fractional_cooling_truncates() {
        let mut src = HeatField::new(5, 5);
        src.set(2, 3, 250);
        let mut dst = HeatField::new(5, 5);
        // remapped 0.25 -> cooling 0.5; 62 - 0.5 truncates to 61
        step(RowAlignment::InPlace).apply(&src, &mut dst, &ConstantNoise(-0.5));
        assert_eq!(dst.get(2, 2), Some(61));
    }

    #[test]
    fn test_clamps_at_zero() {
        let mut src = HeatField::new(5, 5);
        src.set(1, 2, 12);
        let mut dst = HeatField::new(5, 5);
        dst.fill(99);
        // noise 1.0 remaps above the threshold: cooling 10 against avg 3
        step(RowAlignment::InPlace).apply(&src, &mut dst, &ConstantNoise(1.0));
        assert_eq!(dst.get(2, 2), Some(0));
        for y in 1..4 {
            for x in 1..4 {
                assert_eq!(dst.get(x, y), Some(0));
            }
        }
    }

    #[test]
    fn test_cold_snap_applies_in_pass() {
        let mut src = HeatField::new(5, 5);
        for x in 0..5 {
            src.set(x, 3, 200);
        }
        let mut dst = HeatField::new(5, 5);
        // 0.902 remaps to 0.951
        step(RowAlignment::InPlace).apply(&src, &mut dst, &ConstantNoise(0.902));
        // (200 + 200 + 0 + 0) / 4 = 100, minus the cold snap
        assert_eq!(dst.get(2, 3), Some(90));
    }

    #[test]
    fn test_borders_untouched() {
        let src = random_field(16, 12, 3);
        let noise = SimplexNoise::new(99);
        for alignment in [RowAlignment::Rising, RowAlignment::InPlace] {
            let mut dst = random_field(16, 12, 4);
            let before = dst.clone();
            step(alignment).apply(&src, &mut dst, &noise);
            for (x, y, h) in before.iter() {
                if before.is_border(x, y) {
                    assert_eq!(dst.get(x, y), Some(h), "border ({x}, {y}) changed");
                }
            }
        }
    }

    #[test]
    fn test_rising_leaves_base_row_stale() {
        let src = random_field(10, 10, 8);
        let mut dst = HeatField::new(10, 10);
        dst.fill(7);
        step(RowAlignment::Rising).apply(&src, &mut dst, &NO_COOLING);
        for x in 1..9 {
            assert_eq!(dst.get(x, 8), Some(7));
        }
    }

    #[test]
    fn test_output_never_exceeds_inputs() {
        let src = random_field(20, 20, 11);
        let peak = src.stats().peak;
        let mut dst = HeatField::new(20, 20);
        step(RowAlignment::Rising).apply(&src, &mut dst, &NO_COOLING);
        assert!(dst.stats().peak <= peak);
    }

    #[test]
    fn test_drifting_mode_reads_z_offset() {
        let mut src = HeatField::new(8, 8);
        src.fill(200);
        let noise = SimplexNoise::new(5);
        let mut planar = step(RowAlignment::InPlace);
        planar.offsets.z = 37.0;
        let mut drifting = planar;
        drifting.noise_mode = NoiseMode::Drifting;

        let mut a = HeatField::new(8, 8);
        let mut b = HeatField::new(8, 8);
        planar.apply(&src, &mut a, &noise);
        drifting.apply(&src, &mut b, &noise);
        assert_ne!(a, b);
    }
}
