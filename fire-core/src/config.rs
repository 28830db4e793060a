use serde::{Deserialize, Serialize};

use crate::diffusion::{CoolingCurve, NoiseMode, RowAlignment};
use crate::error::FireError;
use crate::grid::Heat;
use crate::noise_source::OffsetSteps;

/// Every tunable of the effect. Fixed once a simulation is built.
///
/// Deserialises with per-field defaults, so a config file only needs the
/// keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    /// Surface width in pixels.
    pub screen_width: u32,
    /// Surface height in pixels.
    pub screen_height: u32,
    /// Side of one grid cell in pixels.
    pub grid_size: u32,
    pub max_heat: Heat,
    /// Spatial scale divisor for noise lookups; larger is smoother.
    pub feature_size: f64,
    pub offset_steps: OffsetSteps,
    pub cooling: CoolingCurve,
    /// Distance of random hotspots from the grid edge, in cells.
    pub hotspot_margin: usize,
    pub row_alignment: RowAlignment,
    pub noise_mode: NoiseMode,
}

impl Default for FireConfig {
    fn default() -> Self {
        FireConfig {
            screen_width: 500,
            screen_height: 500,
            grid_size: 2,
            max_heat: 250,
            feature_size: 10.0,
            offset_steps: OffsetSteps::default(),
            cooling: CoolingCurve::default(),
            hotspot_margin: 10,
            row_alignment: RowAlignment::default(),
            noise_mode: NoiseMode::default(),
        }
    }
}

fn finite(name: &'static str, v: f64) -> Result<f64, FireError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FireError::parameter(name, format!("must be finite (got {v})")))
    }
}

impl FireConfig {
    /// Grid columns, `screen_width / grid_size`.
    pub fn grid_width(&self) -> usize {
        self.screen_width.checked_div(self.grid_size).unwrap_or(0) as usize
    }

    /// Grid rows, `screen_height / grid_size`.
    pub fn grid_height(&self) -> usize {
        self.screen_height.checked_div(self.grid_size).unwrap_or(0) as usize
    }

    pub fn validate(&self) -> Result<(), FireError> {
        for (name, value) in [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("grid_size", self.grid_size),
            ("max_heat", self.max_heat),
        ] {
            if value == 0 {
                return Err(FireError::InvalidDimension { name, value });
            }
        }

        let (w, h) = (self.grid_width(), self.grid_height());
        if w < 3 || h < 3 {
            return Err(FireError::GridTooSmall {
                width: w,
                height: h,
            });
        }

        if finite("feature_size", self.feature_size)? <= 0.0 {
            return Err(FireError::parameter("feature_size", "must be > 0"));
        }
        finite("offset_steps.x", self.offset_steps.x)?;
        finite("offset_steps.y", self.offset_steps.y)?;
        finite("offset_steps.z", self.offset_steps.z)?;

        let threshold = finite("cooling.cold_snap_threshold", self.cooling.cold_snap_threshold)?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(FireError::parameter(
                "cooling.cold_snap_threshold",
                "must lie in [0, 1]",
            ));
        }
        if finite("cooling.cold_snap_cooling", self.cooling.cold_snap_cooling)? < 0.0 {
            return Err(FireError::parameter("cooling.cold_snap_cooling", "must be >= 0"));
        }
        if finite("cooling.max_cooling", self.cooling.max_cooling)? < 0.0 {
            return Err(FireError::parameter("cooling.max_cooling", "must be >= 0"));
        }

        crate::injection::HotspotRange::new(w, h, self.hotspot_margin).map(|_| ())
    }
}
