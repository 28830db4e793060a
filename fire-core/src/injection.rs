//! Heat sources: the flame base row and random two-cell hotspots.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::error::FireError;
use crate::grid::{Heat, HeatField};

/// Left cell of an injected hotspot; `(x + 1, y)` is heated as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Hotspot {
    pub x: usize,
    pub y: usize,
}

/// Sets row `height - 2` to `max_heat` across the interior columns.
pub fn ignite_base_row(field: &mut HeatField, max_heat: Heat) {
    let (w, h) = (field.width(), field.height());
    if w < 3 || h < 3 {
        return;
    }
    let y = h - 2;
    for x in 1..(w - 1) {
        field.put(x, y, max_heat);
    }
}

/// Heats `(x, y)` and `(x + 1, y)`.
pub fn inject_hotspot(field: &mut HeatField, spot: Hotspot, max_heat: Heat) {
    field.set(spot.x, spot.y, max_heat);
    field.set(spot.x + 1, spot.y, max_heat);
}

/// Inclusive coordinate ranges random hotspots are drawn from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HotspotRange {
    x: RangeInclusive<usize>,
    y: RangeInclusive<usize>,
}

impl HotspotRange {
    /// `[margin, dim - 1 - margin]` on both axes.
    ///
    /// A zero margin is rejected since the right-hand cell of a hotspot
    /// would fall off the grid.
    pub fn new(width: usize, height: usize, margin: usize) -> Result<HotspotRange, FireError> {
        if margin == 0 {
            return Err(FireError::parameter("hotspot_margin", "must be >= 1"));
        }
        let span = margin.checked_mul(2).and_then(|m| m.checked_add(1));
        if span.is_none_or(|span| width < span || height < span) {
            return Err(FireError::HotspotRangeEmpty {
                width,
                height,
                margin,
            });
        }
        Ok(HotspotRange {
            x: margin..=(width - 1 - margin),
            y: margin..=(height - 1 - margin),
        })
    }

    pub fn contains(&self, spot: Hotspot) -> bool {
        self.x.contains(&spot.x) && self.y.contains(&spot.y)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Hotspot {
        let spot = Hotspot {
            x: rng.gen_range(self.x.clone()),
            y: rng.gen_range(self.y.clone()),
        };
        debug!(x = spot.x, y = spot.y, "hotspot");
        spot
    }
}
