//! Heat to fire-colour mapping.

use crate::grid::Heat;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    pub const fn gray(v: u8) -> Rgb {
        Rgb { r: v, g: v, b: v }
    }
}

// Green channel ramp: brightness [1, 255] maps onto [30, 210], boosted and
// capped so the hottest cells saturate to yellow.
const GREEN_FLOOR: f64 = 30.0;
const GREEN_CEIL: f64 = 210.0;
const GREEN_GAIN: f64 = 1.1;

/// Linear map of `n` from `[min_n, max_n]` onto `[min, max]`. Not clamped.
pub fn rescale(n: f64, min_n: f64, max_n: f64, min: f64, max: f64) -> f64 {
    ((n - min_n) / (max_n - min_n)) * (max - min) + min
}

/// Colour of a cell: black when cold, otherwise full red with green rising
/// with heat (red, orange, yellow).
pub fn heat_color(heat: Heat, max_heat: Heat) -> Rgb {
    let brightness = rescale(f64::from(heat), 0.0, f64::from(max_heat), 0.0, 255.0);
    if brightness > 0.0 {
        let g = (rescale(brightness, 1.0, 255.0, GREEN_FLOOR, GREEN_CEIL) * GREEN_GAIN)
            .min(GREEN_CEIL);
        Rgb::new(255, g as u8, 0)
    } else {
        Rgb::gray(brightness as u8)
    }
}
