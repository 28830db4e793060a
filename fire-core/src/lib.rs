//! Cellular heat-diffusion fire effect.
//!
//! A grid of integer heat values is averaged over its four neighbours each
//! frame, cooled by scrolling simplex noise, refuelled along a base row and
//! at random hotspots, and drawn as a black-red-yellow raster. Platform
//! glue (terminal, browser canvas) only needs to implement [`Surface`] and
//! translate its events into [`InputEvent`]s.

mod color;
mod config;
mod diffusion;
mod error;
mod grid;
mod injection;
mod input;
mod noise_source;
mod raster;
mod sim;

pub use color::{Rgb, heat_color, rescale};
pub use config::FireConfig;
pub use diffusion::{CoolingCurve, DiffusionStep, NoiseMode, RowAlignment, remap_unit};
pub use error::FireError;
pub use grid::{FieldStats, Heat, HeatBuffers, HeatField};
pub use injection::{Hotspot, HotspotRange, ignite_base_row, inject_hotspot};
pub use input::{Action, Binding, InputEvent, Key, KeyBindings, KeyPhase};
pub use noise_source::{ConstantNoise, NoiseOffsets, NoiseSource, OffsetSteps, SimplexNoise};
pub use raster::{PixelBuffer, Rect, Surface, rasterize};
pub use sim::FireSim;
