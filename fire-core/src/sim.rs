//! The simulation state owned by a frame driver.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, trace};

use crate::color::Rgb;
use crate::config::FireConfig;
use crate::diffusion::DiffusionStep;
use crate::error::FireError;
use crate::grid::{HeatBuffers, HeatField};
use crate::injection::{Hotspot, HotspotRange, ignite_base_row, inject_hotspot};
use crate::input::Action;
use crate::noise_source::{NoiseOffsets, NoiseSource, SimplexNoise};
use crate::raster::{Surface, rasterize};

/// Heat buffers, noise, offsets and randomness for one running effect.
///
/// A frame is [`FireSim::draw`] followed by [`FireSim::finish_frame`]:
///
/// ```
/// use fire_core::{FireConfig, FireSim, PixelBuffer};
///
/// let config = FireConfig::default();
/// let mut sim = FireSim::seeded(config.clone(), 7).unwrap();
/// let mut surface = PixelBuffer::new(config.screen_width, config.screen_height);
/// for _ in 0..3 {
///     sim.draw(&mut surface);
///     sim.finish_frame();
/// }
/// assert_eq!(sim.frame(), 3);
/// ```
pub struct FireSim<R> {
    config: FireConfig,
    buffers: HeatBuffers,
    offsets: NoiseOffsets,
    noise: Box<dyn NoiseSource>,
    rng: R,
    hotspots: HotspotRange,
    frame: u64,
}

impl FireSim<ChaCha8Rng> {
    /// Builds a simulation whose randomness, noise seed included, is fully
    /// determined by `seed`.
    pub fn seeded(config: FireConfig, seed: u64) -> Result<FireSim<ChaCha8Rng>, FireError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let noise = SimplexNoise::new(rng.next_u32());
        info!(seed, noise_seed = noise.seed(), "seeded fire simulation");
        FireSim::new(config, Box::new(noise), rng)
    }
}

impl<R: Rng> FireSim<R> {
    pub fn new(
        config: FireConfig,
        noise: Box<dyn NoiseSource>,
        rng: R,
    ) -> Result<FireSim<R>, FireError> {
        config.validate()?;
        let (w, h) = (config.grid_width(), config.grid_height());
        let hotspots = HotspotRange::new(w, h, config.hotspot_margin)?;

        info!(
            "fire simulation: {}x{} cells of {}px, max_heat={}, alignment={:?}, noise={:?}",
            w, h, config.grid_size, config.max_heat, config.row_alignment, config.noise_mode
        );

        Ok(FireSim {
            buffers: HeatBuffers::new(w, h),
            offsets: NoiseOffsets::default(),
            noise,
            rng,
            hotspots,
            frame: 0,
            config,
        })
    }

    // ---- Accessors ----

    pub fn config(&self) -> &FireConfig {
        &self.config
    }

    pub fn width(&self) -> usize {
        self.buffers.width()
    }

    pub fn height(&self) -> usize {
        self.buffers.height()
    }

    pub fn offsets(&self) -> NoiseOffsets {
        self.offsets
    }

    /// Completed diffusion passes.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The most recently computed field, which is also where injection lands.
    pub fn field(&self) -> &HeatField {
        self.buffers.previous()
    }

    /// Mutable access to the field the next pass reads from.
    pub fn field_mut(&mut self) -> &mut HeatField {
        self.buffers.previous_mut()
    }

    // ---- Frame steps ----

    fn diffusion_step(&self) -> DiffusionStep {
        DiffusionStep {
            feature_size: self.config.feature_size,
            offsets: self.offsets,
            cooling: self.config.cooling,
            alignment: self.config.row_alignment,
            noise_mode: self.config.noise_mode,
        }
    }

    /// Diffuses the previous field into the current one and swaps them.
    pub fn advance(&mut self) {
        let step = self.diffusion_step();
        let (src, dst) = self.buffers.split();
        step.apply(src, dst, self.noise.as_ref());
        self.buffers.swap();
        self.frame += 1;
        trace!(frame = self.frame, "diffused");
    }

    /// Clears `surface` and draws [`FireSim::field`] onto it.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear(Rgb::BLACK);
        rasterize(
            self.buffers.previous(),
            self.config.grid_size,
            self.config.max_heat,
            surface,
        );
    }

    /// One diffusion pass followed by rendering its result.
    pub fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.advance();
        self.render(surface);
    }

    pub fn ignite_base(&mut self) {
        ignite_base_row(self.buffers.previous_mut(), self.config.max_heat);
    }

    pub fn inject_random_hotspot(&mut self) -> Hotspot {
        let spot = self.hotspots.sample(&mut self.rng);
        inject_hotspot(self.buffers.previous_mut(), spot, self.config.max_heat);
        spot
    }

    /// End-of-frame bookkeeping: refuel the base row, scroll the noise and
    /// drop one random hotspot. Returns the hotspot.
    pub fn finish_frame(&mut self) -> Hotspot {
        self.ignite_base();
        self.offsets.advance(&self.config.offset_steps);
        self.inject_random_hotspot()
    }

    /// Applies the simulation side of an input action. Returns `false` once
    /// the driver should stop.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Exit => false,
            Action::InjectHotspot => {
                self.inject_random_hotspot();
                true
            }
            Action::TogglePause | Action::ToggleHud => true,
        }
    }

    /// Zeroes both fields and the offsets. Frame count is kept.
    pub fn reset(&mut self) {
        self.buffers.clear();
        self.offsets = NoiseOffsets::default();
    }
}
