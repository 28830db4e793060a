mod record;
mod term;

use clap::{Parser, ValueEnum};
use fire_core::{FireConfig, FireSim, NoiseMode, RowAlignment};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON config file; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Surface width in pixels (defaults to the terminal width)
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels (defaults to twice the terminal height)
    #[arg(long)]
    height: Option<u32>,

    /// Side of one grid cell in pixels
    #[arg(long)]
    grid_size: Option<u32>,

    /// Heat written by the base row and hotspots
    #[arg(long)]
    max_heat: Option<u32>,

    /// Noise scale divisor; larger means smoother cooling
    #[arg(long)]
    feature_size: Option<f64>,

    /// Minimum distance of random hotspots from the edge, in cells
    #[arg(long)]
    margin: Option<usize>,

    /// Where diffused heat is written
    #[arg(long, value_enum)]
    alignment: Option<AlignmentArg>,

    /// Cooling noise lookup
    #[arg(long, value_enum)]
    noise: Option<NoiseArg>,

    /// Base RNG seed (reproducibility); drawn from entropy when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Frame cap for the terminal renderer, 0 for uncapped
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Append logs here while the terminal renderer owns the screen
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Record headless into this directory instead of rendering
    #[arg(long)]
    out: Option<PathBuf>,

    /// Frames to record with --out
    #[arg(long, default_value_t = 300)]
    frames: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlignmentArg {
    Rising,
    InPlace,
}

impl From<AlignmentArg> for RowAlignment {
    fn from(a: AlignmentArg) -> RowAlignment {
        match a {
            AlignmentArg::Rising => RowAlignment::Rising,
            AlignmentArg::InPlace => RowAlignment::InPlace,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NoiseArg {
    Planar,
    Drifting,
}

impl From<NoiseArg> for NoiseMode {
    fn from(n: NoiseArg) -> NoiseMode {
        match n {
            NoiseArg::Planar => NoiseMode::Planar,
            NoiseArg::Drifting => NoiseMode::Drifting,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = build_config(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut sim = FireSim::seeded(config, seed).map_err(|e| format!("invalid config: {e}"))?;
    info!(seed, "starting");

    match &args.out {
        Some(out) => {
            let summary = record::record(&mut sim, seed, out, args.frames)?;
            println!("Wrote {} frames to: {}", summary.frames, out.display());
            println!(
                "Grid: {}x{} cells, final heat total {}",
                summary.grid_width, summary.grid_height, summary.final_total
            );
        }
        None => term::run(&mut sim, args.fps)?,
    }

    Ok(())
}

/// Defaults, then the config file, then individual flags.
fn build_config(args: &Args) -> Result<FireConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => FireConfig::default(),
    };

    // Without explicit dimensions the terminal renderer fills the screen,
    // one cell per half-block pixel.
    let interactive = args.out.is_none();
    if interactive && args.config.is_none() && (args.width.is_none() || args.height.is_none()) {
        let (w, h) = term::pixel_size()?;
        config.screen_width = w;
        config.screen_height = h;
        config.grid_size = 1;
    }

    if let Some(v) = args.width {
        config.screen_width = v;
    }
    if let Some(v) = args.height {
        config.screen_height = v;
    }
    if let Some(v) = args.grid_size {
        config.grid_size = v;
    }
    if let Some(v) = args.max_heat {
        config.max_heat = v;
    }
    if let Some(v) = args.feature_size {
        config.feature_size = v;
    }
    if let Some(v) = args.margin {
        config.hotspot_margin = v;
    }
    if let Some(v) = args.alignment {
        config.row_alignment = v.into();
    }
    if let Some(v) = args.noise {
        config.noise_mode = v.into();
    }
    Ok(config)
}

fn load_config(path: &Path) -> Result<FireConfig, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("reading config {}: {e}", path.display()))?;
    let config = serde_json::from_str(&text)
        .map_err(|e| format!("parsing config {}: {e}", path.display()))?;
    Ok(config)
}

fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The terminal renderer owns stdout/stderr; only log there when headless.
    let writer = match (&args.log_file, &args.out) {
        (Some(path), _) => {
            let file = File::options().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        (None, Some(_)) => BoxMakeWriter::new(std::io::stderr),
        (None, None) => BoxMakeWriter::new(std::io::sink),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(args.log_file.is_none())
        .init();
    Ok(())
}
