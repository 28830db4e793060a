//! Headless recording: raw frames, raw heat fields and a JSONL frame log.

use fire_core::{FireSim, PixelBuffer, Surface};
use rand::Rng;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

#[derive(Serialize)]
struct FrameRow {
    frame_idx: u64,
    seed: u64,

    screen_width: u32,
    screen_height: u32,
    grid_width: usize,
    grid_height: usize,

    // offsets the frame's diffusion pass sampled at
    xoff: f64,
    yoff: f64,
    zoff: f64,

    hotspot_x: usize,
    hotspot_y: usize,

    total_heat: u64,
    peak_heat: u32,
    hot_cells: usize,
}

#[derive(Debug)]
pub struct Summary {
    pub frames: usize,
    pub grid_width: usize,
    pub grid_height: usize,
    pub final_total: u64,
}

/// Runs `frames` frames of `sim` and writes them under `out`.
pub fn record<R: Rng>(
    sim: &mut FireSim<R>,
    seed: u64,
    out: &Path,
    frames: usize,
) -> Result<Summary, Box<dyn std::error::Error>> {
    fs::create_dir_all(out)?;

    let config = sim.config().clone();
    let mut config_file = BufWriter::new(File::create(out.join("config.json"))?);
    serde_json::to_writer_pretty(&mut config_file, &config)?;
    config_file.flush()?;

    let mut frame_writer = BufWriter::new(File::create(out.join("frames.bin"))?);
    let mut heat_writer = BufWriter::new(File::create(out.join("heat.bin"))?);

    let mut meta_file = BufWriter::new(
        OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(out.join("meta.jsonl"))?,
    );

    let mut surface = PixelBuffer::new(config.screen_width, config.screen_height);
    info!(frames, out = %out.display(), "recording");

    for _ in 0..frames {
        let offsets = sim.offsets();
        sim.draw(&mut surface);
        let _ = surface.present();

        frame_writer.write_all(&surface.to_rgb())?;
        write_u32_slice(&mut heat_writer, sim.field().cells())?;
        let stats = sim.field().stats();

        let spot = sim.finish_frame();

        let row = FrameRow {
            frame_idx: sim.frame() - 1,
            seed,

            screen_width: config.screen_width,
            screen_height: config.screen_height,
            grid_width: sim.width(),
            grid_height: sim.height(),

            xoff: offsets.x,
            yoff: offsets.y,
            zoff: offsets.z,

            hotspot_x: spot.x,
            hotspot_y: spot.y,

            total_heat: stats.total,
            peak_heat: stats.peak,
            hot_cells: stats.hot_cells,
        };

        serde_json::to_writer(&mut meta_file, &row)?;
        meta_file.write_all(b"\n")?;
        debug!(frame = row.frame_idx, total = stats.total, "recorded");
    }

    frame_writer.flush()?;
    heat_writer.flush()?;
    meta_file.flush()?;

    Ok(Summary {
        frames,
        grid_width: sim.width(),
        grid_height: sim.height(),
        final_total: sim.field().stats().total,
    })
}

fn write_u32_slice<W: Write>(w: &mut W, v: &[u32]) -> std::io::Result<()> {
    for &x in v {
        w.write_all(&x.to_le_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fire_core::FireConfig;

    #[test]
    fn test_record_writes_all_streams() {
        let dir = std::env::temp_dir().join(format!("fire-cli-record-{}", std::process::id()));
        let config = FireConfig {
            screen_width: 48,
            screen_height: 44,
            grid_size: 2,
            ..FireConfig::default()
        };
        let mut sim = FireSim::seeded(config, 21).unwrap();

        let summary = record(&mut sim, 21, &dir, 5).unwrap();
        assert_eq!(summary.frames, 5);
        assert_eq!((summary.grid_width, summary.grid_height), (24, 22));

        let frames = fs::read(dir.join("frames.bin")).unwrap();
        assert_eq!(frames.len(), 5 * 48 * 44 * 3);
        let heat = fs::read(dir.join("heat.bin")).unwrap();
        assert_eq!(heat.len(), 5 * 24 * 22 * 4);

        let meta = fs::read_to_string(dir.join("meta.jsonl")).unwrap();
        let rows: Vec<serde_json::Value> = meta
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0]["frame_idx"], 0);
        assert_eq!(rows[4]["frame_idx"], 4);
        assert_eq!(rows[0]["yoff"], 0.0);
        assert_eq!(rows[1]["yoff"], 1.0);
        let hx = rows[2]["hotspot_x"].as_u64().unwrap();
        assert!((10..=13).contains(&hx));

        let saved: FireConfig =
            serde_json::from_str(&fs::read_to_string(dir.join("config.json")).unwrap()).unwrap();
        assert_eq!(saved.screen_width, 48);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_u32_little_endian() {
        let mut buf = Vec::new();
        write_u32_slice(&mut buf, &[1, 250]).unwrap();
        assert_eq!(buf, vec![1, 0, 0, 0, 250, 0, 0, 0]);
    }
}
