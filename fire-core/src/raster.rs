//! Drawing a heat field onto a surface as filled squares.

use std::convert::Infallible;

use crate::color::{Rgb, heat_color};
use crate::grid::{Heat, HeatField};

/// Axis-aligned pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// The drawing primitives a platform must provide.
pub trait Surface {
    type Error;

    fn clear(&mut self, color: Rgb);

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// Makes the frame drawn since the last call visible.
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// Draws every cell of `field` as a `cell_size` square at `(x, y) * cell_size`.
pub fn rasterize<S: Surface + ?Sized>(
    field: &HeatField,
    cell_size: u32,
    max_heat: Heat,
    surface: &mut S,
) {
    for (x, y, heat) in field.iter() {
        let rect = Rect {
            x: x as u32 * cell_size,
            y: y as u32 * cell_size,
            w: cell_size,
            h: cell_size,
        };
        surface.fill_rect(rect, heat_color(heat, max_heat));
    }
}

/// In-memory RGBA8 framebuffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    presented: u64,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> PixelBuffer {
        let mut rgba = vec![0; width as usize * height as usize * 4];
        for px in rgba.chunks_exact_mut(4) {
            px[3] = 255;
        }
        PixelBuffer {
            width,
            height,
            rgba,
            presented: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Pixels without the alpha channel.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Rgb::new(self.rgba[i], self.rgba[i + 1], self.rgba[i + 2]))
    }

    /// Number of completed `present` calls.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Surface for PixelBuffer {
    type Error = Infallible;

    fn clear(&mut self, color: Rgb) {
        for px in self.rgba.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let x0 = rect.x.min(self.width);
        let y0 = rect.y.min(self.height);
        let x1 = rect.x.saturating_add(rect.w).min(self.width);
        let y1 = rect.y.saturating_add(rect.h).min(self.height);
        for y in y0..y1 {
            let row = y as usize * self.width as usize;
            for x in x0..x1 {
                let i = (row + x as usize) * 4;
                self.rgba[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, 255]);
            }
        }
    }

    fn present(&mut self) -> Result<(), Infallible> {
        self.presented += 1;
        Ok(())
    }
}
