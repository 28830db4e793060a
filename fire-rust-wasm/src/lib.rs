use fire_core::{
    FireConfig, FireSim, InputEvent, Key, KeyBindings, PixelBuffer, Surface,
};
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct FireEffect {
    inner: FireSim<ChaCha8Rng>,
    surface: PixelBuffer,
    bindings: KeyBindings,
}

#[wasm_bindgen]
impl FireEffect {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, grid_size: u32, seed: u64) -> Result<FireEffect, JsValue> {
        let config = FireConfig {
            screen_width: width,
            screen_height: height,
            grid_size,
            ..FireConfig::default()
        };
        let inner = FireSim::seeded(config, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(FireEffect {
            inner,
            surface: PixelBuffer::new(width, height),
            bindings: KeyBindings::default(),
        })
    }

    // Dimensions
    pub fn width(&self) -> u32 { self.surface.width() }
    pub fn height(&self) -> u32 { self.surface.height() }
    pub fn grid_width(&self) -> usize { self.inner.width() }
    pub fn grid_height(&self) -> usize { self.inner.height() }
    pub fn frame(&self) -> u64 { self.inner.frame() }

    /// RGBA bytes for `ImageData` (copy-based JS access)
    pub fn pixels(&self) -> Vec<u8> {
        self.surface.as_rgba().to_vec()
    }

    pub fn heat(&self) -> Vec<u32> {
        self.inner.field().cells().to_vec()
    }

    pub fn inject_hotspot(&mut self) {
        self.inner.inject_random_hotspot();
    }

    pub fn reset(&mut self) { self.inner.reset(); }

    /// Feeds a DOM key event (`KeyboardEvent.key`). Returns false once the
    /// page should stop its animation loop.
    pub fn handle_key(&mut self, key: &str, pressed: bool) -> bool {
        let key = dom_key(key);
        let event = if pressed { InputEvent::KeyDown(key) } else { InputEvent::KeyUp(key) };
        match self.bindings.resolve(event) {
            Some(action) => self.inner.apply(action),
            None => true,
        }
    }

    /// Draw + end-of-frame injection, with timing (WASM-only)
    pub fn frame_step(&mut self) -> StepInfo {
        let t0 = now_ms();
        self.inner.draw(&mut self.surface);
        let _ = self.surface.present();
        let spot = self.inner.finish_frame();
        let t1 = now_ms();
        StepInfo {
            compute_ms: t1 - t0,
            hotspot_x: spot.x as u32,
            hotspot_y: spot.y as u32,
            total_heat: self.inner.field().stats().total as f64,
        }
    }
}

#[wasm_bindgen]
pub struct StepInfo {
    compute_ms: f64,
    hotspot_x: u32,
    hotspot_y: u32,
    total_heat: f64,
}

#[wasm_bindgen]
impl StepInfo {
    pub fn compute_ms(&self) -> f64 { self.compute_ms }
    pub fn hotspot_x(&self) -> u32 { self.hotspot_x }
    pub fn hotspot_y(&self) -> u32 { self.hotspot_y }
    pub fn total_heat(&self) -> f64 { self.total_heat }
}

fn dom_key(key: &str) -> Key {
    match key {
        "Escape" => Key::Escape,
        " " | "Spacebar" => Key::Space,
        k => {
            let mut chars = k.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                _ => Key::Other,
            }
        }
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_keys() {
        assert_eq!(dom_key("Escape"), Key::Escape);
        assert_eq!(dom_key(" "), Key::Space);
        assert_eq!(dom_key("Q"), Key::Char('q'));
        assert_eq!(dom_key("ArrowUp"), Key::Other);
    }
}
