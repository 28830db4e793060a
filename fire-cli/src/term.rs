//! Interactive renderer: two pixels per terminal cell via the upper half block.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use fire_core::{
    Action, FireSim, InputEvent, Key, KeyBindings, KeyPhase, PixelBuffer, Rect, Rgb, Surface,
};
use rand::Rng;
use tracing::{debug, info};

const HALF_BLOCK: char = '▀';
const HUD_FG: Rgb = Rgb::new(235, 215, 200);

/// Pixel size of the whole terminal: one column wide, two per row.
pub fn pixel_size() -> io::Result<(u32, u32)> {
    let (cols, rows) = terminal::size()?;
    Ok((u32::from(cols), u32::from(rows) * 2))
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Framebuffer that flushes only changed terminal cells on `present`.
pub struct TerminalSurface<W: Write> {
    out: W,
    pixels: PixelBuffer,
    cols: u16,
    rows: u16,
    // (top, bottom) colours each terminal cell currently shows
    shown: Vec<Option<(Rgb, Rgb)>>,
    hud: Option<String>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, cols: u16, rows: u16, width: u32, height: u32) -> Self {
        TerminalSurface {
            out,
            pixels: PixelBuffer::new(width, height),
            cols,
            rows,
            shown: vec![None; cols as usize * rows as usize],
            hud: None,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.shown = vec![None; cols as usize * rows as usize];
    }

    pub fn set_hud(&mut self, text: Option<String>) {
        if text.is_none() && self.hud.is_some() {
            // repaint the row the HUD covered
            for cell in self.shown.iter_mut().take(self.cols as usize) {
                *cell = None;
            }
        }
        self.hud = text;
    }

    fn flush_cells(&mut self) -> io::Result<()> {
        let mut last_fg: Option<Rgb> = None;
        let mut last_bg: Option<Rgb> = None;

        for cy in 0..self.rows {
            for cx in 0..self.cols {
                let px = u32::from(cx);
                let py = u32::from(cy) * 2;
                let top = self.pixels.pixel(px, py).unwrap_or(Rgb::BLACK);
                let bottom = self.pixels.pixel(px, py + 1).unwrap_or(Rgb::BLACK);

                let i = cy as usize * self.cols as usize + cx as usize;
                if self.shown[i] == Some((top, bottom)) {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(cx, cy))?;
                if last_fg != Some(top) {
                    queue!(self.out, SetForegroundColor(to_color(top)))?;
                    last_fg = Some(top);
                }
                if last_bg != Some(bottom) {
                    queue!(self.out, SetBackgroundColor(to_color(bottom)))?;
                    last_bg = Some(bottom);
                }
                queue!(self.out, Print(HALF_BLOCK))?;
                self.shown[i] = Some((top, bottom));
            }
        }
        Ok(())
    }

    fn flush_hud(&mut self) -> io::Result<()> {
        let Some(text) = &self.hud else {
            return Ok(());
        };
        let line: String = text.chars().take(self.cols as usize).collect();
        let covered = line.chars().count();
        queue!(
            self.out,
            cursor::MoveTo(0, 0),
            SetBackgroundColor(to_color(Rgb::BLACK)),
            SetForegroundColor(to_color(HUD_FG)),
            Print(line)
        )?;
        // force the covered cells to repaint once the HUD moves on
        for cell in self.shown.iter_mut().take(covered) {
            *cell = None;
        }
        Ok(())
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    type Error = io::Error;

    fn clear(&mut self, color: Rgb) {
        self.pixels.clear(color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.pixels.fill_rect(rect, color);
    }

    fn present(&mut self) -> io::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;
        self.flush_cells()?;
        self.flush_hud()?;
        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()
    }
}

/// Alternate screen + raw mode for the lifetime of the value.
struct Session {
    enhanced: bool,
}

impl Session {
    /// The guard exists before the first terminal change, so a failure
    /// part-way through still restores the screen on drop.
    fn enter<W: Write>(out: &mut W) -> io::Result<Session> {
        let mut session = Session { enhanced: false };
        execute!(out, EnterAlternateScreen, DisableLineWrap, cursor::Hide)?;
        terminal::enable_raw_mode()?;
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            session.enhanced = true;
        }
        Ok(session)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = restore(&mut io::stdout(), self.enhanced);
    }
}

fn restore<W: Write>(out: &mut W, enhanced: bool) -> io::Result<()> {
    if enhanced {
        execute!(out, PopKeyboardEnhancementFlags)?;
    }
    execute!(
        out,
        ResetColor,
        cursor::Show,
        EnableLineWrap,
        LeaveAlternateScreen
    )
}

fn key_of(code: KeyCode) -> Key {
    match code {
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
        _ => Key::Other,
    }
}

/// Turns crossterm events into [`InputEvent`]s.
///
/// Most terminals only report key presses. Until a real release shows up,
/// each press is followed by a synthetic release so release-bound actions
/// still fire.
struct KeyTranslator {
    synthesize_release: bool,
}

impl KeyTranslator {
    fn new(enhanced: bool) -> Self {
        KeyTranslator {
            synthesize_release: !enhanced && !cfg!(windows),
        }
    }

    fn translate(&mut self, event: &Event) -> Vec<InputEvent> {
        let Event::Key(k) = event else {
            return Vec::new();
        };
        if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
            return vec![InputEvent::Quit];
        }
        let key = key_of(k.code);
        match k.kind {
            KeyEventKind::Press if self.synthesize_release => {
                vec![InputEvent::KeyDown(key), InputEvent::KeyUp(key)]
            }
            KeyEventKind::Press => vec![InputEvent::KeyDown(key)],
            KeyEventKind::Release => {
                self.synthesize_release = false;
                vec![InputEvent::KeyUp(key)]
            }
            KeyEventKind::Repeat => Vec::new(),
        }
    }
}

fn bindings() -> KeyBindings {
    KeyBindings::default()
        .bind(Key::Char('q'), KeyPhase::Down, Action::Exit)
        .bind(Key::Char('p'), KeyPhase::Down, Action::TogglePause)
        .bind(Key::Char('h'), KeyPhase::Down, Action::ToggleHud)
}

pub fn run<R: Rng>(sim: &mut FireSim<R>, fps: u32) -> io::Result<()> {
    let mut out = io::stdout();
    let session = Session::enter(&mut out)?;

    let (cols, rows) = terminal::size()?;
    let config = sim.config().clone();
    let mut surface = TerminalSurface::new(out, cols, rows, config.screen_width, config.screen_height);
    let mut translator = KeyTranslator::new(session.enhanced);
    let bindings = bindings();
    info!(cols, rows, enhanced = session.enhanced, "terminal renderer");

    let budget = (fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(fps)));
    let mut paused = false;
    let mut show_hud = true;
    let mut quit = false;

    let mut last_fps = Instant::now();
    let mut fps_smoothed = 0.0f32;
    let mut frames = 0u32;

    while !quit {
        let frame_start = Instant::now();

        if !paused {
            sim.draw(&mut surface);
        }
        if show_hud {
            let stats = sim.field().stats();
            surface.set_hud(Some(format!(
                " frame {}  {:.0} fps  heat {}  hot {}{}  [space] spark  [p] pause  [h] hud  [q] quit ",
                sim.frame(),
                fps_smoothed,
                stats.total,
                stats.hot_cells,
                if paused { "  paused" } else { "" },
            )));
        } else {
            surface.set_hud(None);
        }
        surface.present()?;
        if !paused {
            sim.finish_frame();
        }

        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            if let Event::Resize(w, h) = ev {
                surface.resize(w, h);
                continue;
            }
            for input in translator.translate(&ev) {
                let Some(action) = bindings.resolve(input) else {
                    continue;
                };
                match action {
                    Action::TogglePause => paused = !paused,
                    Action::ToggleHud => show_hud = !show_hud,
                    Action::InjectHotspot => debug!("spark requested"),
                    Action::Exit => {}
                }
                if !sim.apply(action) {
                    quit = true;
                }
            }
        }

        frames += 1;
        let window = last_fps.elapsed().as_secs_f32();
        if window >= 0.33 {
            let current = frames as f32 / window.max(1e-6);
            fps_smoothed = if fps_smoothed == 0.0 {
                current
            } else {
                fps_smoothed * 0.85 + current * 0.15
            };
            frames = 0;
            last_fps = Instant::now();
        }

        if let Some(budget) = budget {
            let elapsed = frame_start.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            }
        }
    }

    info!(frames = sim.frame(), "terminal renderer stopped");
    drop(session);
    Ok(())
}
