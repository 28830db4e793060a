//! Runs the full frame loop against an in-memory surface.
use fire_core::{
    Action, FireConfig, FireSim, InputEvent, Key, KeyBindings, PixelBuffer, Rgb, Surface,
    heat_color,
};

fn config() -> FireConfig {
    FireConfig {
        screen_width: 120,
        screen_height: 90,
        grid_size: 3,
        ..FireConfig::default()
    }
}

#[test]
fn test_flame_base_is_rendered_after_warmup() {
    let config = config();
    let mut surface = PixelBuffer::new(config.screen_width, config.screen_height);
    let mut sim = FireSim::seeded(config.clone(), 11).unwrap();

    for _ in 0..10 {
        sim.draw(&mut surface);
        surface.present().unwrap();
        sim.finish_frame();
    }
    assert_eq!(surface.presented(), 10);

    let base_y = (sim.height() - 2) as u32 * config.grid_size;
    let yellow = heat_color(config.max_heat, config.max_heat);
    for cx in 1..(sim.width() - 1) as u32 {
        assert_eq!(surface.pixel(cx * config.grid_size, base_y), Some(yellow));
    }
    // left border column never heats
    assert_eq!(surface.pixel(0, base_y), Some(Rgb::BLACK));
}

#[test]
fn test_heat_stays_in_range() {
    let config = config();
    let mut sim = FireSim::seeded(config.clone(), 99).unwrap();
    for _ in 0..60 {
        sim.advance();
        let stats = sim.field().stats();
        assert!(stats.peak <= config.max_heat);
        sim.finish_frame();
    }
    let stats = sim.field().stats();
    assert!(stats.hot_cells > sim.width());
    // the top border row is never written
    for x in 0..sim.width() {
        assert_eq!(sim.field().get(x, 0), Some(0));
    }
}

#[test]
fn test_bindings_drive_the_loop() {
    let bindings = KeyBindings::default();
    let mut sim = FireSim::seeded(config(), 4).unwrap();
    let events = [
        InputEvent::KeyDown(Key::Space),
        InputEvent::KeyUp(Key::Space),
        InputEvent::KeyDown(Key::Char('x')),
        InputEvent::KeyDown(Key::Escape),
    ];

    let mut running = true;
    for event in events {
        if let Some(action) = bindings.resolve(event) {
            running = sim.apply(action);
            if action == Action::Exit {
                break;
            }
        }
    }
    assert!(!running);
    assert_eq!(sim.field().stats().hot_cells, 2);
}
