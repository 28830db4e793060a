//! Single-pass diffusion over a 20x20 grid with a heated row and no cooling.
use fire_core::{
    ConstantNoise, CoolingCurve, DiffusionStep, HeatField, NoiseMode, NoiseOffsets, RowAlignment,
};

const MAX_HEAT: u32 = 250;

fn heated_row_field() -> HeatField {
    let mut field = HeatField::new(20, 20);
    for x in 1..=18 {
        field.set(x, 18, MAX_HEAT);
    }
    field
}

fn run_pass(alignment: RowAlignment) -> HeatField {
    let step = DiffusionStep {
        feature_size: 10.0,
        offsets: NoiseOffsets::default(),
        cooling: CoolingCurve::default(),
        alignment,
        noise_mode: NoiseMode::Planar,
    };
    let src = heated_row_field();
    let mut dst = HeatField::new(20, 20);
    step.apply(&src, &mut dst, &ConstantNoise(-1.0));
    dst
}

/// Expected output when the row above the heated one is `upper` and the
/// heated row's own image is `lower`.
fn expected(upper: usize, lower: usize, x: usize, y: usize) -> u32 {
    if y == upper && (1..=18).contains(&x) {
        62
    } else if y == lower && (2..=17).contains(&x) {
        125
    } else if y == lower && (x == 1 || x == 18) {
        62
    } else {
        0
    }
}

#[test]
fn test_in_place_pass() {
    let out = run_pass(RowAlignment::InPlace);
    for (x, y, heat) in out.iter() {
        assert_eq!(heat, expected(17, 18, x, y), "cell ({x}, {y})");
    }
}

#[test]
fn test_rising_pass_shifts_up_one_row() {
    let out = run_pass(RowAlignment::Rising);
    for (x, y, heat) in out.iter() {
        assert_eq!(heat, expected(16, 17, x, y), "cell ({x}, {y})");
    }
}

#[test]
fn test_source_field_is_not_modified() {
    let src = heated_row_field();
    let before = src.clone();
    let step = DiffusionStep {
        feature_size: 10.0,
        offsets: NoiseOffsets::default(),
        cooling: CoolingCurve::default(),
        alignment: RowAlignment::Rising,
        noise_mode: NoiseMode::Planar,
    };
    let mut dst = HeatField::new(20, 20);
    step.apply(&src, &mut dst, &ConstantNoise(0.3));
    assert_eq!(src, before);
}
