//! Cosmetic telemetry for the simulator view.
//!
//! The waveform is a sampled sine driven only by the simulator's phase
//! counter. It does not reflect actual pin values and must not be read as
//! a measurement.

pub const WAVEFORM_SAMPLES: usize = 40;
const X_STEP: f64 = 25.0;
const BASELINE: f64 = 50.0;
const AMPLITUDE: f64 = 20.0;
const PHASE_STEP: f64 = 0.5;

/// `(x, y)` points of the display trace for `phase`.
pub fn waveform(phase: u32) -> Vec<(f64, f64)> {
    (0..WAVEFORM_SAMPLES)
        .map(|i| {
            let x = i as f64 * X_STEP;
            let y = BASELINE + ((i as f64 + f64::from(phase)) * PHASE_STEP).sin() * AMPLITUDE;
            (x, y)
        })
        .collect()
}

/// SVG path data starting from the baseline, e.g. `M 0 50 L 0 50.00 L 25 ...`.
pub fn svg_path(points: &[(f64, f64)]) -> String {
    let mut path = format!("M 0 {BASELINE}");
    for (x, y) in points {
        path.push_str(&format!(" L {x} {y:.2}"));
    }
    path
}

/// Fake CPU load shown while simulating, in percent.
pub fn cpu_load_percent(phase: u32) -> f64 {
    10.0 + f64::from(phase) / 10.0
}
