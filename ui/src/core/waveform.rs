//! Lead path synthesis.
//!
//! Two renderers share one output shape, a [`PathGeometry`] in SVG user space (y grows
//! downward): [`render_from_samples`] stretches a recorded buffer across the requested width,
//! [`render_synthetic`] draws a parametric cardiac cycle for leads that have no recording.
//! Both are pure; identical arguments give identical vertices, which keeps redraws stable
//! across re-renders and resizes.

use std::fmt::Write as _;

use super::aggregate::WavePattern;
use super::config::RenderConfig;
use super::records::{CaseDetail, LeadName};

/// Length of one synthetic cardiac cycle in x units.
const CYCLE: f64 = 100.0;
/// Phase offset applied per seed step so adjacent leads are visibly desynchronized.
const SEED_PHASE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathGeometry {
    pub vertices: Vec<Vertex>,
}

impl PathGeometry {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// SVG path data: `M x0 y0 L x1 y1 ...`. Empty geometry gives an empty string.
    pub fn to_svg_path(&self) -> String {
        let mut out = String::with_capacity(self.vertices.len() * 16);
        for (i, v) in self.vertices.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{cmd} {} {}", trim_float(v.x), trim_float(v.y));
        }
        out
    }
}

/// Fit a recorded buffer to `width`: sample `i` lands at `i * width / len`, value `v` at
/// `height / 2 - v * vertical_scale`. This is a display fit, not a time-accurate resampling.
pub fn render_from_samples(
    samples: &[f64],
    width: f64,
    height: f64,
    vertical_scale: f64,
) -> PathGeometry {
    if samples.is_empty() {
        return PathGeometry::default();
    }
    let len = samples.len() as f64;
    let mid = height / 2.0;
    let vertices = samples
        .iter()
        .enumerate()
        .map(|(i, value)| Vertex {
            x: i as f64 * width / len,
            y: mid - value * vertical_scale,
        })
        .collect();
    PathGeometry { vertices }
}

/// Parameters of a synthetic trace. `step` defaults to 2 units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticTrace {
    pub width: f64,
    pub amplitude: f64,
    pub pattern: WavePattern,
    pub seed: usize,
    pub step: f64,
}

impl SyntheticTrace {
    pub fn new(width: f64, amplitude: f64, pattern: WavePattern, seed: usize) -> Self {
        Self {
            width,
            amplitude,
            pattern,
            seed,
            step: 2.0,
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn render(&self) -> PathGeometry {
        render_synthetic(self.width, self.amplitude, self.pattern, self.seed, self.step)
    }
}

/// Parametric stand-in waveform. The baseline sits at `amplitude` (so the trace spans roughly
/// `[0, 2 * amplitude]`); `seed` shifts the cycle phase by `20 * seed` units.
pub fn render_synthetic(
    width: f64,
    amplitude: f64,
    pattern: WavePattern,
    seed: usize,
    step: f64,
) -> PathGeometry {
    if !(width > 0.0) || !(step > 0.0) {
        return PathGeometry::default();
    }
    let count = (width / step).ceil() as usize;
    let shift = seed as f64 * SEED_PHASE;
    let vertices = (0..count)
        .map(|i| {
            let x = i as f64 * step;
            let pos = (x + shift).rem_euclid(CYCLE);
            let y = amplitude
                + baseline_noise(x, amplitude)
                + deflection(pattern, x, pos, amplitude);
            Vertex { x, y }
        })
        .collect();
    PathGeometry { vertices }
}

fn baseline_noise(x: f64, amplitude: f64) -> f64 {
    (x * 0.2).sin() * (amplitude * 0.05)
}

/// Offset from the noisy baseline at phase `pos`. Negative values render upward.
fn deflection(pattern: WavePattern, x: f64, pos: f64, a: f64) -> f64 {
    match pattern {
        WavePattern::Stemi => {
            if pos > 10.0 && pos < 20.0 {
                -0.1 * a
            } else if pos > 25.0 && pos < 28.0 {
                0.1 * a
            } else if (28.0..32.0).contains(&pos) {
                -1.2 * a
            } else if (32.0..35.0).contains(&pos) {
                0.2 * a
            } else if (35.0..50.0).contains(&pos) {
                // elevated ST segment
                -0.4 * a
            } else if (50.0..70.0).contains(&pos) {
                -0.5 * a
            } else {
                0.0
            }
        }
        WavePattern::Flutter => {
            // sawtooth F-waves, with an occasional conducted QRS
            let f_wave = (x * 0.3).sin() * (a * 0.3);
            let qrs = if pos > 45.0 && pos < 50.0 { -0.8 * a } else { 0.0 };
            f_wave + qrs
        }
        WavePattern::Normal => {
            if pos > 10.0 && pos < 20.0 {
                -0.1 * a
            } else if pos > 25.0 && pos < 35.0 {
                -0.8 * a
            } else if pos > 40.0 && pos < 60.0 {
                -0.15 * a
            } else {
                0.0
            }
        }
    }
}

/// Geometry for one lead of a 12-lead view, picking the best available source: the lead's
/// recorded samples, then the case's preview signal, then a synthetic trace seeded by the lead.
pub fn lead_trace(
    lead: LeadName,
    detail: Option<&CaseDetail>,
    preview: Option<&[f64]>,
    pattern: WavePattern,
    render: &RenderConfig,
    width: f64,
) -> PathGeometry {
    if let Some(samples) = detail.and_then(|d| d.lead(lead)) {
        return render_from_samples(samples, width, render.lead_height, render.vertical_scale);
    }
    if let Some(samples) = preview.filter(|s| !s.is_empty()) {
        return render_from_samples(samples, width, render.lead_height, render.vertical_scale);
    }
    SyntheticTrace::new(width, render.synthetic_amplitude, pattern, lead.index())
        .with_step(render.step)
        .render()
}

fn trim_float(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}
