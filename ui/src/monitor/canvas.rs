use std::rc::Rc;

use dioxus::prelude::*;

use crate::core::aggregate::WavePattern;
use crate::core::config::RenderConfig;
use crate::core::records::{CaseDetail, LeadName};
use crate::core::waveform::{lead_trace, render_from_samples, SyntheticTrace};

/// Where a twelve-lead view takes its samples from. Any lead missing from `detail` falls back to
/// `preview`, then to a synthetic trace.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeadSource {
    pub detail: Option<Rc<CaseDetail>>,
    pub preview: Option<Vec<f64>>,
}

/// Twelve stacked leads on an ECG grid, redrawn at the measured width whenever the container
/// is resized.
#[component]
pub fn EcgCanvas(
    source: LeadSource,
    pattern: WavePattern,
    render: RenderConfig,
    #[props(default)] compact: bool,
) -> Element {
    let mut width = use_signal(|| render.default_width);
    let current_width = width();
    let height = render.lead_height;
    let detail = source.detail.as_deref();
    let preview = source.preview.as_deref();

    let rows: Vec<(LeadName, String)> = LeadName::ALL
        .iter()
        .map(|&lead| {
            let geometry = lead_trace(lead, detail, preview, pattern, &render, current_width);
            (lead, geometry.to_svg_path())
        })
        .collect();

    let class_name = if compact {
        "ecg-canvas ecg-canvas--compact"
    } else {
        "ecg-canvas"
    };

    rsx! {
        div {
            class: "{class_name}",
            onresize: move |evt: Event<ResizeData>| {
                if let Ok(size) = evt.get_content_box_size() {
                    if size.width > 0.0 && (size.width - width()).abs() >= 1.0 {
                        width.set(size.width);
                    }
                }
            },
            div { class: "ecg-canvas__leads ecg-grid",
                for (lead, path) in rows {
                    div { key: "{lead}", class: "ecg-canvas__lead",
                        span { class: "ecg-canvas__lead-label", "{lead}" }
                        svg {
                            class: "ecg-canvas__trace",
                            view_box: "0 0 {current_width} {height}",
                            preserve_aspect_ratio: "none",
                            path {
                                d: "{path}",
                                fill: "none",
                                stroke: "#0f172a",
                                stroke_width: "1.5",
                                stroke_linejoin: "round",
                            }
                        }
                    }
                }
            }
            if !compact {
                TimeAxis {}
            }
        }
    }
}

/// Seconds ruler under the lead stack: ten major ticks, minor ticks every 0.2 s.
#[component]
fn TimeAxis() -> Element {
    rsx! {
        div { class: "ecg-canvas__axis",
            for i in 0..=10u32 {
                div {
                    key: "major-{i}",
                    class: "ecg-canvas__tick ecg-canvas__tick--major",
                    left: "{i * 10}%",
                    span { class: "ecg-canvas__tick-label", "{i}" }
                }
            }
            for i in 0..=50u32 {
                div {
                    key: "minor-{i}",
                    class: "ecg-canvas__tick ecg-canvas__tick--minor",
                    left: "{i * 2}%",
                }
            }
        }
    }
}

/// Small single-trace preview shown on each retrieval card.
#[component]
pub fn RhythmStrip(
    #[props(!optional)] preview: Option<Vec<f64>>,
    seed: usize,
    pattern: WavePattern,
    render: RenderConfig,
) -> Element {
    let width = render.strip_width;
    let height = render.strip_amplitude * 2.0;
    let geometry = match preview.as_deref().filter(|samples| !samples.is_empty()) {
        Some(samples) => render_from_samples(samples, width, height, render.strip_amplitude),
        None => SyntheticTrace::new(width, render.strip_amplitude, pattern, seed)
            .with_step(render.step)
            .render(),
    };
    let path = geometry.to_svg_path();

    rsx! {
        div { class: "rhythm-strip",
            svg {
                class: "rhythm-strip__trace",
                view_box: "0 0 {width} {height}",
                preserve_aspect_ratio: "none",
                path { d: "{path}", fill: "none", stroke: "#ef4444", stroke_width: "1" }
            }
        }
    }
}
