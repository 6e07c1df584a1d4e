//! The live monitor: patient header, twelve-lead canvas and export actions for the monitor
//! subject (the query case, or the first retrieved case when the bundle has none).

mod canvas;
mod export;
mod header;

pub use canvas::{EcgCanvas, LeadSource, RhythmStrip};
pub use export::{group_summary_json, lead_sheet_svg, ExportPanel};
pub use header::PatientHeader;

use dioxus::prelude::*;

use crate::core::aggregate::WavePattern;
use crate::core::config::RenderConfig;
use crate::core::session::Session;
use crate::t;

#[component]
pub fn MonitorPanel(session: Signal<Session>, render: RenderConfig) -> Element {
    let snapshot = session.read();
    let subject_id = snapshot.monitor_subject().map(|case| case.id.clone());
    let source = LeadSource {
        detail: snapshot.monitor_detail().shared(),
        preview: snapshot
            .monitor_subject()
            .and_then(|case| case.preview_signal.clone()),
    };
    let pattern = snapshot.active_pattern();
    drop(snapshot);

    let title = match subject_id.as_deref() {
        Some(id) => t!("monitor-title", id = id),
        None => t!("monitor-title-empty"),
    };

    rsx! {
        section { class: "monitor-panel",
            PatientHeader { session }

            div { class: "card monitor-card",
                div { class: "monitor-card__header",
                    h3 { class: "monitor-card__title", "{title}" }
                    if pattern == WavePattern::Flutter {
                        span { class: "monitor-card__badge monitor-card__badge--flutter",
                            {t!("monitor-flutter-badge")}
                        }
                    }
                    span { class: "monitor-card__calibration", {t!("monitor-calibration")} }
                }
                EcgCanvas { source, pattern, render }
            }

            ExportPanel { session, render }
        }
    }
}
