use dioxus::prelude::*;

use crate::core::config::RenderConfig;
use crate::core::format::format_similarity;
use crate::core::knowledge::features_for;
use crate::core::session::{Session, SessionEvent};
use crate::monitor::{EcgCanvas, LeadSource};
use crate::t;

/// Overlay for the case picked from the evidence list. Closing it drops the inspection, and any
/// detail load still in flight for it is ignored.
#[component]
pub fn CaseDetailModal(session: Signal<Session>, render: RenderConfig) -> Element {
    let events = use_coroutine_handle::<SessionEvent>();

    let snapshot = session.read();
    let Some(case) = snapshot.inspected_case().cloned() else {
        return rsx! {};
    };
    let detail_state = snapshot.inspected_detail();
    let loading = detail_state.is_loading();
    let source = LeadSource {
        detail: detail_state.shared(),
        preview: case.preview_signal.clone(),
    };
    let pattern = snapshot.pattern_for(&case.group_rank);
    drop(snapshot);

    let similarity = format_similarity(case.similarity);
    let report = case.report.clone();
    let mappings: Vec<(String, &'static [&'static str])> = case
        .diagnosis
        .iter()
        .filter_map(|label| features_for(label).map(|features| (label.clone(), features)))
        .collect();

    rsx! {
        div {
            class: "case-modal",
            role: "dialog",
            aria_modal: "true",
            onclick: move |_| events.send(SessionEvent::DismissInspection),

            div {
                class: "case-modal__panel",
                onclick: move |evt| evt.stop_propagation(),

                header { class: "case-modal__header",
                    div {
                        h2 { class: "case-modal__title", {t!("detail-title", id = case.id.clone())} }
                        span { class: "case-modal__similarity",
                            {t!("detail-similarity", value = similarity)}
                        }
                    }
                    button {
                        r#type: "button",
                        class: "button button--ghost case-modal__close",
                        aria_label: t!("detail-close"),
                        onclick: move |_| events.send(SessionEvent::DismissInspection),
                        "✕"
                    }
                }

                div { class: "case-modal__body",
                    div { class: "case-modal__leads",
                        if loading {
                            p { class: "case-modal__loading", {t!("detail-loading")} }
                        }
                        EcgCanvas { source, pattern, render, compact: true }
                    }

                    aside { class: "case-modal__sidebar",
                        h4 { class: "case-modal__section-title", {t!("detail-verified-diagnosis")} }
                        div { class: "case-modal__tags",
                            for (position, label) in case.diagnosis.iter().enumerate() {
                                span {
                                    key: "{position}",
                                    class: if position == 0 { "tag tag--primary" } else { "tag" },
                                    "{label}"
                                }
                            }
                        }

                        h4 { class: "case-modal__section-title", {t!("detail-report")} }
                        p { class: "case-modal__report",
                            strong { {t!("detail-observation")} }
                            " {report}"
                        }

                        if !mappings.is_empty() {
                            h4 { class: "case-modal__section-title", {t!("detail-feature-mapping")} }
                            for (label, features) in mappings {
                                div { key: "{label}", class: "case-modal__mapping",
                                    span { class: "case-modal__mapping-label", "{label}" }
                                    ul {
                                        for feature in features.iter() {
                                            li { key: "{feature}", "{feature}" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                footer { class: "case-modal__footer",
                    span { {t!("detail-footer-id", id = case.id.clone())} }
                    span { {t!("detail-footer-demographics", demographics = case.demographics.clone())} }
                }
            }
        }
    }
}
