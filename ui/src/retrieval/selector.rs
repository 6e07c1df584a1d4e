use dioxus::prelude::*;

use crate::core::aggregate::{Confidence, DiagnosisGroup};
use crate::core::format::format_score;
use crate::core::session::{Session, SessionEvent};
use crate::t;

#[component]
pub fn ConfidenceBadge(confidence: Confidence) -> Element {
    let label = match confidence {
        Confidence::High => t!("confidence-high"),
        Confidence::Medium => t!("confidence-medium"),
        Confidence::Low => t!("confidence-low"),
        Confidence::VeryLow => t!("confidence-very-low"),
    };
    let modifier = confidence.css_class();

    rsx! {
        span { class: "confidence-badge {modifier}", "{label}" }
    }
}

/// Active diagnosis plus a dropdown of every group, best score first.
#[component]
pub fn DiagnosisSelector(session: Signal<Session>) -> Element {
    let events = use_coroutine_handle::<SessionEvent>();
    let mut open = use_signal(|| false);

    let snapshot = session.read();
    let active: Option<DiagnosisGroup> = snapshot.active_group().cloned();
    let groups: Vec<DiagnosisGroup> = snapshot.groups().to_vec();
    drop(snapshot);

    let Some(active) = active else {
        return rsx! {
            div { class: "diagnosis-selector diagnosis-selector--empty",
                p { class: "diagnosis-selector__placeholder", {t!("selector-no-groups")} }
            }
        };
    };

    let toggle_class = if open() {
        "diagnosis-selector__toggle diagnosis-selector__toggle--open"
    } else {
        "diagnosis-selector__toggle"
    };

    rsx! {
        div { class: "diagnosis-selector",
            span { class: "diagnosis-selector__eyebrow", {t!("selector-primary-label")} }
            button {
                r#type: "button",
                class: "{toggle_class}",
                aria_expanded: "{open()}",
                onclick: move |_| open.toggle(),
                span { class: "diagnosis-selector__name", "{active.name}" }
                if active.verified {
                    span { class: "diagnosis-selector__verified", "✓" }
                }
                span { class: "diagnosis-selector__chevron", "▾" }
            }
            div { class: "diagnosis-selector__meta",
                ConfidenceBadge { confidence: active.confidence }
                span { class: "diagnosis-selector__score",
                    {t!("selector-score", score = format_score(active.score))}
                }
            }

            if open() {
                ul { class: "diagnosis-selector__menu", role: "listbox",
                    for group in groups {
                        {
                            let is_active = group.rank == active.rank;
                            let rank = group.rank.clone();
                            let class_name = if is_active {
                                "diagnosis-selector__option diagnosis-selector__option--active"
                            } else {
                                "diagnosis-selector__option"
                            };
                            rsx! {
                                li { key: "{group.rank}", role: "option",
                                    button {
                                        r#type: "button",
                                        class: "{class_name}",
                                        onclick: move |_| {
                                            events.send(SessionEvent::SelectGroup(rank.clone()));
                                            open.set(false);
                                        },
                                        span { class: "diagnosis-selector__option-name", "{group.name}" }
                                        span { class: "diagnosis-selector__option-score",
                                            {format_score(group.score)}
                                        }
                                        span { class: "diagnosis-selector__option-count",
                                            {t!("selector-cases-found", count = group.support_count)}
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
