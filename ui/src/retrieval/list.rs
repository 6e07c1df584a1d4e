use dioxus::prelude::*;

use crate::core::aggregate::WavePattern;
use crate::core::config::RenderConfig;
use crate::core::format::format_similarity;
use crate::core::records::CaseRecord;
use crate::core::session::{Session, SessionEvent};
use crate::monitor::RhythmStrip;
use crate::t;

/// Tags shown on a card before the rest collapse into "+N".
const CARD_TAG_LIMIT: usize = 3;

#[component]
pub fn RetrievalList(session: Signal<Session>, render: RenderConfig) -> Element {
    let snapshot = session.read();
    let cases: Vec<CaseRecord> = snapshot.filtered_cases().into_iter().cloned().collect();
    let pattern = snapshot.active_pattern();
    let inspected = snapshot.inspected_case().map(|case| case.id.clone());
    drop(snapshot);

    rsx! {
        div { class: "retrieval-list",
            div { class: "retrieval-list__header",
                h3 { {t!("retrieval-title")} }
                span { class: "retrieval-list__count",
                    {t!("retrieval-results-count", count = cases.len())}
                }
            }

            if cases.is_empty() {
                p { class: "retrieval-list__empty", {t!("retrieval-empty")} }
            } else {
                ul { class: "retrieval-list__items",
                    for (index, case) in cases.into_iter().enumerate() {
                        RetrievalCard {
                            key: "{case.id}",
                            active: inspected.as_deref() == Some(case.id.as_str()),
                            case,
                            index,
                            pattern,
                            render,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn RetrievalCard(
    case: CaseRecord,
    index: usize,
    pattern: WavePattern,
    render: RenderConfig,
    active: bool,
) -> Element {
    let events = use_coroutine_handle::<SessionEvent>();

    let similarity = format_similarity(case.similarity);
    let shown: Vec<String> = case.diagnosis.iter().take(CARD_TAG_LIMIT).cloned().collect();
    let hidden = case.diagnosis.len().saturating_sub(CARD_TAG_LIMIT);
    let preview = case.preview_signal.clone();
    let class_name = if active {
        "retrieval-card retrieval-card--active"
    } else {
        "retrieval-card"
    };
    let id = case.id.clone();

    rsx! {
        li { class: "{class_name}",
            button {
                r#type: "button",
                class: "retrieval-card__button",
                onclick: move |_| events.send(SessionEvent::SelectCase(case.clone())),
                div { class: "retrieval-card__heading",
                    span { class: "retrieval-card__id", "{id}" }
                    span { class: "retrieval-card__similarity",
                        {t!("retrieval-similarity", value = similarity)}
                    }
                }
                div { class: "retrieval-card__tags",
                    for (position, tag) in shown.into_iter().enumerate() {
                        span { key: "{position}", class: "tag", "{tag}" }
                    }
                    if hidden > 0 {
                        span { class: "tag tag--more", "+{hidden}" }
                    }
                }
                RhythmStrip { preview, seed: index, pattern, render }
            }
        }
    }
}
