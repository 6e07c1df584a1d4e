use dioxus::prelude::*;

use crate::core::records::Symptom;
use crate::core::session::{Session, SessionEvent};
use crate::t;

#[component]
pub fn PatientHeader(session: Signal<Session>) -> Element {
    let events = use_coroutine_handle::<SessionEvent>();
    let snapshot = session.read();

    let summary = snapshot.monitor_summary();
    let position = snapshot.patient_position();
    let can_previous = snapshot.can_go_previous();
    let can_next = snapshot.can_go_next();
    let loading = snapshot.monitor_detail().is_loading();
    drop(snapshot);

    let not_provided = t!("patient-not-provided");
    let (id, age, gender, symptom, acquired) = match summary {
        Some(summary) => {
            let symptom = match summary.symptom {
                Symptom::AssessmentRequired => t!("patient-assessment-required"),
                Symptom::Label(label) => capitalize(&label),
            };
            (
                summary.id,
                summary.age,
                summary.gender,
                symptom,
                summary.acquired_at.unwrap_or_else(|| not_provided.clone()),
            )
        }
        None => (
            not_provided.clone(),
            "??".to_string(),
            t!("patient-gender-unknown"),
            t!("patient-assessment-required"),
            not_provided,
        ),
    };

    rsx! {
        div { class: "patient-header",
            div { class: "patient-header__identity",
                h2 { class: "patient-header__id",
                    "{id}"
                    span { class: "patient-header__age", {t!("patient-age", age = age)} }
                    span { class: "patient-header__gender", "{gender}" }
                }
                div { class: "patient-header__meta",
                    span { class: "patient-header__symptom", "⚠️ {symptom}" }
                    span { class: "patient-header__time", "• {acquired}" }
                    if loading {
                        span { class: "patient-header__loading", {t!("patient-loading-detail")} }
                    }
                }
            }

            div { class: "patient-header__nav",
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    disabled: !can_previous,
                    aria_label: t!("patient-previous"),
                    onclick: move |_| events.send(SessionEvent::ChangePatient(-1)),
                    "‹"
                }
                if let Some((index, total)) = position {
                    span { class: "patient-header__position",
                        {t!("patient-position", index = index, total = total)}
                    }
                }
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    disabled: !can_next,
                    aria_label: t!("patient-next"),
                    onclick: move |_| events.send(SessionEvent::ChangePatient(1)),
                    "›"
                }
            }
        }
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
