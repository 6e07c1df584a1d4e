use dioxus::prelude::*;

use crate::core::knowledge;
use crate::t;

/// Reference page listing the typical ECG features behind each diagnostic label.
#[component]
pub fn Knowledge() -> Element {
    let _lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let _lang_current = _lang_code.as_ref().map(|s| s()).unwrap_or_default();

    let entries = knowledge::entries();

    rsx! {
        section { class: "page page-knowledge",
            header { class: "page-knowledge__header",
                h1 { {t!("knowledge-title")} }
                p { class: "page-knowledge__lede", {t!("knowledge-lede")} }
            }
            div { class: "knowledge-grid",
                for entry in entries.iter() {
                    article { key: "{entry.label}", class: "card knowledge-card",
                        h3 { class: "knowledge-card__label", "{entry.label}" }
                        ul { class: "knowledge-card__features",
                            for feature in entry.features.iter() {
                                li { key: "{feature}", "{feature}" }
                            }
                        }
                    }
                }
            }
            p { class: "page-knowledge__disclaimer", {t!("knowledge-disclaimer")} }
        }
    }
}
