//! Retrieved evidence: the diagnosis-group selector, the case list for the active group and the
//! case inspection overlay.

mod detail;
mod list;
mod selector;

pub use detail::CaseDetailModal;
pub use list::RetrievalList;
pub use selector::{ConfidenceBadge, DiagnosisSelector};

use dioxus::prelude::*;

use crate::core::config::RenderConfig;
use crate::core::session::{Session, SessionState};
use crate::t;

#[component]
pub fn RetrievalPanel(session: Signal<Session>, render: RenderConfig) -> Element {
    let state = session.read().state();

    rsx! {
        section { class: "card retrieval-panel",
            DiagnosisSelector { session }
            if state == SessionState::RetrievalLoading {
                p { class: "retrieval-panel__loading", {t!("retrieval-loading")} }
            }
            RetrievalList { session, render }
        }
    }
}
