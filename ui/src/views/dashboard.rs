use std::rc::Rc;

use dioxus::prelude::*;

use crate::core::driver::drive_session;
use crate::core::pipeline::CasePipeline;
use crate::core::session::{Notice, Session, SessionEvent, SessionState};
use crate::monitor::MonitorPanel;
use crate::retrieval::{CaseDetailModal, RetrievalPanel};
use crate::t;

use super::DashboardContext;

#[component]
pub fn Dashboard() -> Element {
    // Re-render on language change.
    let _lang_code: Option<Signal<String>> = try_use_context::<Signal<String>>();
    let _lang_current = _lang_code.as_ref().map(|s| s()).unwrap_or_default();

    let context = use_hook(|| try_consume_context::<DashboardContext>().unwrap_or_default());
    let render = context.config.render;
    let session = use_signal(|| Session::new(context.config.thresholds));

    let coroutine = {
        let context = context.clone();
        use_coroutine(move |rx: UnboundedReceiver<SessionEvent>| {
            let pipeline = Rc::new(CasePipeline::new(
                context.resolver.clone(),
                context.config.resources.clone(),
            ));
            let initial = Session::new(context.config.thresholds);
            let mut published = session;
            async move {
                let finished = drive_session(pipeline, rx, initial, move |snapshot| {
                    published.set(snapshot.clone())
                })
                .await;
                tracing::debug!(state = ?finished.state(), "session loop ended");
            }
        })
    };

    use_hook(move || coroutine.send(SessionEvent::Start));

    let snapshot = session.read();
    let state = snapshot.state();
    let notice = snapshot.notice().cloned();
    drop(snapshot);

    let notice_text = notice.map(|notice| match notice {
        Notice::ManifestUnavailable => t!("notice-manifest-unavailable"),
        Notice::EmptyManifest => t!("notice-manifest-empty"),
        Notice::BundleUnavailable { patient } => {
            t!("notice-bundle-unavailable", patient = patient)
        }
        Notice::DetailUnavailable { case_id } => t!("notice-detail-unavailable", case = case_id),
    });

    rsx! {
        section { class: "page page-dashboard",
            if let Some(text) = notice_text {
                div { class: "dashboard__notice", role: "status", "⚠️ {text}" }
            }

            match state {
                SessionState::Empty | SessionState::ManifestLoading => rsx! {
                    div { class: "dashboard__placeholder",
                        if state == SessionState::ManifestLoading {
                            p { {t!("dashboard-loading-manifest")} }
                        } else {
                            p { {t!("dashboard-empty")} }
                        }
                    }
                },
                _ => rsx! {
                    div { class: "dashboard__grid",
                        MonitorPanel { session, render }
                        RetrievalPanel { session, render }
                    }
                },
            }

            CaseDetailModal { session, render }
        }
    }
}
