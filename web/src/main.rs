use dioxus::prelude::*;
use tracing::Level;

use ui::components::{register_nav, AppNavbar, NavBuilder};
use ui::views::{Dashboard, DashboardContext, Knowledge};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Dashboard {},
    #[route("/knowledge")]
    Knowledge {},
}

const FAVICON: Asset = asset!("/assets/favicon.svg");

fn nav_dashboard(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Dashboard {},
        "{label}"
    })
}
fn nav_knowledge(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Knowledge {},
        "{label}"
    })
}

fn main() {
    if let Err(err) = dioxus::logger::init(Level::INFO) {
        eprintln!("logger already initialized: {err}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();
    register_nav(NavBuilder {
        dashboard: nav_dashboard,
        knowledge: nav_knowledge,
    });

    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);
    // The browser build always reads the embedded demo database with stock settings.
    use_context_provider(DashboardContext::default);

    rsx! {
        document::Link { rel: "icon", href: FAVICON }
        document::Link { rel: "stylesheet", href: ui::MAIN_CSS }

        div {
            key: "{lang_code()}",
            Router::<Route> {}
        }
    }
}

#[component]
fn WebNavbar() -> Element {
    rsx! {
        AppNavbar {}
        Outlet::<Route> {}
    }
}
