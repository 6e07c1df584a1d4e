#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use std::path::PathBuf;
use std::rc::Rc;

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config};
use dioxus::prelude::*;
use tracing::Level;

use ui::components::{register_nav, AppNavbar, NavBuilder};
use ui::core::config::DashboardConfig;
use ui::core::resolver::{DirectoryResolver, EmbeddedResolver, Resolver};
use ui::views::{Dashboard, DashboardContext, Knowledge};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(DesktopNavbar)]
    #[route("/")]
    Dashboard {},
    #[route("/knowledge")]
    Knowledge {},
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

#[cfg(feature = "desktop")]
fn main() {
    if let Err(err) = dioxus::logger::init(Level::INFO) {
        eprintln!("logger already initialized: {err}");
    }
    let resource_dir = resolve_resource_dir();

    LaunchBuilder::desktop()
        .with_cfg(
            Config::new()
                .with_window(
                    WindowBuilder::new()
                        .with_title(format!("ECG-RAG – v{}", env!("CARGO_PKG_VERSION")))
                        .with_maximized(true),
                )
                .with_resource_directory(resource_dir),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    if let Err(err) = dioxus::logger::init(Level::INFO) {
        eprintln!("logger already initialized: {err}");
    }
    LaunchBuilder::server().launch(App);
}

fn nav_dashboard(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Dashboard {}, "{label}" })
}
fn nav_knowledge(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Knowledge {}, "{label}" })
}

/// `config.json` under the platform config directory; a missing or broken file means defaults.
fn load_config() -> DashboardConfig {
    let Some(dirs) = directories::ProjectDirs::from("org", "ECG-RAG", "ECG-RAG") else {
        tracing::warn!("no platform config directory; using default settings");
        return DashboardConfig::default();
    };
    let path = dirs.config_dir().join("config.json");
    match DashboardConfig::load(&path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "configuration loaded");
            config
        }
        Err(err) => {
            tracing::warn!(%err, "invalid configuration; using default settings");
            DashboardConfig::default()
        }
    }
}

fn build_context() -> DashboardContext {
    let config = load_config();
    let resolver: Rc<dyn Resolver> = match config.data_dir.as_ref() {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "reading cases from local directory");
            Rc::new(DirectoryResolver::new(dir.clone()))
        }
        None => Rc::new(EmbeddedResolver),
    };
    DashboardContext::new(config, resolver)
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);
    use_context_provider(build_context);

    register_nav(NavBuilder {
        dashboard: nav_dashboard,
        knowledge: nav_knowledge,
    });

    #[cfg(feature = "desktop")]
    {
        let win = dioxus::desktop::use_window();
        use_effect(move || {
            win.set_maximized(true);
        });
    }

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }

        // Remount the routed tree when the language changes.
        div {
            key: "{lang_code()}",
            Router::<Route> { }
        }
    }
}

#[cfg(feature = "desktop")]
fn resolve_resource_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))
    }

    #[cfg(not(debug_assertions))]
    {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
            .unwrap_or_else(|| PathBuf::from("assets"))
    }
}

#[component]
fn DesktopNavbar() -> Element {
    rsx! {
        AppNavbar { }
        Outlet::<Route> {}
    }
}
