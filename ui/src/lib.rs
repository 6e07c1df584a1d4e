//! Shared crate for the ECG-RAG clinical review dashboard: the case engines in [`core`], the
//! Dioxus views built on them, and localization. Launchers live in `web/` and `desktop/`.

pub mod core;
pub mod i18n;
pub mod monitor;
pub mod retrieval;
pub mod views;

pub mod components {
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}

use dioxus::prelude::{asset, manganis, Asset};

/// Shared theme stylesheet. Web links it; desktop inlines the same file.
pub const MAIN_CSS: Asset = asset!("/assets/theme/main.css");
