//! Localization for the dashboard.
//!
//! Fluent bundles live under `ui/i18n/<locale>/ecgrag-ui.ftl` and are embedded at compile time.
//! `en-US` is the fallback and the reference key set; every other locale must define the same
//! message ids (see `tests/i18n_missing_keys.rs`).
//!
//! ```ignore
//! ui::i18n::init(); // idempotent
//! let label = ui::t!("nav-dashboard");
//! let count = ui::t!("retrieval-results-count", count = 3);
//! ```
//!
//! Desktop builds request languages from the OS locale list, web builds from
//! `navigator.languages`. Assets are always embedded on wasm (`debug-embed`).
use std::sync::Once;

use i18n_embed::fluent::FluentLanguageLoader;
use once_cell::sync::Lazy;
use rust_embed::Embed;
use unic_langid::LanguageIdentifier;

pub use i18n_embed_fl::fl;

/// `t!("key")` / `t!("key", arg = value)`, routed through the shared [`LOADER`].
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

/// Fluent domain; the fallback file is `i18n/en-US/{DOMAIN}.ftl`.
const DOMAIN: &str = "ecgrag-ui";

#[derive(Embed)]
#[folder = "i18n"]
struct Localizations;

pub static LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| {
    let fallback: LanguageIdentifier = unic_langid::langid!("en-US");
    FluentLanguageLoader::new(DOMAIN, fallback)
});

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        let requested = requested_languages();
        if let Err(err) = i18n_embed::select(&*LOADER, &Localizations, &requested) {
            tracing::warn!(%err, "language selection failed; using en-US");
        }
    });
}

/// Switch language at runtime. Unparseable tags are ignored.
pub fn set_language(tag: &str) -> Result<(), i18n_embed::I18nEmbedError> {
    let Ok(lang) = tag.parse::<LanguageIdentifier>() else {
        tracing::debug!(tag, "ignoring invalid language tag");
        return Ok(());
    };
    i18n_embed::select(&*LOADER, &Localizations, &[lang]).map(|_| ())
}

/// Embedded locale tags, sorted, for the language picker.
pub fn available_languages() -> Vec<String> {
    let mut langs = Localizations::iter()
        .filter_map(|path| path.split('/').next().map(str::to_string))
        .collect::<Vec<_>>();
    langs.sort();
    langs.dedup();
    langs
}

#[cfg(target_arch = "wasm32")]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::WebLanguageRequester::requested_languages()
}

#[cfg(not(target_arch = "wasm32"))]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_and_spanish_are_embedded() {
        let langs = available_languages();
        assert!(langs.iter().any(|l| l == "en-US"));
        assert!(langs.iter().any(|l| l == "es-ES"));
    }

    #[test]
    fn fallback_lookup_and_arguments() {
        set_language("en-US").unwrap();
        assert_eq!(fl!(&*LOADER, "nav-dashboard"), "Dashboard");
        let count = fl!(&*LOADER, "retrieval-results-count", count = 2);
        assert!(count.contains('2'));
    }

    #[test]
    fn invalid_tag_keeps_current_language() {
        set_language("en-US").unwrap();
        let before = fl!(&*LOADER, "nav-knowledge");
        set_language("not a tag!").unwrap();
        assert_eq!(before, fl!(&*LOADER, "nav-knowledge"));
    }
}
