#![cfg(test)]
//! Selector lint for the shared theme (`ui/assets/theme/main.css`).
//!
//! The dashboard components emit these class names from Rust; renaming one on either side
//! without the other silently unstyles part of the packaged desktop build. Update
//! `REQUIRED_SELECTORS` together with the component markup.

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".page {",
    ".card {",
    ".button {",
    ".button--primary",
    ".button--ghost",
    ".tag--primary",
    // Dashboard shell
    ".dashboard__grid",
    ".dashboard__notice",
    ".dashboard__placeholder",
    // Monitor
    ".patient-header",
    ".patient-header__nav",
    ".patient-header__position",
    ".monitor-card__header",
    ".monitor-card__badge--flutter",
    ".ecg-canvas",
    ".ecg-canvas--compact",
    ".ecg-canvas__lead",
    ".ecg-canvas__lead-label",
    ".ecg-canvas__trace",
    ".ecg-canvas__tick--major",
    ".ecg-canvas__tick--minor",
    ".export-panel__status--error",
    // Retrieval
    ".diagnosis-selector__menu",
    ".diagnosis-selector__option--active",
    ".retrieval-list__items",
    ".retrieval-list__empty",
    ".retrieval-card--active",
    ".rhythm-strip__trace",
    // Case detail
    ".case-modal",
    ".case-modal__panel",
    ".case-modal__body",
    ".case-modal__mapping",
    // Knowledge page
    ".knowledge-grid",
    ".knowledge-card__features",
    "@media (max-width: 720px)",
];

#[test]
fn unified_theme_contains_required_selectors() {
    let missing: Vec<&str> = REQUIRED_SELECTORS
        .iter()
        .copied()
        .filter(|sel| !THEME_CSS.contains(sel))
        .collect();

    assert!(
        missing.is_empty(),
        "Missing {} required CSS selectors/tokens in unified theme:\n{}",
        missing.len(),
        missing.join("\n")
    );
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 4_000,
        "Embedded theme appears unexpectedly small ({non_ws_len} non-whitespace chars)"
    );
}

#[test]
fn every_confidence_tier_has_a_badge_style() {
    for tier in ["high", "medium", "low", "very-low"] {
        let selector = format!(".confidence-badge--{tier}");
        assert!(THEME_CSS.contains(&selector), "missing {selector}");
    }
}
