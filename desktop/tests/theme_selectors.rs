#![cfg(test)]
/*!
Theme selector lint for the desktop build.

Ensures that CSS selectors the dashboard components emit remain present in the
shared theme `ui/assets/theme/main.css`, so a refactor that drops or renames a
class fails here instead of silently degrading the embedded desktop styling.

A substring presence check is enough as an early warning. When you rename or
remove a selector, update the component markup and REQUIRED_SELECTORS together.
*/

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

/// Selectors / tokens the `ui` crate's components rely on.
const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".page {",
    // Buttons
    ".button {",
    ".button--primary",
    ".button--ghost",
    // Dashboard layout & controls
    ".dashboard__controls",
    ".dashboard__body",
    ".dashboard__chart",
    ".dashboard__legends",
    ".dashboard-control__label",
    ".dashboard-control__select",
    // Cards
    ".dashboard-card--error",
    ".dashboard-card__placeholder",
    ".dashboard-card__meta",
    // Legends & composer
    ".dashboard-legend__items",
    ".dashboard-legend__swatch",
    ".dashboard-composer__chosen",
    // Charts
    ".bar--exceeded",
    ".bar--failed",
    ".point--exceeded",
    ".point--failed",
    // Tables
    ".summary-table",
    ".metric-table__sorted",
    // Media query token (sanity check responsive block exists)
    "@media (max-width: 720px)",
];

/// Table cell classes produced for each measurement state.
const CELL_CLASSES: &[&str] = &[
    ".timing-cell",
    ".timing-exceeded-cell",
    ".timing-failed-cell",
    ".timing-not-run-cell",
];

#[test]
fn unified_theme_contains_required_selectors() {
    let mut missing = Vec::new();
    for sel in REQUIRED_SELECTORS {
        if !THEME_CSS.contains(sel) {
            missing.push(*sel);
        }
    }

    if !missing.is_empty() {
        panic!(
            "Missing {} required CSS selectors/tokens in unified theme:\n{}",
            missing.len(),
            missing.join("\n")
        );
    }
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 4_000,
        "Embedded theme appears unexpectedly small ({} non-whitespace chars) – \
         did the file get truncated or path change?",
        non_ws_len
    );
}

#[test]
fn every_cell_state_is_styled() {
    let missing: Vec<&str> = CELL_CLASSES
        .iter()
        .copied()
        .filter(|class| !THEME_CSS.contains(class))
        .collect();
    assert!(missing.is_empty(), "Unstyled table cell states: {missing:?}");
}
