use std::collections::{BTreeSet, HashSet};

/// Translation completeness test.
/// Ensures every non‑fallback locale provides *at least* the keys present
/// in the fallback (en-US) `ecgrag-ui.ftl`.
///
/// This is a lightweight parser:
/// - Ignores comment lines starting with `#`
/// - Treats any line of the form `key =` or `key=` as a message definition
/// - Skips blank / attribute / continuation lines
/// - Does not attempt to parse multi-line pattern bodies (only keys)
///
/// If you add a new locale:
/// 1. Create `ui/i18n/<locale>/ecgrag-ui.ftl`
/// 2. Copy all keys from `en-US/ecgrag-ui.ftl`
/// 3. Run `cargo test -p ecgrag-ui` to confirm completeness.
#[test]
fn all_locales_have_all_fallback_keys() {
    // Embed the FTL sources at compile time.
    // (If you add a new locale, register it here.)
    const EN_US: &str = include_str!("../i18n/en-US/ecgrag-ui.ftl");
    const ES_ES: &str = include_str!("../i18n/es-ES/ecgrag-ui.ftl");

    let fallback_keys = extract_keys(EN_US);

    // Ensure fallback itself has no duplicates and at least one key.
    assert!(
        !fallback_keys.is_empty(),
        "Fallback (en-US) contains no keys."
    );
    assert_no_dup_keys(EN_US, "en-US");

    let locales: &[(&str, &str)] = &[
        ("es-ES", ES_ES),
        // Add new locales here.
    ];

    let mut failures = Vec::new();

    for (locale, src) in locales {
        assert_no_dup_keys(src, locale);

        let keys = extract_keys(src);
        let mut missing: BTreeSet<String> = BTreeSet::new();

        for k in &fallback_keys {
            if !keys.contains(k) {
                missing.insert(k.clone());
            }
        }

        if !missing.is_empty() {
            failures.push(format!(
                "Locale {locale} is missing {} key(s):\n  {}",
                missing.len(),
                missing.into_iter().collect::<Vec<_>>().join("\n  ")
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "Translation completeness check failed:\n\n{}\n\nHint: copy the missing keys from en-US, then translate.",
            failures.join("\n\n")
        );
    }
}

/// Extract message keys from a Fluent file (simple heuristic).
fn extract_keys(src: &str) -> HashSet<String> {
    let mut keys = HashSet::new();

    for line in src.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Skip attribute or continuation lines (start with '.' or indent).
        if line.starts_with('.') {
            continue;
        }
        // Basic pattern: key [space]* '='
        if let Some(eq_pos) = line.find('=') {
            let (left, _right) = line.split_at(eq_pos);
            let key = left.trim();
            if !key.is_empty()
                && !key.contains(' ')
                && !key.contains('\t')
                && !key.starts_with('[')
                && !key.starts_with('@')
            {
                keys.insert(key.to_string());
            }
        }
    }

    keys
}

/// Assert no duplicate key definitions in a single FTL file (rudimentary).
fn assert_no_dup_keys(src: &str, locale: &str) {
    let mut seen = HashSet::new();
    let mut dups = BTreeSet::new();

    for line in src.lines() {
        let raw = line;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('.') {
            continue;
        }
        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            if !key.is_empty()
                && !key.contains(' ')
                && !key.contains('\t')
                && !key.starts_with('[')
                && !key.starts_with('@')
            {
                if !seen.insert(key.to_string()) {
                    dups.insert(format!("{key}  (line: \"{raw}\")"));
                }
            }
        }
    }

    if !dups.is_empty() {
        panic!(
            "Duplicate key definitions in {locale}:\n  {}",
            dups.into_iter().collect::<Vec<_>>().join("\n  ")
        );
    }
}

/// Every translated message must use the same `$variables` as its en-US counterpart, otherwise
/// `t!` call sites silently drop an argument in that locale.
#[test]
fn translated_messages_keep_fallback_arguments() {
    const EN_US: &str = include_str!("../i18n/en-US/ecgrag-ui.ftl");
    const ES_ES: &str = include_str!("../i18n/es-ES/ecgrag-ui.ftl");

    let fallback = message_variables(EN_US);
    let translated = message_variables(ES_ES);

    let mismatched: Vec<String> = fallback
        .iter()
        .filter_map(|(key, vars)| match translated.get(key) {
            Some(other) if other != vars => Some(format!("{key}: {vars:?} vs {other:?}")),
            _ => None,
        })
        .collect();

    assert!(
        mismatched.is_empty(),
        "es-ES argument mismatch:\n  {}",
        mismatched.join("\n  ")
    );
    assert_eq!(
        fallback.get("retrieval-results-count"),
        Some(&BTreeSet::from(["count".to_string()]))
    );
}

/// Message id -> set of `$variable` names referenced in its body (continuation lines included).
fn message_variables(src: &str) -> std::collections::BTreeMap<String, BTreeSet<String>> {
    let mut out = std::collections::BTreeMap::new();
    let mut current: Option<String> = None;

    for line in src.lines() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let starts_message = !line.starts_with(' ') && line.contains('=');
        let body = if starts_message {
            let (key, rest) = line.split_at(line.find('=').unwrap_or(0));
            let key = key.trim().to_string();
            out.entry(key.clone()).or_insert_with(BTreeSet::new);
            current = Some(key);
            rest
        } else {
            line
        };

        let Some(key) = current.as_ref() else {
            continue;
        };
        let vars = out.entry(key.clone()).or_insert_with(BTreeSet::new);
        for piece in body.split('$').skip(1) {
            let name: String = piece
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .collect();
            if !name.is_empty() {
                vars.insert(name);
            }
        }
    }

    out
}
