//! Guards over the Fluent bundles in `ui/i18n/`.
//!
//! `en-US` is the reference: every other locale must define exactly its
//! messages with the same `{ $variables }`, and every message must be used by
//! a `t!("...")` call under `src/` (and the other way round).

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

const BUNDLE: &str = "benchview_ui.ftl";
const FALLBACK: &str = "en-US";

/// Message id → variables referenced in its value.
type Messages = BTreeMap<String, BTreeSet<String>>;

fn crate_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn locales() -> Vec<(String, String)> {
    let mut found: Vec<(String, String)> = fs::read_dir(crate_dir().join("i18n"))
        .expect("i18n directory")
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .map(|entry| {
            let code = entry.file_name().to_string_lossy().to_string();
            let text = fs::read_to_string(entry.path().join(BUNDLE))
                .unwrap_or_else(|err| panic!("{code}/{BUNDLE}: {err}"));
            (code, text)
        })
        .collect();
    found.sort();
    found
}

fn message_id(line: &str) -> Option<&str> {
    if line.starts_with(char::is_whitespace) || line.starts_with('#') || line.starts_with('-') {
        return None;
    }
    let (id, _) = line.split_once('=')?;
    let id = id.trim();
    (!id.is_empty() && id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'))
        .then_some(id)
}

fn variables(value: &str) -> BTreeSet<String> {
    value
        .split("{ $")
        .skip(1)
        .filter_map(|rest| rest.split_once(char::is_whitespace).map(|(name, _)| name.to_string()))
        .collect()
}

/// Parse a bundle, panicking on duplicate ids.
fn parse(code: &str, text: &str) -> Messages {
    let mut messages = Messages::new();
    let mut current: Option<String> = None;
    for line in text.lines() {
        if let Some(id) = message_id(line) {
            assert!(
                !messages.contains_key(id),
                "{code} defines `{id}` more than once"
            );
            let value = line.split_once('=').map(|(_, v)| v).unwrap_or_default();
            messages.insert(id.to_string(), variables(value));
            current = Some(id.to_string());
        } else if line.starts_with(char::is_whitespace) {
            // Continuation of a multi-line value.
            if let Some(id) = &current {
                let vars = variables(line);
                messages.entry(id.clone()).or_default().extend(vars);
            }
        } else {
            current = None;
        }
    }
    messages
}

fn fallback() -> Messages {
    let (code, text) = locales()
        .into_iter()
        .find(|(code, _)| code == FALLBACK)
        .expect("fallback locale present");
    parse(&code, &text)
}

fn rust_files(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).expect("readable source dir").flatten() {
        let path = entry.path();
        if path.is_dir() {
            rust_files(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
}

/// Literal ids passed to `t!` anywhere under `src/`.
fn used_ids() -> BTreeSet<String> {
    let mut files = Vec::new();
    rust_files(&crate_dir().join("src"), &mut files);
    let mut ids = BTreeSet::new();
    for file in files {
        let source = fs::read_to_string(&file).expect("readable source file");
        for chunk in source.split("t!(\"").skip(1) {
            if let Some((id, _)) = chunk.split_once('"') {
                ids.insert(id.to_string());
            }
        }
    }
    ids
}

#[test]
fn every_locale_matches_the_fallback() {
    let reference = fallback();
    assert!(!reference.is_empty(), "{FALLBACK} has no messages");

    let mut problems = Vec::new();
    for (code, text) in locales() {
        if code == FALLBACK {
            continue;
        }
        let messages = parse(&code, &text);
        let missing: Vec<&String> = reference.keys().filter(|id| !messages.contains_key(*id)).collect();
        let extra: Vec<&String> = messages.keys().filter(|id| !reference.contains_key(*id)).collect();
        if !missing.is_empty() {
            problems.push(format!("{code} is missing {missing:?}"));
        }
        if !extra.is_empty() {
            problems.push(format!("{code} has unknown messages {extra:?}"));
        }
        for (id, vars) in &messages {
            if let Some(expected) = reference.get(id) {
                if expected != vars {
                    problems.push(format!("{code}/{id} uses {vars:?}, {FALLBACK} uses {expected:?}"));
                }
            }
        }
    }
    assert!(problems.is_empty(), "locale mismatch:\n  {}", problems.join("\n  "));
}

#[test]
fn spanish_is_shipped() {
    let codes: Vec<String> = locales().into_iter().map(|(code, _)| code).collect();
    assert_eq!(codes, [FALLBACK, "es-ES"]);
}

#[test]
fn source_and_fallback_agree_on_ids() {
    let defined: BTreeSet<String> = fallback().into_keys().collect();
    let used = used_ids();

    let undefined: Vec<&String> = used.difference(&defined).collect();
    assert!(undefined.is_empty(), "t! ids missing from {FALLBACK}: {undefined:?}");

    let unused: Vec<&String> = defined.difference(&used).collect();
    assert!(unused.is_empty(), "{FALLBACK} messages never looked up: {unused:?}");
}

#[test]
fn export_message_takes_the_path() {
    let reference = fallback();
    assert_eq!(
        reference.get("export-saved"),
        Some(&BTreeSet::from(["path".to_string()]))
    );
}
