//! Localized strings.
//!
//! Fluent bundles live under `ui/i18n/<lang>/benchview_ui.ftl` and are
//! embedded at compile time (always on wasm, where `debug-embed` is on).
//! `en-US` is the fallback and the reference every other locale must match;
//! `ui/tests/locales.rs` enforces that.
//!
//! Components call [`init`] once and then look strings up with [`t!`]:
//!
//! ```ignore
//! crate::i18n::init();
//! let label = crate::t!("nav-dashboard");
//! let saved = crate::t!("export-saved", path = path);
//! ```
//!
//! Keys are checked against the fallback bundle at compile time by `fl!`.

use std::sync::Once;

use i18n_embed::{fluent::FluentLanguageLoader, LanguageLoader};
use once_cell::sync::Lazy;
use rust_embed::Embed;
use thiserror::Error;
use unic_langid::LanguageIdentifier;

pub use i18n_embed_fl::fl;

/// Look up a message in the shared loader, with optional Fluent arguments.
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

/// Bundle file stem. `fl!` derives it from the package name with `-` turned
/// into `_`, so the files are `i18n/<lang>/benchview_ui.ftl`.
const DOMAIN: &str = "benchview_ui";

pub const FALLBACK_LANGUAGE: &str = "en-US";

#[derive(Embed)]
#[folder = "i18n"]
struct Bundles;

pub static LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| {
    let fallback: LanguageIdentifier = FALLBACK_LANGUAGE.parse().unwrap_or_default();
    FluentLanguageLoader::new(DOMAIN, fallback)
});

static INIT: Once = Once::new();

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("`{0}` is not a language tag")]
    BadTag(String),
    #[error("no translations for `{0}`")]
    Unavailable(String),
    #[error("could not load translations: {0}")]
    Load(#[from] i18n_embed::I18nEmbedError),
}

/// Load the bundles matching the user's preferred languages. Idempotent.
pub fn init() {
    INIT.call_once(|| {
        let requested = requested_languages();
        match i18n_embed::select(&*LOADER, &Bundles, &requested) {
            Ok(selected) => tracing::debug!(?selected, "localization ready"),
            Err(err) => tracing::warn!("using {FALLBACK_LANGUAGE} strings: {err}"),
        }
    });
}

/// Switch every lookup to `tag`. Unknown or unparseable tags leave the
/// current language in place.
pub fn set_language(tag: &str) -> Result<(), LocaleError> {
    let lang: LanguageIdentifier = tag
        .parse()
        .map_err(|_| LocaleError::BadTag(tag.to_string()))?;
    if !available_languages().iter().any(|code| code == tag) {
        return Err(LocaleError::Unavailable(tag.to_string()));
    }
    i18n_embed::select(&*LOADER, &Bundles, &[lang])?;
    tracing::info!(lang = tag, "language changed");
    Ok(())
}

/// Language the loader currently resolves messages in.
pub fn current_language() -> String {
    LOADER.current_language().to_string()
}

/// Embedded language tags, sorted.
pub fn available_languages() -> Vec<String> {
    let mut codes: Vec<String> = Bundles::iter()
        .filter_map(|path| path.split('/').next().map(str::to_string))
        .collect();
    codes.sort();
    codes.dedup();
    codes
}

#[cfg(target_arch = "wasm32")]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::WebLanguageRequester::requested_languages()
}

#[cfg(not(target_arch = "wasm32"))]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
}
