//! Platform helpers for locating data sources.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Web,
    Desktop,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Web
        } else {
            Self::Desktop
        }
    }
}

/// Whether `location` names something fetched over HTTP rather than read from disk.
pub fn is_http(location: &str) -> bool {
    let lower = location.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Whether `location` names a SQLite database file rather than a JSON export.
pub fn is_sqlite(location: &str) -> bool {
    let path = location.trim().split(['?', '#']).next().unwrap_or_default();
    let lower = path.to_ascii_lowercase();
    [".db", ".sqlite", ".sqlite3"]
        .iter()
        .any(|extension| lower.ends_with(extension))
}

/// Resolve a possibly relative location against the page URL. Browsers need
/// absolute URLs for `reqwest`; native builds keep paths as given.
#[cfg(target_arch = "wasm32")]
pub fn resolve_location(location: &str) -> String {
    if is_http(location) {
        return location.to_string();
    }
    web_sys::window()
        .and_then(|window| window.location().href().ok())
        .and_then(|base| web_sys::Url::new_with_base(location, &base).ok())
        .map(|url| url.href())
        .unwrap_or_else(|| location.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn resolve_location(location: &str) -> String {
    location.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_http_locations() {
        assert!(is_http("https://bench.example/db.json"));
        assert!(is_http("HTTP://bench.example"));
        assert!(!is_http("benchmark.json"));
        assert!(!is_http("/var/lib/benchmark.json"));
    }

    #[test]
    fn detects_sqlite_databases() {
        assert!(is_sqlite("reports/benchmark.db"));
        assert!(is_sqlite("https://bench.example/benchmark.DB?v=3"));
        assert!(is_sqlite("/tmp/results.sqlite3"));
        assert!(!is_sqlite("benchmark.json"));
        assert!(!is_sqlite("https://bench.example/db.json#benchmark.db.json"));
    }

    #[test]
    fn native_paths_are_kept() {
        assert_eq!(resolve_location(" reports/benchmark.json "), "reports/benchmark.json");
        assert_eq!(Platform::current(), Platform::Desktop);
    }
}
