//! Preference parsing and endpoint construction.
//!
//! # Design
//! - Browser storage and DOM lookups live in the wasm `app` module; these
//!   helpers only interpret the raw strings they return.
//! - Stored values that fail to parse fall back to defaults silently.

use storalytics_core::{DisplayUnit, Filter};

/// Local storage key for the selected display unit.
pub const UNIT_KEY: &str = "storalytics.unit";
/// `<meta name="...">` carrying the API base URL.
pub const API_META_NAME: &str = "storalytics-api";
/// API base used when the page does not configure one.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Interpret a stored unit label, defaulting to TB.
#[must_use]
pub fn stored_unit(value: Option<&str>) -> DisplayUnit {
    value
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_default()
}

/// API base from the page meta tag, without a trailing slash.
#[must_use]
pub fn api_base(meta_content: Option<&str>) -> String {
    meta_content
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_API_BASE)
        .trim_end_matches('/')
        .to_string()
}

/// Join an endpoint path (e.g. `login/`) onto the API base.
#[must_use]
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// `dashboard/` path with the filter encoded as query parameters.
#[must_use]
pub fn dashboard_path(filter: &Filter) -> String {
    let query = filter
        .query_pairs()
        .into_iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() {
        "dashboard/".to_string()
    } else {
        format!("dashboard/?{query}")
    }
}
