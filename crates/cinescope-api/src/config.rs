//! Client configuration and base URL resolution.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Fallback base URL pointing at a locally running service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Base URL baked in at build time via `CINESCOPE_API_BASE_URL`.
pub const BUILD_TIME_BASE_URL: Option<&str> = option_env!("CINESCOPE_API_BASE_URL");

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for `search` (latency-sensitive, re-issued by debounce anyway).
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(8);

/// Timeout for `recommend` (backend computation is heavier).
pub const RECOMMEND_TIMEOUT: Duration = Duration::from_secs(20);

/// Default retry budget.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Retry budget for `search`.
pub const SEARCH_MAX_RETRIES: u32 = 1;

/// User-tunable client settings (the `[api]` section of `config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[allow(clippy::module_name_repetitions)]
pub struct ApiConfig {
    /// Explicit base URL override.
    pub base_url: Option<String>,
    /// Default request timeout in seconds.
    pub timeout_secs: u64,
    /// Search request timeout in seconds.
    pub search_timeout_secs: u64,
    /// Recommendation request timeout in seconds.
    pub recommend_timeout_secs: u64,
    /// Default retry budget.
    pub max_retries: u32,
    /// Search retry budget.
    pub search_max_retries: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            search_timeout_secs: SEARCH_TIMEOUT.as_secs(),
            recommend_timeout_secs: RECOMMEND_TIMEOUT.as_secs(),
            max_retries: DEFAULT_MAX_RETRIES,
            search_max_retries: SEARCH_MAX_RETRIES,
        }
    }
}

/// Resolves the service base URL.
///
/// Order: `explicit` (if non-blank) → build-time `CINESCOPE_API_BASE_URL`
/// → [`DEFAULT_BASE_URL`]. The returned URL always ends with `/` so that
/// endpoint paths join below it.
///
/// # Errors
///
/// Returns an error if the chosen value is not a valid URL.
pub fn resolve_base_url(explicit: Option<&str>) -> Result<Url> {
    let raw = explicit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or(BUILD_TIME_BASE_URL)
        .unwrap_or(DEFAULT_BASE_URL);

    let url = Url::parse(raw).with_context(|| format!("invalid API base URL: {raw}"))?;
    Ok(with_trailing_slash(url))
}

/// Ensures the URL path ends with `/`.
pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
