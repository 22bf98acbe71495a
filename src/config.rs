use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API: &str = "https://leaf-disease-production.up.railway.app";
pub const API_URL_ENV: &str = "LEAF_API_URL";
pub const DEFAULT_UPLOAD_FIELD: &str = "file";
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
pub const TOP_K: usize = 5;

/// Client settings, built once at startup and passed down. Nothing in the
/// crate reads the environment after this is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL after override resolution, without trailing slash.
    pub api_base: String,
    /// Where to go when a loopback base turns out to be unreachable.
    pub fallback_base: String,
    /// Multipart field name the backend reads the image from.
    pub upload_field: String,
    pub health_timeout: Duration,
    pub request_timeout: Option<Duration>,
    pub save_path: Option<PathBuf>,
    pub png_path: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(api_override: Option<&str>) -> Self {
        Self {
            api_base: resolve_api_base(api_override),
            fallback_base: DEFAULT_API.to_string(),
            upload_field: DEFAULT_UPLOAD_FIELD.to_string(),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            request_timeout: None,
            save_path: None,
            png_path: None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Pick the backend base URL: a non-empty override wins, otherwise the
/// compiled-in default. Trailing slashes are always stripped.
pub fn resolve_api_base(api_override: Option<&str>) -> String {
    let raw = api_override
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_API);
    strip_trailing_slash(raw).to_string()
}

pub fn strip_trailing_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Join a base URL and an endpoint path with exactly one slash between them.
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", strip_trailing_slash(base), path.trim_start_matches('/'))
}
