use std::env;
use std::path::Path;
use std::time::Duration;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_BASE_URL: &str = "";
pub const FALLBACK_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_REFRESH_SECS: u64 = 30;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Resolved runtime settings shared by the web server and the CLI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub refresh_interval: Duration,
    pub session_idle: Duration,
    pub request_timeout: Duration,
}

impl Settings {
    /// Reads every setting from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            api_base_url: get_api_base_url(),
            refresh_interval: Duration::from_secs(get_secs("TASKDESK_REFRESH_SECS", DEFAULT_REFRESH_SECS)),
            session_idle: Duration::from_secs(get_secs("TASKDESK_SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS)),
            request_timeout: Duration::from_secs(get_secs(
                "TASKDESK_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: sanitize_base_url(DEFAULT_API_BASE_URL),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_api_base_url() -> String {
    sanitize_base_url(&env::var("TASKDESK_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()))
}

/// Reads a positive number of seconds; zero and garbage fall back to `default`.
fn get_secs(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        FALLBACK_API_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Host portion of the API base URL, shown in page headers.
pub fn api_host(base_url: &str) -> String {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| {
            url.host_str().map(|host| match url.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            })
        })
        .unwrap_or_default()
}
