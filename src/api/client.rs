use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use yansi::Paint;

use super::error::ApiError;
use crate::config::sanitize_base_url;

static SILENT: AtomicBool = AtomicBool::new(false);

/// Turns the curl-style request echo on stdout off (or back on).
pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        println!("{}", msg);
    }
}

fn echo_request(method: &Method, url: &str, body: Option<&Value>) {
    if SILENT.load(Ordering::Relaxed) {
        return;
    }
    let mut parts = Vec::new();
    parts.push(Paint::new("curl").fg(yansi::Color::Green).bold().to_string());
    parts.push(format!("-X {}", Paint::new(method.as_str()).fg(yansi::Color::Yellow).bold()));
    parts.push(format!("'{}'", Paint::new(url).fg(yansi::Color::Cyan)));
    if let Some(d) = body {
        parts.push(format!(
            "{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Content-Type: application/json'").fg(yansi::Color::Magenta)
        ));
        let json_str = serde_json::to_string(d).unwrap_or_default();
        let escaped_json = json_str.replace('\'', "'\\''");
        parts.push(format!(
            "{} {}",
            Paint::new("-d").fg(yansi::Color::Blue),
            Paint::new(format!("'{}'", escaped_json)).fg(yansi::Color::White)
        ));
    }
    log_output(format!("Request:\n{}", parts.join(" ")));
}

/// JSON client for the task API.
///
/// Every call returns `Result<T, ApiError>`: transport failures, non-2xx
/// statuses and malformed bodies each surface as their own variant instead
/// of leaking out as a panic or an untyped value.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url` (sanitised, see [`sanitize_base_url`]).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = sanitize_base_url(base_url);
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(base_url));
        }
        let http = reqwest::Client::builder()
            .user_agent(format!("taskdesk/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None).await
    }

    /// Issue a request and decode the JSON response body into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let text = self.send_raw(method, path, body).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Issue a request whose response body the caller does not use.
    pub async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<(), ApiError> {
        self.send_raw(method, path, body).await.map(|_| ())
    }

    async fn send_raw(&self, method: Method, path: &str, body: Option<Value>) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        echo_request(&method, &url, body.as_ref());

        let started = Instant::now();
        let mut req = self.http.request(method.clone(), &url);
        if let Some(ref b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "API request failed");
            ApiError::from(e)
        })?;
        let status = resp.status();
        let text = resp.text().await?;

        tracing::debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "API response"
        );
        log_output(format!("Response:\n{}", Paint::new(&text).rgb(100, 100, 100)));

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}
