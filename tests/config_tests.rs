use std::env;
use std::time::Duration;
use taskdesk::config::{self, Settings};

#[test]
fn test_sanitize_base_url_removes_trailing_slash() {
    assert_eq!(config::sanitize_base_url("http://tasks.local:5000/"), "http://tasks.local:5000");
}

#[test]
fn test_sanitize_base_url_multiple_trailing_slashes() {
    assert_eq!(config::sanitize_base_url("http://tasks.local:5000///"), "http://tasks.local:5000");
}

#[test]
fn test_sanitize_base_url_with_whitespace() {
    assert_eq!(config::sanitize_base_url("  http://tasks.local/api-root/  "), "http://tasks.local/api-root");
}

#[test]
fn test_sanitize_base_url_empty_string() {
    assert_eq!(config::sanitize_base_url(""), "http://localhost:5000");
    assert_eq!(config::sanitize_base_url("   "), "http://localhost:5000");
}

#[test]
fn test_api_host() {
    assert_eq!(config::api_host("http://localhost:5000"), "localhost:5000");
    assert_eq!(config::api_host("https://tasks.example.com/base"), "tasks.example.com");
    assert_eq!(config::api_host("not a url"), "");
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.api_base_url, "http://localhost:5000");
    assert_eq!(settings.refresh_interval, Duration::from_secs(30));
    assert_eq!(settings.session_idle, Duration::from_secs(1800));
    assert_eq!(settings.request_timeout, Duration::from_secs(30));
}

// Environment variables are process-wide, so every env case lives in this
// one test to keep parallel test threads from racing on them.
#[test]
fn test_settings_from_env() {
    env::remove_var("TASKDESK_API_BASE_URL");
    env::remove_var("TASKDESK_REFRESH_SECS");
    env::remove_var("TASKDESK_SESSION_IDLE_SECS");
    env::remove_var("TASKDESK_REQUEST_TIMEOUT_SECS");
    assert_eq!(Settings::from_env(), Settings::default());

    env::set_var("TASKDESK_API_BASE_URL", "http://tasks.local:8000/");
    env::set_var("TASKDESK_REFRESH_SECS", "5");
    env::set_var("TASKDESK_SESSION_IDLE_SECS", "0");
    env::set_var("TASKDESK_REQUEST_TIMEOUT_SECS", "soon");
    let settings = Settings::from_env();
    assert_eq!(settings.api_base_url, "http://tasks.local:8000");
    assert_eq!(settings.refresh_interval, Duration::from_secs(5));
    // Zero and garbage fall back to the defaults.
    assert_eq!(settings.session_idle, Duration::from_secs(1800));
    assert_eq!(settings.request_timeout, Duration::from_secs(30));

    env::remove_var("TASKDESK_API_BASE_URL");
    env::remove_var("TASKDESK_REFRESH_SECS");
    env::remove_var("TASKDESK_SESSION_IDLE_SECS");
    env::remove_var("TASKDESK_REQUEST_TIMEOUT_SECS");
}
