use reqwest::Method;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{LoginRequest, LoginResponse};

/// `POST /api/login`. The caller decides what `ok: false` means.
pub async fn login(api: &ApiClient, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    let body = serde_json::to_value(request).map_err(|e| ApiError::Parse(e.to_string()))?;
    let response: LoginResponse = api.request(Method::POST, "/api/login", Some(body)).await?;
    tracing::info!(username = %request.username, role = %request.role, ok = response.ok, "Login response");
    Ok(response)
}
