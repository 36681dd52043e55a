use super::client::ApiClient;
use super::error::ApiError;
use crate::models::RosterEntry;

/// Load the roster of users tasks can be assigned to.
pub async fn load_users(api: &ApiClient) -> Result<Vec<RosterEntry>, ApiError> {
    let users: Vec<RosterEntry> = api.get("/api/users").await?;
    tracing::debug!(count = users.len(), "Loaded roster");
    Ok(users)
}
