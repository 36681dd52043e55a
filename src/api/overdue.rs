use super::client::ApiClient;
use super::error::ApiError;
use crate::models::OverdueTask;

/// Load tasks the API considers overdue.
pub async fn load_overdue(api: &ApiClient) -> Result<Vec<OverdueTask>, ApiError> {
    api.get("/api/overdue").await
}
