use crate::api::ApiClient;
use crate::config::Settings;
use crate::services::session::SessionStore;

/// Shared state of the web front end.
#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub sessions: SessionStore,
    pub settings: Settings,
    /// Host of the task API, shown in the page header.
    pub api_host: String,
}

impl AppState {
    pub fn new(api: ApiClient, settings: Settings) -> Self {
        let api_host = crate::config::api_host(api.base_url());
        Self {
            api,
            sessions: SessionStore::new(),
            settings,
            api_host,
        }
    }
}
