use askama::Template;

use crate::models::CurrentUser;
use crate::services::LoginForm;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_host: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,

    pub role: String,
    pub username: String,
    pub submit_enabled: bool,
    pub focus_username: bool,
    pub error: String,
    pub has_error: bool,
}

crate::impl_base_template!(LoginTemplate);

impl LoginTemplate {
    /// Fill the login view from the controller state.
    pub fn from_form(form: &LoginForm, api_host: String, flash_messages: Vec<String>) -> Self {
        let error = form.error().unwrap_or_default().to_string();
        Self {
            current_user: None,
            api_host,
            has_flash_messages: !flash_messages.is_empty(),
            flash_messages,
            role: form.role.as_str().to_string(),
            username: form.username.clone(),
            submit_enabled: form.submit_enabled(),
            focus_username: form.role == crate::models::Role::User,
            has_error: !error.is_empty(),
            error,
        }
    }
}
