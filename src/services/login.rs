use serde::Serialize;
use thiserror::Error;

use crate::api::{self, ApiClient, ApiError};
use crate::models::{ApiUser, LoginRequest, Role, SessionUser};

/// Reasons a login attempt does not produce a session.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Field should not be empty: Username is required for Users")]
    UsernameRequired,
    #[error("Login failed. Try again.")]
    Rejected,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl LoginError {
    /// Text for the inline error region under the username field.
    pub fn inline_message(&self) -> String {
        match self {
            LoginError::Api(e) => e.notice(),
            other => other.to_string(),
        }
    }
}

/// Result of re-running validation after an input event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginValidation {
    pub valid: bool,
    pub submit_enabled: bool,
    /// The username field should take focus (set when "user" gets selected).
    pub focus_username: bool,
    pub error: Option<String>,
}

/// State of the login view: role selector, username field, submit control
/// and inline error region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginForm {
    pub role: Role,
    pub username: String,
    submit_enabled: bool,
    error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new(Role::default(), "")
    }
}

impl LoginForm {
    pub fn new(role: Role, username: &str) -> Self {
        let mut form = Self {
            role,
            username: username.to_string(),
            submit_enabled: false,
            error: None,
        };
        form.revalidate(false);
        form
    }

    /// Users must give a name; project managers may log in anonymously.
    pub fn validate(&self) -> Result<(), LoginError> {
        if self.role == Role::User && self.username.trim().is_empty() {
            return Err(LoginError::UsernameRequired);
        }
        Ok(())
    }

    pub fn on_username_input(&mut self, value: &str) -> LoginValidation {
        self.username = value.to_string();
        self.revalidate(false)
    }

    pub fn on_role_change(&mut self, role: Role) -> LoginValidation {
        self.role = role;
        self.revalidate(role == Role::User)
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn revalidate(&mut self, focus_username: bool) -> LoginValidation {
        match self.validate() {
            Ok(()) => {
                self.error = None;
                self.submit_enabled = true;
            }
            Err(e) => {
                self.error = Some(e.inline_message());
                self.submit_enabled = false;
            }
        }
        LoginValidation {
            valid: self.submit_enabled,
            submit_enabled: self.submit_enabled,
            focus_username,
            error: self.error.clone(),
        }
    }

    /// Validate, then send `{username, role}` to the login endpoint.
    ///
    /// On success returns the session user carrying the roster from the
    /// response. Any failure is also recorded as the inline error.
    pub async fn submit(&mut self, api: &ApiClient) -> Result<SessionUser, LoginError> {
        self.revalidate(false);
        self.validate()?;

        let request = LoginRequest {
            username: self.username.trim().to_string(),
            role: self.role,
        };
        let outcome = match api::login(api, &request).await {
            Ok(response) if response.ok => {
                let user = response.user.unwrap_or(ApiUser {
                    id: None,
                    name: request.username.clone(),
                    role: request.role,
                });
                Ok(SessionUser::from_login(user, response.users))
            }
            Ok(_) => Err(LoginError::Rejected),
            Err(e) => Err(LoginError::Api(e)),
        };
        if let Err(ref e) = outcome {
            tracing::warn!(username = %request.username, role = %request.role, error = %e, "Login failed");
            self.error = Some(e.inline_message());
        }
        outcome
    }
}
