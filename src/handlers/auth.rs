use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::models::{AppState, Role};
use crate::services::{start_session, LoginForm, LoginValidation};
use crate::templates::LoginTemplate;

use super::helpers::{render_template, session_cookie, session_from_jar};

#[derive(Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub username: String,
}

/// Which input event triggered a live validation check.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidateEvent {
    #[default]
    Input,
    Role,
}

#[derive(Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub event: ValidateEvent,
}

pub async fn login_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if session_from_jar(&state, &jar).is_some() {
        return Redirect::to("/tasks").into_response();
    }
    render_template(LoginTemplate::from_form(&LoginForm::default(), state.api_host.clone(), Vec::new()))
}

pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(input): Form<LoginInput>,
) -> impl IntoResponse {
    let mut form = LoginForm::new(input.role, &input.username);
    match form.submit(&state.api).await {
        Ok(user) => {
            let handle = start_session(&state.api, user).await;
            let sid = state.sessions.insert(handle);
            (jar.add(session_cookie(sid)), Redirect::to("/tasks")).into_response()
        }
        Err(_) => render_template(LoginTemplate::from_form(&form, state.api_host.clone(), Vec::new())),
    }
}

/// Live check run by the login page on every keystroke and role change.
pub async fn login_validate(Json(req): Json<ValidateRequest>) -> Json<LoginValidation> {
    let mut form = LoginForm::new(req.role, &req.username);
    let validation = match req.event {
        ValidateEvent::Input => form.on_username_input(&req.username),
        ValidateEvent::Role => form.on_role_change(req.role),
    };
    Json(validation)
}

pub async fn root_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if session_from_jar(&state, &jar).is_some() {
        return Redirect::to("/tasks");
    }
    Redirect::to("/login")
}
