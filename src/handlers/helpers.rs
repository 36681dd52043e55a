use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::models::{AppState, CurrentUser};
use crate::services::{ActionError, SessionHandle};

pub const SESSION_COOKIE: &str = "session_id";

pub fn session_id_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

pub fn session_from_jar(state: &AppState, jar: &CookieJar) -> Option<SessionHandle> {
    let sid = session_id_from_jar(jar)?;
    state.sessions.get(&sid)
}

pub fn session_cookie(sid: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, sid);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie
}

#[derive(Default)]
pub struct TemplateGlobals {
    pub current_user: Option<CurrentUser>,
    pub api_host: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
}

/// Header fields for a full page. Drains the session's pending notices.
pub fn build_template_globals(state: &AppState, session: Option<&SessionHandle>) -> TemplateGlobals {
    let (current_user, flash_messages) = match session {
        Some(handle) => handle.with(|s| (Some(s.current_user()), s.take_notices())),
        None => (None, Vec::new()),
    };
    TemplateGlobals {
        current_user,
        api_host: state.api_host.clone(),
        has_flash_messages: !flash_messages.is_empty(),
        flash_messages,
    }
}

pub fn plain_html<S: AsRef<str>>(s: S) -> Response {
    Html(format!("<!DOCTYPE html><html><body><p>{}</p></body></html>", s.as_ref())).into_response()
}

pub fn render_template<T: Template>(t: T) -> Response {
    match t.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Post/redirect/get for task actions. Refused actions answer 403; other
/// failures become a notice on the next page.
pub fn action_response(handle: &SessionHandle, result: Result<(), ActionError>) -> Response {
    match result {
        Ok(()) => Redirect::to("/tasks").into_response(),
        Err(e @ ActionError::Forbidden(_)) => {
            tracing::warn!(error = %e, "Refused task action");
            let mut resp = plain_html(e.to_string());
            *resp.status_mut() = StatusCode::FORBIDDEN;
            resp
        }
        // The form keeps the message in its own error box.
        Err(ActionError::Invalid(_)) => Redirect::to("/tasks").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Task action failed");
            handle.notify(e.notice());
            Redirect::to("/tasks").into_response()
        }
    }
}
