use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::handlers::helpers::session_from_jar;
use crate::models::AppState;

/// Resolve the session cookie and hand the [`SessionHandle`] to the handler
/// as an extension; anonymous requests go to the login view.
///
/// [`SessionHandle`]: crate::services::SessionHandle
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match session_from_jar(&state, &jar) {
        Some(handle) => {
            request.extensions_mut().insert(handle);
            next.run(request).await
        }
        None => Redirect::to("/login").into_response(),
    }
}
