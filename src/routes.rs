use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::models::AppState;

pub fn build_router(state: AppState) -> Router {
    let tasks = Router::new()
        .route("/tasks", get(handlers::tasks_get))
        .route("/tasks/table", get(handlers::tasks_table))
        .route("/tasks/new", get(handlers::task_new))
        .route("/tasks/save", post(handlers::task_save))
        .route("/tasks/cancel", post(handlers::task_cancel))
        .route("/tasks/:id/edit", get(handlers::task_edit))
        .route(
            "/tasks/:id/delete",
            get(handlers::task_delete_confirm).post(handlers::task_delete),
        )
        .route("/tasks/:id/status", post(handlers::task_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), handlers::auth_middleware))
        // Pages hold per-session state; never serve them from a cache.
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    let assets = Router::new()
        .route("/static/styles.css", get(handlers::styles_css))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        ));

    Router::new()
        .route("/", get(handlers::root_get))
        .route("/login", get(handlers::login_get).post(handlers::login_post))
        .route("/login/validate", post(handlers::login_validate))
        .merge(tasks)
        .merge(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
