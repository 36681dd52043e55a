use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;

const STYLES_CSS: &str = include_str!("../../static/styles.css");

pub async fn styles_css() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], STYLES_CSS)
}
