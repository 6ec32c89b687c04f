//! Health check endpoint

use axum::{routing::get, Router};

pub async fn health_check() -> &'static str {
    "ok"
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}
