use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::routes::task::{health, infer, remove_background};
use crate::state::AppState;

mod task;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/infer", post(infer))
        .route("/remove_background", post(remove_background))
        .route("/health", get(health))
}
