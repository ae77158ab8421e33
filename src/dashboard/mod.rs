pub mod routes;

use axum::Router;
use std::path::PathBuf;
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
