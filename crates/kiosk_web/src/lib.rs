use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod refresh;
pub mod state;

pub use refresh::Refresher;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/announcements", get(handlers::list_announcements))
        .route("/api/forecast", get(handlers::get_forecast))
        .route("/api/weather", get(handlers::get_weather))
        .route("/api/news", get(handlers::list_news))
        .route("/api/:feed/current", get(handlers::get_current_item))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::{create_app, AppState, Refresher};
    pub use kiosk_core::{Error, Result};
}
