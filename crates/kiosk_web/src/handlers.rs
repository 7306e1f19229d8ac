use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use kiosk_core::{
    Announcement, Article, CurrentConditions, DayForecast, Error, NewsHeadline, Stamped,
};
use kiosk_storage::Feed;

use crate::AppState;

pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            Error::Unsupported(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn list_articles(State(state): State<Arc<AppState>>) -> ApiResult<Stamped<Vec<Article>>> {
    Ok(Json(state.store.articles().await?))
}

pub async fn list_announcements(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Stamped<Vec<Announcement>>> {
    Ok(Json(state.store.announcements().await?))
}

pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Stamped<Vec<DayForecast>>> {
    Ok(Json(state.store.forecast().await?))
}

pub async fn get_weather(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Stamped<Option<CurrentConditions>>> {
    Ok(Json(state.store.weather().await?))
}

pub async fn list_news(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Stamped<Vec<NewsHeadline>>> {
    Ok(Json(state.store.news().await?))
}

pub async fn get_current_item(
    State(state): State<Arc<AppState>>,
    Path(feed): Path<String>,
) -> Result<Response, ApiError> {
    let feed: Feed = feed.parse()?;
    match state.store.current(feed).await? {
        Some(item) => Ok(Json::<Value>(item).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no {} to show", feed) })),
        )
            .into_response()),
    }
}
