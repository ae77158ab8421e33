//! JSON endpoints over the daily CSV outputs.
//!
//! The data changes once per day, so files are read per request rather than
//! cached.

use crate::dashboard::AppState;
use crate::domain::model::{ForecastRecord, IndicatorRow};
use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::path::Path;

const NO_FORECAST_DATA: &str = "No forecast data found. The daily analysis may not have run yet.";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/forecasts", get(all_forecasts))
        .route("/api/forecasts/latest", get(latest_forecasts))
        .route("/api/coins/{ticker}/indicators", get(coin_indicators))
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn all_forecasts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ForecastRecord>>, ApiError> {
    let mut rows = read_summary(&state)?;
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(rows))
}

async fn latest_forecasts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ForecastRecord>>, ApiError> {
    let rows = read_summary(&state)?;
    let latest = rows
        .iter()
        .map(|r| r.date)
        .max()
        .ok_or_else(|| ApiError::NotFound(NO_FORECAST_DATA.to_string()))?;
    Ok(Json(rows.into_iter().filter(|r| r.date == latest).collect()))
}

async fn coin_indicators(
    State(state): State<AppState>,
    UrlPath(ticker): UrlPath<String>,
) -> Result<Json<Vec<IndicatorRow>>, ApiError> {
    if !is_valid_ticker(&ticker) {
        return Err(ApiError::BadRequest(format!("Invalid ticker '{}'", ticker)));
    }

    let path = state
        .data_dir
        .join("data")
        .join(format!("{}_data.csv", ticker));
    let rows: Vec<IndicatorRow> =
        read_rows(&path, format!("No indicator data for {}", ticker))?;
    if rows.is_empty() {
        return Err(ApiError::NotFound(format!("No indicator data for {}", ticker)));
    }
    Ok(Json(rows))
}

fn read_summary(state: &AppState) -> Result<Vec<ForecastRecord>, ApiError> {
    let rows: Vec<ForecastRecord> = read_rows(
        &state.data_dir.join("forecast_results.csv"),
        NO_FORECAST_DATA.to_string(),
    )?;
    if rows.is_empty() {
        return Err(ApiError::NotFound(NO_FORECAST_DATA.to_string()));
    }
    Ok(rows)
}

fn read_rows<T: DeserializeOwned>(path: &Path, missing: String) -> Result<Vec<T>, ApiError> {
    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(missing))
        }
        Err(e) => {
            return Err(ApiError::Internal(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    let mut reader = csv::Reader::from_reader(raw.as_slice());
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| ApiError::Internal(format!("Malformed CSV in {}: {}", path.display(), e)))
}

/// Tickers come straight from the URL and end up in a file name.
fn is_valid_ticker(ticker: &str) -> bool {
    !ticker.is_empty()
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}
