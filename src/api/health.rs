//! Index and health check endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::{AppError, AppResult};

#[derive(Serialize)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

#[derive(Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub version: String,
}

/// API index
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Welcome to Libris - Book Catalog API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint (checks database connectivity)
pub async fn readiness_check(
    State(state): State<crate::AppState>,
) -> AppResult<Json<HealthResponse>> {
    state
        .services
        .ping()
        .await
        .map_err(|_| AppError::Internal("database unavailable".to_string()))?;

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
