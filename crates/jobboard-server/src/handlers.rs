use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::catalog::{Category, Company, Job};
use crate::error::{ApiError, ApiResult};
use crate::server::AppState;

const DEFAULT_FEATURED_LIMIT: usize = 5;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "route not found" })))
}

// ---- Public catalog ----

#[derive(Debug, Deserialize)]
pub struct FeaturedParams {
    pub limit: Option<usize>,
}

pub async fn featured_jobs(
    State(state): State<AppState>,
    Query(params): Query<FeaturedParams>,
) -> ApiResult<Json<Arc<Vec<Job>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_FEATURED_LIMIT);
    let max = state.config.cache.max_featured_limit;
    if limit == 0 || limit > max {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {max}"
        )));
    }

    Ok(Json(state.catalog.featured_jobs(limit).await?))
}

pub async fn job_by_id(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Arc<Job>>> {
    state
        .catalog
        .job(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("job {id}")))
}

pub async fn categories(State(state): State<AppState>) -> ApiResult<Json<Arc<Vec<Category>>>> {
    Ok(Json(state.catalog.categories().await?))
}

pub async fn category_jobs(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Arc<Vec<Job>>>> {
    Ok(Json(state.catalog.jobs_in_category(&slug).await?))
}

pub async fn companies(State(state): State<AppState>) -> ApiResult<Json<Arc<Vec<Company>>>> {
    Ok(Json(state.catalog.companies().await?))
}

// ---- Admin back-office ----
// Everything under the protected prefix except the login page is behind the
// access gate before these run.

pub async fn admin_login(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "page": "admin-login",
        "cookie": state.gate.config().cookie_name,
    }))
}

pub async fn admin_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.catalog.stats();
    Json(json!({
        "page": "admin-dashboard",
        "cache": {
            "total_entries": stats.total_entries(),
            "spaces": stats,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct InvalidateRequest {
    pub key: String,
}

pub async fn admin_invalidate(
    State(state): State<AppState>,
    Json(payload): Json<InvalidateRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.key.is_empty() {
        return Err(ApiError::BadRequest("key cannot be empty".into()));
    }

    let removed = state.catalog.invalidate(&payload.key);
    tracing::info!(key = %payload.key, removed, "Cache key invalidated by admin");

    Ok(Json(json!({ "key": payload.key, "removed": removed })))
}
