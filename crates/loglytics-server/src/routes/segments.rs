//! Segment preview, paginated results and mapping introspection.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{engine_failure, AppError, MSG_SEGMENT_NOT_FOUND, MSG_STATS_FAILED};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub client_id: i64,
    pub instance_id: Option<i64>,
    pub query: Value,
}

/// `POST /api/segments/preview` — cheap size estimate for an ad-hoc query.
/// The permission gate has already checked the caller against the body's
/// client/instance pair.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PreviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let preview = state
        .analytics
        .preview_segment(req.client_id, req.instance_id, &req.query)
        .await
        .map_err(|e| engine_failure(MSG_STATS_FAILED, e))?;
    Ok(Json(preview))
}

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub size: Option<usize>,
    pub after_key: Option<String>,
}

/// `GET /api/segments/{id}/results?size&after_key` — one page of member ids.
/// Stateless across calls: the opaque cursor is the only paging state.
pub async fn results(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<ResultsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let segment = state
        .segments
        .get(id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(MSG_SEGMENT_NOT_FOUND.to_string()))?;

    let size = query
        .size
        .unwrap_or(loglytics_search::queries::segments::DEFAULT_PAGE_SIZE);
    let page = state
        .analytics
        .segment_results(&segment, size, query.after_key.as_deref())
        .await
        .map_err(|e| engine_failure(MSG_STATS_FAILED, e))?;
    Ok(Json(page))
}

/// `GET /api/segments/mapping/{clientId}` — field map of the tenant's
/// current write index, for the segment-builder UI.
pub async fn mapping(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let properties = state
        .analytics
        .field_mapping(client_id)
        .await
        .map_err(|e| engine_failure(MSG_STATS_FAILED, e))?;
    Ok(Json(properties))
}
