//! Bulk dispatcher: replay up to ten analytics requests through their
//! registered handlers in one call.
//!
//! Items are independent; one failure never aborts the batch, and the result
//! array preserves input order. The envelope's `success` reflects only
//! structural acceptance of the batch, never item outcomes.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde_json::{json, Value};

use crate::auth::TenantContext;
use crate::error::AppError;
use crate::registry::{self, AnalyticsParams};
use crate::state::AppState;

pub const MAX_BULK_REQUESTS: usize = 10;

pub const MSG_BULK_NOT_ARRAY: &str = "Il body deve essere un array di richieste";
pub const MSG_INVALID_ENDPOINT: &str = "Endpoint non valido";

pub fn bulk_limit_message() -> String {
    format!("Numero massimo di richieste bulk consentite: {MAX_BULK_REQUESTS}")
}

/// `POST /api/analytics/bulk` — body: `[{endpoint, params}, …]`.
pub async fn bulk(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<TenantContext>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let Some(items) = body.as_array() else {
        return Err(AppError::BadRequest(MSG_BULK_NOT_ARRAY.to_string()));
    };
    if items.len() > MAX_BULK_REQUESTS {
        return Err(AppError::BadRequest(bulk_limit_message()));
    }

    let mut results = Vec::with_capacity(items.len());
    for item in items {
        results.push(run_item(&state, ctx, item).await);
    }

    Ok(Json(json!({ "success": true, "results": results })))
}

/// Execute one batch item. The item's params become the handler's query
/// parameters; the tenant context is the OUTER request's and cannot be
/// overridden per item.
async fn run_item(state: &Arc<AppState>, ctx: TenantContext, item: &Value) -> Value {
    let endpoint = item
        .get("endpoint")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let Some(entry) = registry::bulk_endpoint(endpoint) else {
        return json!({
            "endpoint": endpoint,
            "success": false,
            "error": MSG_INVALID_ENDPOINT,
        });
    };

    let params: AnalyticsParams = item
        .get("params")
        .and_then(|raw| serde_json::from_value(raw.clone()).ok())
        .unwrap_or_default();

    match (entry.handler)(Arc::clone(state), ctx, params).await {
        Ok(data) => json!({
            "endpoint": endpoint,
            "success": true,
            "data": { "success": true, "data": data },
        }),
        Err(err) => {
            if let AppError::Internal(ref e) = err {
                tracing::error!(endpoint, error = %e, "bulk item failed");
            }
            json!({
                "endpoint": endpoint,
                "success": false,
                "data": { "success": false, "message": err.user_message() },
            })
        }
    }
}
