use std::sync::Arc;

use axum::{
    extract::{Query, State},
    middleware,
    routing::{get, post, MethodRouter},
    Extension, Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{self, TenantContext};
use crate::error::AppError;
use crate::registry::{self, AnalyticsParams, EndpointEntry};
use crate::routes;
use crate::state::AppState;

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// Analytics and segment routes are installed from the endpoint registry and
/// sit behind the tenant-context middleware; `/health` stays open. Outer
/// layers: `TraceLayer` for structured request logging, then permissive CORS
/// (dashboards are served from other origins).
pub fn build_app(state: Arc<AppState>) -> Router {
    let mut api = Router::new();
    for entry in registry::ENDPOINTS {
        api = api.route(entry.path, registry_route(entry));
    }

    let api = api
        .route("/api/analytics/bulk", post(routes::bulk::bulk))
        .route("/api/segments/preview", post(routes::segments::preview))
        .route("/api/segments/{id}/results", get(routes::segments::results))
        .route(
            "/api/segments/mapping/{client_id}",
            get(routes::segments::mapping),
        )
        .layer(middleware::from_fn(auth::resolve_tenant));

    Router::new()
        .route("/health", get(routes::health::health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Adapt a registry handler to an Axum method router. Success bodies are
/// wrapped in the `{success, data}` envelope here, in one place.
fn registry_route(entry: &'static EndpointEntry) -> MethodRouter<Arc<AppState>> {
    let handler = move |State(state): State<Arc<AppState>>,
                        Extension(ctx): Extension<TenantContext>,
                        Query(params): Query<AnalyticsParams>| async move {
        let data = (entry.handler)(state, ctx, params).await?;
        Ok::<_, AppError>(Json(json!({ "success": true, "data": data })))
    };
    match entry.method {
        "post" => post(handler),
        _ => get(handler),
    }
}
