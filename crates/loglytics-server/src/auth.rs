//! Tenant context resolution.
//!
//! Authentication and permission checks happen upstream; the gateway injects
//! the resolved tenant into `x-client-id` / `x-instance-id` headers and this
//! middleware trusts them verbatim. Requests without a tenant never reach a
//! handler.

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// Resolved tenant scope for one request, injected into request extensions.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext {
    pub client_id: i64,
    pub instance_id: Option<i64>,
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}

pub async fn resolve_tenant(mut request: Request, next: Next) -> Response {
    let headers = request.headers();
    let Some(client_id) = header_i64(headers, "x-client-id") else {
        return AppError::Unauthorized.into_response();
    };
    let instance_id = header_i64(headers, "x-instance-id");

    request.extensions_mut().insert(TenantContext {
        client_id,
        instance_id,
    });
    next.run(request).await
}
