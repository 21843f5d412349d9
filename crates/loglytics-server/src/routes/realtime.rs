//! Realtime visitor operations. Windows are fixed relative expressions, so
//! `from`/`to` params are accepted and ignored; nothing to validate.

use std::sync::Arc;

use loglytics_search::mapping;

use crate::auth::TenantContext;
use crate::error::{engine_failure, MSG_REALTIME_FAILED};
use crate::registry::{AnalyticsParams, HandlerFuture};
use crate::routes::to_payload;
use crate::state::AppState;

pub fn visitors(
    state: Arc<AppState>,
    ctx: TenantContext,
    _params: AnalyticsParams,
) -> HandlerFuture {
    Box::pin(async move {
        let live = state
            .analytics
            .realtime_visitors(ctx.client_id)
            .await
            .map_err(|e| engine_failure(MSG_REALTIME_FAILED, e))?;
        to_payload(live)
    })
}

pub fn timeline(
    state: Arc<AppState>,
    ctx: TenantContext,
    _params: AnalyticsParams,
) -> HandlerFuture {
    Box::pin(async move {
        let points = state
            .analytics
            .realtime_visitor_timeline(ctx.client_id)
            .await
            .map_err(|e| engine_failure(MSG_REALTIME_FAILED, e))?;
        to_payload(points)
    })
}

fn grouped(state: Arc<AppState>, ctx: TenantContext, field: &'static str) -> HandlerFuture {
    Box::pin(async move {
        let rows = state
            .analytics
            .realtime_visitors_by_group(ctx.client_id, field)
            .await
            .map_err(|e| engine_failure(MSG_REALTIME_FAILED, e))?;
        to_payload(rows)
    })
}

pub fn by_country(s: Arc<AppState>, c: TenantContext, _p: AnalyticsParams) -> HandlerFuture {
    grouped(s, c, mapping::GEO_COUNTRY)
}

pub fn by_page(s: Arc<AppState>, c: TenantContext, _p: AnalyticsParams) -> HandlerFuture {
    grouped(s, c, mapping::PAGE_TITLE)
}

pub fn by_browser(s: Arc<AppState>, c: TenantContext, _p: AnalyticsParams) -> HandlerFuture {
    grouped(s, c, mapping::DEVICE_BROWSER)
}

pub fn by_device(s: Arc<AppState>, c: TenantContext, _p: AnalyticsParams) -> HandlerFuture {
    grouped(s, c, mapping::DEVICE_TYPE)
}
