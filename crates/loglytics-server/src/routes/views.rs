//! View analytics operations.
//!
//! Handlers here are plain functions over `(state, tenant, params)` so the
//! router and the bulk dispatcher can call the same code path.

use std::sync::Arc;

use loglytics_search::mapping;

use crate::auth::TenantContext;
use crate::error::{engine_failure, MSG_STATS_FAILED};
use crate::registry::{AnalyticsParams, HandlerFuture};
use crate::routes::{require_window, to_payload};
use crate::state::AppState;

pub fn total(state: Arc<AppState>, ctx: TenantContext, params: AnalyticsParams) -> HandlerFuture {
    Box::pin(async move {
        let window = require_window(&params)?;
        let totals = state
            .analytics
            .total_views(ctx.client_id, &window)
            .await
            .map_err(|e| engine_failure(MSG_STATS_FAILED, e))?;
        to_payload(totals)
    })
}

pub fn daily(state: Arc<AppState>, ctx: TenantContext, params: AnalyticsParams) -> HandlerFuture {
    Box::pin(async move {
        let window = require_window(&params)?;
        let days = state
            .analytics
            .daily_views(ctx.client_id, &window)
            .await
            .map_err(|e| engine_failure(MSG_STATS_FAILED, e))?;
        to_payload(days)
    })
}

fn grouped(
    state: Arc<AppState>,
    ctx: TenantContext,
    params: AnalyticsParams,
    field: &'static str,
) -> HandlerFuture {
    Box::pin(async move {
        let window = require_window(&params)?;
        let rows = state
            .analytics
            .views_by_group(ctx.client_id, &window, field)
            .await
            .map_err(|e| engine_failure(MSG_STATS_FAILED, e))?;
        to_payload(rows)
    })
}

pub fn by_device(s: Arc<AppState>, c: TenantContext, p: AnalyticsParams) -> HandlerFuture {
    grouped(s, c, p, mapping::DEVICE_TYPE)
}

pub fn by_browser(s: Arc<AppState>, c: TenantContext, p: AnalyticsParams) -> HandlerFuture {
    grouped(s, c, p, mapping::DEVICE_BROWSER)
}

pub fn by_os(s: Arc<AppState>, c: TenantContext, p: AnalyticsParams) -> HandlerFuture {
    grouped(s, c, p, mapping::DEVICE_OS)
}

pub fn by_referrer(s: Arc<AppState>, c: TenantContext, p: AnalyticsParams) -> HandlerFuture {
    grouped(s, c, p, mapping::REFERRER)
}

pub fn by_city(s: Arc<AppState>, c: TenantContext, p: AnalyticsParams) -> HandlerFuture {
    grouped(s, c, p, mapping::GEO_CITY)
}

pub fn by_country(s: Arc<AppState>, c: TenantContext, p: AnalyticsParams) -> HandlerFuture {
    grouped(s, c, p, mapping::GEO_COUNTRY)
}
