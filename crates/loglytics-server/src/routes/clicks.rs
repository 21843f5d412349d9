//! Click analytics operations.

use std::sync::Arc;

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
            .total_clicks(ctx.client_id, &window)
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
            .daily_clicks(ctx.client_id, &window)
            .await
            .map_err(|e| engine_failure(MSG_STATS_FAILED, e))?;
        to_payload(days)
    })
}

pub fn by_target(
    state: Arc<AppState>,
    ctx: TenantContext,
    params: AnalyticsParams,
) -> HandlerFuture {
    Box::pin(async move {
        let window = require_window(&params)?;
        let rows = state
            .analytics
            .clicks_by_target(ctx.client_id, &window)
            .await
            .map_err(|e| engine_failure(MSG_STATS_FAILED, e))?;
        to_payload(rows)
    })
}
