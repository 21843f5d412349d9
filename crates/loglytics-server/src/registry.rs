//! Static endpoint registry.
//!
//! One table drives both route installation ([`crate::app::build_app`]) and
//! the bulk-eligible subset consumed by the dispatcher. Handlers are plain
//! function pointers over `(state, tenant, params)` — no transport objects —
//! so the bulk dispatcher calls them directly.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::auth::TenantContext;
use crate::error::AppError;
use crate::routes;
use crate::state::AppState;

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value, AppError>> + Send>>;

pub type Handler = fn(Arc<AppState>, TenantContext, AnalyticsParams) -> HandlerFuture;

/// Query parameters shared by every analytics endpoint. Bulk items carry the
/// same shape in their `params` object; unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub struct EndpointEntry {
    pub key: &'static str,
    pub path: &'static str,
    pub method: &'static str,
    pub handler: Handler,
    pub supports_bulk: bool,
}

/// Immutable after process start. Realtime endpoints are excluded from bulk:
/// their relative windows make per-item params meaningless.
pub static ENDPOINTS: &[EndpointEntry] = &[
    EndpointEntry {
        key: "views-total",
        path: "/api/analytics/views/total",
        method: "get",
        handler: routes::views::total,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "views-daily",
        path: "/api/analytics/views/daily",
        method: "get",
        handler: routes::views::daily,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "views-groupby-device",
        path: "/api/analytics/views/groupby/device",
        method: "get",
        handler: routes::views::by_device,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "views-groupby-browser",
        path: "/api/analytics/views/groupby/browser",
        method: "get",
        handler: routes::views::by_browser,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "views-groupby-os",
        path: "/api/analytics/views/groupby/os",
        method: "get",
        handler: routes::views::by_os,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "views-groupby-referrer",
        path: "/api/analytics/views/groupby/referrer",
        method: "get",
        handler: routes::views::by_referrer,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "views-groupby-city",
        path: "/api/analytics/views/groupby/city",
        method: "get",
        handler: routes::views::by_city,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "views-groupby-country",
        path: "/api/analytics/views/groupby/country",
        method: "get",
        handler: routes::views::by_country,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "uviews-total",
        path: "/api/analytics/uviews/total",
        method: "get",
        handler: routes::uviews::total,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "uviews-daily",
        path: "/api/analytics/uviews/daily",
        method: "get",
        handler: routes::uviews::daily,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "uviews-groupby-device",
        path: "/api/analytics/uviews/groupby/device",
        method: "get",
        handler: routes::uviews::by_device,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "uviews-groupby-browser",
        path: "/api/analytics/uviews/groupby/browser",
        method: "get",
        handler: routes::uviews::by_browser,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "uviews-groupby-referrer",
        path: "/api/analytics/uviews/groupby/referrer",
        method: "get",
        handler: routes::uviews::by_referrer,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "uviews-groupby-city",
        path: "/api/analytics/uviews/groupby/city",
        method: "get",
        handler: routes::uviews::by_city,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "uviews-new-returning",
        path: "/api/analytics/uviews/new-returning",
        method: "get",
        handler: routes::uviews::new_returning,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "clicks-total",
        path: "/api/analytics/clicks/total",
        method: "get",
        handler: routes::clicks::total,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "clicks-daily",
        path: "/api/analytics/clicks/daily",
        method: "get",
        handler: routes::clicks::daily,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "clicks-groupby-target",
        path: "/api/analytics/clicks/groupby/target",
        method: "get",
        handler: routes::clicks::by_target,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "purchases-total",
        path: "/api/analytics/purchases/total",
        method: "get",
        handler: routes::purchases::total,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "purchases-daily",
        path: "/api/analytics/purchases/daily",
        method: "get",
        handler: routes::purchases::daily,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "purchases-groupby-device",
        path: "/api/analytics/purchases/groupby/device",
        method: "get",
        handler: routes::purchases::by_device,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "purchases-groupby-browser",
        path: "/api/analytics/purchases/groupby/browser",
        method: "get",
        handler: routes::purchases::by_browser,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "purchases-groupby-product",
        path: "/api/analytics/purchases/groupby/product",
        method: "get",
        handler: routes::purchases::by_product,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "purchases-groupby-brand",
        path: "/api/analytics/purchases/groupby/brand",
        method: "get",
        handler: routes::purchases::by_brand,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "purchases-groupby-category",
        path: "/api/analytics/purchases/groupby/category",
        method: "get",
        handler: routes::purchases::by_category,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "purchases-groupby-city",
        path: "/api/analytics/purchases/groupby/city",
        method: "get",
        handler: routes::purchases::by_city,
        supports_bulk: true,
    },
    EndpointEntry {
        key: "realtime-visitors",
        path: "/api/analytics/realtime/visitors",
        method: "get",
        handler: routes::realtime::visitors,
        supports_bulk: false,
    },
    EndpointEntry {
        key: "realtime-visitors-last-3-hours",
        path: "/api/analytics/realtime/visitors/last-3-hours",
        method: "get",
        handler: routes::realtime::timeline,
        supports_bulk: false,
    },
    EndpointEntry {
        key: "realtime-visitors-by-country",
        path: "/api/analytics/realtime/visitors/groupby/country",
        method: "get",
        handler: routes::realtime::by_country,
        supports_bulk: false,
    },
    EndpointEntry {
        key: "realtime-visitors-by-page",
        path: "/api/analytics/realtime/visitors/groupby/page",
        method: "get",
        handler: routes::realtime::by_page,
        supports_bulk: false,
    },
    EndpointEntry {
        key: "realtime-visitors-by-browser",
        path: "/api/analytics/realtime/visitors/groupby/browser",
        method: "get",
        handler: routes::realtime::by_browser,
        supports_bulk: false,
    },
    EndpointEntry {
        key: "realtime-visitors-by-device",
        path: "/api/analytics/realtime/visitors/groupby/device",
        method: "get",
        handler: routes::realtime::by_device,
        supports_bulk: false,
    },
];

/// Resolve a bulk item's endpoint key against the bulk-eligible subset.
pub fn bulk_endpoint(key: &str) -> Option<&'static EndpointEntry> {
    ENDPOINTS
        .iter()
        .find(|entry| entry.supports_bulk && entry.key == key)
}
