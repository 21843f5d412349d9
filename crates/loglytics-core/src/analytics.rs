//! Analytics backend abstraction.
//!
//! Result shapes are deliberately flat: every decoder produces `0` or an
//! empty list for missing aggregation values, never a null.

use serde::Serialize;
use serde_json::Value;

use crate::period::TimeWindow;
use crate::segment::{Segment, SegmentPage, SegmentPreview};

/// Current-vs-previous view counts.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ViewTotals {
    pub current_views: u64,
    pub previous_views: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ClickTotals {
    pub current_clicks: u64,
    pub previous_clicks: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PurchaseTotals {
    pub current_purchases: u64,
    pub previous_purchases: u64,
    pub current_revenue: f64,
    pub previous_revenue: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct UniqueViewTotals {
    pub current_unique_views: u64,
    pub previous_unique_views: u64,
}

/// New-vs-returning cohort counts for the current and previous period.
///
/// "New" = first activity inside the window; "returning" = activity both
/// before the window start and inside the window.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReturning {
    pub new_users: u64,
    pub returning_users: u64,
    pub prev_new_users: u64,
    pub prev_returning_users: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupRow {
    pub key: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueGroupRow {
    pub key: String,
    pub count: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyCount {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyRevenue {
    pub date: String,
    pub count: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RealtimeVisitors {
    pub visitors: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisitorPoint {
    pub date: String,
    pub visitors: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisitorGroupRow {
    pub key: String,
    pub visitors: u64,
}

/// One method per exposed analytics operation. The search implementation
/// lives in `loglytics-search`; server tests substitute a stub.
#[async_trait::async_trait]
pub trait AnalyticsBackend: Send + Sync + 'static {
    async fn total_views(&self, client_id: i64, window: &TimeWindow)
        -> anyhow::Result<ViewTotals>;

    async fn daily_views(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<DailyCount>>;

    async fn views_by_group(
        &self,
        client_id: i64,
        window: &TimeWindow,
        field: &str,
    ) -> anyhow::Result<Vec<GroupRow>>;

    async fn total_clicks(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<ClickTotals>;

    async fn daily_clicks(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<DailyCount>>;

    async fn clicks_by_target(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<GroupRow>>;

    async fn total_purchases(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<PurchaseTotals>;

    async fn daily_purchases(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<DailyRevenue>>;

    async fn purchases_by_group(
        &self,
        client_id: i64,
        window: &TimeWindow,
        field: &str,
    ) -> anyhow::Result<Vec<RevenueGroupRow>>;

    async fn total_unique_views(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<UniqueViewTotals>;

    async fn daily_unique_views(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<DailyCount>>;

    async fn unique_views_by_group(
        &self,
        client_id: i64,
        window: &TimeWindow,
        field: &str,
    ) -> anyhow::Result<Vec<GroupRow>>;

    async fn new_vs_returning(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<NewReturning>;

    async fn realtime_visitors(&self, client_id: i64) -> anyhow::Result<RealtimeVisitors>;

    async fn realtime_visitor_timeline(
        &self,
        client_id: i64,
    ) -> anyhow::Result<Vec<VisitorPoint>>;

    async fn realtime_visitors_by_group(
        &self,
        client_id: i64,
        field: &str,
    ) -> anyhow::Result<Vec<VisitorGroupRow>>;

    async fn preview_segment(
        &self,
        client_id: i64,
        instance_id: Option<i64>,
        query: &Value,
    ) -> anyhow::Result<SegmentPreview>;

    async fn segment_results(
        &self,
        segment: &Segment,
        size: usize,
        after: Option<&str>,
    ) -> anyhow::Result<SegmentPage>;

    async fn field_mapping(&self, client_id: i64) -> anyhow::Result<Value>;
}
