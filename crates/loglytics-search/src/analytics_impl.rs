use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;

use loglytics_core::analytics::{
    AnalyticsBackend, ClickTotals, DailyCount, DailyRevenue, GroupRow, NewReturning,
    PurchaseTotals, RealtimeVisitors, RevenueGroupRow, UniqueViewTotals, ViewTotals,
    VisitorGroupRow, VisitorPoint,
};
use loglytics_core::period::TimeWindow;
use loglytics_core::segment::{Segment, SegmentPage, SegmentPreview};

use crate::error::SearchError;
use crate::queries::segments::PREVIEW_HAS_MORE_THRESHOLD;
use crate::{cursor, mapping, queries, OpenSearchBackend, SearchClient};

#[async_trait]
impl<C: SearchClient> AnalyticsBackend for OpenSearchBackend<C> {
    async fn total_views(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<ViewTotals> {
        let body = queries::views::total_body(window);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::views::decode_totals(&resp))
    }

    async fn daily_views(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<DailyCount>> {
        let body = queries::views::daily_body(window);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::views::decode_daily(&resp))
    }

    async fn views_by_group(
        &self,
        client_id: i64,
        window: &TimeWindow,
        field: &str,
    ) -> anyhow::Result<Vec<GroupRow>> {
        let body = queries::views::group_body(window, field);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::views::decode_groups(&resp))
    }

    async fn total_clicks(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<ClickTotals> {
        let body = queries::clicks::total_body(window);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::clicks::decode_totals(&resp))
    }

    async fn daily_clicks(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<DailyCount>> {
        let body = queries::clicks::daily_body(window);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::clicks::decode_daily(&resp))
    }

    async fn clicks_by_target(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<GroupRow>> {
        let body = queries::clicks::by_target_body(window);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::clicks::decode_by_target(&resp))
    }

    async fn total_purchases(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<PurchaseTotals> {
        let body = queries::purchases::total_body(window);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::purchases::decode_totals(&resp))
    }

    async fn daily_purchases(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<DailyRevenue>> {
        let body = queries::purchases::daily_body(window);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::purchases::decode_daily(&resp))
    }

    async fn purchases_by_group(
        &self,
        client_id: i64,
        window: &TimeWindow,
        field: &str,
    ) -> anyhow::Result<Vec<RevenueGroupRow>> {
        let body = queries::purchases::group_body(window, field);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::purchases::decode_groups(&resp))
    }

    async fn total_unique_views(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<UniqueViewTotals> {
        let body = queries::uviews::total_body(window);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::uviews::decode_totals(&resp))
    }

    async fn daily_unique_views(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<Vec<DailyCount>> {
        let body = queries::uviews::daily_body(window);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::uviews::decode_daily(&resp))
    }

    async fn unique_views_by_group(
        &self,
        client_id: i64,
        window: &TimeWindow,
        field: &str,
    ) -> anyhow::Result<Vec<GroupRow>> {
        let body = queries::uviews::group_body(window, field);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::uviews::decode_groups(&resp))
    }

    async fn new_vs_returning(
        &self,
        client_id: i64,
        window: &TimeWindow,
    ) -> anyhow::Result<NewReturning> {
        let body = queries::uviews::new_returning_body(window);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::uviews::decode_new_returning(&resp))
    }

    async fn realtime_visitors(&self, client_id: i64) -> anyhow::Result<RealtimeVisitors> {
        let body = queries::realtime::visitors_body();
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::realtime::decode_visitors(&resp))
    }

    async fn realtime_visitor_timeline(
        &self,
        client_id: i64,
    ) -> anyhow::Result<Vec<VisitorPoint>> {
        let body = queries::realtime::timeline_body();
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::realtime::decode_timeline(&resp))
    }

    async fn realtime_visitors_by_group(
        &self,
        client_id: i64,
        field: &str,
    ) -> anyhow::Result<Vec<VisitorGroupRow>> {
        let body = queries::realtime::group_body(field);
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await?;
        Ok(queries::realtime::decode_groups(&resp))
    }

    async fn preview_segment(
        &self,
        client_id: i64,
        instance_id: Option<i64>,
        query: &Value,
    ) -> anyhow::Result<SegmentPreview> {
        let scoped = queries::segments::with_instance_filter(query, instance_id);
        let body = queries::segments::preview_body(&scoped);
        let started = Instant::now();
        let resp = self
            .client()
            .search(&mapping::index_alias(client_id), &body)
            .await
            .map_err(|e| SearchError::PreviewFailed(e.to_string()))?;
        let estimated_count = queries::segments::decode_preview_count(&resp);
        Ok(SegmentPreview {
            estimated_count,
            execution_time: started.elapsed().as_millis() as u64,
            has_more: estimated_count > PREVIEW_HAS_MORE_THRESHOLD,
        })
    }

    async fn segment_results(
        &self,
        segment: &Segment,
        size: usize,
        after: Option<&str>,
    ) -> anyhow::Result<SegmentPage> {
        let scoped = queries::segments::with_instance_filter(&segment.query, segment.instance_id);
        let after_key = after.map(cursor::decode_after_key).transpose()?;
        let body = queries::segments::results_body(&scoped, size, after_key.as_ref());
        let resp = self
            .client()
            .search(&mapping::index_alias(segment.client_id), &body)
            .await?;
        Ok(queries::segments::decode_results(segment.id, size, &resp)?)
    }

    async fn field_mapping(&self, client_id: i64) -> anyhow::Result<Value> {
        let alias = mapping::index_alias(client_id);
        let alias_response = self.client().get_alias(&alias).await?;
        let write_index = queries::segments::resolve_write_index(&alias, &alias_response)?;
        let mapping_response = self.client().get_mapping(&write_index).await?;
        queries::segments::extract_properties(&write_index, &mapping_response)
            .ok_or_else(|| SearchError::MappingNotFound(alias).into())
    }
}
