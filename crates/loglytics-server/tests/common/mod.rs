//! Shared test harness: a canned [`AnalyticsBackend`] stub standing in for
//! the search engine, plus request helpers.

use std::sync::Arc;

use anyhow::anyhow;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use loglytics_core::analytics::{
    AnalyticsBackend, ClickTotals, DailyCount, DailyRevenue, GroupRow, NewReturning,
    PurchaseTotals, RealtimeVisitors, RevenueGroupRow, UniqueViewTotals, ViewTotals,
    VisitorGroupRow, VisitorPoint,
};
use loglytics_core::config::Config;
use loglytics_core::period::TimeWindow;
use loglytics_core::segment::{Segment, SegmentPage, SegmentPreview, SegmentStatus};
use loglytics_search::SearchError;
use loglytics_server::app::build_app;
use loglytics_server::state::{AppState, InMemorySegmentStore};

pub const NEXT_CURSOR: &str = "eyJkZXZpY2VfaWQiOiJiIn0=";
pub const BAD_CURSOR: &str = "@@not-a-cursor@@";

/// Backend returning fixed fixtures; `fail = true` makes every call error
/// like an unreachable engine.
pub struct StubBackend {
    pub fail: bool,
}

impl StubBackend {
    fn check(&self) -> anyhow::Result<()> {
        if self.fail {
            Err(anyhow!("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl AnalyticsBackend for StubBackend {
    async fn total_views(&self, _: i64, _: &TimeWindow) -> anyhow::Result<ViewTotals> {
        self.check()?;
        Ok(ViewTotals {
            current_views: 1000,
            previous_views: 800,
        })
    }

    async fn daily_views(&self, _: i64, _: &TimeWindow) -> anyhow::Result<Vec<DailyCount>> {
        self.check()?;
        Ok(vec![
            DailyCount {
                date: "2024-03-01".to_string(),
                count: 500,
            },
            DailyCount {
                date: "2024-03-02".to_string(),
                count: 500,
            },
        ])
    }

    async fn views_by_group(
        &self,
        _: i64,
        _: &TimeWindow,
        _: &str,
    ) -> anyhow::Result<Vec<GroupRow>> {
        self.check()?;
        Ok(vec![
            GroupRow {
                key: "desktop".to_string(),
                count: 600,
            },
            GroupRow {
                key: "mobile".to_string(),
                count: 400,
            },
        ])
    }

    async fn total_clicks(&self, _: i64, _: &TimeWindow) -> anyhow::Result<ClickTotals> {
        self.check()?;
        Ok(ClickTotals {
            current_clicks: 150,
            previous_clicks: 120,
        })
    }

    async fn daily_clicks(&self, _: i64, _: &TimeWindow) -> anyhow::Result<Vec<DailyCount>> {
        self.check()?;
        Ok(vec![DailyCount {
            date: "2024-03-01".to_string(),
            count: 150,
        }])
    }

    async fn clicks_by_target(&self, _: i64, _: &TimeWindow) -> anyhow::Result<Vec<GroupRow>> {
        self.check()?;
        Ok(vec![GroupRow {
            key: "cta-banner".to_string(),
            count: 90,
        }])
    }

    async fn total_purchases(&self, _: i64, _: &TimeWindow) -> anyhow::Result<PurchaseTotals> {
        self.check()?;
        Ok(PurchaseTotals {
            current_purchases: 42,
            previous_purchases: 40,
            current_revenue: 1234.5,
            previous_revenue: 999.0,
        })
    }

    async fn daily_purchases(&self, _: i64, _: &TimeWindow) -> anyhow::Result<Vec<DailyRevenue>> {
        self.check()?;
        Ok(vec![DailyRevenue {
            date: "2024-03-01".to_string(),
            count: 42,
            revenue: 1234.5,
        }])
    }

    async fn purchases_by_group(
        &self,
        _: i64,
        _: &TimeWindow,
        _: &str,
    ) -> anyhow::Result<Vec<RevenueGroupRow>> {
        self.check()?;
        Ok(vec![RevenueGroupRow {
            key: "acme".to_string(),
            count: 30,
            revenue: 900.0,
        }])
    }

    async fn total_unique_views(
        &self,
        _: i64,
        _: &TimeWindow,
    ) -> anyhow::Result<UniqueViewTotals> {
        self.check()?;
        Ok(UniqueViewTotals {
            current_unique_views: 321,
            previous_unique_views: 280,
        })
    }

    async fn daily_unique_views(&self, _: i64, _: &TimeWindow) -> anyhow::Result<Vec<DailyCount>> {
        self.check()?;
        Ok(vec![DailyCount {
            date: "2024-03-01".to_string(),
            count: 321,
        }])
    }

    async fn unique_views_by_group(
        &self,
        _: i64,
        _: &TimeWindow,
        _: &str,
    ) -> anyhow::Result<Vec<GroupRow>> {
        self.check()?;
        Ok(vec![GroupRow {
            key: "Firefox".to_string(),
            count: 111,
        }])
    }

    async fn new_vs_returning(&self, _: i64, _: &TimeWindow) -> anyhow::Result<NewReturning> {
        self.check()?;
        Ok(NewReturning {
            new_users: 10,
            returning_users: 20,
            prev_new_users: 5,
            prev_returning_users: 15,
        })
    }

    async fn realtime_visitors(&self, _: i64) -> anyhow::Result<RealtimeVisitors> {
        self.check()?;
        Ok(RealtimeVisitors { visitors: 12 })
    }

    async fn realtime_visitor_timeline(&self, _: i64) -> anyhow::Result<Vec<VisitorPoint>> {
        self.check()?;
        Ok(vec![VisitorPoint {
            date: "2024-03-01 10:00".to_string(),
            visitors: 4,
        }])
    }

    async fn realtime_visitors_by_group(
        &self,
        _: i64,
        _: &str,
    ) -> anyhow::Result<Vec<VisitorGroupRow>> {
        self.check()?;
        Ok(vec![VisitorGroupRow {
            key: "IT".to_string(),
            visitors: 7,
        }])
    }

    async fn preview_segment(
        &self,
        _: i64,
        _: Option<i64>,
        _: &Value,
    ) -> anyhow::Result<SegmentPreview> {
        self.check().map_err(|e| SearchError::PreviewFailed(e.to_string()))?;
        Ok(SegmentPreview {
            estimated_count: 1500,
            execution_time: 5,
            has_more: false,
        })
    }

    async fn segment_results(
        &self,
        segment: &Segment,
        _size: usize,
        after: Option<&str>,
    ) -> anyhow::Result<SegmentPage> {
        self.check()?;
        match after {
            None => Ok(SegmentPage {
                segment_id: segment.id,
                total: 2,
                ids: vec!["a".to_string(), "b".to_string()],
                after_key: Some(NEXT_CURSOR.to_string()),
            }),
            Some(BAD_CURSOR) => Err(SearchError::InvalidCursor.into()),
            Some(_) => Ok(SegmentPage {
                segment_id: segment.id,
                total: 1,
                ids: vec!["c".to_string()],
                after_key: None,
            }),
        }
    }

    async fn field_mapping(&self, _: i64) -> anyhow::Result<Value> {
        self.check()?;
        Ok(json!({ "device": { "type": "nested" }, "date": { "type": "date" } }))
    }
}

fn config() -> Config {
    Config {
        port: 0,
        search_url: "http://localhost:9200".to_string(),
        search_username: String::new(),
        search_password: String::new(),
        search_allow_unsecure: false,
        cors_origins: vec![],
    }
}

pub async fn setup(fail: bool) -> axum::Router {
    let segments = Arc::new(InMemorySegmentStore::default());
    segments
        .insert(Segment {
            id: 1,
            name: "Active premium users".to_string(),
            description: None,
            query: json!({ "bool": { "must": [{ "term": { "user.active": true } }] } }),
            client_id: 1,
            instance_id: None,
            status: SegmentStatus::Active,
        })
        .await;

    let state = Arc::new(AppState::new(
        Arc::new(StubBackend { fail }),
        segments,
        config(),
    ));
    build_app(state)
}

pub async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse JSON")
}

/// GET with the tenant headers the upstream gate would install.
pub async fn get_as_tenant(app: &axum::Router, uri: &str) -> axum::http::Response<Body> {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-client-id", "1")
        .body(Body::empty())
        .expect("request");
    app.clone().oneshot(req).await.expect("response")
}

pub async fn post_as_tenant(
    app: &axum::Router,
    uri: &str,
    body: Value,
) -> axum::http::Response<Body> {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-client-id", "1")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    app.clone().oneshot(req).await.expect("response")
}
