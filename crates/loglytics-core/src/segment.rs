//! Audience segments: persisted boolean queries evaluated on demand.
//!
//! Segment CRUD lives in an external relational store; the query engine only
//! ever reads `query`, `client_id` and `instance_id` from a loaded record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStatus {
    #[default]
    Active,
    Draft,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Arbitrary boolean query DSL, stored verbatim.
    pub query: Value,
    pub client_id: i64,
    pub instance_id: Option<i64>,
    pub status: SegmentStatus,
}

/// Read-only access to persisted segments.
#[async_trait::async_trait]
pub trait SegmentStore: Send + Sync + 'static {
    async fn get(&self, id: i64) -> anyhow::Result<Option<Segment>>;
}

/// Cheap size estimate for a segment query.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPreview {
    pub estimated_count: u64,
    /// Wall-clock milliseconds around the single search call.
    pub execution_time: u64,
    /// Set when the estimate exceeds the paging-practicality threshold;
    /// callers should treat the count as approximate.
    pub has_more: bool,
}

/// One page of segment member ids.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentPage {
    pub segment_id: i64,
    /// Bucket count of THIS page, not a grand total. Long-standing contract;
    /// callers depend on it.
    pub total: usize,
    pub ids: Vec<String>,
    /// Opaque cursor for the next page; absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_key: Option<String>,
}
