//! Realtime visitor counts over relative windows.
//!
//! No previous-period comparison applies here; windows are relative
//! expressions resolved by the engine at query time. Grouped variants use
//! the fixed live lookback regardless of caller input — "now" semantics.

use serde_json::{json, Value};

use loglytics_core::analytics::{RealtimeVisitors, VisitorGroupRow, VisitorPoint};

use crate::{aggs, decode};

const EVENT: &str = "view";
const LIVE_LOOKBACK: &str = "now-15m";
const TIMELINE_LOOKBACK: &str = "now-3h";

pub fn visitors_body() -> Value {
    json!({
        "query": aggs::base_query(EVENT, Some((LIVE_LOOKBACK, "now"))),
        "size": 0,
        "aggs": { "nested_device": aggs::unique_devices() }
    })
}

pub fn decode_visitors(resp: &Value) -> RealtimeVisitors {
    RealtimeVisitors {
        visitors: decode::agg_u64(resp, &["nested_device", "unique_devices"]),
    }
}

/// Ten-minute resolution over the last three hours.
pub fn timeline_body() -> Value {
    json!({
        "query": aggs::base_query(EVENT, Some((TIMELINE_LOOKBACK, "now"))),
        "size": 0,
        "aggs": {
            "timeline": {
                "date_histogram": {
                    "field": "date",
                    "fixed_interval": "10m",
                    "format": "yyyy-MM-dd HH:mm",
                },
                "aggs": { "nested_device": aggs::unique_devices() }
            }
        }
    })
}

pub fn decode_timeline(resp: &Value) -> Vec<VisitorPoint> {
    decode::buckets(resp, &["timeline"])
        .iter()
        .map(|bucket| VisitorPoint {
            date: decode::bucket_key_string(bucket),
            visitors: decode::bucket_u64(bucket, &["nested_device", "unique_devices"]),
        })
        .collect()
}

pub fn group_body(field: &str) -> Value {
    let metric = aggs::unique_devices();
    json!({
        "query": {
            "bool": {
                "must": [
                    { "term": { "event": EVENT } },
                    { "range": { "date": { "gte": LIVE_LOOKBACK } } },
                ]
            }
        },
        "size": 0,
        "aggs": { "group_by": aggs::group_by(field, Some(("nested_device", &metric))) }
    })
}

pub fn decode_groups(resp: &Value) -> Vec<VisitorGroupRow> {
    decode::group_buckets(resp)
        .iter()
        .map(|bucket| VisitorGroupRow {
            key: decode::bucket_key(bucket),
            visitors: decode::bucket_u64(bucket, &["nested_device", "unique_devices"]),
        })
        .collect()
}
