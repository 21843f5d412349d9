//! Click counts: totals with comparison, daily trend and the target
//! breakdown.

use serde_json::{json, Value};

use loglytics_core::analytics::{ClickTotals, DailyCount, GroupRow};
use loglytics_core::period::TimeWindow;

use crate::{aggs, decode, mapping};

const EVENT: &str = "click";

pub fn total_body(window: &TimeWindow) -> Value {
    let prev = window.previous();
    let count = json!({ "total_clicks": { "value_count": { "field": "date" } } });
    json!({
        "query": aggs::base_query(EVENT, Some((&prev.iso_from(), &window.iso_to()))),
        "size": 0,
        "aggs": {
            "current_clicks": aggs::range_slice(&window.iso_from(), &window.iso_to(), count.clone()),
            "previous_clicks": aggs::range_slice(&prev.iso_from(), &prev.iso_to(), count),
        }
    })
}

pub fn decode_totals(resp: &Value) -> ClickTotals {
    ClickTotals {
        current_clicks: decode::agg_u64(resp, &["current_clicks", "total_clicks"]),
        previous_clicks: decode::agg_u64(resp, &["previous_clicks", "total_clicks"]),
    }
}

pub fn daily_body(window: &TimeWindow) -> Value {
    json!({
        "query": aggs::base_query(EVENT, Some((&window.iso_from(), &window.iso_to()))),
        "size": 0,
        "aggs": { "daily": aggs::daily_histogram() }
    })
}

pub fn decode_daily(resp: &Value) -> Vec<DailyCount> {
    decode::buckets(resp, &["daily"])
        .iter()
        .map(|bucket| DailyCount {
            date: decode::bucket_key_string(bucket),
            count: decode::doc_count(bucket),
        })
        .collect()
}

/// Clicks are always broken down by their target element.
pub fn by_target_body(window: &TimeWindow) -> Value {
    json!({
        "query": aggs::base_query(EVENT, Some((&window.iso_from(), &window.iso_to()))),
        "size": 0,
        "aggs": { "group_by": aggs::group_by(mapping::TARGET, None) }
    })
}

pub fn decode_by_target(resp: &Value) -> Vec<GroupRow> {
    decode::group_buckets(resp)
        .iter()
        .map(|bucket| GroupRow {
            key: decode::bucket_key(bucket),
            count: decode::doc_count(bucket),
        })
        .collect()
}
