//! View counts: totals with previous-period comparison, daily trend and
//! dimension breakdowns.

use serde_json::{json, Value};

use loglytics_core::analytics::{DailyCount, GroupRow, ViewTotals};
use loglytics_core::period::TimeWindow;

use crate::{aggs, decode};

const EVENT: &str = "view";

/// One round trip for both periods: the base filter spans
/// `[prev_from, to]` and two filter aggregations re-apply the precise
/// sub-ranges.
pub fn total_body(window: &TimeWindow) -> Value {
    let prev = window.previous();
    let count = json!({ "total_views": { "value_count": { "field": "date" } } });
    json!({
        "query": aggs::base_query(EVENT, Some((&prev.iso_from(), &window.iso_to()))),
        "size": 0,
        "aggs": {
            "current_views": aggs::range_slice(&window.iso_from(), &window.iso_to(), count.clone()),
            "previous_views": aggs::range_slice(&prev.iso_from(), &prev.iso_to(), count),
        }
    })
}

pub fn decode_totals(resp: &Value) -> ViewTotals {
    ViewTotals {
        current_views: decode::agg_u64(resp, &["current_views", "total_views"]),
        previous_views: decode::agg_u64(resp, &["previous_views", "total_views"]),
    }
}

pub fn daily_body(window: &TimeWindow) -> Value {
    json!({
        "query": aggs::base_query(EVENT, Some((&window.iso_from(), &window.iso_to()))),
        "size": 0,
        "aggs": { "daily": aggs::daily_histogram() }
    })
}

/// Buckets come back in the engine's ascending key order; no re-sort.
pub fn decode_daily(resp: &Value) -> Vec<DailyCount> {
    decode::buckets(resp, &["daily"])
        .iter()
        .map(|bucket| DailyCount {
            date: decode::bucket_key_string(bucket),
            count: decode::doc_count(bucket),
        })
        .collect()
}

pub fn group_body(window: &TimeWindow, field: &str) -> Value {
    json!({
        "query": aggs::base_query(EVENT, Some((&window.iso_from(), &window.iso_to()))),
        "size": 0,
        "aggs": { "group_by": aggs::group_by(field, None) }
    })
}

pub fn decode_groups(resp: &Value) -> Vec<GroupRow> {
    decode::group_buckets(resp)
        .iter()
        .map(|bucket| GroupRow {
            key: decode::bucket_key(bucket),
            count: decode::doc_count(bucket),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use loglytics_core::period::TimeWindow;

    use super::*;

    fn window() -> TimeWindow {
        TimeWindow::parse("2024-03-01", "2024-03-07").unwrap()
    }

    #[test]
    fn total_base_filter_spans_previous_and_current() {
        let body = total_body(&window());
        let range = &body["query"]["bool"]["filter"][1]["range"]["date"];
        assert_eq!(range["gte"], "2024-02-24T00:00:00.000Z");
        assert_eq!(range["lte"], "2024-03-07T00:00:00.000Z");
        assert_eq!(body["size"], 0);

        let current = &body["aggs"]["current_views"]["filter"]["range"]["date"];
        assert_eq!(current["gte"], "2024-03-01T00:00:00.000Z");
        let previous = &body["aggs"]["previous_views"]["filter"]["range"]["date"];
        assert_eq!(previous["lte"], "2024-03-01T00:00:00.000Z");
    }

    #[test]
    fn totals_decode_with_missing_previous() {
        let resp = json!({
            "aggregations": {
                "current_views": { "total_views": { "value": 1000 } }
            }
        });
        let totals = decode_totals(&resp);
        assert_eq!(totals.current_views, 1000);
        assert_eq!(totals.previous_views, 0);
    }

    #[test]
    fn daily_decodes_histogram_buckets() {
        let resp = json!({
            "aggregations": {
                "daily": {
                    "buckets": [
                        { "key_as_string": "2024-03-01", "doc_count": 12 },
                        { "key_as_string": "2024-03-02", "doc_count": 7 },
                    ]
                }
            }
        });
        let days = decode_daily(&resp);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-03-01");
        assert_eq!(days[1].count, 7);
    }

    #[test]
    fn group_body_uses_shared_builder() {
        let body = group_body(&window(), "device.type");
        assert_eq!(body["aggs"]["group_by"]["nested"]["path"], "device");
        let flat = group_body(&window(), "referrer");
        assert_eq!(flat["aggs"]["group_by"]["terms"]["field"], "referrer");
    }
}
