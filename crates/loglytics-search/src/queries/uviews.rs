//! Unique views: distinct-device counts with comparison, daily trend,
//! dimension breakdowns and the new-vs-returning cohort split.

use serde_json::{json, Value};

use loglytics_core::analytics::{DailyCount, GroupRow, NewReturning, UniqueViewTotals};
use loglytics_core::period::TimeWindow;

use crate::{aggs, decode};

const EVENT: &str = "view";

/// Decode path of the per-slice metric: nested wrapper, then cardinality.
const METRIC: [&str; 2] = ["nested_device", "unique_devices"];

fn metric_agg() -> Value {
    json!({ "nested_device": aggs::unique_devices() })
}

pub fn total_body(window: &TimeWindow) -> Value {
    let prev = window.previous();
    json!({
        "query": aggs::base_query(EVENT, Some((&prev.iso_from(), &window.iso_to()))),
        "size": 0,
        "aggs": {
            "current_unique_views":
                aggs::range_slice(&window.iso_from(), &window.iso_to(), metric_agg()),
            "previous_unique_views":
                aggs::range_slice(&prev.iso_from(), &prev.iso_to(), metric_agg()),
        }
    })
}

pub fn decode_totals(resp: &Value) -> UniqueViewTotals {
    UniqueViewTotals {
        current_unique_views: decode::agg_u64(
            resp,
            &["current_unique_views", METRIC[0], METRIC[1]],
        ),
        previous_unique_views: decode::agg_u64(
            resp,
            &["previous_unique_views", METRIC[0], METRIC[1]],
        ),
    }
}

pub fn daily_body(window: &TimeWindow) -> Value {
    let mut daily = aggs::daily_histogram();
    daily["aggs"] = metric_agg();
    json!({
        "query": aggs::base_query(EVENT, Some((&window.iso_from(), &window.iso_to()))),
        "size": 0,
        "aggs": { "daily": daily }
    })
}

pub fn decode_daily(resp: &Value) -> Vec<DailyCount> {
    decode::buckets(resp, &["daily"])
        .iter()
        .map(|bucket| DailyCount {
            date: decode::bucket_key_string(bucket),
            count: decode::bucket_u64(bucket, &METRIC),
        })
        .collect()
}

/// Grouped uniques go through the shared tree builder; grouping by a
/// `device.*` dimension triggers its same-boundary rescope so the
/// cardinality is evaluated once per bucket.
pub fn group_body(window: &TimeWindow, field: &str) -> Value {
    let metric = aggs::unique_devices();
    json!({
        "query": aggs::base_query(EVENT, Some((&window.iso_from(), &window.iso_to()))),
        "size": 0,
        "aggs": { "group_by": aggs::group_by(field, Some(("nested_device", &metric))) }
    })
}

pub fn decode_groups(resp: &Value) -> Vec<GroupRow> {
    decode::group_buckets(resp)
        .iter()
        .map(|bucket| GroupRow {
            key: decode::bucket_key(bucket),
            count: decode::bucket_u64(bucket, &METRIC),
        })
        .collect()
}

/// Four cohort slices out of one `[prev_from, to]` base filter. "New" means
/// no activity before the window start; "returning" means activity both
/// before and inside the window.
pub fn new_returning_body(window: &TimeWindow) -> Value {
    let prev = window.previous();
    let (from, to) = (window.iso_from(), window.iso_to());
    let (prev_from, prev_to) = (prev.iso_from(), prev.iso_to());

    let slice = |filter: Value| json!({ "filter": filter, "aggs": metric_agg() });

    json!({
        "query": aggs::base_query(EVENT, Some((&prev_from, &to))),
        "size": 0,
        "aggs": {
            "new_users": slice(aggs::cohort_filter(&from, &to, false)),
            "returning_users": slice(aggs::cohort_filter(&from, &to, true)),
            "prev_new_users": slice(aggs::cohort_filter(&prev_from, &prev_to, false)),
            "prev_returning_users": slice(aggs::cohort_filter(&prev_from, &prev_to, true)),
        }
    })
}

pub fn decode_new_returning(resp: &Value) -> NewReturning {
    let read = |slice: &str| decode::agg_u64(resp, &[slice, METRIC[0], METRIC[1]]);
    NewReturning {
        new_users: read("new_users"),
        returning_users: read("returning_users"),
        prev_new_users: read("prev_new_users"),
        prev_returning_users: read("prev_returning_users"),
    }
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
    fn totals_read_through_nested_metric() {
        let resp = json!({
            "aggregations": {
                "current_unique_views": {
                    "nested_device": { "unique_devices": { "value": 321 } }
                },
                "previous_unique_views": {
                    "nested_device": { "unique_devices": { "value": 280 } }
                }
            }
        });
        let totals = decode_totals(&resp);
        assert_eq!(totals.current_unique_views, 321);
        assert_eq!(totals.previous_unique_views, 280);
    }

    #[test]
    fn device_grouping_rescopes_the_metric() {
        let body = group_body(&window(), "device.browser");
        let metric = &body["aggs"]["group_by"]["aggs"]["inner_group_by"]["aggs"]["nested_device"];
        assert_eq!(metric["filter"]["exists"]["field"], "device.browser");
    }

    #[test]
    fn geo_grouping_keeps_the_nested_metric() {
        let body = group_body(&window(), "geo.country");
        let metric = &body["aggs"]["group_by"]["aggs"]["inner_group_by"]["aggs"]["nested_device"];
        assert_eq!(metric["nested"]["path"], "device");
    }

    #[test]
    fn cohort_slices_pair_must_and_must_not() {
        let body = new_returning_body(&window());
        let new_users = &body["aggs"]["new_users"]["filter"]["bool"];
        assert!(new_users["must_not"].is_array());
        let returning = &body["aggs"]["returning_users"]["filter"]["bool"];
        assert_eq!(returning["must"].as_array().map(Vec::len), Some(2));
        for slice in ["new_users", "returning_users", "prev_new_users", "prev_returning_users"] {
            assert!(body["aggs"][slice]["aggs"]["nested_device"].is_object());
        }
    }

    #[test]
    fn cohort_decodes_all_four_slices() {
        let leaf = |value: u64| json!({ "nested_device": { "unique_devices": { "value": value } } });
        let resp = json!({
            "aggregations": {
                "new_users": leaf(10),
                "returning_users": leaf(20),
                "prev_new_users": leaf(5),
                "prev_returning_users": leaf(15),
            }
        });
        let cohort = decode_new_returning(&resp);
        assert_eq!(cohort.new_users, 10);
        assert_eq!(cohort.returning_users, 20);
        assert_eq!(cohort.prev_new_users, 5);
        assert_eq!(cohort.prev_returning_users, 15);
    }
}
