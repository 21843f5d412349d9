//! Aggregation tree builders.
//!
//! Every builder returns a fresh `serde_json::Value` tree; nothing here holds
//! or mutates shared templates.

use serde_json::{json, Value};

/// Bucket cap for every group-by breakdown. Grouped results are not
/// paginated; high-cardinality dimensions are truncated at this size.
pub const GROUP_SIZE: u32 = 100;

/// Base filter shared by every metric query: event kind plus an optional
/// date range. Realtime callers pass relative bounds (`now-15m`, `now`).
pub fn base_query(event: &str, range: Option<(&str, &str)>) -> Value {
    let mut filters = vec![json!({ "term": { "event": event } })];
    if let Some((gte, lte)) = range {
        filters.push(json!({ "range": { "date": { "gte": gte, "lte": lte } } }));
    }
    json!({ "bool": { "filter": filters } })
}

/// A `filter` aggregation re-applying a precise date sub-range, used to slice
/// current and previous periods out of one broader base filter.
pub fn range_slice(gte: &str, lte: &str, aggs: Value) -> Value {
    json!({
        "filter": { "range": { "date": { "gte": gte, "lte": lte } } },
        "aggs": aggs,
    })
}

/// Day-granularity histogram on the event date, formatted `yyyy-MM-dd`.
pub fn daily_histogram() -> Value {
    json!({
        "date_histogram": {
            "field": "date",
            "calendar_interval": "day",
            "format": "yyyy-MM-dd",
        }
    })
}

/// Distinct device count: cardinality of `device.id` under its nested
/// wrapper. The canonical unique-visitor metric.
pub fn unique_devices() -> Value {
    json!({
        "nested": { "path": "device" },
        "aggs": {
            "unique_devices": { "cardinality": { "field": "device.id" } }
        }
    })
}

/// Order revenue: unit price times quantity, summed per document.
pub fn revenue_sum() -> Value {
    json!({
        "sum": {
            "script": {
                "source": "doc['product.price'].value * doc['product.quantity'].value"
            }
        }
    })
}

/// Group-by aggregation over `field`, optionally carrying a named metric
/// sub-aggregation per bucket.
///
/// A dotted field addresses a nested object; the path segment before the
/// first dot is the nesting boundary and the terms aggregation is wrapped in
/// a `nested` aggregation over it. Consumers read
/// `group_by.inner_group_by.buckets` in that case and `group_by.buckets`
/// otherwise — see [`crate::decode::group_buckets`]; no caller branches on
/// field shape anywhere else.
pub fn group_by(field: &str, metric: Option<(&str, &Value)>) -> Value {
    match field.split_once('.') {
        Some((boundary, _)) => {
            let mut inner = json!({ "terms": { "field": field, "size": GROUP_SIZE } });
            if let Some((name, agg)) = metric {
                inner["aggs"] = json!({ name: rescope_metric(field, boundary, agg) });
            }
            json!({
                "nested": { "path": boundary },
                "aggs": { "inner_group_by": inner },
            })
        }
        None => {
            let mut root = json!({ "terms": { "field": field, "size": GROUP_SIZE } });
            if let Some((name, agg)) = metric {
                root["aggs"] = json!({ name: agg.clone() });
            }
            root
        }
    }
}

/// A metric that is itself nested over the group-by boundary would traverse
/// the nested array a second time and be evaluated once per array element
/// instead of once per bucket, undercounting. Inside the nested terms context
/// the wrapper is redundant: replace it with an `exists` filter scoped to the
/// grouped field and keep the metric's inner aggregations. Any other metric
/// passes through unchanged.
fn rescope_metric(field: &str, boundary: &str, metric: &Value) -> Value {
    let same_boundary = metric
        .get("nested")
        .and_then(|n| n.get("path"))
        .and_then(Value::as_str)
        .is_some_and(|path| path == boundary);
    if !same_boundary {
        return metric.clone();
    }
    let inner = metric.get("aggs").cloned().unwrap_or_else(|| json!({}));
    json!({
        "filter": { "exists": { "field": field } },
        "aggs": inner,
    })
}

/// Clause pair shared by the cohort aggregations: activity inside
/// `[gte, lte]`, with `seen_before` toggling the "any activity before the
/// window start" condition between `must` and `must_not`.
pub fn cohort_filter(gte: &str, lte: &str, seen_before: bool) -> Value {
    let in_window = json!({ "range": { "date": { "gte": gte, "lte": lte } } });
    let before_window = json!({ "range": { "date": { "lt": gte } } });
    if seen_before {
        json!({ "bool": { "must": [in_window, before_window] } })
    } else {
        json!({ "bool": { "must": [in_window], "must_not": [before_window] } })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::mapping;

    use super::*;

    #[test]
    fn flat_field_builds_plain_terms() {
        let tree = group_by(mapping::REFERRER, None);
        assert_eq!(
            tree,
            json!({ "terms": { "field": "referrer", "size": 100 } })
        );
    }

    #[test]
    fn flat_field_attaches_metric_as_child() {
        let metric = revenue_sum();
        let tree = group_by(mapping::TARGET, Some(("total_revenue", &metric)));
        assert_eq!(tree["terms"]["field"], "target");
        assert_eq!(tree["aggs"]["total_revenue"], metric);
    }

    #[test]
    fn dotted_field_wraps_in_nested() {
        let tree = group_by(mapping::GEO_COUNTRY, None);
        assert_eq!(tree["nested"]["path"], "geo");
        assert_eq!(
            tree["aggs"]["inner_group_by"]["terms"]["field"],
            "geo.country"
        );
        assert_eq!(tree["aggs"]["inner_group_by"]["terms"]["size"], 100);
    }

    #[test]
    fn builder_is_pure() {
        let a = group_by(mapping::DEVICE_TYPE, None);
        let b = group_by(mapping::DEVICE_TYPE, None);
        assert_eq!(a, b);
    }

    #[test]
    fn metric_nested_over_other_path_passes_through() {
        let metric = unique_devices();
        let tree = group_by(mapping::GEO_CITY, Some(("nested_device", &metric)));
        // Boundary `geo` differs from the metric's `device` path: no rewrite.
        assert_eq!(
            tree["aggs"]["inner_group_by"]["aggs"]["nested_device"],
            metric
        );
    }

    #[test]
    fn metric_over_same_boundary_is_rescoped() {
        let metric = unique_devices();
        let tree = group_by(mapping::DEVICE_TYPE, Some(("nested_device", &metric)));
        let rescoped = &tree["aggs"]["inner_group_by"]["aggs"]["nested_device"];
        // The second nested wrapper is gone, replaced by an exists filter on
        // the grouped field; the cardinality metric survives underneath.
        assert!(rescoped.get("nested").is_none());
        assert_eq!(rescoped["filter"]["exists"]["field"], "device.type");
        assert_eq!(
            rescoped["aggs"]["unique_devices"]["cardinality"]["field"],
            "device.id"
        );
    }

    #[test]
    fn base_query_without_range_has_single_term() {
        let query = base_query("view", None);
        assert_eq!(query["bool"]["filter"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn cohort_filter_toggles_must_not() {
        let new_users = cohort_filter("2024-03-01", "2024-03-07", false);
        assert!(new_users["bool"]["must_not"].is_array());
        let returning = cohort_filter("2024-03-01", "2024-03-07", true);
        assert!(returning["bool"].get("must_not").is_none());
        assert_eq!(returning["bool"]["must"].as_array().map(Vec::len), Some(2));
    }
}
