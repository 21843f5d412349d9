//! Helpers for reading aggregation values out of raw search responses.
//!
//! Missing aggregations decode to `0` / empty slices so every result shape
//! stays dense even when the engine returns a sparse response.

use serde_json::Value;

/// Walk `path` from the response's `aggregations` object and read the
/// numeric `value` leaf, defaulting to 0.0.
pub fn agg_f64(resp: &Value, path: &[&str]) -> f64 {
    let mut node = match resp.get("aggregations") {
        Some(aggs) => aggs,
        None => return 0.0,
    };
    for key in path {
        node = match node.get(key) {
            Some(next) => next,
            None => return 0.0,
        };
    }
    node.get("value").and_then(Value::as_f64).unwrap_or(0.0)
}

pub fn agg_u64(resp: &Value, path: &[&str]) -> u64 {
    agg_f64(resp, path).max(0.0) as u64
}

/// Bucket list of the aggregation at `path`, or empty.
pub fn buckets<'a>(resp: &'a Value, path: &[&str]) -> &'a [Value] {
    let mut node = match resp.get("aggregations") {
        Some(aggs) => aggs,
        None => return &[],
    };
    for key in path {
        node = match node.get(key) {
            Some(next) => next,
            None => return &[],
        };
    }
    node.get("buckets")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Buckets of the `group_by` aggregation, reading through the
/// `inner_group_by` level when the grouping field was nested. The single
/// place that knows about the two shapes.
pub fn group_buckets(resp: &Value) -> &[Value] {
    let inner = resp
        .get("aggregations")
        .and_then(|aggs| aggs.get("group_by"))
        .and_then(|group| group.get("inner_group_by"));
    if inner.is_some() {
        buckets(resp, &["group_by", "inner_group_by"])
    } else {
        buckets(resp, &["group_by"])
    }
}

/// Terms bucket key as a string; numeric keys are stringified.
pub fn bucket_key(bucket: &Value) -> String {
    match bucket.get("key") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Histogram bucket key in its formatted form.
pub fn bucket_key_string(bucket: &Value) -> String {
    bucket
        .get("key_as_string")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub fn doc_count(bucket: &Value) -> u64 {
    bucket.get("doc_count").and_then(Value::as_u64).unwrap_or(0)
}

/// Metric `value` leaf at `path` inside a single bucket, defaulting to 0.0.
pub fn bucket_f64(bucket: &Value, path: &[&str]) -> f64 {
    let mut node = bucket;
    for key in path {
        node = match node.get(key) {
            Some(next) => next,
            None => return 0.0,
        };
    }
    node.get("value").and_then(Value::as_f64).unwrap_or(0.0)
}

pub fn bucket_u64(bucket: &Value, path: &[&str]) -> u64 {
    bucket_f64(bucket, path).max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_aggregations_decode_to_zero() {
        assert_eq!(agg_u64(&json!({}), &["current_views", "total_views"]), 0);
        assert!(buckets(&json!({"took": 3}), &["daily"]).is_empty());
    }

    #[test]
    fn reads_value_leaf_through_path() {
        let resp = json!({
            "aggregations": {
                "current_views": { "total_views": { "value": 1000 } }
            }
        });
        assert_eq!(agg_u64(&resp, &["current_views", "total_views"]), 1000);
    }

    #[test]
    fn group_buckets_handles_both_shapes() {
        let flat = json!({
            "aggregations": { "group_by": { "buckets": [{ "key": "a" }] } }
        });
        let nested = json!({
            "aggregations": {
                "group_by": {
                    "doc_count": 7,
                    "inner_group_by": { "buckets": [{ "key": "b" }, { "key": "c" }] }
                }
            }
        });
        assert_eq!(group_buckets(&flat).len(), 1);
        assert_eq!(group_buckets(&nested).len(), 2);
    }

    #[test]
    fn numeric_bucket_keys_are_stringified() {
        assert_eq!(bucket_key(&json!({ "key": 42 })), "42");
        assert_eq!(bucket_key(&json!({ "key": "mobile" })), "mobile");
    }
}
